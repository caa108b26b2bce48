use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analytics::error::{downstream_error, AnalyticsResult};

/// Arbitrary event or user properties, forwarded without inspection.
pub type Properties = Map<String, Value>;

/// Session identifier as reported by the downstream SDK (milliseconds since the epoch).
pub type SessionId = i64;

/// A batch of user-property `set` operations, the shape the browser library's `identify`
/// call consumes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Identify {
    operations: Vec<(String, Value)>,
}

impl Identify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.operations.push((key.into(), value.into()));
        self
    }

    pub fn from_properties(properties: &Properties) -> Self {
        properties
            .iter()
            .fold(Self::new(), |identify, (key, value)| identify.set(key.as_str(), value.clone()))
    }

    pub fn operations(&self) -> &[(String, Value)] {
        &self.operations
    }
}

/// A revenue event. Values are not range-checked; the downstream SDK owns validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_type: Option<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Revenue {
    pub fn new(product_id: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
            revenue_type: None,
            properties: Properties::new(),
        }
    }

    /// Label such as `"purchase"` or `"subscription"`.
    pub fn with_revenue_type(mut self, revenue_type: impl Into<String>) -> Self {
        self.revenue_type = Some(revenue_type.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Revenue type only when one was provided and it is not empty.
    #[cfg_attr(not(all(feature = "wasm-web", target_arch = "wasm32")), allow(dead_code))]
    pub(crate) fn revenue_type_label(&self) -> Option<&str> {
        self.revenue_type.as_deref().filter(|label| !label.is_empty())
    }
}

/// Decodes a session id reported either as a JSON number or as its decimal string.
pub(crate) fn decode_session_id(payload: &Value) -> AnalyticsResult<SessionId> {
    let decoded = match payload {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    decoded.ok_or_else(|| downstream_error(format!("unexpected session id payload: {payload}")))
}
