//! Channel that forwards every operation through the host container's generic plugin
//! invocation primitive.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::analytics::channel::AnalyticsChannel;
use crate::analytics::config::AmplitudeConfig;
use crate::analytics::constants::*;
use crate::analytics::error::{downstream_error, from_rejection, payload_text, AnalyticsResult};
use crate::analytics::types::{decode_session_id, Properties, Revenue, SessionId};

/// Generic "invoke `action` on `service` with positional `args`" primitive exposed by the
/// native container.
///
/// The future resolves with the payload handed to the success callback, or fails with the
/// payload handed to the failure callback.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait NativeBridge: Send + Sync {
    async fn exec(&self, service: &str, action: &str, args: Vec<Value>) -> Result<Value, Value>;
}

#[derive(Clone)]
pub struct NativeChannel {
    bridge: Arc<dyn NativeBridge>,
}

impl fmt::Debug for NativeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeChannel")
            .field("service", &SERVICE_NAME)
            .finish()
    }
}

impl NativeChannel {
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self { bridge }
    }

    async fn call(&self, action: &str, args: Vec<Value>) -> AnalyticsResult<Value> {
        log::debug!("native exec {SERVICE_NAME}.{action} with {} argument(s)", args.len());
        self.bridge
            .exec(SERVICE_NAME, action, args)
            .await
            .map_err(from_rejection)
    }

    async fn call_for_text(&self, action: &str, args: Vec<Value>) -> AnalyticsResult<String> {
        self.call(action, args).await.map(payload_text)
    }
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::String(text.to_string()))
}

pub(crate) fn revenue_args(revenue: &Revenue) -> Vec<Value> {
    vec![
        Value::String(revenue.product_id.clone()),
        json!(revenue.quantity),
        json!(revenue.price),
        optional_text(revenue.revenue_type.as_deref()),
        Value::Object(revenue.properties.clone()),
    ]
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl AnalyticsChannel for NativeChannel {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn initialize(&self, config: &AmplitudeConfig) -> AnalyticsResult<String> {
        let config = serde_json::to_value(config)
            .map_err(|err| downstream_error(format!("failed to encode configuration: {err}")))?;
        self.call_for_text(METHOD_INITIALIZE, vec![config]).await
    }

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<String> {
        self.call_for_text(
            METHOD_TRACK,
            vec![
                Value::String(event_name.to_string()),
                Value::Object(properties.clone()),
            ],
        )
        .await
    }

    async fn identify(
        &self,
        user_id: Option<&str>,
        properties: &Properties,
    ) -> AnalyticsResult<String> {
        self.call_for_text(
            METHOD_IDENTIFY,
            vec![optional_text(user_id), Value::Object(properties.clone())],
        )
        .await
    }

    async fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<String> {
        self.call_for_text(METHOD_SET_USER_ID, vec![optional_text(user_id)])
            .await
    }

    async fn set_user_properties(&self, properties: &Properties) -> AnalyticsResult<String> {
        self.call_for_text(
            METHOD_SET_USER_PROPERTIES,
            vec![Value::Object(properties.clone())],
        )
        .await
    }

    async fn log_revenue(&self, revenue: &Revenue) -> AnalyticsResult<String> {
        self.call_for_text(METHOD_LOG_REVENUE, revenue_args(revenue))
            .await
    }

    async fn reset(&self) -> AnalyticsResult<String> {
        self.call_for_text(METHOD_RESET, Vec::new()).await
    }

    async fn set_device_id(&self, device_id: &str) -> AnalyticsResult<String> {
        self.call_for_text(
            METHOD_SET_DEVICE_ID,
            vec![Value::String(device_id.to_string())],
        )
        .await
    }

    async fn device_id(&self) -> AnalyticsResult<String> {
        match self.call(METHOD_GET_DEVICE_ID, Vec::new()).await? {
            Value::Null => Err(downstream_error("native bridge returned no device id")),
            payload => Ok(payload_text(payload)),
        }
    }

    async fn session_id(&self) -> AnalyticsResult<SessionId> {
        let payload = self.call(METHOD_GET_SESSION_ID, Vec::new()).await?;
        decode_session_id(&payload)
    }

    async fn flush(&self) -> AnalyticsResult<String> {
        self.call_for_text(METHOD_FLUSH, Vec::new()).await
    }
}
