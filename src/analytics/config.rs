use serde::{Deserialize, Serialize};

/// Options accepted by [`Amplitude::initialize`](crate::analytics::Amplitude::initialize).
///
/// The record is handed to the downstream SDK unmodified. On the native channel it is
/// serialized with the camelCase keys the container plugin reads (`apiKey`, `userId`,
/// `trackingSessionEvents`, `minTimeBetweenSessionsMillis`); unset options are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmplitudeConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_session_events: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time_between_sessions_millis: Option<u64>,
}

impl AmplitudeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_tracking_session_events(mut self, enabled: bool) -> Self {
        self.tracking_session_events = Some(enabled);
        self
    }

    pub fn with_min_time_between_sessions_millis(mut self, millis: u64) -> Self {
        self.min_time_between_sessions_millis = Some(millis);
        self
    }

    pub(crate) fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Options object passed as the third argument of the browser library's `init`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserInitOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tracking: Option<DefaultTracking>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DefaultTracking {
    pub sessions: bool,
}

impl BrowserInitOptions {
    pub(crate) fn from_config(config: &AmplitudeConfig) -> Self {
        Self {
            // A zero gap means "unset" for the browser library.
            session_timeout: config.min_time_between_sessions_millis.filter(|millis| *millis > 0),
            default_tracking: config
                .tracking_session_events
                .map(|sessions| DefaultTracking { sessions }),
        }
    }
}
