use async_trait::async_trait;

use crate::analytics::config::AmplitudeConfig;
use crate::analytics::error::AnalyticsResult;
use crate::analytics::types::{Properties, Revenue, SessionId};

/// One of the two downstream routes a facade can be bound to.
///
/// Implementations receive arguments that already passed local validation and forward them
/// as-is. Errors reported downstream are returned unchanged.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AnalyticsChannel: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    async fn initialize(&self, config: &AmplitudeConfig) -> AnalyticsResult<String>;

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<String>;

    async fn identify(
        &self,
        user_id: Option<&str>,
        properties: &Properties,
    ) -> AnalyticsResult<String>;

    async fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<String>;

    async fn set_user_properties(&self, properties: &Properties) -> AnalyticsResult<String>;

    async fn log_revenue(&self, revenue: &Revenue) -> AnalyticsResult<String>;

    async fn reset(&self) -> AnalyticsResult<String>;

    async fn set_device_id(&self, device_id: &str) -> AnalyticsResult<String>;

    async fn device_id(&self) -> AnalyticsResult<String>;

    async fn session_id(&self) -> AnalyticsResult<SessionId>;

    async fn flush(&self) -> AnalyticsResult<String>;
}
