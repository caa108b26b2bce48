//! Drives the browser channel with an in-memory stand-in for the browser library. In a
//! wasm build with the `wasm-web` feature, `Amplitude::detect()` binds the real library.

use std::sync::{Arc, Mutex};

use amplitude_bridge::analytics::{
    Amplitude, AmplitudeConfig, AnalyticsResult, BrowserInitOptions, BrowserSdk, Identify,
    Properties, ReadySdkLoader, Revenue, SessionId,
};
use async_trait::async_trait;
use serde_json::json;

#[derive(Default)]
struct ConsoleSdk {
    user_id: Mutex<Option<String>>,
}

#[async_trait]
impl BrowserSdk for ConsoleSdk {
    async fn init(
        &self,
        api_key: &str,
        user_id: Option<&str>,
        options: &BrowserInitOptions,
    ) -> AnalyticsResult<()> {
        println!("init {api_key} user={user_id:?} options={options:?}");
        *self.user_id.lock().unwrap() = user_id.map(str::to_string);
        Ok(())
    }

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<()> {
        println!("track {event_name} {properties:?}");
        Ok(())
    }

    fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<()> {
        *self.user_id.lock().unwrap() = user_id.map(str::to_string);
        Ok(())
    }

    async fn identify(&self, identify: &Identify) -> AnalyticsResult<()> {
        println!("identify {:?}", identify.operations());
        Ok(())
    }

    async fn revenue(&self, revenue: &Revenue) -> AnalyticsResult<()> {
        println!(
            "revenue {} x{} @ {} type={:?}",
            revenue.product_id, revenue.quantity, revenue.price, revenue.revenue_type
        );
        Ok(())
    }

    fn reset(&self) -> AnalyticsResult<()> {
        self.user_id.lock().unwrap().take();
        Ok(())
    }

    fn set_device_id(&self, device_id: &str) -> AnalyticsResult<()> {
        println!("device id set to {device_id}");
        Ok(())
    }

    fn device_id(&self) -> AnalyticsResult<Option<String>> {
        Ok(Some("console-device".to_string()))
    }

    fn session_id(&self) -> AnalyticsResult<Option<SessionId>> {
        Ok(Some(1))
    }

    async fn flush(&self) -> AnalyticsResult<()> {
        println!("flush");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loader = ReadySdkLoader::new(Arc::new(ConsoleSdk::default()));
    let amplitude = Amplitude::browser(Arc::new(loader));

    let config =
        AmplitudeConfig::new("YOUR_API_KEY").with_min_time_between_sessions_millis(300_000);
    amplitude.initialize(&config).await?;

    let properties = json!({ "plan": "pro" }).as_object().cloned();
    amplitude.identify(Some("user-42"), properties).await?;

    let revenue = Revenue::new("annual-plan", 1, 99.0)
        .with_revenue_type("subscription")
        .with_properties(json!({ "coupon": "SPRING" }).as_object().cloned().unwrap_or_default());
    println!("{}", amplitude.log_revenue(&revenue).await?);

    amplitude.reset().await?;
    Ok(())
}
