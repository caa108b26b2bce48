//! Drives the native channel with a bridge that prints each plugin invocation instead of
//! handing it to a mobile container. Swap `PrintingBridge` for your container's binding.

use std::sync::Arc;

use amplitude_bridge::analytics::{Amplitude, AmplitudeConfig, NativeBridge, Revenue};
use async_trait::async_trait;
use serde_json::{json, Value};

struct PrintingBridge;

#[async_trait]
impl NativeBridge for PrintingBridge {
    async fn exec(&self, service: &str, action: &str, args: Vec<Value>) -> Result<Value, Value> {
        println!("exec {service}.{action} {}", Value::Array(args));
        match action {
            "getSessionId" => Ok(json!("1700000000000")),
            "getDeviceId" => Ok(json!("demo-device")),
            _ => Ok(json!(format!("{action} ok"))),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let amplitude = Amplitude::native(Arc::new(PrintingBridge));

    let config = AmplitudeConfig::new("YOUR_API_KEY")
        .with_user_id("user-42")
        .with_tracking_session_events(true);
    amplitude.initialize(&config).await?;

    let properties = json!({ "screen": "home" }).as_object().cloned();
    amplitude.track("screen_viewed", properties).await?;
    amplitude
        .log_revenue(&Revenue::new("sku1", 2, 9.99).with_revenue_type("purchase"))
        .await?;

    println!("device id: {}", amplitude.device_id().await?);
    println!("session id: {}", amplitude.session_id().await?);
    amplitude.flush().await?;

    Ok(())
}
