use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::analytics::browser::{BrowserChannel, BrowserSdkLoader};
use crate::analytics::channel::AnalyticsChannel;
use crate::analytics::config::AmplitudeConfig;
use crate::analytics::constants::{MSG_API_KEY_REQUIRED, MSG_EVENT_NAME_REQUIRED};
use crate::analytics::error::{invalid_argument, AnalyticsResult};
use crate::analytics::native::{NativeBridge, NativeChannel};
use crate::analytics::types::{Properties, Revenue, SessionId};
use crate::platform::environment::Environment;

/// Uniform entry point for the analytics operations.
///
/// The downstream channel is chosen once, when the facade is built, and kept for the
/// facade's lifetime. Cloning is cheap and clones share the channel.
///
/// Only [`initialize`](Self::initialize) and [`track`](Self::track) validate their
/// arguments locally; everything else is forwarded as given and the downstream SDK owns
/// validation.
#[derive(Clone)]
pub struct Amplitude {
    inner: Arc<AmplitudeInner>,
}

struct AmplitudeInner {
    channel: Arc<dyn AnalyticsChannel>,
    initialized: AtomicBool,
}

impl fmt::Debug for Amplitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Amplitude")
            .field("channel", &self.inner.channel.name())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Amplitude {
    pub fn with_channel(channel: Arc<dyn AnalyticsChannel>) -> Self {
        Self {
            inner: Arc::new(AmplitudeInner {
                channel,
                initialized: AtomicBool::new(false),
            }),
        }
    }

    /// Routes every call through the container's plugin invocation primitive.
    pub fn native(bridge: Arc<dyn NativeBridge>) -> Self {
        Self::with_channel(Arc::new(NativeChannel::new(bridge)))
    }

    /// Drives the browser library, acquired through `loader` on first use.
    pub fn browser(loader: Arc<dyn BrowserSdkLoader>) -> Self {
        Self::with_channel(Arc::new(BrowserChannel::new(loader)))
    }

    /// Picks the channel matching `environment`. The unused collaborator is dropped.
    pub fn for_environment(
        environment: Environment,
        bridge: Arc<dyn NativeBridge>,
        loader: Arc<dyn BrowserSdkLoader>,
    ) -> Self {
        match environment {
            Environment::Native => Self::native(bridge),
            Environment::Browser => Self::browser(loader),
        }
    }

    /// Inspects the hosting page once and binds to Cordova's `exec` inside a native
    /// container, or to the browser library otherwise.
    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    pub fn detect() -> Self {
        use crate::analytics::wasm::{CordovaExec, JsBrowserSdkLoader};

        Self::for_environment(
            crate::platform::environment::detect(),
            Arc::new(CordovaExec::new()),
            Arc::new(JsBrowserSdkLoader::new()),
        )
    }

    /// Name of the bound channel (`"native"` or `"browser"`).
    pub fn channel_name(&self) -> &'static str {
        self.inner.channel.name()
    }

    /// Whether an [`initialize`](Self::initialize) call has succeeded through this facade.
    /// Informational only; other operations are not gated on it.
    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::SeqCst)
    }

    pub async fn initialize(&self, config: &AmplitudeConfig) -> AnalyticsResult<String> {
        if !config.has_api_key() {
            return Err(invalid_argument(MSG_API_KEY_REQUIRED));
        }
        self.trace("initialize");
        let result = self.inner.channel.initialize(config).await?;
        self.inner.initialized.store(true, Ordering::SeqCst);
        Ok(result)
    }

    /// Tracks `event_name`. Missing properties are sent as an empty map.
    pub async fn track(
        &self,
        event_name: &str,
        properties: Option<Properties>,
    ) -> AnalyticsResult<String> {
        if event_name.trim().is_empty() {
            return Err(invalid_argument(MSG_EVENT_NAME_REQUIRED));
        }
        self.trace("track");
        let properties = properties.unwrap_or_default();
        self.inner.channel.track(event_name, &properties).await
    }

    pub async fn identify(
        &self,
        user_id: Option<&str>,
        properties: Option<Properties>,
    ) -> AnalyticsResult<String> {
        self.trace("identify");
        let properties = properties.unwrap_or_default();
        self.inner.channel.identify(user_id, &properties).await
    }

    /// Sets or, with `None`, clears the user id.
    pub async fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<String> {
        self.trace("setUserId");
        self.inner.channel.set_user_id(user_id).await
    }

    pub async fn set_user_properties(&self, properties: Properties) -> AnalyticsResult<String> {
        self.trace("setUserProperties");
        self.inner.channel.set_user_properties(&properties).await
    }

    pub async fn log_revenue(&self, revenue: &Revenue) -> AnalyticsResult<String> {
        self.trace("logRevenue");
        self.inner.channel.log_revenue(revenue).await
    }

    /// Forgets the current user (logout).
    pub async fn reset(&self) -> AnalyticsResult<String> {
        self.trace("reset");
        self.inner.channel.reset().await
    }

    pub async fn set_device_id(&self, device_id: &str) -> AnalyticsResult<String> {
        self.trace("setDeviceId");
        self.inner.channel.set_device_id(device_id).await
    }

    pub async fn device_id(&self) -> AnalyticsResult<String> {
        self.trace("getDeviceId");
        self.inner.channel.device_id().await
    }

    pub async fn session_id(&self) -> AnalyticsResult<SessionId> {
        self.trace("getSessionId");
        self.inner.channel.session_id().await
    }

    /// Asks the downstream SDK to upload pending events now.
    pub async fn flush(&self) -> AnalyticsResult<String> {
        self.trace("flush");
        self.inner.channel.flush().await
    }

    fn trace(&self, operation: &str) {
        log::debug!("dispatching {operation} via {} channel", self.channel_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::error::AnalyticsErrorCode;
    use crate::analytics::types::Identify;
    use crate::test_support::{FailingLoader, RecordingBridge, RecordingSdk, SdkCall};
    use serde_json::json;

    fn properties(value: serde_json::Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn initialize_without_api_key_touches_no_channel() {
        let bridge = RecordingBridge::default();
        let sdk = RecordingSdk::default();
        let loader = Arc::new(sdk.loader());
        let native = Amplitude::native(Arc::new(bridge.clone()));
        let browser = Amplitude::browser(loader.clone());

        for amplitude in [&native, &browser] {
            let err = amplitude
                .initialize(&AmplitudeConfig::default())
                .await
                .unwrap_err();
            assert_eq!(err.code, AnalyticsErrorCode::InvalidArgument);
            assert_eq!(err.message(), "API key is required");
            assert!(!amplitude.is_initialized());
        }

        assert!(bridge.calls().is_empty());
        assert_eq!(loader.load_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn track_rejects_empty_names_before_dispatch() {
        let bridge = RecordingBridge::default();
        let amplitude = Amplitude::native(Arc::new(bridge.clone()));

        for name in ["", "   "] {
            let err = amplitude.track(name, None).await.unwrap_err();
            assert_eq!(err.code, AnalyticsErrorCode::InvalidArgument);
            assert_eq!(err.message(), "Event name is required");
        }
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn successful_initialize_sets_latch() {
        let bridge = RecordingBridge::default();
        let amplitude = Amplitude::native(Arc::new(bridge.clone()));
        assert!(!amplitude.is_initialized());

        amplitude
            .initialize(&AmplitudeConfig::new("key"))
            .await
            .unwrap();
        assert!(amplitude.is_initialized());
        assert!(amplitude.clone().is_initialized());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_initialize_leaves_latch_unset() {
        let bridge = RecordingBridge::default();
        bridge.respond_with("initialize", Err(json!("Error initializing Amplitude: boom")));
        let amplitude = Amplitude::native(Arc::new(bridge));

        let err = amplitude
            .initialize(&AmplitudeConfig::new("key"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Error initializing Amplitude: boom");
        assert!(!amplitude.is_initialized());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn track_defaults_missing_properties_to_empty_map() {
        let sdk = RecordingSdk::default();
        let amplitude = Amplitude::browser(Arc::new(sdk.loader()));
        amplitude.track("opened", None).await.unwrap();
        assert_eq!(
            sdk.calls(),
            vec![SdkCall::Track("opened".to_string(), Properties::new())]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn browser_revenue_passes_descriptor_through() {
        let sdk = RecordingSdk::default();
        let amplitude = Amplitude::browser(Arc::new(sdk.loader()));
        let revenue = Revenue::new("sku1", 2, 9.99)
            .with_revenue_type("purchase")
            .with_properties(properties(json!({ "coupon": "WELCOME" })));

        let result = amplitude.log_revenue(&revenue).await.unwrap();
        assert_eq!(result, "Revenue logged successfully");
        assert_eq!(sdk.calls(), vec![SdkCall::Revenue(revenue)]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn for_environment_selects_matching_channel() {
        let bridge = Arc::new(RecordingBridge::default());
        let loader = Arc::new(FailingLoader::default());

        let native =
            Amplitude::for_environment(Environment::Native, bridge.clone(), loader.clone());
        assert_eq!(native.channel_name(), "native");

        let browser = Amplitude::for_environment(Environment::Browser, bridge, loader.clone());
        assert_eq!(browser.channel_name(), "browser");
        let err = browser.reset().await.unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Unavailable);
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn set_user_properties_builds_identify_for_browser() {
        let sdk = RecordingSdk::default();
        let amplitude = Amplitude::browser(Arc::new(sdk.loader()));
        amplitude
            .set_user_properties(properties(json!({ "tier": "gold" })))
            .await
            .unwrap();
        assert_eq!(
            sdk.calls(),
            vec![SdkCall::Identify(Identify::new().set("tier", "gold"))]
        );
    }
}
