//! Channel that drives the browser analytics library directly.
//!
//! The library handle is acquired lazily by the first operation that needs it. Acquisition
//! runs at most once per channel: a successful load is cached, and a failed load is logged
//! and then reported as [`AnalyticsErrorCode::Unavailable`] by every later call. The outcome
//! is never reset.
//!
//! [`AnalyticsErrorCode::Unavailable`]: crate::analytics::error::AnalyticsErrorCode::Unavailable

use std::fmt;
use std::sync::Arc;

use async_lock::OnceCell as AsyncOnceCell;
use async_trait::async_trait;

use crate::analytics::channel::AnalyticsChannel;
use crate::analytics::config::{AmplitudeConfig, BrowserInitOptions};
use crate::analytics::constants::*;
use crate::analytics::error::{downstream_error, unavailable, AnalyticsResult};
use crate::analytics::types::{Identify, Properties, Revenue, SessionId};

/// The subset of the browser analytics library this crate drives.
///
/// Async methods correspond to library calls that hand back an awaitable completion; the
/// rest complete synchronously.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait BrowserSdk: Send + Sync {
    async fn init(
        &self,
        api_key: &str,
        user_id: Option<&str>,
        options: &BrowserInitOptions,
    ) -> AnalyticsResult<()>;

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<()>;

    fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<()>;

    async fn identify(&self, identify: &Identify) -> AnalyticsResult<()>;

    /// Sends a revenue event. Implementations set the revenue type only when
    /// [`Revenue::revenue_type`] holds a non-empty label and attach event properties only
    /// when the map is non-empty.
    async fn revenue(&self, revenue: &Revenue) -> AnalyticsResult<()>;

    fn reset(&self) -> AnalyticsResult<()>;

    fn set_device_id(&self, device_id: &str) -> AnalyticsResult<()>;

    fn device_id(&self) -> AnalyticsResult<Option<String>>;

    fn session_id(&self) -> AnalyticsResult<Option<SessionId>>;

    async fn flush(&self) -> AnalyticsResult<()>;
}

/// Produces a handle to the browser library.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait BrowserSdkLoader: Send + Sync {
    async fn load(&self) -> AnalyticsResult<Arc<dyn BrowserSdk>>;
}

/// Loader for hosts that already hold a library handle.
#[derive(Clone)]
pub struct ReadySdkLoader {
    sdk: Arc<dyn BrowserSdk>,
}

impl ReadySdkLoader {
    pub fn new(sdk: Arc<dyn BrowserSdk>) -> Self {
        Self { sdk }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl BrowserSdkLoader for ReadySdkLoader {
    async fn load(&self) -> AnalyticsResult<Arc<dyn BrowserSdk>> {
        Ok(self.sdk.clone())
    }
}

/// Observable state of the one-shot library acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// No load has completed yet (none started, or one is in flight).
    Unloaded,
    Ready,
    Failed,
}

pub struct BrowserChannel {
    loader: Arc<dyn BrowserSdkLoader>,
    handle: AsyncOnceCell<Option<Arc<dyn BrowserSdk>>>,
}

impl fmt::Debug for BrowserChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserChannel")
            .field("load_state", &self.load_state())
            .finish()
    }
}

impl BrowserChannel {
    pub fn new(loader: Arc<dyn BrowserSdkLoader>) -> Self {
        Self {
            loader,
            handle: AsyncOnceCell::new(),
        }
    }

    pub fn load_state(&self) -> LoadState {
        match self.handle.get() {
            None => LoadState::Unloaded,
            Some(Some(_)) => LoadState::Ready,
            Some(None) => LoadState::Failed,
        }
    }

    async fn sdk(&self) -> AnalyticsResult<Arc<dyn BrowserSdk>> {
        let handle = self
            .handle
            .get_or_init(|| async {
                match self.loader.load().await {
                    Ok(sdk) => {
                        log::debug!("Amplitude browser SDK loaded");
                        Some(sdk)
                    }
                    Err(err) => {
                        log::error!("Amplitude browser SDK not available: {err}");
                        None
                    }
                }
            })
            .await;
        handle.clone().ok_or_else(|| unavailable(MSG_SDK_UNAVAILABLE))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl AnalyticsChannel for BrowserChannel {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn initialize(&self, config: &AmplitudeConfig) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        let options = BrowserInitOptions::from_config(config);
        sdk.init(&config.api_key, config.user_id.as_deref(), &options)
            .await?;
        Ok(MSG_INITIALIZED.to_string())
    }

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.track(event_name, properties).await?;
        Ok(MSG_TRACKED.to_string())
    }

    async fn identify(
        &self,
        user_id: Option<&str>,
        properties: &Properties,
    ) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        if let Some(user_id) = user_id.filter(|id| !id.is_empty()) {
            sdk.set_user_id(Some(user_id))?;
        }
        if !properties.is_empty() {
            sdk.identify(&Identify::from_properties(properties)).await?;
        }
        Ok(MSG_IDENTIFIED.to_string())
    }

    async fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.set_user_id(user_id)?;
        Ok(MSG_USER_ID_SET.to_string())
    }

    async fn set_user_properties(&self, properties: &Properties) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.identify(&Identify::from_properties(properties)).await?;
        Ok(MSG_USER_PROPERTIES_SET.to_string())
    }

    async fn log_revenue(&self, revenue: &Revenue) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.revenue(revenue).await?;
        Ok(MSG_REVENUE_LOGGED.to_string())
    }

    async fn reset(&self) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.reset()?;
        Ok(MSG_RESET.to_string())
    }

    async fn set_device_id(&self, device_id: &str) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.set_device_id(device_id)?;
        Ok(MSG_DEVICE_ID_SET.to_string())
    }

    async fn device_id(&self) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.device_id()?
            .ok_or_else(|| downstream_error("browser SDK returned no device id"))
    }

    async fn session_id(&self) -> AnalyticsResult<SessionId> {
        let sdk = self.sdk().await?;
        sdk.session_id()?
            .ok_or_else(|| downstream_error("browser SDK returned no session id"))
    }

    async fn flush(&self) -> AnalyticsResult<String> {
        let sdk = self.sdk().await?;
        sdk.flush().await?;
        Ok(MSG_FLUSHED.to_string())
    }
}
