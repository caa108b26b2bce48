use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::analytics::error::{downstream_error, unavailable, AnalyticsResult};
use crate::analytics::{
    BrowserInitOptions, BrowserSdk, BrowserSdkLoader, Identify, Properties, Revenue, SessionId,
};

#[derive(Clone, Debug, PartialEq)]
pub enum SdkCall {
    Init(String, Option<String>, BrowserInitOptions),
    Track(String, Properties),
    SetUserId(Option<String>),
    Identify(Identify),
    Revenue(Revenue),
    Reset,
    SetDeviceId(String),
    Flush,
}

struct SdkState {
    calls: Vec<SdkCall>,
    fail_next: Option<String>,
    device_id: Option<String>,
    session_id: Option<SessionId>,
}

/// Browser library double. Reports device id `"device-1"` and session id `42` until
/// [`RecordingSdk::clear_ids`] is called.
#[derive(Clone)]
pub struct RecordingSdk {
    state: Arc<Mutex<SdkState>>,
}

impl Default for RecordingSdk {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SdkState {
                calls: Vec::new(),
                fail_next: None,
                device_id: Some("device-1".to_string()),
                session_id: Some(42),
            })),
        }
    }
}

impl RecordingSdk {
    pub fn calls(&self) -> Vec<SdkCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Makes the next library call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn clear_ids(&self) {
        let mut state = self.state.lock().unwrap();
        state.device_id = None;
        state.session_id = None;
    }

    pub fn loader(&self) -> RecordingLoader {
        RecordingLoader {
            sdk: self.clone(),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn check(&self) -> AnalyticsResult<()> {
        match self.state.lock().unwrap().fail_next.take() {
            Some(message) => Err(downstream_error(message)),
            None => Ok(()),
        }
    }

    fn record(&self, call: SdkCall) -> AnalyticsResult<()> {
        self.check()?;
        self.state.lock().unwrap().calls.push(call);
        Ok(())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl BrowserSdk for RecordingSdk {
    async fn init(
        &self,
        api_key: &str,
        user_id: Option<&str>,
        options: &BrowserInitOptions,
    ) -> AnalyticsResult<()> {
        self.record(SdkCall::Init(
            api_key.to_string(),
            user_id.map(str::to_string),
            options.clone(),
        ))
    }

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<()> {
        self.record(SdkCall::Track(event_name.to_string(), properties.clone()))
    }

    fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<()> {
        self.record(SdkCall::SetUserId(user_id.map(str::to_string)))
    }

    async fn identify(&self, identify: &Identify) -> AnalyticsResult<()> {
        self.record(SdkCall::Identify(identify.clone()))
    }

    async fn revenue(&self, revenue: &Revenue) -> AnalyticsResult<()> {
        self.record(SdkCall::Revenue(revenue.clone()))
    }

    fn reset(&self) -> AnalyticsResult<()> {
        self.record(SdkCall::Reset)
    }

    fn set_device_id(&self, device_id: &str) -> AnalyticsResult<()> {
        self.record(SdkCall::SetDeviceId(device_id.to_string()))
    }

    fn device_id(&self) -> AnalyticsResult<Option<String>> {
        self.check()?;
        Ok(self.state.lock().unwrap().device_id.clone())
    }

    fn session_id(&self) -> AnalyticsResult<Option<SessionId>> {
        self.check()?;
        Ok(self.state.lock().unwrap().session_id)
    }

    async fn flush(&self) -> AnalyticsResult<()> {
        self.record(SdkCall::Flush)
    }
}

/// Loader that hands out a [`RecordingSdk`] and counts how often it was asked to.
#[derive(Clone)]
pub struct RecordingLoader {
    sdk: RecordingSdk,
    loads: Arc<AtomicUsize>,
}

impl RecordingLoader {
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl BrowserSdkLoader for RecordingLoader {
    async fn load(&self) -> AnalyticsResult<Arc<dyn BrowserSdk>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.sdk.clone()) as Arc<dyn BrowserSdk>)
    }
}

/// Loader whose every attempt fails, as when the library script cannot be fetched.
#[derive(Default)]
pub struct FailingLoader {
    loads: AtomicUsize,
}

impl FailingLoader {
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl BrowserSdkLoader for FailingLoader {
    async fn load(&self) -> AnalyticsResult<Arc<dyn BrowserSdk>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Err(unavailable("Failed to resolve module specifier"))
    }
}
