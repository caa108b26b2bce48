/// Service name the native container registers the analytics plugin under.
pub const SERVICE_NAME: &str = "AmplitudePlugin";

pub(crate) const METHOD_INITIALIZE: &str = "initialize";
pub(crate) const METHOD_TRACK: &str = "track";
pub(crate) const METHOD_IDENTIFY: &str = "identify";
pub(crate) const METHOD_SET_USER_ID: &str = "setUserId";
pub(crate) const METHOD_SET_USER_PROPERTIES: &str = "setUserProperties";
pub(crate) const METHOD_LOG_REVENUE: &str = "logRevenue";
pub(crate) const METHOD_RESET: &str = "reset";
pub(crate) const METHOD_SET_DEVICE_ID: &str = "setDeviceId";
pub(crate) const METHOD_GET_DEVICE_ID: &str = "getDeviceId";
pub(crate) const METHOD_GET_SESSION_ID: &str = "getSessionId";
pub(crate) const METHOD_FLUSH: &str = "flush";

pub(crate) const MSG_API_KEY_REQUIRED: &str = "API key is required";
pub(crate) const MSG_EVENT_NAME_REQUIRED: &str = "Event name is required";
pub(crate) const MSG_SDK_UNAVAILABLE: &str = "Browser SDK not available";

pub(crate) const MSG_INITIALIZED: &str = "Amplitude initialized successfully";
pub(crate) const MSG_TRACKED: &str = "Event tracked successfully";
pub(crate) const MSG_IDENTIFIED: &str = "User identified successfully";
pub(crate) const MSG_USER_ID_SET: &str = "User ID set successfully";
pub(crate) const MSG_USER_PROPERTIES_SET: &str = "User properties set successfully";
pub(crate) const MSG_REVENUE_LOGGED: &str = "Revenue logged successfully";
pub(crate) const MSG_RESET: &str = "User reset successfully";
pub(crate) const MSG_DEVICE_ID_SET: &str = "Device ID set successfully";
pub(crate) const MSG_FLUSHED: &str = "Events flushed successfully";

/// Global the browser library may already be exposed under.
#[cfg_attr(not(all(feature = "wasm-web", target_arch = "wasm32")), allow(dead_code))]
pub(crate) const BROWSER_GLOBAL_HANDLE: &str = "amplitudeBrowser";
/// Module specifier used for the dynamic import fallback.
#[cfg_attr(not(all(feature = "wasm-web", target_arch = "wasm32")), allow(dead_code))]
pub(crate) const BROWSER_MODULE_SPECIFIER: &str = "@amplitude/analytics-browser";
