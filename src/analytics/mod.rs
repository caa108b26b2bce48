mod api;
pub mod browser;
mod channel;
mod config;
pub mod constants;
pub mod error;
pub mod native;
mod types;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub mod wasm;

pub use api::Amplitude;
pub use browser::{BrowserChannel, BrowserSdk, BrowserSdkLoader, LoadState, ReadySdkLoader};
pub use channel::AnalyticsChannel;
pub use config::{AmplitudeConfig, BrowserInitOptions, DefaultTracking};
pub use error::{AnalyticsError, AnalyticsErrorCode, AnalyticsResult};
pub use native::{NativeBridge, NativeChannel};
pub use types::{Identify, Properties, Revenue, SessionId};
