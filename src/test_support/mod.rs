//! Test doubles shared across crate-level unit tests.

pub mod browser;
pub mod native;

pub use browser::{FailingLoader, RecordingLoader, RecordingSdk, SdkCall};
pub use native::{NativeCall, RecordingBridge};
