//! Runtime environment detection.
//!
//! The facade binds to one channel for its whole lifetime, so detection is meant to run
//! once, when the facade is built.

use std::env;

/// Variable that forces the detected environment (`browser` or `native`).
pub const ENVIRONMENT_OVERRIDE_VAR: &str = "AMPLITUDE_BRIDGE_ENV";

/// Where the host application is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Embedded in a native mobile container that exposes the plugin bridge.
    Native,
    /// A regular browser page without a native container.
    Browser,
}

impl Environment {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "browser" => Some(Environment::Browser),
            "native" => Some(Environment::Native),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Native => "native",
            Environment::Browser => "browser",
        }
    }
}

fn forced_environment() -> Option<Environment> {
    let raw = env::var(ENVIRONMENT_OVERRIDE_VAR).ok()?;
    let parsed = Environment::parse(&raw);
    if parsed.is_none() {
        log::warn!("ignoring unrecognised {ENVIRONMENT_OVERRIDE_VAR} value `{raw}`");
    }
    parsed
}

/// Returns the environment the facade should bind to.
///
/// A page with a `window` but no `window.cordova` is a browser; anything else is treated
/// as a native container. [`ENVIRONMENT_OVERRIDE_VAR`] takes precedence when set to a
/// recognised value.
pub fn detect() -> Environment {
    let environment = forced_environment().unwrap_or_else(detect_from_runtime);
    log::debug!("detected {} environment", environment.as_str());
    environment
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
fn detect_from_runtime() -> Environment {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return Environment::Native;
    };
    let has_cordova = js_sys::Reflect::get(&window, &JsValue::from_str("cordova"))
        .map(|value| value.is_truthy())
        .unwrap_or(false);
    if has_cordova {
        Environment::Native
    } else {
        Environment::Browser
    }
}

#[cfg(not(all(feature = "wasm-web", target_arch = "wasm32")))]
fn detect_from_runtime() -> Environment {
    Environment::Native
}
