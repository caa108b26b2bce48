use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::analytics::NativeBridge;

#[derive(Clone, Debug, PartialEq)]
pub struct NativeCall {
    pub service: String,
    pub action: String,
    pub args: Vec<Value>,
}

#[derive(Default)]
struct BridgeState {
    calls: Vec<NativeCall>,
    responses: HashMap<String, Result<Value, Value>>,
}

/// Native bridge double that records every invocation and answers `"ok"` unless a response
/// was configured for the action.
#[derive(Clone, Default)]
pub struct RecordingBridge {
    state: Arc<Mutex<BridgeState>>,
}

impl RecordingBridge {
    pub fn calls(&self) -> Vec<NativeCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn respond_with(&self, action: &str, response: Result<Value, Value>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(action.to_string(), response);
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl NativeBridge for RecordingBridge {
    async fn exec(&self, service: &str, action: &str, args: Vec<Value>) -> Result<Value, Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(NativeCall {
            service: service.to_string(),
            action: action.to_string(),
            args,
        });
        state
            .responses
            .get(action)
            .cloned()
            .unwrap_or_else(|| Ok(json!("ok")))
    }
}
