#![cfg(all(feature = "wasm-web", target_arch = "wasm32"))]

//! JavaScript bindings for the two downstream collaborators: Cordova's `exec` primitive and
//! the Amplitude browser library.

use std::sync::Arc;

use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::analytics::browser::{BrowserSdk, BrowserSdkLoader};
use crate::analytics::config::BrowserInitOptions;
use crate::analytics::constants::{BROWSER_GLOBAL_HANDLE, BROWSER_MODULE_SPECIFIER};
use crate::analytics::error::{downstream_error, unavailable, AnalyticsResult};
use crate::analytics::native::NativeBridge;
use crate::analytics::types::{Identify, Properties, Revenue, SessionId};

#[wasm_bindgen(inline_js = "export function import_module(specifier) { return import(specifier); }")]
extern "C" {
    fn import_module(specifier: &str) -> Promise;
}

fn json_to_js(value: &Value) -> AnalyticsResult<JsValue> {
    js_sys::JSON::parse(&value.to_string())
        .map_err(|err| downstream_error(format_js_error("JSON.parse", err)))
}

fn js_to_json(value: &JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_else(|| Value::String(format!("{value:?}")))
}

/// Text of a JS rejection, kept as close to the original as possible.
fn rejection_text(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    match js_to_json(err) {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn format_js_error(context: &str, err: JsValue) -> String {
    format!("{context} failed: {}", rejection_text(&err))
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| value.is_truthy())
}

fn optional_str(value: Option<&str>) -> JsValue {
    value.map_or(JsValue::UNDEFINED, JsValue::from_str)
}

fn call_method(target: &JsValue, method: &str, args: &Array) -> AnalyticsResult<JsValue> {
    let function = Reflect::get(target, &JsValue::from_str(method))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(|| downstream_error(format!("browser SDK does not export `{method}`")))?;
    function
        .apply(target, args)
        .map_err(|err| downstream_error(rejection_text(&err)))
}

/// `window.cordova.exec(success, failure, service, action, args)` wrapped in a future.
#[derive(Clone, Copy, Debug, Default)]
pub struct CordovaExec;

impl CordovaExec {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl NativeBridge for CordovaExec {
    async fn exec(&self, service: &str, action: &str, args: Vec<Value>) -> Result<Value, Value> {
        let window = web_sys::window().ok_or_else(|| Value::from("window is not available"))?;
        let cordova = property(&window, "cordova")
            .ok_or_else(|| Value::from("cordova is not available"))?;
        let exec = Reflect::get(&cordova, &JsValue::from_str("exec"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| Value::from("cordova.exec is not available"))?;

        let js_args = Array::new();
        for arg in &args {
            let value = json_to_js(arg).map_err(|err| Value::from(err.message()))?;
            js_args.push(&value);
        }

        let service = JsValue::from_str(service);
        let action = JsValue::from_str(action);
        let promise = Promise::new(&mut |resolve, reject| {
            let params = Array::of5(&resolve, &reject, &service, &action, &js_args);
            if let Err(err) = exec.apply(&cordova, &params) {
                let _ = reject.call1(&JsValue::UNDEFINED, &err);
            }
        });

        JsFuture::from(promise)
            .await
            .map(|value| js_to_json(&value))
            .map_err(|err| js_to_json(&err))
    }
}

/// Handle to the Amplitude browser library (module namespace or global object).
pub struct JsBrowserSdk {
    handle: JsValue,
}

// wasm32 without threads runs on a single thread; the handle never crosses threads.
unsafe impl Send for JsBrowserSdk {}
unsafe impl Sync for JsBrowserSdk {}

impl JsBrowserSdk {
    pub fn new(handle: JsValue) -> Self {
        Self { handle }
    }

    fn call(&self, method: &str, args: &Array) -> AnalyticsResult<JsValue> {
        call_method(&self.handle, method, args)
    }

    /// Calls `method` and awaits the `{ promise }` the library returns.
    async fn call_and_wait(&self, method: &str, args: &Array) -> AnalyticsResult<JsValue> {
        let result = self.call(method, args)?;
        match property(&result, "promise") {
            Some(promise) => JsFuture::from(Promise::from(promise))
                .await
                .map_err(|err| downstream_error(rejection_text(&err))),
            None => Ok(result),
        }
    }

    fn construct(&self, class: &str) -> AnalyticsResult<JsValue> {
        let constructor = Reflect::get(&self.handle, &JsValue::from_str(class))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| downstream_error(format!("browser SDK does not export `{class}`")))?;
        Reflect::construct(&constructor, &Array::new())
            .map_err(|err| downstream_error(format_js_error(class, err)))
    }

    fn build_identify(&self, identify: &Identify) -> AnalyticsResult<JsValue> {
        let target = self.construct("Identify")?;
        for (key, value) in identify.operations() {
            let args = Array::of2(&JsValue::from_str(key), &json_to_js(value)?);
            call_method(&target, "set", &args)?;
        }
        Ok(target)
    }

    fn build_revenue(&self, revenue: &Revenue) -> AnalyticsResult<JsValue> {
        let target = self.construct("Revenue")?;
        call_method(
            &target,
            "setProductId",
            &Array::of1(&JsValue::from_str(&revenue.product_id)),
        )?;
        call_method(
            &target,
            "setQuantity",
            &Array::of1(&JsValue::from_f64(revenue.quantity as f64)),
        )?;
        call_method(&target, "setPrice", &Array::of1(&JsValue::from_f64(revenue.price)))?;
        if let Some(label) = revenue.revenue_type_label() {
            call_method(&target, "setRevenueType", &Array::of1(&JsValue::from_str(label)))?;
        }
        if !revenue.properties.is_empty() {
            let properties = json_to_js(&Value::Object(revenue.properties.clone()))?;
            call_method(&target, "setEventProperties", &Array::of1(&properties))?;
        }
        Ok(target)
    }
}

#[async_trait(?Send)]
impl BrowserSdk for JsBrowserSdk {
    async fn init(
        &self,
        api_key: &str,
        user_id: Option<&str>,
        options: &BrowserInitOptions,
    ) -> AnalyticsResult<()> {
        let options = serde_json::to_value(options)
            .map_err(|err| downstream_error(format!("failed to encode init options: {err}")))?;
        let args = Array::of3(
            &JsValue::from_str(api_key),
            &optional_str(user_id),
            &json_to_js(&options)?,
        );
        self.call_and_wait("init", &args).await.map(|_| ())
    }

    async fn track(&self, event_name: &str, properties: &Properties) -> AnalyticsResult<()> {
        let properties = json_to_js(&Value::Object(properties.clone()))?;
        let args = Array::of2(&JsValue::from_str(event_name), &properties);
        self.call_and_wait("track", &args).await.map(|_| ())
    }

    fn set_user_id(&self, user_id: Option<&str>) -> AnalyticsResult<()> {
        self.call("setUserId", &Array::of1(&optional_str(user_id)))
            .map(|_| ())
    }

    async fn identify(&self, identify: &Identify) -> AnalyticsResult<()> {
        let target = self.build_identify(identify)?;
        self.call_and_wait("identify", &Array::of1(&target))
            .await
            .map(|_| ())
    }

    async fn revenue(&self, revenue: &Revenue) -> AnalyticsResult<()> {
        let target = self.build_revenue(revenue)?;
        self.call_and_wait("revenue", &Array::of1(&target))
            .await
            .map(|_| ())
    }

    fn reset(&self) -> AnalyticsResult<()> {
        self.call("reset", &Array::new()).map(|_| ())
    }

    fn set_device_id(&self, device_id: &str) -> AnalyticsResult<()> {
        self.call("setDeviceId", &Array::of1(&JsValue::from_str(device_id)))
            .map(|_| ())
    }

    fn device_id(&self) -> AnalyticsResult<Option<String>> {
        self.call("getDeviceId", &Array::new())
            .map(|value| value.as_string())
    }

    fn session_id(&self) -> AnalyticsResult<Option<SessionId>> {
        self.call("getSessionId", &Array::new())
            .map(|value| value.as_f64().map(|id| id as SessionId))
    }

    async fn flush(&self) -> AnalyticsResult<()> {
        self.call_and_wait("flush", &Array::new()).await.map(|_| ())
    }
}

/// Resolves the browser library from `window.amplitudeBrowser`, falling back to a dynamic
/// `import('@amplitude/analytics-browser')`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsBrowserSdkLoader;

impl JsBrowserSdkLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl BrowserSdkLoader for JsBrowserSdkLoader {
    async fn load(&self) -> AnalyticsResult<Arc<dyn BrowserSdk>> {
        let window = web_sys::window().ok_or_else(|| unavailable("window is not available"))?;
        let handle = match property(&window, BROWSER_GLOBAL_HANDLE) {
            Some(handle) => handle,
            None => JsFuture::from(import_module(BROWSER_MODULE_SPECIFIER))
                .await
                .map_err(|err| unavailable(format_js_error("import", err)))?,
        };
        Ok(Arc::new(JsBrowserSdk::new(handle)) as Arc<dyn BrowserSdk>)
    }
}
