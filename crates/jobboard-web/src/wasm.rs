#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the JobBoardRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use jobboard_core::{Alert, AlertAction, BoardConfig};

use super::dom::{DomView, LocalStorageThemeStore};
use super::runner_core::{RunnerCore, job_id_from_js};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn alert_action_to_js(action: AlertAction) -> JsValue {
    let obj = Object::new();
    let kind = match action {
        AlertAction::Fade(_) => "fade",
        AlertAction::Remove(_) => "remove",
    };
    set_js(&obj, "action", JsValue::from_str(kind));
    set_js(&obj, "id", JsValue::from_str(&action.id().to_string()));
    obj.into()
}

fn alert_to_js(alert: &Alert) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "id", JsValue::from_str(&alert.id.to_string()));
    set_js(&obj, "level", JsValue::from_str(alert.level.as_str()));
    set_js(&obj, "class", JsValue::from_str(&alert.css_class()));
    set_js(&obj, "message", JsValue::from_str(&alert.message));
    obj.into()
}

fn strings_to_js(items: Vec<String>) -> Array {
    let arr = Array::new();
    for item in items {
        arr.push(&JsValue::from_str(&item));
    }
    arr
}

/// Job board runner bound to the live document.
///
/// Host-driven: JavaScript forwards page events as encoded JSON, feeds
/// `performance.now()` through `setTime`, and calls `step` from a timer or
/// `requestAnimationFrame`.
#[wasm_bindgen]
pub struct JobBoardRunner {
    inner: RunnerCore<DomView, LocalStorageThemeStore>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// `"2024-03-05"` as `"Mar 5, 2024"`, or `null` for an invalid date.
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(raw: &str) -> Option<String> {
    jobboard_core::format_date(raw)
}

#[wasm_bindgen]
impl JobBoardRunner {
    /// Create a runner over `window.document`.
    ///
    /// `config_json` is an optional settings object such as
    /// `{"search_debounce_ms":300}`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<JobBoardRunner, JsValue> {
        install_panic_hook();
        let config = match config_json.as_deref() {
            Some(json) => {
                BoardConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?
            }
            None => BoardConfig::default(),
        };
        let view = DomView::from_window().ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self {
            inner: RunnerCore::with_parts(view, LocalStorageThemeStore::from_window(), config),
        })
    }

    /// Apply the stored theme and start timing page alerts.
    ///
    /// `page_alerts_json`: `[{"level":"success","message":"Saved"}]`.
    /// Returns the assigned alert ids, or `null` if the JSON is malformed.
    pub fn init(&mut self, page_alerts_json: Option<String>) -> JsValue {
        let ids = match page_alerts_json.as_deref() {
            Some(json) => self.inner.init_json(json),
            None => Some(self.inner.init(&[])),
        };
        match ids {
            Some(ids) => strings_to_js(ids.iter().map(ToString::to_string).collect()).into(),
            None => JsValue::NULL,
        }
    }

    /// Advance the clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the clock to an absolute millisecond timestamp.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Parse and apply a JSON-encoded page event.
    /// Returns `true` if accepted, `false` if unknown/malformed.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        self.inner.push_encoded_input(json)
    }

    /// Run a filter pass immediately. Returns the visible count.
    #[wasm_bindgen(js_name = filterNow)]
    pub fn filter_now(&mut self) -> u32 {
        self.inner.filter_now().min(u32::MAX as usize) as u32
    }

    /// Fire whatever is due.
    /// Returns `{ events_processed, filtered, visible_count, pending, next_deadline_ms }`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        let obj = Object::new();
        set_js(&obj, "events_processed", result.events_processed.into());
        set_js(&obj, "filtered", result.filtered.into());
        set_js(
            &obj,
            "visible_count",
            result
                .visible_count
                .map_or(JsValue::NULL, |count| JsValue::from_f64(count as f64)),
        );
        set_js(&obj, "pending", result.pending.into());
        set_js(
            &obj,
            "next_deadline_ms",
            self.inner
                .next_deadline_ms()
                .map_or(JsValue::NULL, JsValue::from_f64),
        );
        obj.into()
    }

    /// `"N jobs found"` from the latest pass, or `null`.
    #[wasm_bindgen(js_name = countLabel)]
    pub fn count_label(&self) -> Option<String> {
        self.inner.count_label()
    }

    /// `"light"` or `"dark"`.
    pub fn theme(&self) -> String {
        self.inner.theme().as_str().to_string()
    }

    /// Share payload `{ title, text, url }` as a JSON string, or `null`.
    pub fn share(&self, origin: &str, job_id: f64, title: &str) -> Option<String> {
        let job_id = job_id_from_js(job_id)?;
        serde_json::to_string(&self.inner.share(origin, job_id, title)).ok()
    }

    /// Drain accumulated log lines. Returns `Array<string>`.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        strings_to_js(self.inner.take_logs())
    }

    /// Drain alert transitions. Returns `Array<{ action, id }>`.
    #[wasm_bindgen(js_name = takeAlertActions)]
    pub fn take_alert_actions(&mut self) -> Array {
        let arr = Array::new();
        for action in self.inner.take_alert_actions() {
            arr.push(&alert_action_to_js(action));
        }
        arr
    }

    /// Drain new notifications. Returns `Array<{ id, level, class, message }>`.
    #[wasm_bindgen(js_name = takeNewAlerts)]
    pub fn take_new_alerts(&mut self) -> Array {
        let arr = Array::new();
        for alert in self.inner.take_new_alerts() {
            arr.push(&alert_to_js(&alert));
        }
        arr
    }

    /// Drain settled global search terms. Returns `Array<string>`.
    #[wasm_bindgen(js_name = takeGlobalSearches)]
    pub fn take_global_searches(&mut self) -> Array {
        strings_to_js(self.inner.take_global_searches())
    }

    /// Drain forms whose submit button should be restored. Returns `Array<string>`.
    #[wasm_bindgen(js_name = takeReleasedForms)]
    pub fn take_released_forms(&mut self) -> Array {
        strings_to_js(self.inner.take_released_forms())
    }
}
