//! WebAssembly bindings for DACHSwitch
//!
//! ```js
//! import init, { DachSwitch } from "./pkg/dach_wasm.js";
//! await init();
//! const toggle = new DachSwitch(document.getElementById("switch"), { persist: true });
//! toggle.on_change((change) => console.log(change.active));
//! ```

mod dom;
mod storage;
mod widget;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use dach_core::SwitchConfig;

pub use dom::{DocumentTree, DomTarget};
pub use storage::LocalStore;

use widget::{to_js, to_js_value, Widget};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

/// Parse a JS options object; `undefined` and `null` mean defaults.
fn parse_config(options: &JsValue) -> Result<SwitchConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(SwitchConfig::default());
    }
    let json: String = js_sys::JSON::stringify(options)?.into();
    SwitchConfig::from_json(&json).map_err(to_js)
}

/// A country toggle mounted into a container element.
#[wasm_bindgen]
pub struct DachSwitch {
    widget: Rc<Widget>,
}

#[wasm_bindgen]
impl DachSwitch {
    /// Render into `container` and run the first filter pass.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element, options: JsValue) -> Result<DachSwitch, JsValue> {
        let config = parse_config(&options)?;
        let widget = Widget::mount(container, config)?;
        Ok(DachSwitch { widget })
    }

    /// Same as clicking the button for `label`.
    pub fn toggle(&self, label: &str) -> Result<(), JsValue> {
        self.widget.toggle(label)
    }

    /// Same as clicking the master toggle.
    pub fn toggle_all(&self) -> Result<(), JsValue> {
        self.widget.toggle_all()
    }

    pub fn active_labels(&self) -> js_sys::Array {
        self.widget
            .switch()
            .active_labels()
            .iter()
            .map(|label| JsValue::from_str(label))
            .collect()
    }

    pub fn is_active(&self, label: &str) -> bool {
        self.widget.switch().is_active(label)
    }

    pub fn is_all_selected(&self) -> bool {
        self.widget.switch().is_all_selected()
    }

    pub fn all_toggle_label(&self) -> String {
        self.widget.switch().config().all_toggle_label()
    }

    /// Re-run the filter (e.g. after the page added content) and return the
    /// per-element decisions.
    pub fn filter(&self) -> JsValue {
        to_js_value(&self.widget.refresh())
    }

    /// Call `callback` with `{ cause, active, allSelected }` after every change.
    pub fn on_change(&self, callback: js_sys::Function) {
        self.widget.subscribe(callback);
    }

    /// Rebuild from new options, reading persisted state again.
    pub fn remount(&self, options: JsValue) -> Result<(), JsValue> {
        let config = parse_config(&options)?;
        self.widget.remount(config)
    }

    /// Remove the rendered control. Filtered elements keep their visibility.
    pub fn unmount(&self) {
        self.widget.unmount();
    }
}

/// Validate an options object without mounting anything.
#[wasm_bindgen]
pub fn validate_options(options: JsValue) -> Result<(), JsValue> {
    parse_config(&options).map(|_| ())
}

/// Master toggle label for the given options.
#[wasm_bindgen]
pub fn derive_all_toggle_label(options: JsValue) -> Result<String, JsValue> {
    Ok(parse_config(&options)?.all_toggle_label())
}
