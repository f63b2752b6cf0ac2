//! Browser tests: `wasm-pack test --headless --chrome crates/dach-wasm`

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement, SvgElement};

use dach_wasm::DachSwitch;

wasm_bindgen_test_configure!(run_in_browser);

struct Fixture {
    document: Document,
    content: Element,
    host: Element,
}

impl Fixture {
    fn new(items: &str) -> Self {
        let document = web_sys::window().unwrap().document().unwrap();
        let body = document.body().unwrap();

        let content = document.create_element("div").unwrap();
        content.set_inner_html(items);
        body.append_child(&content).unwrap();

        let host = document.create_element("div").unwrap();
        body.append_child(&host).unwrap();

        Self {
            document,
            content,
            host,
        }
    }

    fn dach() -> Self {
        Self::new(
            r#"
            <div class="item" data-country="DE" id="de-item">Germany Content</div>
            <div class="item" data-country="AT" id="at-item">Austria Content</div>
            <div class="item" data-country="CH" id="ch-item">Swiss Content</div>
            "#,
        )
    }

    fn display(&self, id: &str) -> String {
        self.document
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
            .style()
            .get_property_value("display")
            .unwrap()
    }

    fn svg_display(&self, id: &str) -> String {
        self.document
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<SvgElement>()
            .unwrap()
            .style()
            .get_property_value("display")
            .unwrap()
    }

    fn count(&self, selector: &str) -> u32 {
        self.host.query_selector_all(selector).unwrap().length()
    }

    fn click(&self, selector: &str) {
        self.host
            .query_selector(selector)
            .unwrap()
            .unwrap_or_else(|| panic!("no element for {selector}"))
            .dyn_into::<HtmlElement>()
            .unwrap()
            .click();
    }

    fn has(&self, selector: &str) -> bool {
        self.host.query_selector(selector).unwrap().is_some()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.content.remove();
        self.host.remove();
    }
}

fn options(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

fn labels(switch: &DachSwitch) -> Vec<String> {
    switch
        .active_labels()
        .iter()
        .filter_map(|value| value.as_string())
        .collect()
}

/// Collect every change object passed to `on_change`.
fn record_changes(switch: &DachSwitch) -> (js_sys::Array, Closure<dyn FnMut(JsValue)>) {
    let seen = js_sys::Array::new();
    let sink = seen.clone();
    let callback = Closure::wrap(Box::new(move |change: JsValue| {
        sink.push(&change);
    }) as Box<dyn FnMut(JsValue)>);
    switch.on_change(callback.as_ref().unchecked_ref::<js_sys::Function>().clone());
    (seen, callback)
}

#[wasm_bindgen_test]
fn renders_flags() {
    let fixture = Fixture::dach();
    let _switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();

    assert!(fixture.has(r#"button[title="Filter by D"]"#));
    assert!(fixture.has(r#"button[title="Filter by A"]"#));
    assert!(fixture.has(r#"button[title="Filter by CH"]"#));
    assert!(fixture.has(r#"button[title="Toggle All Countries"]"#));
}

#[wasm_bindgen_test]
fn default_selection_shows_everything() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();

    assert_eq!(fixture.display("de-item"), "");
    assert_eq!(fixture.display("at-item"), "");
    assert!(switch.is_all_selected());
}

#[wasm_bindgen_test]
fn deselected_flag_hides_content() {
    let fixture = Fixture::dach();
    let _switch = DachSwitch::new(
        fixture.host.clone(),
        options(r#"{"defaultAllActive": false, "defaultActive": ["D"]}"#),
    )
    .unwrap();

    assert_eq!(fixture.display("de-item"), "");
    assert_eq!(fixture.display("at-item"), "none");

    fixture.click(r#"[data-testid="flag-A"]"#);
    assert_eq!(fixture.display("at-item"), "");
}

#[wasm_bindgen_test]
fn labels_map_to_custom_attribute_values() {
    let fixture = Fixture::new(
        r#"
        <div lang="DE" id="custom-de">DE Lang</div>
        <div lang="AT" id="custom-at">AT Lang</div>
        "#,
    );
    let _switch = DachSwitch::new(
        fixture.host.clone(),
        options(r#"{"countryCodeAttribute": "lang", "defaultAllActive": false, "defaultActive": "D"}"#),
    )
    .unwrap();

    assert_eq!(fixture.display("custom-de"), "");
    assert_eq!(fixture.display("custom-at"), "none");
}

#[wasm_bindgen_test]
fn master_toggle_clears_and_restores() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();

    fixture.click(r#"button[title="Toggle All Countries"]"#);
    assert_eq!(fixture.display("de-item"), "none");
    assert_eq!(switch.active_labels().length(), 0);

    fixture.click(r#"button[title="Toggle All Countries"]"#);
    assert_eq!(fixture.display("de-item"), "");
    assert!(switch.is_all_selected());
}

#[wasm_bindgen_test]
fn aria_pressed_follows_selection() {
    let fixture = Fixture::dach();
    let _switch = DachSwitch::new(fixture.host.clone(), options(r#"{"singleSelect": true}"#)).unwrap();

    fixture.click(r#"[data-testid="flag-CH"]"#);
    let pressed = |label: &str| {
        fixture
            .host
            .query_selector(&format!(r#"[data-testid="flag-{label}"]"#))
            .unwrap()
            .unwrap()
            .get_attribute("aria-pressed")
    };
    assert_eq!(pressed("CH").as_deref(), Some("true"));
    assert_eq!(pressed("D").as_deref(), Some("false"));
    assert_eq!(fixture.display("ch-item"), "");
    assert_eq!(fixture.display("de-item"), "none");
}

#[wasm_bindgen_test]
fn persisted_selection_survives_remount() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item("dach-test-selection").unwrap();

    let fixture = Fixture::dach();
    let opts = r#"{"persist": true, "storageKey": "dach-test-selection", "defaultAllActive": false, "defaultActive": "CH"}"#;
    let switch = DachSwitch::new(fixture.host.clone(), options(opts)).unwrap();
    switch.toggle("A").unwrap();
    assert_eq!(
        storage.get_item("dach-test-selection").unwrap().as_deref(),
        Some(r#"["CH","A"]"#)
    );

    switch.unmount();
    assert!(!fixture.has("button"));

    let again = DachSwitch::new(fixture.host.clone(), options(opts)).unwrap();
    assert_eq!(labels(&again), vec!["CH", "A"]);
    assert_eq!(fixture.display("de-item"), "none");

    storage.remove_item("dach-test-selection").unwrap();
}

#[wasm_bindgen_test]
fn change_listener_receives_plain_objects() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();

    let (seen, callback) = record_changes(&switch);

    fixture.click(r#"[data-testid="flag-D"]"#);
    assert_eq!(seen.length(), 1);

    let change = seen.get(0);
    let all = js_sys::Reflect::get(&change, &"allSelected".into()).unwrap();
    assert_eq!(all.as_bool(), Some(false));
    let active = js_sys::Array::from(&js_sys::Reflect::get(&change, &"active".into()).unwrap());
    assert_eq!(active.length(), 2);

    drop(callback);
}

#[wasm_bindgen_test]
fn invalid_options_are_rejected() {
    let fixture = Fixture::dach();
    let duplicate = options(r#"{"countries": [{"label": "D", "code": "DE"}, {"label": "D", "code": "AT"}]}"#);
    assert!(DachSwitch::new(fixture.host.clone(), duplicate).is_err());
    assert!(!fixture.has("button"));
}

#[wasm_bindgen_test]
fn svg_targets_are_hidden_too() {
    let fixture = Fixture::new(
        r#"
        <div data-country="DE" id="de-item">Germany Content</div>
        <svg data-country="AT" id="at-map" width="10" height="10"></svg>
        "#,
    );
    let switch = DachSwitch::new(
        fixture.host.clone(),
        options(r#"{"defaultAllActive": false, "defaultActive": "D"}"#),
    )
    .unwrap();

    assert_eq!(fixture.svg_display("at-map"), "none");
    assert_eq!(fixture.display("de-item"), "");

    switch.toggle("A").unwrap();
    assert_eq!(fixture.svg_display("at-map"), "");
}

#[wasm_bindgen_test]
fn null_default_active_still_mounts() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(
        fixture.host.clone(),
        options(r#"{"defaultAllActive": false, "defaultActive": null}"#),
    )
    .unwrap();

    assert!(switch.is_all_selected());
    assert_eq!(fixture.count("[data-testid]"), 3);
}

#[wasm_bindgen_test]
fn remount_rerenders_once_with_new_options() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();

    switch.remount(options(r#"{"singleSelect": true}"#)).unwrap();
    assert_eq!(fixture.count(".dach-switch"), 1);
    assert_eq!(fixture.count("[data-testid]"), 3);

    fixture.click(r#"[data-testid="flag-A"]"#);
    assert_eq!(labels(&switch), vec!["A"]);
    assert_eq!(fixture.display("at-item"), "");
    assert_eq!(fixture.display("de-item"), "none");

    fixture.click(r#"[data-testid="flag-CH"]"#);
    assert_eq!(labels(&switch), vec!["CH"]);
    assert_eq!(fixture.display("at-item"), "none");
}

#[wasm_bindgen_test]
fn remount_reads_storage_again() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item("dach-remount-selection").unwrap();

    let fixture = Fixture::dach();
    let opts = r#"{"persist": true, "storageKey": "dach-remount-selection"}"#;
    let switch = DachSwitch::new(fixture.host.clone(), options(opts)).unwrap();
    assert!(switch.is_all_selected());

    storage.set_item("dach-remount-selection", r#"["CH"]"#).unwrap();
    switch.remount(options(opts)).unwrap();

    assert_eq!(labels(&switch), vec!["CH"]);
    assert_eq!(fixture.display("ch-item"), "");
    assert_eq!(fixture.display("de-item"), "none");

    storage.remove_item("dach-remount-selection").unwrap();
}

#[wasm_bindgen_test]
fn remount_notifies_listeners() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();
    let (seen, callback) = record_changes(&switch);

    switch.remount(JsValue::UNDEFINED).unwrap();
    assert_eq!(seen.length(), 1);

    let cause = js_sys::Reflect::get(&seen.get(0), &"cause".into()).unwrap();
    let kind = js_sys::Reflect::get(&cause, &"kind".into()).unwrap();
    assert_eq!(kind.as_string().as_deref(), Some("remount"));

    drop(callback);
}

#[wasm_bindgen_test]
fn toggle_after_unmount_changes_nothing() {
    let fixture = Fixture::dach();
    let switch = DachSwitch::new(fixture.host.clone(), JsValue::UNDEFINED).unwrap();
    let (seen, callback) = record_changes(&switch);

    switch.unmount();
    switch.toggle("A").unwrap();
    switch.toggle_all().unwrap();

    assert!(switch.is_all_selected());
    assert_eq!(labels(&switch), vec!["D", "A", "CH"]);
    assert_eq!(fixture.display("at-item"), "");
    assert_eq!(fixture.count("button"), 0);
    assert_eq!(seen.length(), 0);

    drop(callback);
}
