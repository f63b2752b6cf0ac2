//! The rendered control.
//!
//! Buttons are created once per mount and updated in place after every
//! change, so click handlers are never dropped while one of them runs.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use dach_core::filter::FilterReport;
use dach_core::switch::{SelectionChange, Switch, SwitchError};
use dach_core::SwitchConfig;

use crate::dom::DocumentTree;
use crate::storage::LocalStore;

type ClickHandler = Closure<dyn FnMut(Event)>;

enum Action {
    Toggle(String),
    ToggleAll,
}

/// Elements created by one render.
struct Controls {
    root: Element,
    all_toggle: Option<Element>,
    buttons: Vec<Element>,
    handlers: Vec<(Element, ClickHandler)>,
}

impl Controls {
    fn update(&self, switch: &Switch<LocalStore>) {
        for (button, view) in self.buttons.iter().zip(switch.buttons()) {
            set_pressed(button, view.active);
            set_class(button, "active", view.active);
            set_class(button, "highlighted", view.highlighted);
        }

        if let (Some(button), Some(view)) = (&self.all_toggle, switch.all_toggle()) {
            set_pressed(button, view.pressed);
            set_class(button, "active", view.pressed);
        }
    }

    fn remove(self) {
        for (target, handler) in &self.handlers {
            let _ = target
                .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        }
        self.root.remove();
    }
}

pub(crate) struct Widget {
    document: Document,
    container: Element,
    switch: RefCell<Switch<LocalStore>>,
    controls: RefCell<Option<Controls>>,
    mounted: Cell<bool>,
    pending: Rc<RefCell<VecDeque<SelectionChange>>>,
    listeners: RefCell<Vec<js_sys::Function>>,
}

impl Widget {
    pub(crate) fn mount(container: Element, config: SwitchConfig) -> Result<Rc<Self>, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("Container is not attached to a document"))?;

        let mut switch = Switch::mount(config, LocalStore::from_window()).map_err(to_js)?;
        let pending: Rc<RefCell<VecDeque<SelectionChange>>> = Rc::new(RefCell::new(VecDeque::new()));
        let queue = Rc::clone(&pending);
        switch.subscribe(move |change| queue.borrow_mut().push_back(change.clone()));

        let widget = Rc::new(Self {
            document,
            container,
            switch: RefCell::new(switch),
            controls: RefCell::new(None),
            mounted: Cell::new(true),
            pending,
            listeners: RefCell::new(Vec::new()),
        });

        let controls = widget.render()?;
        *widget.controls.borrow_mut() = Some(controls);
        widget.refresh();
        Ok(widget)
    }

    pub(crate) fn remount(self: &Rc<Self>, config: SwitchConfig) -> Result<(), JsValue> {
        self.switch.borrow_mut().remount(config).map_err(to_js)?;
        self.teardown();
        let controls = self.render()?;
        *self.controls.borrow_mut() = Some(controls);
        self.mounted.set(true);
        self.refresh();
        self.flush();
        Ok(())
    }

    pub(crate) fn unmount(&self) {
        self.teardown();
        self.mounted.set(false);
        self.pending.borrow_mut().clear();
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub(crate) fn switch(&self) -> std::cell::Ref<'_, Switch<LocalStore>> {
        self.switch.borrow()
    }

    pub(crate) fn subscribe(&self, callback: js_sys::Function) {
        self.listeners.borrow_mut().push(callback);
    }

    pub(crate) fn toggle(&self, label: &str) -> Result<(), JsValue> {
        self.dispatch(&Action::Toggle(label.to_string())).map_err(to_js)
    }

    pub(crate) fn toggle_all(&self) -> Result<(), JsValue> {
        self.dispatch(&Action::ToggleAll).map_err(to_js)
    }

    /// Run a filter pass over the document and sync the buttons.
    pub(crate) fn refresh(&self) -> FilterReport {
        let switch = self.switch.borrow();
        if let Some(controls) = self.controls.borrow().as_ref() {
            controls.update(&switch);
        }
        let mut tree = DocumentTree::new(self.document.clone());
        switch.filter(&mut tree)
    }

    fn dispatch(&self, action: &Action) -> Result<(), SwitchError> {
        if !self.is_mounted() {
            log::warn!("Ignoring input on an unmounted switch");
            return Ok(());
        }
        {
            let mut switch = self.switch.borrow_mut();
            match action {
                Action::Toggle(label) => switch.toggle(label)?,
                Action::ToggleAll => switch.toggle_all(),
            }
        }
        self.refresh();
        self.flush();
        Ok(())
    }

    /// Deliver queued changes once no borrow of the switch is held, so
    /// callbacks may call back into the switch.
    fn flush(&self) {
        let changes: Vec<SelectionChange> = self.pending.borrow_mut().drain(..).collect();
        if changes.is_empty() {
            return;
        }
        let listeners = self.listeners.borrow().clone();
        for change in &changes {
            let value = to_js_value(change);
            for listener in &listeners {
                if let Err(e) = listener.call1(&JsValue::NULL, &value) {
                    log::warn!("Change listener threw: {:?}", e);
                }
            }
        }
    }

    fn teardown(&self) {
        if let Some(controls) = self.controls.borrow_mut().take() {
            controls.remove();
        }
    }

    fn render(self: &Rc<Self>) -> Result<Controls, JsValue> {
        let switch = self.switch.borrow();
        let document = &self.document;

        let root = create(document, "div", "dach-switch")?;
        let mut handlers = Vec::new();

        let all_toggle = match switch.all_toggle() {
            Some(view) => {
                let button = create(document, "button", "dach-switch__all")?;
                button.set_attribute("type", "button")?;
                button.set_attribute("title", &view.title)?;

                let knob = create(document, "span", "dach-switch__knob")?;
                button.append_child(&knob)?;
                let label = create(document, "span", "dach-switch__label")?;
                label.set_text_content(Some(&view.label));
                button.append_child(&label)?;

                handlers.push(self.on_click(&button, Action::ToggleAll)?);
                root.append_child(&button)?;
                let divider = create(document, "div", "dach-switch__divider")?;
                root.append_child(&divider)?;
                Some(button)
            }
            None => None,
        };

        let flags = create(document, "div", "dach-switch__flags")?;
        let mut buttons = Vec::new();
        for view in switch.buttons() {
            let button = create(document, "button", "dach-switch__flag")?;
            button.set_attribute("type", "button")?;
            button.set_attribute("title", &view.title)?;
            button.set_attribute("data-testid", &view.test_id)?;

            let glyph = create(document, "span", "dach-switch__glyph")?;
            glyph.set_text_content(Some(&view.flag));
            button.append_child(&glyph)?;

            handlers.push(self.on_click(&button, Action::Toggle(view.label))?);
            flags.append_child(&button)?;
            buttons.push(button);
        }
        root.append_child(&flags)?;
        self.container.append_child(&root)?;

        let controls = Controls {
            root,
            all_toggle,
            buttons,
            handlers,
        };
        controls.update(&switch);
        Ok(controls)
    }

    fn on_click(
        self: &Rc<Self>,
        target: &Element,
        action: Action,
    ) -> Result<(Element, ClickHandler), JsValue> {
        let widget: Weak<Self> = Rc::downgrade(self);
        let handler = Closure::wrap(Box::new(move |_event: Event| {
            let Some(widget) = widget.upgrade() else {
                return;
            };
            if let Err(e) = widget.dispatch(&action) {
                log::warn!("Click ignored: {}", e);
            }
        }) as Box<dyn FnMut(Event)>);

        target.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        Ok((target.clone(), handler))
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        if let Some(controls) = self.controls.get_mut().take() {
            controls.remove();
        }
    }
}

fn create(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

fn set_pressed(element: &Element, pressed: bool) {
    let _ = element.set_attribute("aria-pressed", if pressed { "true" } else { "false" });
}

fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

pub(crate) fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize through JSON so the JS side receives a plain object.
pub(crate) fn to_js_value<T: serde::Serialize>(value: &T) -> JsValue {
    serde_json::to_string(value)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::NULL)
}
