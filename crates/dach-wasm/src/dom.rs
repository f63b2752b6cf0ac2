//! Live document adapter for the filtering engine.

use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, SvgElement};

use dach_core::filter::{Target, TargetTree};
use dach_core::types::Visibility;

/// `document.querySelectorAll` on every pass; nothing is cached.
pub struct DocumentTree {
    document: Document,
}

impl DocumentTree {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl TargetTree for DocumentTree {
    type Node<'a> = DomTarget;

    fn select(&mut self, selector: &str) -> Vec<Self::Node<'_>> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Selector '{}' rejected by the document: {:?}", selector, e);
                return Vec::new();
            }
        };

        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(DomTarget)
            .collect()
    }
}

/// One matched element.
pub struct DomTarget(Element);

impl Target for DomTarget {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        let Some(style) = style_of(&self.0) else {
            log::warn!("<{}> has no inline style; left as is", self.0.tag_name());
            return;
        };
        if let Err(e) = style.set_property("display", visibility.display_value()) {
            log::warn!("Failed to set display on <{}>: {:?}", self.0.tag_name(), e);
        }
    }

    fn describe(&self) -> String {
        let id = self.0.id();
        if id.is_empty() {
            self.0.tag_name().to_lowercase()
        } else {
            id
        }
    }
}

/// Inline style of HTML, SVG and any other element exposing `style`
/// (e.g. MathML).
fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    if let Some(svg) = element.dyn_ref::<SvgElement>() {
        return Some(svg.style());
    }
    js_sys::Reflect::get(element, &"style".into())
        .ok()
        .and_then(|style| style.dyn_into::<CssStyleDeclaration>().ok())
}
