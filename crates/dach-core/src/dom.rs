//! In-memory element tree
//!
//! A flat list of elements with a small selector matcher. It stands in for
//! the browser document in tests, benchmarks and the CLI preview.
//!
//! Supported selectors are comma-separated compounds of:
//! `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`, `[attr="value"]`.
//! Combinators (descendant, child, sibling) are not supported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::{Target, TargetTree};
use crate::types::Visibility;

// =============================================================================
// Elements
// =============================================================================

/// One element with attributes and an inline `display` style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryElement {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    display: String,
}

fn default_tag() -> String {
    "div".to_string()
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            display: String::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Inline `display` value; empty means shown.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn set_display(&mut self, value: &str) {
        self.display = value.to_string();
    }

    pub fn is_visible(&self) -> bool {
        self.display != "none"
    }
}

impl Target for MemoryElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name).map(str::to_string)
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.set_display(visibility.display_value());
    }
}

// =============================================================================
// Selectors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,
    #[error("Unsupported selector syntax at '{0}'")]
    Unsupported(String),
    #[error("Unterminated attribute selector in '{0}'")]
    Unterminated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Tag(String),
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEquals(String, String),
}

impl Condition {
    fn matches(&self, element: &MemoryElement) -> bool {
        match self {
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::HasAttr(name) => element.attributes.contains_key(name),
            Self::AttrEquals(name, value) => element.get_attribute(name) == Some(value.as_str()),
        }
    }
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Vec<Condition>>,
}

impl Selector {
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let mut groups = Vec::new();
        for group in split_groups(text) {
            let group = group.trim();
            if group.is_empty() {
                return Err(SelectorError::Empty);
            }
            groups.push(parse_compound(group)?);
        }
        Ok(Self { groups })
    }

    pub fn matches(&self, element: &MemoryElement) -> bool {
        self.groups
            .iter()
            .any(|conditions| conditions.iter().all(|c| c.matches(element)))
    }
}

/// Split at commas outside attribute brackets and quoted values.
fn split_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(&text[start..]);
    groups
}

/// Index of the `]` closing an attribute condition, skipping quoted values.
fn find_close(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> (&str, &str) {
    let end = rest
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    (&rest[..end], &rest[end..])
}

fn parse_compound(text: &str) -> Result<Vec<Condition>, SelectorError> {
    let mut conditions = Vec::new();
    let mut rest = text;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let (tag, after) = take_ident(rest);
        if !tag.is_empty() {
            conditions.push(Condition::Tag(tag.to_string()));
            rest = after;
        }
    }

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let (id, after) = take_ident(after);
            if id.is_empty() {
                return Err(SelectorError::Unsupported(rest.to_string()));
            }
            conditions.push(Condition::Id(id.to_string()));
            rest = after;
        } else if let Some(after) = rest.strip_prefix('.') {
            let (class, after) = take_ident(after);
            if class.is_empty() {
                return Err(SelectorError::Unsupported(rest.to_string()));
            }
            conditions.push(Condition::Class(class.to_string()));
            rest = after;
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = find_close(after)
                .ok_or_else(|| SelectorError::Unterminated(text.to_string()))?;
            conditions.push(parse_attribute(&after[..close], rest)?);
            rest = &after[close + 1..];
        } else {
            return Err(SelectorError::Unsupported(rest.to_string()));
        }
    }

    Ok(conditions)
}

fn parse_attribute(inner: &str, context: &str) -> Result<Condition, SelectorError> {
    let (name, value) = match inner.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (inner.trim(), None),
    };

    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(SelectorError::Unsupported(context.to_string()));
    }

    Ok(match value {
        None => Condition::HasAttr(name.to_string()),
        Some(value) => {
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Condition::AttrEquals(name.to_string(), unquoted.to_string())
        }
    })
}

// =============================================================================
// Tree
// =============================================================================

/// Flat element list in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryTree {
    elements: Vec<MemoryElement>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements<I: IntoIterator<Item = MemoryElement>>(elements: I) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    pub fn push(&mut self, element: MemoryElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[MemoryElement] {
        &self.elements
    }

    pub fn by_id(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.iter().find(|el| el.id() == Some(id))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut MemoryElement> {
        self.elements.iter_mut().find(|el| el.id() == Some(id))
    }
}

impl TargetTree for MemoryTree {
    type Node<'a> = &'a mut MemoryElement;

    fn select(&mut self, selector: &str) -> Vec<Self::Node<'_>> {
        let selector = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(e) => {
                log::warn!("Selector '{}' matches nothing: {}", selector, e);
                return Vec::new();
            }
        };
        self.elements
            .iter_mut()
            .filter(|el| selector.matches(el))
            .collect()
    }
}
