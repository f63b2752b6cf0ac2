//! Filtering engine
//!
//! Projects the active labels onto the target elements of the host page.
//! Every pass is a full rescan: the tree is queried with the effective
//! selector, one attribute is read per node and one visibility is written
//! back.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::SwitchConfig;
use crate::selection::Selection;
use crate::types::Visibility;

// =============================================================================
// Target Tree
// =============================================================================

/// One node the filter can read and hide.
pub trait Target {
    /// Value of `name`, or `None` if the node does not carry it.
    fn attribute(&self, name: &str) -> Option<String>;

    fn set_visibility(&mut self, visibility: Visibility);

    /// Identifier used in reports; `id` attribute by default.
    fn describe(&self) -> String {
        self.attribute("id").unwrap_or_default()
    }
}

impl<T: Target + ?Sized> Target for &mut T {
    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        (**self).set_visibility(visibility)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// A live, mutable tree of elements.
pub trait TargetTree {
    type Node<'a>: Target
    where
        Self: 'a;

    /// Nodes currently matching `selector`, in document order.
    fn select(&mut self, selector: &str) -> Vec<Self::Node<'_>>;
}

// =============================================================================
// Accepted Codes
// =============================================================================

/// Upper-cased codes (and aliases) of every active option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedCodes {
    codes: HashSet<String>,
}

impl AcceptedCodes {
    /// Labels without a configured option are skipped.
    pub fn from_selection(config: &SwitchConfig, selection: &Selection) -> Self {
        let mut codes = HashSet::new();
        for label in selection.labels() {
            match config.option(label) {
                Some(option) => codes.extend(option.matching_codes()),
                None => log::debug!("Skipping unknown label '{}'", label),
            }
        }
        Self { codes }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&code.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Decision for a node whose attribute value is `value`.
    ///
    /// Nodes without the attribute are not subject to the filter and are
    /// always visible.
    pub fn decide(&self, value: Option<&str>) -> Visibility {
        match value {
            None => Visibility::Visible,
            Some(code) => Visibility::from(self.contains(code)),
        }
    }
}

// =============================================================================
// Filter Pass
// =============================================================================

/// Decision taken for one matched node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDecision {
    pub target: String,
    /// Attribute value as found on the node
    pub code: Option<String>,
    pub visibility: Visibility,
}

/// Outcome of one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub selector: String,
    pub decisions: Vec<FilterDecision>,
}

impl FilterReport {
    pub fn visible_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|decision| decision.visibility.is_visible())
            .count()
    }

    pub fn hidden_count(&self) -> usize {
        self.decisions.len() - self.visible_count()
    }

    /// Decision for the node described as `target`.
    pub fn visibility_of(&self, target: &str) -> Option<Visibility> {
        self.decisions
            .iter()
            .find(|decision| decision.target == target)
            .map(|decision| decision.visibility)
    }
}

/// Run one pass over `tree` and apply the decisions.
pub fn apply_filter<T: TargetTree + ?Sized>(
    config: &SwitchConfig,
    selection: &Selection,
    tree: &mut T,
) -> FilterReport {
    let selector = config.effective_selector();
    let accepted = AcceptedCodes::from_selection(config, selection);
    let attribute = config.country_code_attribute.as_str();

    let mut decisions = Vec::new();
    for mut node in tree.select(&selector) {
        let code = node.attribute(attribute);
        let visibility = accepted.decide(code.as_deref());
        node.set_visibility(visibility);
        decisions.push(FilterDecision {
            target: node.describe(),
            code,
            visibility,
        });
    }

    let report = FilterReport { selector, decisions };
    log::debug!(
        "Filter pass over '{}': {} visible, {} hidden",
        report.selector,
        report.visible_count(),
        report.hidden_count()
    );
    report
}
