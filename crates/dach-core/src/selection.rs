//! Selection state
//!
//! The set of active labels, held in insertion order so the persisted array
//! reflects the order in which toggles were switched on. "All selected" is
//! always derived from the configuration, never stored.

use crate::config::SwitchConfig;

/// Active labels of one mounted switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every configured label, in configuration order.
    pub fn all(config: &SwitchConfig) -> Self {
        Self {
            active: config.labels().map(str::to_string).collect(),
        }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for label in labels {
            selection.insert(label.into());
        }
        selection
    }

    pub fn contains(&self, label: &str) -> bool {
        self.active.iter().any(|active| active == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// True iff every configured label is active. False for an empty config.
    pub fn is_all_selected(&self, config: &SwitchConfig) -> bool {
        !config.countries.is_empty() && config.labels().all(|label| self.contains(label))
    }

    fn insert(&mut self, label: String) {
        if !self.contains(&label) {
            self.active.push(label);
        }
    }

    fn remove(&mut self, label: &str) {
        self.active.retain(|active| active != label);
    }

    /// Toggle one label: radio semantics in single-select mode, checkbox
    /// semantics otherwise.
    pub fn toggle(&mut self, label: &str, single_select: bool) {
        if single_select {
            self.active.clear();
            self.active.push(label.to_string());
        } else if self.contains(label) {
            self.remove(label);
        } else {
            self.active.push(label.to_string());
        }
    }

    /// Everything becomes nothing, anything else becomes everything.
    pub fn toggle_all(&mut self, config: &SwitchConfig) {
        if self.is_all_selected(config) {
            self.active.clear();
        } else {
            *self = Self::all(config);
        }
    }
}

/// Where an initial selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSource {
    Persisted,
    AllActive,
    Default,
    /// The caller default resolved to nothing.
    Fallback,
}

/// Initial selection from persisted labels, the all-active flag, or the
/// caller default, in that order.
///
/// `persisted` must already be filtered to known labels (see
/// [`crate::storage::load_persisted`]).
pub fn resolve_initial(
    config: &SwitchConfig,
    persisted: Option<Vec<String>>,
) -> (Selection, InitialSource) {
    if let Some(labels) = persisted.filter(|labels| !labels.is_empty()) {
        return (Selection::from_labels(labels), InitialSource::Persisted);
    }

    if config.default_all_active {
        return (Selection::all(config), InitialSource::AllActive);
    }

    let mut selection = Selection::new();
    for entry in config.default_active.entries() {
        if config.has_label(entry) {
            selection.insert(entry.clone());
        } else if let Some(option) = config.option_by_code(entry) {
            selection.insert(option.label.clone());
        } else {
            log::debug!("Dropping unresolvable default selection entry '{}'", entry);
        }
    }

    if selection.is_empty() {
        (Selection::all(config), InitialSource::Fallback)
    } else {
        (selection, InitialSource::Default)
    }
}
