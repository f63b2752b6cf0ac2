//! The switch controller
//!
//! Owns the configuration, the selection state and the injected store.
//! Every change runs the same sequence: update the selection, persist it,
//! notify subscribers. Filtering is driven by the caller through
//! [`Switch::filter`] so the host decides which tree is projected.

use serde::Serialize;

use crate::config::{ConfigError, SwitchConfig};
use crate::filter::{apply_filter, FilterReport, TargetTree};
use crate::selection::{resolve_initial, InitialSource, Selection};
use crate::storage::{load_persisted, save_persisted, SelectionStore};
use crate::view::{all_toggle, toggle_buttons, AllToggle, ToggleButton};

/// Error type for switch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwitchError {
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What triggered a selection change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "camelCase")]
pub enum ChangeCause {
    Toggle(String),
    ToggleAll,
    Remount,
}

/// Notification sent to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionChange {
    pub cause: ChangeCause,
    pub active: Vec<String>,
    pub all_selected: bool,
}

type Listener = Box<dyn FnMut(&SelectionChange)>;

/// A mounted switch.
pub struct Switch<S: SelectionStore> {
    config: SwitchConfig,
    selection: Selection,
    source: InitialSource,
    store: S,
    listeners: Vec<Listener>,
}

impl<S: SelectionStore> Switch<S> {
    /// Validate `config` and compute the initial selection.
    ///
    /// The store is read exactly once here; later reads only happen on
    /// [`Switch::remount`].
    pub fn mount(config: SwitchConfig, store: S) -> Result<Self, SwitchError> {
        config.validate()?;
        let (selection, source) = resolve_initial(&config, load_persisted(&store, &config));
        log::debug!(
            "Mounted with {:?} selection {:?}",
            source,
            selection.labels()
        );
        Ok(Self {
            config,
            selection,
            source,
            store,
            listeners: Vec::new(),
        })
    }

    /// Replace the configuration and start over from persisted storage.
    ///
    /// Subscribers are kept and notified.
    pub fn remount(&mut self, config: SwitchConfig) -> Result<(), SwitchError> {
        config.validate()?;
        let (selection, source) = resolve_initial(&config, load_persisted(&self.store, &config));
        self.config = config;
        self.selection = selection;
        self.source = source;
        self.notify(ChangeCause::Remount);
        Ok(())
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Active labels in held order.
    pub fn active_labels(&self) -> &[String] {
        self.selection.labels()
    }

    pub fn initial_source(&self) -> InitialSource {
        self.source
    }

    pub fn is_active(&self, label: &str) -> bool {
        self.selection.contains(label)
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.config)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Register a callback run after every change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Toggle one option.
    pub fn toggle(&mut self, label: &str) -> Result<(), SwitchError> {
        if !self.config.has_label(label) {
            return Err(SwitchError::UnknownLabel(label.to_string()));
        }
        self.selection.toggle(label, self.config.single_select);
        self.changed(ChangeCause::Toggle(label.to_string()));
        Ok(())
    }

    /// Select everything, or nothing if everything is already selected.
    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.config);
        self.changed(ChangeCause::ToggleAll);
    }

    /// Project the current selection onto `tree`.
    pub fn filter<T: TargetTree + ?Sized>(&self, tree: &mut T) -> FilterReport {
        apply_filter(&self.config, &self.selection, tree)
    }

    pub fn buttons(&self) -> Vec<ToggleButton> {
        toggle_buttons(&self.config, &self.selection)
    }

    pub fn all_toggle(&self) -> Option<AllToggle> {
        all_toggle(&self.config, &self.selection)
    }

    fn changed(&mut self, cause: ChangeCause) {
        log::debug!("{:?} -> {:?}", cause, self.selection.labels());
        if let Err(e) = save_persisted(&mut self.store, &self.config, self.selection.labels()) {
            log::warn!("Selection not persisted: {}", e);
        }
        self.notify(cause);
    }

    fn notify(&mut self, cause: ChangeCause) {
        if self.listeners.is_empty() {
            return;
        }
        let change = SelectionChange {
            cause,
            active: self.selection.labels().to_vec(),
            all_selected: self.is_all_selected(),
        };
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}
