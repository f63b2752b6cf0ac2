//! Switch configuration
//!
//! Every option is defaulted, so an empty JSON object `{}` is a complete
//! configuration for the three DACH regions. A configuration must pass
//! [`SwitchConfig::validate`] before a switch is built from it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{
    default_countries, CountryOption, InitialSelection, DEFAULT_ATTRIBUTE, DEFAULT_STORAGE_KEY,
};

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Country list is empty")]
    NoCountries,
    #[error("Country option #{0} has an empty label")]
    EmptyLabel(usize),
    #[error("Country option '{0}' has an empty code")]
    EmptyCode(String),
    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),
    #[error("Attribute name is empty")]
    EmptyAttribute,
    #[error("Storage key is empty")]
    EmptyStorageKey,
    #[error("Invalid configuration JSON: {0}")]
    Json(String),
}

/// Options accepted by the switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SwitchConfig {
    /// Attribute carrying the region code on target elements
    pub country_code_attribute: String,
    /// Elements subject to filtering; `[<attribute>]` when unset
    #[cfg_attr(feature = "ts", ts(optional))]
    pub target_selector: Option<String>,
    /// Ordered region options
    pub countries: Vec<CountryOption>,
    /// Used only when `default_all_active` is off and nothing is persisted
    pub default_active: InitialSelection,
    pub show_all_toggle: bool,
    /// Master toggle text; derived from the labels when unset
    #[cfg_attr(feature = "ts", ts(optional))]
    pub all_toggle_label: Option<String>,
    pub default_all_active: bool,
    /// Radio semantics instead of checkbox semantics
    pub single_select: bool,
    /// Mirror the selection to the configured storage key
    pub persist: bool,
    pub storage_key: String,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            country_code_attribute: DEFAULT_ATTRIBUTE.to_string(),
            target_selector: None,
            countries: default_countries(),
            default_active: InitialSelection::default(),
            show_all_toggle: true,
            all_toggle_label: None,
            default_all_active: true,
            single_select: false,
            persist: false,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl SwitchConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the switch cannot operate on.
    ///
    /// Duplicate labels are an error rather than resolved by position.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countries.is_empty() {
            return Err(ConfigError::NoCountries);
        }
        if self.country_code_attribute.trim().is_empty() {
            return Err(ConfigError::EmptyAttribute);
        }
        if self.persist && self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.countries.len());
        for (idx, option) in self.countries.iter().enumerate() {
            if option.label.is_empty() {
                return Err(ConfigError::EmptyLabel(idx));
            }
            if option.code.is_empty() {
                return Err(ConfigError::EmptyCode(option.label.clone()));
            }
            if !seen.insert(option.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(option.label.clone()));
            }
        }

        Ok(())
    }

    /// Selector used to collect target elements on every filter pass.
    pub fn effective_selector(&self) -> String {
        match self.target_selector.as_deref().map(str::trim) {
            Some(selector) if !selector.is_empty() => selector.to_string(),
            _ => format!("[{}]", self.country_code_attribute),
        }
    }

    /// Master toggle text: the override, or every label upper-cased and joined.
    pub fn all_toggle_label(&self) -> String {
        match &self.all_toggle_label {
            Some(label) => label.clone(),
            None => self
                .countries
                .iter()
                .map(|option| option.label.to_uppercase())
                .collect(),
        }
    }

    /// Labels in configuration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.countries.iter().map(|option| option.label.as_str())
    }

    pub fn option(&self, label: &str) -> Option<&CountryOption> {
        self.countries.iter().find(|option| option.label == label)
    }

    /// First option whose primary code equals `code`, ignoring case.
    pub fn option_by_code(&self, code: &str) -> Option<&CountryOption> {
        let code = code.to_uppercase();
        self.countries
            .iter()
            .find(|option| option.code.to_uppercase() == code)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.option(label).is_some()
    }
}
