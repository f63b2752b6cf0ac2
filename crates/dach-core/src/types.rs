//! Core type definitions for DACHSwitch
//!
//! These types describe one filterable region and the values that flow
//! between the selection state, the filtering engine and the host page.

use serde::{Deserialize, Serialize};

// =============================================================================
// Defaults
// =============================================================================

/// Attribute checked on target elements when none is configured.
pub const DEFAULT_ATTRIBUTE: &str = "data-country";

/// Storage key used when persistence is enabled without an explicit key.
pub const DEFAULT_STORAGE_KEY: &str = "dach-switch-selection";

/// Glyph rendered for options that carry no flag.
pub const FLAG_PLACEHOLDER: &str = "\u{1F3F3}\u{FE0F}";

/// Title of the master toggle button.
pub const ALL_TOGGLE_TITLE: &str = "Toggle All Countries";

// =============================================================================
// Country Options
// =============================================================================

/// One filterable region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CountryOption {
    /// Identifier shown on the toggle button; unique within a configuration
    pub label: String,
    /// Primary value matched (case-insensitively) against target elements
    pub code: String,
    /// Optional display glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts", ts(optional))]
    pub flag: Option<String>,
    /// Aliases treated as equivalent to `code`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_codes: Vec<String>,
}

impl CountryOption {
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
            flag: None,
            accepted_codes: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn with_accepted_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Flag glyph, or the generic placeholder.
    pub fn display_flag(&self) -> &str {
        self.flag.as_deref().unwrap_or(FLAG_PLACEHOLDER)
    }

    /// Upper-cased code followed by upper-cased aliases.
    pub fn matching_codes(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.code)
            .chain(self.accepted_codes.iter())
            .map(|code| code.to_uppercase())
    }
}

/// The three regions the switch is named after.
pub fn default_countries() -> Vec<CountryOption> {
    vec![
        CountryOption::new("D", "DE").with_flag("\u{1F1E9}\u{1F1EA}"),
        CountryOption::new("A", "AT").with_flag("\u{1F1E6}\u{1F1F9}"),
        CountryOption::new("CH", "CH").with_flag("\u{1F1E8}\u{1F1ED}"),
    ]
}

// =============================================================================
// Initial Selection
// =============================================================================

/// Caller-supplied starting selection: one value or a list.
///
/// Entries may be labels or codes; see [`crate::selection::resolve_initial`].
/// Deserialization never fails: `null` and other non-string values become
/// an empty list and non-string list entries are dropped, so the selection
/// falls back to every label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum InitialSelection {
    One(String),
    Many(Vec<String>),
}

impl InitialSelection {
    pub fn entries(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

impl<'de> Deserialize<'de> for InitialSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde_json::Value;

        Ok(match Value::deserialize(deserializer)? {
            Value::String(value) => Self::One(value),
            Value::Array(values) => Self::Many(
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        Value::String(entry) => Some(entry),
                        other => {
                            log::debug!("Dropping non-string default entry {}", other);
                            None
                        }
                    })
                    .collect(),
            ),
            other => {
                log::debug!("Ignoring default selection {}", other);
                Self::Many(Vec::new())
            }
        })
    }
}

impl Default for InitialSelection {
    fn default() -> Self {
        Self::One("D".to_string())
    }
}

impl From<&str> for InitialSelection {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<&str>> for InitialSelection {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

// =============================================================================
// Visibility
// =============================================================================

/// Binary visibility decision for one target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// Value written to the element's `display` style property.
    pub const fn display_value(self) -> &'static str {
        match self {
            Self::Visible => "",
            Self::Hidden => "none",
        }
    }

    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Hidden
        }
    }
}
