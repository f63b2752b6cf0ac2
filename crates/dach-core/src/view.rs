//! Toggle view models
//!
//! What a renderer needs to draw the control: one button per option and
//! the optional master toggle.

use serde::Serialize;

use crate::config::SwitchConfig;
use crate::selection::Selection;
use crate::types::ALL_TOGGLE_TITLE;

/// One country button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleButton {
    pub label: String,
    pub flag: String,
    /// Rendered in full colour, `aria-pressed`
    pub active: bool,
    /// Raised look; only for a partial selection while the master toggle is shown
    pub highlighted: bool,
    pub title: String,
    pub test_id: String,
}

/// The "everything / nothing" control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllToggle {
    pub label: String,
    pub pressed: bool,
    pub title: String,
}

pub fn toggle_buttons(config: &SwitchConfig, selection: &Selection) -> Vec<ToggleButton> {
    let globally_active = config.show_all_toggle && selection.is_all_selected(config);
    config
        .countries
        .iter()
        .map(|option| {
            let active = selection.contains(&option.label);
            ToggleButton {
                label: option.label.clone(),
                flag: option.display_flag().to_string(),
                active,
                highlighted: active && !globally_active,
                title: format!("Filter by {}", option.label),
                test_id: format!("flag-{}", option.label),
            }
        })
        .collect()
}

/// `None` when the master toggle is disabled.
pub fn all_toggle(config: &SwitchConfig, selection: &Selection) -> Option<AllToggle> {
    if !config.show_all_toggle {
        return None;
    }
    Some(AllToggle {
        label: config.all_toggle_label(),
        pressed: selection.is_all_selected(config),
        title: ALL_TOGGLE_TITLE.to_string(),
    })
}
