use std::fs;
use std::path::Path;

use dach_core::filter::FilterReport;
use dach_core::{MemoryStore, MemoryTree, Switch, SwitchConfig};

/// Master toggle in an action list.
pub const ALL_ACTION: &str = "*";

pub struct PreviewOptions {
    pub config_path: Option<String>,
    pub page_path: String,
    pub actions: Vec<String>,
    pub stored: Option<String>,
    pub json: bool,
}

pub struct PreviewOutcome {
    pub active: Vec<String>,
    pub all_selected: bool,
    pub report: FilterReport,
    pub stored: Option<String>,
}

pub fn load_config(path: Option<&str>) -> Result<SwitchConfig, String> {
    let Some(path) = path else {
        return Ok(SwitchConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    SwitchConfig::from_json(&text)
        .map_err(|e| format!("Invalid config '{}': {}", path, e))
}

pub fn load_page(path: &Path) -> Result<MemoryTree, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Invalid page fixture '{}': {}", path.display(), e))
}

/// Mount, replay `actions` and run one filter pass over `page`.
pub fn simulate(
    config: SwitchConfig,
    page: &mut MemoryTree,
    actions: &[String],
    stored: Option<&str>,
) -> Result<PreviewOutcome, String> {
    let key = config.storage_key.clone();
    let store = match stored {
        Some(value) => MemoryStore::with_entry(&key, value),
        None => MemoryStore::new(),
    };

    let mut switch = Switch::mount(config, store).map_err(|e| e.to_string())?;
    log::debug!("Initial selection from {:?}", switch.initial_source());

    for action in actions {
        if action == ALL_ACTION {
            switch.toggle_all();
        } else {
            switch.toggle(action).map_err(|e| e.to_string())?;
        }
    }

    let report = switch.filter(page);
    Ok(PreviewOutcome {
        active: switch.active_labels().to_vec(),
        all_selected: switch.is_all_selected(),
        report,
        stored: switch.store().get(&key).map(str::to_string),
    })
}

pub fn run_preview(opts: PreviewOptions) -> Result<(), String> {
    let config = load_config(opts.config_path.as_deref())?;
    let mut page = load_page(Path::new(&opts.page_path))?;
    let outcome = simulate(config, &mut page, &opts.actions, opts.stored.as_deref())?;

    if opts.json {
        let json = serde_json::to_string_pretty(&outcome.report)
            .map_err(|e| format!("Failed to encode report: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    println!("Active:    [{}]{}", outcome.active.join(", "), if outcome.all_selected { " (all)" } else { "" });
    println!("Selector:  {}", outcome.report.selector);
    if let Some(stored) = &outcome.stored {
        println!("Stored:    {}", stored);
    }
    println!(
        "Elements:  {} matched, {} visible, {} hidden",
        outcome.report.decisions.len(),
        outcome.report.visible_count(),
        outcome.report.hidden_count()
    );
    println!();
    for decision in &outcome.report.decisions {
        let target = if decision.target.is_empty() { "(no id)" } else { decision.target.as_str() };
        println!(
            "  {:<8} {:<24} {}",
            if decision.visibility.is_visible() { "shown" } else { "hidden" },
            target,
            decision.code.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
