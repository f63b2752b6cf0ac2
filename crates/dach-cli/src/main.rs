//! DACHSwitch CLI
//!
//! CLI tool for checking switch configurations and previewing how a
//! selection filters a page.

mod preview;
#[cfg(feature = "e2e")]
mod e2e;

use clap::{Parser, Subcommand};

use preview::{load_config, run_preview, PreviewOptions};

#[derive(Parser)]
#[command(name = "dach-cli")]
#[command(about = "DACHSwitch configuration tools")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a switch configuration file
    Validate {
        /// Configuration JSON file
        #[arg(short, long)]
        config: String,
    },

    /// Apply a sequence of clicks and show which elements stay visible
    Preview {
        /// Configuration JSON file (defaults when omitted)
        #[arg(short, long)]
        config: Option<String>,

        /// Page fixture: JSON array of {tag, attributes} elements
        #[arg(short, long)]
        page: String,

        /// Label to toggle, or '*' for the master toggle; repeatable, applied in order
        #[arg(short, long = "action")]
        actions: Vec<String>,

        /// Raw value already present under the storage key
        #[arg(long)]
        stored: Option<String>,

        /// Print the filter report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drive the demo page in Chrome
    #[cfg(feature = "e2e")]
    E2e {
        #[arg(long, default_value = "http://localhost:9515")]
        chromedriver: String,

        /// URL serving demo/index.html
        #[arg(long, default_value = "http://localhost:8080/demo/index.html")]
        url: String,

        #[arg(long)]
        headless: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Preview {
            config,
            page,
            actions,
            stored,
            json,
        } => run_preview(PreviewOptions {
            config_path: config,
            page_path: page,
            actions,
            stored,
            json,
        }),
        #[cfg(feature = "e2e")]
        Commands::E2e {
            chromedriver,
            url,
            headless,
        } => e2e::run_e2e(e2e::E2eOptions {
            chromedriver_url: chromedriver,
            demo_url: url,
            headless,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_validate(path: &str) -> Result<(), String> {
    let config = load_config(Some(path))?;

    println!("Config '{}' is valid", path);
    println!("  Attribute:   {}", config.country_code_attribute);
    println!("  Selector:    {}", config.effective_selector());
    if config.show_all_toggle {
        println!("  All toggle:  {}", config.all_toggle_label());
    }
    println!("  Mode:        {}", if config.single_select { "single-select" } else { "multi-select" });
    if config.persist {
        println!("  Storage key: {}", config.storage_key);
    }
    println!();

    println!("Countries:");
    for option in &config.countries {
        let codes: Vec<String> = option.matching_codes().collect();
        println!("  {} {:<6} {}", option.display_flag(), option.label, codes.join(", "));
    }

    Ok(())
}
