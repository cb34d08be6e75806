//! Profiles command implementation

use colored::Colorize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::{ConfigError, Result};
use crate::locator::{Locator, default_windows_root};
use crate::output::json::format_json;
use crate::output::table::format_table;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "BROWSER")]
    browser: String,
    #[tabled(rename = "PROFILE")]
    profile: String,
    #[tabled(rename = "STORAGE")]
    storage: String,
    #[tabled(rename = "PATH")]
    path: String,
}

/// Run the profiles command to list detected browser profiles
pub fn run(format: OutputFormat) -> Result<()> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    let profiles = Locator::new(home)
        .with_windows_root(default_windows_root())
        .locate_all();

    match format {
        OutputFormat::Json => println!("{}", format_json(&profiles)?),
        OutputFormat::Pretty => {
            let rows: Vec<ProfileRow> = profiles
                .iter()
                .map(|p| ProfileRow {
                    browser: p.browser.clone(),
                    profile: p.profile.clone(),
                    storage: if p.storage_exists() {
                        "✓".to_string()
                    } else {
                        "✗".to_string()
                    },
                    path: p.storage_root.display().to_string(),
                })
                .collect();

            println!("{}", format_table(&rows));
            if !profiles.is_empty() {
                println!(
                    "\n{} profile(s) detected; STORAGE marks profiles with localStorage on disk",
                    profiles.len().to_string().bold()
                );
            }
        }
    }

    Ok(())
}
