//! Scan command implementation

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use indicatif::ProgressBar;
use std::path::Path;

use crate::cli::{OutputFormat, ScanArgs};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::locator::{Locator, ProfileRef, default_windows_root};
use crate::output::json::format_json;
use crate::pipeline::{self, Pipeline, ScanReport};

/// Run the scan command
pub fn run(args: &ScanArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let mut config = Config::load_at(config_path)?;
    if let Some(name) = &args.token_name {
        config.token_name = name.clone();
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }

    let pretty = matches!(format, OutputFormat::Pretty);

    if pretty {
        println!("{}", "Browser localStorage token audit".bold());
        println!(
            "{}",
            "Educational use on your own system only.".yellow()
        );
        println!("\nSearching for token: {}\n", config.token_name.bold());
    }

    // Declining leaves no side effects - nothing has been read or written yet
    if !args.yes && !confirm()? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    let windows_root = args.windows_root.clone().or_else(default_windows_root);
    let profiles = Locator::new(home)
        .with_windows_root(windows_root)
        .locate_all();

    let report = if pretty {
        scan_with_progress(&config, &profiles)
    } else {
        Pipeline::new(&config).scan(&profiles)
    };

    let output_path = config.output_path();
    pipeline::write_tokens(&output_path, &report.tokens)?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&report)?),
        OutputFormat::Pretty => render_summary(&report, &output_path),
    }

    Ok(())
}

fn confirm() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Scan this machine's browser profiles?")
        .default(false)
        .interact()?)
}

fn scan_with_progress(config: &Config, profiles: &[ProfileRef]) -> ScanReport {
    let pipeline = Pipeline::new(config);
    let bar = ProgressBar::new(profiles.len() as u64);
    let mut report = ScanReport::default();
    let mut current_family = String::new();

    for profile in profiles {
        if profile.browser != current_family {
            current_family = profile.browser.clone();
            bar.println(format!("Scanning {}...", current_family.bold()));
        }
        bar.println(format!("  • {}", profile.profile));
        report.absorb(pipeline.scan_profile(profile));
        bar.inc(1);
    }

    bar.finish_and_clear();
    report
}

fn render_summary(report: &ScanReport, output_path: &Path) {
    println!();
    if report.profiles_scanned == 0 {
        println!("{}", "No browser profiles detected.".yellow());
        return;
    }

    if !report.skipped.is_empty() {
        println!(
            "{} {} file(s) could not be read and were skipped",
            "⚠".yellow(),
            report.skipped.len()
        );
    }

    if report.tokens.is_empty() {
        println!("{} No tokens found.", "✗".red());
        println!("\nThis can mean:");
        println!("  • the token lives in a site you have not visited recently");
        println!("  • the browser is not installed or uses different paths");
        println!("  • the token was cleared or has expired");
        return;
    }

    println!(
        "{} Found {} token(s)",
        "✓".green(),
        report.tokens.len().to_string().bold()
    );

    for (i, token) in report.tokens.iter().enumerate() {
        println!("\n{} Token #{}", "→".cyan(), i + 1);
        println!("  Browser: {}", token.browser);
        println!("  Profile: {}", token.profile);
        if let Some(site) = &token.site {
            println!("  Site:    {}", site);
        }
        println!("  File:    {}", token.file.display());
        println!("  Token:   {}", token.token);
    }

    println!(
        "\n{} Tokens saved to: {}",
        "✓".green(),
        output_path.display()
    );
    println!(
        "  Decode one with: {}",
        "storaudit decode <token>".cyan()
    );

    print_security_lessons();
}

fn print_security_lessons() {
    println!("\n{}", "SECURITY LESSONS".bold());
    println!("\n{}", "Demonstrated weaknesses:".red());
    println!("  1. localStorage is readable from on-disk files, browser closed or not");
    println!("  2. Any script running in the page can read localStorage");
    println!("  3. A single XSS flaw is enough to exfiltrate stored tokens");
    println!("  4. Tokens persist on disk after the session ends");
    println!("\n{}", "Recommended fixes:".green());
    println!("  1. Keep authentication tokens in httpOnly cookies");
    println!("  2. Deploy a Content Security Policy");
    println!("  3. Use short-lived access tokens with refresh rotation");
    println!("  4. Set SameSite on session cookies");
    println!("  5. Prefer sessionStorage when client-side storage is unavoidable");
}
