//! Decode command implementation

use colored::Colorize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::jwt::{self, DecodedJwt};
use crate::output::json::format_json;

/// Run the decode command.
///
/// A malformed token is a structured result, not a process failure: the
/// error is rendered and the command still exits cleanly.
pub fn run(token: &str, format: OutputFormat) -> Result<()> {
    match jwt::decode(token) {
        Ok(decoded) => match format {
            OutputFormat::Json => println!("{}", format_json(&decoded)?),
            OutputFormat::Pretty => render(&decoded)?,
        },
        Err(err) => match format {
            OutputFormat::Json => {
                let error = serde_json::json!({ "error": err.to_string() });
                println!("{}", format_json(&error)?);
            }
            OutputFormat::Pretty => {
                println!("{} {}", "✗".red(), err);
            }
        },
    }

    Ok(())
}

fn render(decoded: &DecodedJwt) -> Result<()> {
    println!("{}\n", "JWT Analysis".bold());

    println!("{}", "Header:".bold());
    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(decoded.header.clone()))?
    );

    println!("\n{}", "Payload (claims):".bold());
    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(decoded.payload.clone()))?
    );

    println!("\n{}", "Signature (not verified):".bold());
    println!("  {}", truncate(&decoded.signature, 50));

    if !decoded.timestamps.is_empty() {
        println!("\n{}", "Timestamps:".bold());
        for ts in &decoded.timestamps {
            println!("  {} ({}): {}", ts.label, ts.claim, ts.datetime);
            if let Some(expired) = ts.expired {
                if expired {
                    println!("    {} expired", "✗".red());
                } else if let Some(secs) = ts.remaining_secs {
                    println!("    {} valid ({}s remaining)", "✓".green(), secs);
                }
            }
        }
    }

    if !decoded.analysis.warnings.is_empty() {
        println!("\n{}", "Warnings:".bold());
        for warning in &decoded.analysis.warnings {
            println!("  {} {}", "⚠".yellow(), warning.red());
        }
    }

    if !decoded.analysis.notes.is_empty() {
        println!("\n{}", "Notes:".bold());
        for note in &decoded.analysis.notes {
            println!("  {} {}", "•".cyan(), note);
        }
    }

    println!("\n{}", "Security recommendations:".bold());
    println!("  1. Do not keep tokens in localStorage - XSS can read them");
    println!("  2. Use httpOnly cookies for sensitive tokens");
    println!("  3. Rotate tokens regularly");
    println!("  4. Always serve over HTTPS");
    println!("  5. Keep expiration times short");
    println!("  6. Never put sensitive data in a JWT payload");

    Ok(())
}

/// Signature segments are ASCII base64url, so byte truncation is safe
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max])
    }
}
