//! Extraction pipeline
//!
//! Dispatches each located profile to the scanner matching its storage
//! engine and aggregates the results in a stable order: family enumeration
//! order, then profile order, then within-file discovery order. Per-file
//! and per-profile failures are carried as skip records and never prevent
//! the remaining profiles from being scanned.

use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::locator::{ProfileRef, StorageEngine};
use crate::scanner::{ChromiumScanner, ExtractedToken, GeckoScanner, ScanOutcome, SkippedFile};

/// Aggregated result of a full scan run
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    /// Every recovered token, in stable discovery order
    pub tokens: Vec<ExtractedToken>,

    /// Files and databases that could not be read
    pub skipped: Vec<SkippedFile>,

    /// Number of profiles visited
    pub profiles_scanned: usize,
}

impl ScanReport {
    /// Fold one profile's outcome into the report
    pub fn absorb(&mut self, outcome: ScanOutcome) {
        self.tokens.extend(outcome.tokens);
        self.skipped.extend(outcome.skipped);
        self.profiles_scanned += 1;
    }
}

/// Runs the configured scanners over located profiles
pub struct Pipeline {
    chromium: ChromiumScanner,
    gecko: GeckoScanner,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            chromium: ChromiumScanner::new(
                config.token_name.clone(),
                config.window.before,
                config.window.after,
            ),
            gecko: GeckoScanner::new(config.token_name.clone()),
        }
    }

    /// Scan a single profile with the scanner matching its engine
    pub fn scan_profile(&self, profile: &ProfileRef) -> ScanOutcome {
        match profile.engine {
            StorageEngine::ChromiumLevelDb => self.chromium.scan_profile(profile),
            StorageEngine::GeckoSqlite => self.gecko.scan_profile(profile),
        }
    }

    /// Scan every profile and aggregate into one report
    pub fn scan(&self, profiles: &[ProfileRef]) -> ScanReport {
        let mut report = ScanReport::default();
        for profile in profiles {
            report.absorb(self.scan_profile(profile));
        }
        report
    }
}

/// Serialize the token list to the result file, fully overwriting it
pub fn write_tokens(path: &Path, tokens: &[ExtractedToken]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, tokens)?;
    Ok(())
}
