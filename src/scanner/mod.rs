//! Storage scanners and their result types
//!
//! Each scanner turns one `ProfileRef` into a `ScanOutcome`: the tokens it
//! recovered plus explicit skip records for every file it could not read.
//! Skips are data, not errors — a locked or corrupt file must never abort
//! the scan of its siblings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod chromium;
pub mod gecko;

pub use chromium::ChromiumScanner;
pub use gecko::GeckoScanner;

/// A token recovered from browser storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedToken {
    /// Browser family the token came from
    pub browser: String,

    /// Profile display name
    pub profile: String,

    /// Site/origin directory name (Gecko scanner only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// Token name that was searched for
    pub token_name: String,

    /// The extracted token string
    pub token: String,

    /// Storage file the token was found in
    pub file: PathBuf,
}

/// A file or database that could not be scanned
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-profile scan result: recovered tokens and per-file skips
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub tokens: Vec<ExtractedToken>,
    pub skipped: Vec<SkippedFile>,
}

impl ScanOutcome {
    /// Record a file that could not be read, logging it once
    pub fn skip(&mut self, path: PathBuf, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("skipping {}: {}", path.display(), reason);
        self.skipped.push(SkippedFile { path, reason });
    }
}
