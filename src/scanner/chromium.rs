//! Chromium-family localStorage scanner
//!
//! Chromium browsers keep localStorage in a log-structured key-value store:
//! a directory of append-only `.log` segments and compacted `.ldb` tables.
//! Keys, values, and internal metadata are interleaved with no offset
//! contract that could be relied on without implementing the full format,
//! so this scanner settles for a proximity heuristic: find the token name
//! in the raw bytes, keep a bounded window around it, and pattern-match the
//! JWT shape inside that window. Occasional false negatives (value written
//! far from its key) and rare false positives are the accepted trade-off.

use regex::Regex;
use std::sync::OnceLock;

use crate::locator::ProfileRef;
use crate::scanner::{ExtractedToken, ScanOutcome};

/// Three base64url segments, the first two starting with `eyJ` (`{"` encoded)
const JWT_SHAPE: &str = r"eyJ[A-Za-z0-9_-]{20,}\.eyJ[A-Za-z0-9_-]{20,}\.[A-Za-z0-9_-]{20,}";

static JWT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn jwt_pattern() -> &'static Regex {
    JWT_PATTERN.get_or_init(|| Regex::new(JWT_SHAPE).expect("JWT_SHAPE is a valid pattern"))
}

/// Scans LevelDB segment files for tokens near a configured key name
pub struct ChromiumScanner {
    token_name: String,
    window_before: usize,
    window_after: usize,
}

impl ChromiumScanner {
    pub fn new(token_name: impl Into<String>, window_before: usize, window_after: usize) -> Self {
        Self {
            token_name: token_name.into(),
            window_before,
            window_after,
        }
    }

    /// Scan every segment file of a profile's storage directory.
    ///
    /// Unreadable files become skip records; a missing storage directory
    /// contributes nothing.
    pub fn scan_profile(&self, profile: &ProfileRef) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        let Ok(entries) = std::fs::read_dir(&profile.storage_root) else {
            log::debug!("no storage directory at {}", profile.storage_root.display());
            return outcome;
        };

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("log") | Some("ldb")
                )
            })
            .collect();
        files.sort();

        for file in files {
            match std::fs::read(&file) {
                Ok(content) => {
                    for token in self.matches_in(&content) {
                        outcome.tokens.push(ExtractedToken {
                            browser: profile.browser.clone(),
                            profile: profile.profile.clone(),
                            site: None,
                            token_name: self.token_name.clone(),
                            token,
                            file: file.clone(),
                        });
                    }
                }
                Err(err) => outcome.skip(file, err.to_string()),
            }
        }

        outcome
    }

    /// JWT-shaped strings within the proximity window of the first
    /// token-name occurrence, in discovery order. Empty when the token name
    /// does not appear at all.
    fn matches_in(&self, content: &[u8]) -> Vec<String> {
        let Some(idx) = find_subslice(content, self.token_name.as_bytes()) else {
            return Vec::new();
        };

        let start = idx.saturating_sub(self.window_before);
        let end = content.len().min(idx + self.window_after);
        // Slicing raw bytes first keeps the window bounds exact; the lossy
        // decode only ever replaces non-UTF-8 runs, and the JWT alphabet is
        // ASCII, so replacement characters cannot corrupt a match.
        let window = String::from_utf8_lossy(&content[start..end]);

        jwt_pattern()
            .find_iter(&window)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
