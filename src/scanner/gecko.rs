//! Gecko-family (Firefox) localStorage scanner
//!
//! Firefox keeps localStorage as one SQLite database per site, under
//! `storage/default/<site>/ls/`. A running browser may hold an exclusive
//! lock on those files, so each database is copied to a caller-exclusive
//! temporary file before it is opened; the copy is removed on every exit
//! path, query failure included.

use rusqlite::{Connection, OpenFlags, types::ValueRef};
use std::path::{Path, PathBuf};

use crate::locator::ProfileRef;
use crate::scanner::{ExtractedToken, ScanOutcome};

/// Scans per-site SQLite databases for keys containing a configured name
pub struct GeckoScanner {
    token_name: String,
}

impl GeckoScanner {
    pub fn new(token_name: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
        }
    }

    /// Scan every site database under a profile's storage directory.
    ///
    /// A missing `data` table, a malformed database, or a failed copy is a
    /// skip record for that database; siblings are still scanned.
    pub fn scan_profile(&self, profile: &ProfileRef) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for site_dir in sorted_subdirs(&profile.storage_root) {
            let Some(site) = site_dir.file_name().map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };

            for db in site_databases(&site_dir) {
                match self.scan_database(profile, &site, &db) {
                    Ok(tokens) => outcome.tokens.extend(tokens),
                    Err(reason) => outcome.skip(db, reason),
                }
            }
        }

        outcome
    }

    fn scan_database(
        &self,
        profile: &ProfileRef,
        site: &str,
        db: &Path,
    ) -> Result<Vec<ExtractedToken>, String> {
        // Copy first: the live browser may hold an exclusive lock on the
        // original. The NamedTempFile is removed when it drops, no matter
        // how this function exits; removal failures are ignored.
        let tmp = tempfile::Builder::new()
            .prefix("storaudit-")
            .suffix(".sqlite")
            .tempfile()
            .map_err(|e| format!("temp file creation failed: {}", e))?;
        std::fs::copy(db, tmp.path()).map_err(|e| format!("copy failed: {}", e))?;

        let conn = Connection::open_with_flags(tmp.path(), OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| format!("open failed: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM data")
            .map_err(|e| format!("query failed: {}", e))?;
        let mut rows = stmt.query([]).map_err(|e| format!("query failed: {}", e))?;

        let mut tokens = Vec::new();
        while let Some(row) = rows.next().map_err(|e| format!("row read failed: {}", e))? {
            let key = lossy_text(row.get_ref(0).map_err(|e| e.to_string())?);
            if !key.contains(&self.token_name) {
                continue;
            }
            let value = lossy_text(row.get_ref(1).map_err(|e| e.to_string())?);
            tokens.push(ExtractedToken {
                browser: profile.browser.clone(),
                profile: profile.profile.clone(),
                site: Some(site.to_string()),
                token_name: self.token_name.clone(),
                token: value,
                file: db.to_path_buf(),
            });
        }

        Ok(tokens)
    }
}

/// Best-effort text from a SQLite value; BLOBs are lossy-decoded
fn lossy_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Null => String::new(),
    }
}

fn sorted_subdirs(base: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(base) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// The `ls/*.sqlite` databases of one site directory, sorted by name
fn site_databases(site_dir: &Path) -> Vec<PathBuf> {
    let ls_dir = site_dir.join("ls");
    let Ok(entries) = std::fs::read_dir(&ls_dir) else {
        return Vec::new();
    };
    let mut dbs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("sqlite"))
        .collect();
    dbs.sort();
    dbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::StorageEngine;
    use std::fs;
    use tempfile::TempDir;

    fn profile_at(root: PathBuf) -> ProfileRef {
        ProfileRef {
            browser: "Firefox".to_string(),
            profile: "abcd.default".to_string(),
            storage_root: root,
            engine: StorageEngine::GeckoSqlite,
        }
    }

    fn make_site_db(storage_root: &Path, site: &str, rows: &[(&str, &[u8])]) -> PathBuf {
        let ls_dir = storage_root.join(site).join("ls");
        fs::create_dir_all(&ls_dir).unwrap();
        let db_path = ls_dir.join("data.sqlite");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute("CREATE TABLE data (key TEXT PRIMARY KEY, value BLOB)", [])
            .unwrap();
        for (key, value) in rows {
            conn.execute(
                "INSERT INTO data (key, value) VALUES (?1, ?2)",
                rusqlite::params![key, value],
            )
            .unwrap();
        }
        db_path
    }

    #[test]
    fn test_extracts_matching_key() {
        let root = TempDir::new().unwrap();
        make_site_db(
            root.path(),
            "https+++app.example.com",
            &[
                ("eva-tk", b"header.payload.signature".as_slice()),
                ("theme", b"dark".as_slice()),
            ],
        );

        let scanner = GeckoScanner::new("eva-tk");
        let outcome = scanner.scan_profile(&profile_at(root.path().to_path_buf()));

        assert_eq!(outcome.tokens.len(), 1);
        let token = &outcome.tokens[0];
        assert_eq!(token.token, "header.payload.signature");
        assert_eq!(token.site.as_deref(), Some("https+++app.example.com"));
        assert_eq!(token.browser, "Firefox");
    }

    #[test]
    fn test_key_match_is_substring_and_case_sensitive() {
        let root = TempDir::new().unwrap();
        make_site_db(
            root.path(),
            "site",
            &[
                ("app:eva-tk:v2", b"match".as_slice()),
                ("EVA-TK", b"no-match".as_slice()),
            ],
        );

        let outcome =
            GeckoScanner::new("eva-tk").scan_profile(&profile_at(root.path().to_path_buf()));
        assert_eq!(outcome.tokens.len(), 1);
        assert_eq!(outcome.tokens[0].token, "match");
    }

    #[test]
    fn test_missing_data_table_is_skip_not_failure() {
        let root = TempDir::new().unwrap();
        let ls_dir = root.path().join("site-a").join("ls");
        fs::create_dir_all(&ls_dir).unwrap();
        let conn = Connection::open(ls_dir.join("data.sqlite")).unwrap();
        conn.execute("CREATE TABLE unrelated (x INTEGER)", []).unwrap();
        drop(conn);

        // A healthy sibling site must still be scanned
        make_site_db(root.path(), "site-b", &[("eva-tk", b"tok".as_slice())]);

        let outcome =
            GeckoScanner::new("eva-tk").scan_profile(&profile_at(root.path().to_path_buf()));
        assert_eq!(outcome.tokens.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("query failed"));
    }

    #[test]
    fn test_malformed_database_is_skip() {
        let root = TempDir::new().unwrap();
        let ls_dir = root.path().join("site").join("ls");
        fs::create_dir_all(&ls_dir).unwrap();
        fs::write(ls_dir.join("data.sqlite"), b"not a sqlite file").unwrap();

        let outcome =
            GeckoScanner::new("eva-tk").scan_profile(&profile_at(root.path().to_path_buf()));
        assert!(outcome.tokens.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn test_missing_storage_directory_is_empty_outcome() {
        let outcome = GeckoScanner::new("eva-tk")
            .scan_profile(&profile_at(PathBuf::from("/nonexistent/storage/default")));
        assert!(outcome.tokens.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let root = TempDir::new().unwrap();
        make_site_db(root.path(), "site", &[("eva-tk", b"tok".as_slice())]);

        let before = count_temp_copies();
        let _ = GeckoScanner::new("eva-tk").scan_profile(&profile_at(root.path().to_path_buf()));
        assert_eq!(count_temp_copies(), before);
    }

    fn count_temp_copies() -> usize {
        std::fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_name().to_string_lossy().starts_with("storaudit-"))
                    .count()
            })
            .unwrap_or(0)
    }
}
