//! Browser profile enumeration
//!
//! Walks the per-browser profile layouts under the user's home directory
//! (and, when mounted, a secondary Windows user tree) and produces one
//! `ProfileRef` per detected profile. Pure filesystem read; base directories
//! that don't exist are silently skipped — having only a subset of browsers
//! installed is normal.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Storage engine backing a profile's localStorage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngine {
    /// Chromium-family log-structured key-value store (LevelDB)
    ChromiumLevelDb,
    /// Gecko per-site SQLite databases
    GeckoSqlite,
}

/// A detected browser profile and the storage directory to scan.
///
/// Never mutated after creation; rescanning always re-enumerates.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRef {
    /// Browser family display name (e.g. "Chrome", "Firefox (Windows)")
    pub browser: String,
    /// Profile display name (directory name)
    pub profile: String,
    /// Absolute path of the profile's storage root
    pub storage_root: PathBuf,
    /// Storage engine the scanner must use
    #[serde(rename = "engine")]
    pub engine: StorageEngine,
}

impl ProfileRef {
    /// Whether the storage directory actually exists on disk
    pub fn storage_exists(&self) -> bool {
        self.storage_root.is_dir()
    }
}

/// Conventional WSL mount point for Windows user directories
const WSL_USERS_ROOT: &str = "/mnt/c/Users";

/// The mounted Windows user tree, when one is present
pub fn default_windows_root() -> Option<PathBuf> {
    let root = PathBuf::from(WSL_USERS_ROOT);
    root.is_dir().then_some(root)
}

/// Chromium-family base directories under the Linux home layout
const CHROMIUM_FAMILIES: &[(&str, &[&str])] = &[
    ("Chrome", &[".config", "google-chrome"]),
    ("Chromium", &[".config", "chromium"]),
    ("Edge", &[".config", "microsoft-edge"]),
    ("Brave", &[".config", "BraveSoftware", "Brave-Browser"]),
];

/// Enumerates browser profiles for every supported family
pub struct Locator {
    home: PathBuf,
    windows_root: Option<PathBuf>,
}

impl Locator {
    /// Create a locator rooted at the given home directory
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            windows_root: None,
        }
    }

    /// Also enumerate a mounted Windows user tree (e.g. /mnt/c/Users under WSL)
    pub fn with_windows_root(mut self, root: Option<PathBuf>) -> Self {
        self.windows_root = root;
        self
    }

    /// Enumerate all profiles in deterministic order: Chromium families
    /// first, then Gecko, native home layout before the Windows tree.
    pub fn locate_all(&self) -> Vec<ProfileRef> {
        let mut profiles = Vec::new();

        for (browser, components) in CHROMIUM_FAMILIES {
            let base = join_components(&self.home, components);
            self.chromium_profiles_under(browser, &base, &mut profiles);
        }

        if let Some(root) = &self.windows_root {
            for user_dir in sorted_subdirs(root) {
                let base = user_dir
                    .join("AppData")
                    .join("Local")
                    .join("Google")
                    .join("Chrome")
                    .join("User Data");
                self.chromium_profiles_under("Chrome (Windows)", &base, &mut profiles);
            }
        }

        let firefox_base = self.home.join(".mozilla").join("firefox");
        self.gecko_profiles_under("Firefox", &firefox_base, &mut profiles);

        if let Some(root) = &self.windows_root {
            for user_dir in sorted_subdirs(root) {
                let base = user_dir
                    .join("AppData")
                    .join("Roaming")
                    .join("Mozilla")
                    .join("Firefox")
                    .join("Profiles");
                self.gecko_profiles_under("Firefox (Windows)", &base, &mut profiles);
            }
        }

        profiles
    }

    fn chromium_profiles_under(&self, browser: &str, base: &Path, out: &mut Vec<ProfileRef>) {
        let mut names: Vec<String> = sorted_subdirs(base)
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .filter(|name| is_chromium_profile_name(name))
            .collect();
        names.sort_by_key(|name| chromium_profile_sort_key(name));

        for name in names {
            let storage_root = base.join(&name).join("Local Storage").join("leveldb");
            log::debug!("found {} profile {:?} at {}", browser, name, storage_root.display());
            out.push(ProfileRef {
                browser: browser.to_string(),
                profile: name,
                storage_root,
                engine: StorageEngine::ChromiumLevelDb,
            });
        }
    }

    fn gecko_profiles_under(&self, browser: &str, base: &Path, out: &mut Vec<ProfileRef>) {
        for dir in sorted_subdirs(base) {
            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            // Firefox profile directories follow the <hash>.<name> convention
            if !name.contains('.') {
                continue;
            }
            let storage_root = dir.join("storage").join("default");
            log::debug!("found {} profile {:?} at {}", browser, name, storage_root.display());
            out.push(ProfileRef {
                browser: browser.to_string(),
                profile: name,
                storage_root,
                engine: StorageEngine::GeckoSqlite,
            });
        }
    }
}

fn join_components(base: &Path, components: &[&str]) -> PathBuf {
    let mut path = base.to_path_buf();
    for c in components {
        path.push(c);
    }
    path
}

/// Subdirectories of `base` sorted by name; empty when `base` is missing
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

fn is_chromium_profile_name(name: &str) -> bool {
    name == "Default" || name.starts_with("Profile")
}

/// Default first, then numbered profiles in numeric order, then the rest
fn chromium_profile_sort_key(name: &str) -> (u8, u32, String) {
    if name == "Default" {
        return (0, 0, String::new());
    }
    if let Some(rest) = name.strip_prefix("Profile ") {
        if let Ok(n) = rest.parse::<u32>() {
            return (1, n, String::new());
        }
    }
    (2, 0, name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_chromium_profile(home: &Path, family_dir: &str, profile: &str) {
        let dir = home
            .join(family_dir)
            .join(profile)
            .join("Local Storage")
            .join("leveldb");
        fs::create_dir_all(dir).unwrap();
    }

    fn make_firefox_profile(home: &Path, profile: &str) {
        let dir = home
            .join(".mozilla")
            .join("firefox")
            .join(profile)
            .join("storage")
            .join("default");
        fs::create_dir_all(dir).unwrap();
    }

    #[test]
    fn test_empty_home_yields_no_profiles() {
        let home = TempDir::new().unwrap();
        let profiles = Locator::new(home.path()).locate_all();
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_single_chrome_profile() {
        let home = TempDir::new().unwrap();
        make_chromium_profile(home.path(), ".config/google-chrome", "Default");

        let profiles = Locator::new(home.path()).locate_all();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].browser, "Chrome");
        assert_eq!(profiles[0].profile, "Default");
        assert_eq!(profiles[0].engine, StorageEngine::ChromiumLevelDb);
        assert!(profiles[0].storage_exists());
    }

    #[test]
    fn test_multiple_profiles_across_families() {
        let home = TempDir::new().unwrap();
        make_chromium_profile(home.path(), ".config/google-chrome", "Default");
        make_chromium_profile(home.path(), ".config/google-chrome", "Profile 1");
        make_chromium_profile(home.path(), ".config/chromium", "Default");
        make_firefox_profile(home.path(), "abcd1234.default-release");

        let profiles = Locator::new(home.path()).locate_all();
        assert_eq!(profiles.len(), 4);

        let counts = |browser: &str| profiles.iter().filter(|p| p.browser == browser).count();
        assert_eq!(counts("Chrome"), 2);
        assert_eq!(counts("Chromium"), 1);
        assert_eq!(counts("Firefox"), 1);
    }

    #[test]
    fn test_non_profile_directories_are_ignored() {
        let home = TempDir::new().unwrap();
        let base = home.path().join(".config").join("google-chrome");
        fs::create_dir_all(base.join("Crash Reports")).unwrap();
        fs::create_dir_all(base.join("GrShaderCache")).unwrap();
        make_chromium_profile(home.path(), ".config/google-chrome", "Profile 2");

        // Firefox dirs without a dot in the name are not profiles
        fs::create_dir_all(home.path().join(".mozilla").join("firefox").join("crashes")).unwrap();

        let profiles = Locator::new(home.path()).locate_all();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].profile, "Profile 2");
    }

    #[test]
    fn test_profile_ordering_default_first_then_numeric() {
        let home = TempDir::new().unwrap();
        make_chromium_profile(home.path(), ".config/google-chrome", "Profile 10");
        make_chromium_profile(home.path(), ".config/google-chrome", "Profile 2");
        make_chromium_profile(home.path(), ".config/google-chrome", "Default");

        let profiles = Locator::new(home.path()).locate_all();
        let names: Vec<&str> = profiles.iter().map(|p| p.profile.as_str()).collect();
        assert_eq!(names, vec!["Default", "Profile 2", "Profile 10"]);
    }

    #[test]
    fn test_profile_without_storage_is_still_enumerated() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(
            home.path()
                .join(".config")
                .join("google-chrome")
                .join("Default"),
        )
        .unwrap();

        let profiles = Locator::new(home.path()).locate_all();
        assert_eq!(profiles.len(), 1);
        assert!(!profiles[0].storage_exists());
    }

    #[test]
    fn test_windows_tree_enumeration() {
        let home = TempDir::new().unwrap();
        let win = TempDir::new().unwrap();
        let chrome = win
            .path()
            .join("alice")
            .join("AppData")
            .join("Local")
            .join("Google")
            .join("Chrome")
            .join("User Data")
            .join("Default")
            .join("Local Storage")
            .join("leveldb");
        fs::create_dir_all(chrome).unwrap();
        let firefox = win
            .path()
            .join("alice")
            .join("AppData")
            .join("Roaming")
            .join("Mozilla")
            .join("Firefox")
            .join("Profiles")
            .join("xyz.default")
            .join("storage")
            .join("default");
        fs::create_dir_all(firefox).unwrap();

        let profiles = Locator::new(home.path())
            .with_windows_root(Some(win.path().to_path_buf()))
            .locate_all();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].browser, "Chrome (Windows)");
        assert_eq!(profiles[1].browser, "Firefox (Windows)");
    }

    #[test]
    fn test_families_enumerate_in_fixed_order() {
        let home = TempDir::new().unwrap();
        make_firefox_profile(home.path(), "abcd.default");
        make_chromium_profile(home.path(), ".config/BraveSoftware/Brave-Browser", "Default");
        make_chromium_profile(home.path(), ".config/google-chrome", "Default");

        let profiles = Locator::new(home.path()).locate_all();
        let browsers: Vec<&str> = profiles.iter().map(|p| p.browser.as_str()).collect();
        assert_eq!(browsers, vec!["Chrome", "Brave", "Firefox"]);
    }
}
