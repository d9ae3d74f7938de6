//! Persisted user preferences
//!
//! A single setting, the last chosen output directory, lives in an INI file
//! named `zipInPdfSettings.ini`:
//!
//! ```ini
//! [DEFAULT]
//! output_dir=/home/me/Documents/merged
//! ```
//!
//! Values are written and read verbatim (no escape sequences, no quoting), so
//! Windows paths with back-slashes survive unchanged and files written by
//! earlier releases keep loading.

use ini::{EscapePolicy, Ini, ParseOption};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::error::{Error, Result};

/// File name of the settings file
pub const SETTINGS_FILE_NAME: &str = "zipInPdfSettings.ini";

/// Per-user directory name for installed builds
pub const APP_DIR_NAME: &str = "PdfZipMerger";

/// Section the preference is written under
pub const SECTION: &str = "DEFAULT";

/// Key of the output directory preference
pub const KEY_OUTPUT_DIR: &str = "output_dir";

/// How the program was launched, which decides where settings live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Installed binary: settings go to a per-user directory
    Installed,
    /// Running from a source checkout: settings sit next to the sources
    FromSource(PathBuf),
}

impl ExecutionMode {
    /// Detect the mode from the environment
    ///
    /// `cargo run` exports `CARGO_MANIFEST_DIR` to the program it launches;
    /// an installed binary never sees it.
    pub fn detect() -> Self {
        Self::from_manifest_dir(std::env::var_os("CARGO_MANIFEST_DIR"))
    }

    /// Mode implied by the value of `CARGO_MANIFEST_DIR`, if any
    pub fn from_manifest_dir(manifest_dir: Option<OsString>) -> Self {
        match manifest_dir {
            Some(dir) if !dir.is_empty() => ExecutionMode::FromSource(PathBuf::from(dir)),
            _ => ExecutionMode::Installed,
        }
    }

    /// Directory the settings file belongs in
    pub fn settings_dir(&self) -> Result<PathBuf> {
        match self {
            ExecutionMode::Installed => {
                let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
                Ok(installed_dir(&home))
            }
            ExecutionMode::FromSource(dir) => Ok(dir.clone()),
        }
    }
}

#[cfg(windows)]
fn installed_dir(home: &Path) -> PathBuf {
    home.join(APP_DIR_NAME)
}

#[cfg(not(windows))]
fn installed_dir(home: &Path) -> PathBuf {
    home.join(".config").join(APP_DIR_NAME)
}

/// Reads and writes the settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by an explicit file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location for `mode`, creating its directory
    pub fn locate(mode: &ExecutionMode) -> Result<Self> {
        let dir = mode.settings_dir()?;
        fs::create_dir_all(&dir).map_err(|source| Error::SaveSettings {
            path: dir.clone(),
            source,
        })?;
        Ok(Self::at(dir.join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored output directory, or `""` when none is configured
    ///
    /// A missing file, unreadable or malformed content and a missing key all
    /// look the same to the caller.
    pub fn load(&self) -> String {
        match self.read_output_dir() {
            Ok(Some(dir)) => dir,
            Ok(None) => {
                debug!(path = %self.path.display(), "no output_dir configured");
                String::new()
            }
            Err(e) => {
                debug!(path = %self.path.display(), "settings unreadable, using defaults: {e}");
                String::new()
            }
        }
    }

    fn read_output_dir(&self) -> std::result::Result<Option<String>, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(&self.path)?;
        let conf = parse_verbatim(&text)?;

        let value = conf
            .section(Some(SECTION))
            .and_then(|props| props.get(KEY_OUTPUT_DIR))
            .or_else(|| {
                conf.section(None::<String>)
                    .and_then(|props| props.get(KEY_OUTPUT_DIR))
            });
        Ok(value.map(str::to_owned))
    }

    /// Replace the whole file with `output_dir` as its only setting
    pub fn save(&self, output_dir: &str) -> Result<()> {
        let mut conf = Ini::new();
        conf.with_section(Some(SECTION)).set(KEY_OUTPUT_DIR, output_dir);
        conf.write_to_file_policy(&self.path, EscapePolicy::Nothing)
            .map_err(|source| Error::SaveSettings {
                path: self.path.clone(),
                source,
            })?;
        info!(path = %self.path.display(), output_dir, "saved output directory");
        Ok(())
    }
}

/// Parse `text` with every back-slash taken literally
///
/// rust-ini joins a line ending in `\` onto the next line even with escapes
/// off. Doubled back-slashes come back out of the escape pass as single
/// literal ones, and none of them can start a continuation.
fn parse_verbatim(text: &str) -> std::result::Result<Ini, ini::ParseError> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: true,
        ..ParseOption::default()
    };
    Ini::load_from_str_opt(&text.replace('\\', "\\\\"), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::at(dir.path().join(SETTINGS_FILE_NAME))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load(), "");
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[DEFAULT]\nother = 1\n").unwrap();
        assert_eq!(store.load(), "");
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), [0xff, 0xfe, 0x00, b'[', b'\n']).unwrap();
        assert_eq!(store.load(), "");
    }

    #[test]
    fn test_load_existing_file_format() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            "[DEFAULT]\noutput_dir = C:\\Users\\me\\Desktop\nextra = ignored\n\n[window]\nwidth = 600\n",
        )
        .unwrap();
        assert_eq!(store.load(), "C:\\Users\\me\\Desktop");
    }

    #[test]
    fn test_load_unnamed_section() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "output_dir=/srv/out\n").unwrap();
        assert_eq!(store.load(), "/srv/out");
    }

    #[test]
    fn test_load_value_ending_in_backslash_keeps_next_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[DEFAULT]\noutput_dir = E:\\work\\\nextra = 1\n\n").unwrap();
        assert_eq!(store.load(), "E:\\work\\");
    }

    #[test]
    fn test_save_load_trailing_backslash() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for path in ["D:\\", "C:\\a\\b\\", "\\\\server\\share\\"] {
            store.save(path).unwrap();
            assert_eq!(store.load(), path);
        }
    }

    #[test]
    fn test_detect_from_manifest_dir() {
        assert_eq!(
            ExecutionMode::from_manifest_dir(Some(OsString::from("/src/merger"))),
            ExecutionMode::FromSource(PathBuf::from("/src/merger"))
        );
        assert_eq!(ExecutionMode::from_manifest_dir(None), ExecutionMode::Installed);
        assert_eq!(
            ExecutionMode::from_manifest_dir(Some(OsString::new())),
            ExecutionMode::Installed
        );
    }

    #[test]
    fn test_save_writes_default_section() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("D:\\merged files").unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("[DEFAULT]"));
        assert!(text.contains("output_dir=D:\\merged files"));
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[DEFAULT]\noutput_dir=/old\nstale=yes\n").unwrap();

        store.save("/new").unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(store.load(), "/new");
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path().join("absent").join(SETTINGS_FILE_NAME));
        let err = store.save("/x").unwrap_err();
        assert!(matches!(err, Error::SaveSettings { .. }));
    }

    #[test]
    fn test_locate_from_source_creates_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("checkout");
        let store = SettingsStore::locate(&ExecutionMode::FromSource(root.clone())).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.path(), root.join(SETTINGS_FILE_NAME));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_installed_dir_layout() {
        assert_eq!(
            installed_dir(Path::new("/home/me")),
            PathBuf::from("/home/me/.config/PdfZipMerger")
        );
    }
}
