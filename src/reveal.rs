//! Open a directory in the platform file manager

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};
use crate::error::{Error, InputField, Result};
use crate::merge::clean_path;

#[cfg(target_os = "windows")]
const FILE_MANAGER: &str = "explorer";
#[cfg(target_os = "macos")]
const FILE_MANAGER: &str = "open";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const FILE_MANAGER: &str = "xdg-open";

/// Check that `raw` names an existing directory and return it normalised
pub fn resolve_directory(raw: &str) -> Result<PathBuf> {
    let dir = clean_path(raw);
    if dir.is_empty() {
        return Err(Error::MissingInput(InputField::OutputDir));
    }
    let dir: PathBuf = Path::new(dir).components().collect();
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir));
    }
    Ok(dir)
}

/// Show `raw` in the file manager
///
/// A blank or missing directory is an error for the user to fix. Failure to
/// launch the file manager is only logged.
pub fn reveal_directory(raw: &str) -> Result<PathBuf> {
    let dir = resolve_directory(raw)?;
    debug!(program = FILE_MANAGER, dir = %dir.display(), "revealing directory");

    match Command::new(FILE_MANAGER).arg(&dir).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(program = FILE_MANAGER, %status, "file manager exited with failure"),
        Err(e) => warn!(program = FILE_MANAGER, "could not launch file manager: {e}"),
    }
    Ok(dir)
}
