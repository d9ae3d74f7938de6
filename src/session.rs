//! State of one interactive session
//!
//! Holds what the user has picked so far. The merge engine never sees this
//! type; it only receives the [`MergeRequest`] built from it.

use std::path::Path;
use crate::error::Result;
use crate::merge::{clean_path, MergeRequest, DEFAULT_BASE_NAME};
use crate::settings::SettingsStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Chosen PDF, as typed or dropped
    pub pdf_path: String,
    /// Chosen ZIP, as typed or dropped
    pub zip_path: String,
    /// Where merged files go
    pub output_dir: String,
    /// Stem of the merged file name
    pub base_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pdf_path: String::new(),
            zip_path: String::new(),
            output_dir: String::new(),
            base_name: DEFAULT_BASE_NAME.to_string(),
        }
    }
}

impl Session {
    /// New session with the output directory pre-filled from the store
    pub fn start(store: &SettingsStore) -> Self {
        Self {
            output_dir: store.load(),
            ..Self::default()
        }
    }

    /// Take the first of the dropped or picked paths as the PDF
    ///
    /// An empty output directory is filled with the PDF's parent directory;
    /// that choice is not persisted.
    pub fn set_pdf<S: AsRef<str>>(&mut self, paths: &[S]) {
        let Some(first) = first_path(paths) else {
            return;
        };
        self.pdf_path = first.to_string();

        if self.output_dir.trim().is_empty() {
            if let Some(parent) = Path::new(clean_path(first)).parent() {
                self.output_dir = parent.to_string_lossy().into_owned();
            }
        }
    }

    /// Take the first of the dropped or picked paths as the ZIP
    pub fn set_zip<S: AsRef<str>>(&mut self, paths: &[S]) {
        if let Some(first) = first_path(paths) {
            self.zip_path = first.to_string();
        }
    }

    /// Change the output directory and remember it for later runs
    pub fn set_output_dir(&mut self, dir: &str, store: &SettingsStore) -> Result<()> {
        if let Some(dir) = remember_output_dir(store, dir)? {
            self.output_dir = dir.to_string();
        }
        Ok(())
    }

    pub fn set_base_name(&mut self, name: &str) {
        self.base_name = name.trim().to_string();
    }

    /// Forget the chosen PDF and ZIP; directory and name stay
    pub fn clear(&mut self) {
        self.pdf_path.clear();
        self.zip_path.clear();
    }

    pub fn request(&self) -> MergeRequest {
        MergeRequest::new(
            self.pdf_path.clone(),
            self.zip_path.clone(),
            self.output_dir.clone(),
            self.base_name.clone(),
        )
    }
}

/// Persist `raw` as the output directory, unquoted
///
/// Blank input leaves the stored preference alone and returns `None`.
pub fn remember_output_dir<'a>(store: &SettingsStore, raw: &'a str) -> Result<Option<&'a str>> {
    let dir = clean_path(raw);
    if dir.is_empty() {
        return Ok(None);
    }
    store.save(dir)?;
    Ok(Some(dir))
}

/// Output directory for a merge that names none: the remembered one, else
/// the PDF's directory, else the current directory for a bare file name
pub fn default_output_dir(remembered: &str, pdf: &str) -> String {
    if !remembered.trim().is_empty() {
        return remembered.to_string();
    }
    match Path::new(clean_path(pdf)).parent() {
        Some(parent) if parent.as_os_str().is_empty() => ".".to_string(),
        Some(parent) => parent.to_string_lossy().into_owned(),
        None => String::new(),
    }
}

fn first_path<S: AsRef<str>>(paths: &[S]) -> Option<&str> {
    paths
        .iter()
        .map(AsRef::as_ref)
        .find(|p| !clean_path(p).is_empty())
}
