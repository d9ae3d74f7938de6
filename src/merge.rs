//! PDF + ZIP concatenation
//!
//! The merged file is the raw bytes of the PDF followed by the raw bytes of
//! the ZIP archive. PDF readers locate the document from the start of the
//! file and unzip tools locate the archive from its end, so the result opens
//! as either.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::error::{Error, InputField, Result};

/// Base name used when the user leaves the name blank
pub const DEFAULT_BASE_NAME: &str = "new";

/// Extension of every merged file
pub const OUTPUT_EXTENSION: &str = "pdf";

/// Everything needed for one merge, as typed or dropped by the user
///
/// Fields are kept raw; [`merge`] does the trimming and unquoting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequest {
    /// PDF file; its bytes open the output
    pub pdf_path: String,
    /// ZIP file; its bytes follow the PDF's
    pub zip_path: String,
    /// Directory the output is created in
    pub output_dir: String,
    /// Output file stem, without extension; blank means [`DEFAULT_BASE_NAME`]
    pub base_name: String,
}

impl MergeRequest {
    pub fn new(
        pdf_path: impl Into<String>,
        zip_path: impl Into<String>,
        output_dir: impl Into<String>,
        base_name: impl Into<String>,
    ) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            zip_path: zip_path.into(),
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }
}

/// Strip surrounding whitespace and the double quotes that pasted or
/// dragged paths often carry
pub fn clean_path(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// The base name to use, falling back to [`DEFAULT_BASE_NAME`]
pub fn effective_base_name(raw: &str) -> &str {
    match raw.trim() {
        "" => DEFAULT_BASE_NAME,
        name => name,
    }
}

/// Lazy sequence of output candidates: `dir/base.pdf`, `dir/base1.pdf`,
/// `dir/base2.pdf`, ...
///
/// Restartable by constructing a new one; ends only if the counter would
/// overflow.
#[derive(Debug, Clone)]
pub struct CandidatePaths {
    directory: PathBuf,
    base_name: String,
    next: Option<u64>,
}

impl CandidatePaths {
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            next: Some(0),
        }
    }

    fn candidate(&self, index: u64) -> PathBuf {
        let mut file_name = OsString::from(&self.base_name);
        if index > 0 {
            file_name.push(index.to_string());
        }
        file_name.push(".");
        file_name.push(OUTPUT_EXTENSION);
        self.directory.join(file_name)
    }
}

impl Iterator for CandidatePaths {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let index = self.next?;
        self.next = index.checked_add(1);
        Some(self.candidate(index))
    }
}

/// Whether anything, including a dangling symlink, already occupies `path`
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Find the first output path in `directory` that no file occupies
///
/// Probing is unbounded: a directory already holding `base.pdf` through
/// `base10000.pdf` costs ten thousand probes.
///
/// # Example
///
/// ```no_run
/// use pdf_zip_merger::merge::resolve_output_path;
/// use std::path::Path;
///
/// let path = resolve_output_path(Path::new("/tmp/out"), "report").unwrap();
/// println!("next free name: {}", path.display());
/// ```
pub fn resolve_output_path(directory: &Path, base_name: &str) -> Result<PathBuf> {
    first_free(CandidatePaths::new(directory, base_name))
}

fn first_free(candidates: CandidatePaths) -> Result<PathBuf> {
    let directory = candidates.directory.clone();
    let base_name = candidates.base_name.clone();
    for candidate in candidates {
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
        debug!(path = %candidate.display(), "output name taken");
    }
    Err(Error::NameSpaceExhausted { directory, base_name })
}

/// Concatenate the PDF and ZIP of `request` into a fresh file
///
/// Returns the absolute path of the written file. Never overwrites an
/// existing file. Both sources are read before the destination is created,
/// and a destination left half-written by a failed write is removed.
///
/// # Example
///
/// ```no_run
/// use pdf_zip_merger::merge::{merge, MergeRequest};
///
/// let request = MergeRequest::new("doc.pdf", "files.zip", "/tmp/out", "report");
/// let written = merge(&request).expect("Failed to merge");
/// println!("{}", written.display());
/// ```
pub fn merge(request: &MergeRequest) -> Result<PathBuf> {
    let pdf_path = clean_path(&request.pdf_path);
    let zip_path = clean_path(&request.zip_path);
    let output_dir = clean_path(&request.output_dir);

    if pdf_path.is_empty() {
        return Err(Error::MissingInput(InputField::PdfPath));
    }
    if zip_path.is_empty() {
        return Err(Error::MissingInput(InputField::ZipPath));
    }
    if output_dir.is_empty() {
        return Err(Error::MissingInput(InputField::OutputDir));
    }

    let pdf_bytes = read_source(Path::new(pdf_path))?;
    let zip_bytes = read_source(Path::new(zip_path))?;

    let base_name = effective_base_name(&request.base_name);
    let output_path = resolve_output_path(Path::new(output_dir), base_name)?;
    let output_path = std::path::absolute(output_path)?;

    // Known race: another process may claim `output_path` between the probe
    // above and the open below. `create_new` turns that into an error
    // instead of an overwrite.
    write_output(&output_path, &pdf_bytes, &zip_bytes)?;

    info!(
        output = %output_path.display(),
        pdf_bytes = pdf_bytes.len(),
        zip_bytes = zip_bytes.len(),
        "merged"
    );
    Ok(output_path)
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::ReadSource {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, pdf_bytes: &[u8], zip_bytes: &[u8]) -> Result<()> {
    let write_error = |source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_error)?;

    if let Err(source) = write_parts(&mut file, &[pdf_bytes, zip_bytes]) {
        drop(file);
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), "could not remove partial output: {e}");
        }
        return Err(write_error(source));
    }

    Ok(())
}

fn write_parts(file: &mut File, parts: &[&[u8]]) -> io::Result<()> {
    for part in parts {
        file.write_all(part)?;
    }
    file.sync_all()
}
