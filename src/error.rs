//! Error types for the PDF/ZIP merger library

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// A required field of a merge or reveal action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    PdfPath,
    ZipPath,
    OutputDir,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputField::PdfPath => "PDF file",
            InputField::ZipPath => "ZIP file",
            InputField::OutputDir => "output directory",
        })
    }
}

/// Broad classes of failure the calling shell reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user must supply something and retry
    MissingInput,
    /// A filesystem operation failed; the message carries the OS error
    IoFailure,
}

/// Main error type for the merger library
#[derive(Error, Debug)]
pub enum Error {
    /// A required path or name was blank
    #[error("No {0} selected")]
    MissingInput(InputField),

    /// The directory to reveal does not exist
    #[error("Output directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Reading one of the merge sources failed
    #[error("Failed to read {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating or writing the merged file failed
    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisting the settings file failed
    #[error("Failed to save settings to {}: {source}", path.display())]
    SaveSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every numbered name for the base name is already taken
    #[error("No free file name for \"{base_name}\" in {}", directory.display())]
    NameSpaceExhausted { directory: PathBuf, base_name: String },

    /// The per-user settings directory cannot be derived
    #[error("Could not determine the home directory")]
    NoHomeDirectory,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error for the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput(_) | Error::DirectoryNotFound(_) => ErrorKind::MissingInput,
            Error::ReadSource { .. }
            | Error::WriteOutput { .. }
            | Error::SaveSettings { .. }
            | Error::NameSpaceExhausted { .. }
            | Error::NoHomeDirectory
            | Error::Io(_) => ErrorKind::IoFailure,
        }
    }
}
