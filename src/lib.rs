//! PDF + ZIP Merger Library
//!
//! Appends a ZIP archive to a PDF so the result opens both as a PDF
//! document and as a ZIP archive. This library provides:
//! - The merge itself, with collision-free output naming
//! - Persistence of the last used output directory
//! - A small interactive shell around both
//!
//! # Example
//!
//! ```no_run
//! use pdf_zip_merger::merge::{merge, MergeRequest};
//!
//! let request = MergeRequest::new("slides.pdf", "sources.zip", "/tmp/out", "handout");
//! let written = merge(&request).expect("Failed to merge");
//! println!("{}", written.display());
//! ```

pub mod error;
pub mod logging;
pub mod merge;
pub mod reveal;
pub mod session;
pub mod settings;
pub mod shell;

// Re-export commonly used items
pub use error::{Error, ErrorKind, InputField, Result};
pub use merge::{merge, resolve_output_path, MergeRequest};
pub use settings::{ExecutionMode, SettingsStore};
