//! Filesystem collaborators for the QoS comparison: directory discovery, CSV output, JSON
//! configuration and the console report.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::path::PathBuf;

mod config;
mod report;
mod sink;
mod source;

pub use config::{read_config, Config};
pub use report::{render, write_summary_json};
pub use sink::{CsvSink, DATASET_FILE};
pub use source::{DirSource, DEFAULT_PATTERN};

/// Error kinds for configuration and report I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown file type.
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    /// Error serializing/deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}
