//! Interfaces to the persistence layer. A [`Source`] finds and reads result files; a [`Sink`]
//! receives the tables the pipeline produces.

use std::path::{Path, PathBuf};

use crate::dataset::Dataset;
use crate::record::Row;

/// A result file found by a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputFile {
    path: PathBuf,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_ref()
    }

    /// The final component of the path.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The name without its extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// An interface for locating and reading result files.
pub trait Source {
    /// List the result files to ingest, in a deterministic order.
    fn discover(&self) -> Result<Vec<InputFile>, StoreError>;

    /// Read the full contents of a file returned by [`Source::discover`].
    fn read(&self, file: &InputFile) -> Result<String, StoreError>;
}

impl<T: Source> Source for &T {
    fn discover(&self) -> Result<Vec<InputFile>, StoreError> {
        (**self).discover()
    }

    fn read(&self, file: &InputFile) -> Result<String, StoreError> {
        (**self).read(file)
    }
}

/// An interface for persisting pipeline output.
pub trait Sink {
    /// Persist the individual flows (no `Average` rows) of one run.
    fn write_flows(&self, file: &InputFile, rows: &[&Row]) -> Result<(), StoreError>;

    /// Persist the unified dataset.
    fn write_dataset(&self, dataset: &Dataset) -> Result<(), StoreError>;
}

impl<T: Sink> Sink for &T {
    fn write_flows(&self, file: &InputFile, rows: &[&Row]) -> Result<(), StoreError> {
        (**self).write_flows(file, rows)
    }

    fn write_dataset(&self, dataset: &Dataset) -> Result<(), StoreError> {
        (**self).write_dataset(dataset)
    }
}

/// A [`Sink`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn write_flows(&self, _: &InputFile, _: &[&Row]) -> Result<(), StoreError> {
        Ok(())
    }

    fn write_dataset(&self, _: &Dataset) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error raised by a persistence backend.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_come_from_the_last_component() {
        let file = InputFile::new("data/txt/qos_dsr_20node_speed5_10client.txt");
        assert_eq!(file.name(), "qos_dsr_20node_speed5_10client.txt");
        assert_eq!(file.stem(), "qos_dsr_20node_speed5_10client");
        assert_eq!(file.to_string(), file.name());
    }

    #[test]
    fn constructs_from_any_path_like() {
        let owned = InputFile::new(PathBuf::from("a/qos.txt"));
        let borrowed = InputFile::new(Path::new("a/qos.txt"));
        let text = InputFile::new(String::from("a/qos.txt"));
        assert_eq!(owned, borrowed);
        assert_eq!(owned, text);
        assert_eq!(owned.path(), Path::new("a/qos.txt"));
    }
}
