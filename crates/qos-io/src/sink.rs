use std::fs;
use std::path::{Path, PathBuf};

use qos_core::{Dataset, InputFile, Row, Sink, StoreError};
use serde::Serialize;

/// The name of the unified dataset file.
pub const DATASET_FILE: &str = "qos_comparison_all_speeds.csv";

/// A [`Sink`] writing CSV files into a directory, which is created if needed.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct CsvSink {
    /// The output directory.
    #[builder(setter(into))]
    pub csv_dir: PathBuf,
}

impl CsvSink {
    /// Where the flows of `file` are written.
    pub fn flows_path(&self, file: &InputFile) -> PathBuf {
        self.csv_dir.join(format!("{}_flows.csv", file.stem()))
    }

    /// Where the unified dataset is written.
    pub fn dataset_path(&self) -> PathBuf {
        self.csv_dir.join(DATASET_FILE)
    }

    fn write_all<T, I>(&self, path: &Path, records: I) -> Result<(), StoreError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        fs::create_dir_all(&self.csv_dir)?;
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        for record in records {
            writer.serialize(record).map_err(csv_error)?;
        }
        writer.flush()?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}

impl Sink for CsvSink {
    fn write_flows(&self, file: &InputFile, rows: &[&Row]) -> Result<(), StoreError> {
        self.write_all(&self.flows_path(file), rows)
    }

    fn write_dataset(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.write_all(&self.dataset_path(), dataset)
    }
}

fn csv_error(e: csv::Error) -> StoreError {
    if e.is_io_error() {
        StoreError::Io(e.into())
    } else {
        StoreError::Other(e.into())
    }
}
