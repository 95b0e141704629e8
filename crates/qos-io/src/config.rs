use std::path::{Path, PathBuf};

use qos_core::{FilenameTemplate, HeaderPolicy, Opts, SummaryScope, TrafficType};

use crate::{CsvSink, DirSource, Error};

/// A comparison run, as described in a configuration file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// The directory holding the ns-3 result files.
    pub input_dir: PathBuf,
    /// The directory receiving the CSV tables.
    pub csv_dir: PathBuf,
    /// Where to export the summary table as JSON, if anywhere.
    #[serde(default)]
    pub summary_json: Option<PathBuf>,
    /// The discovery pattern.
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// The file name grammar.
    #[serde(default)]
    pub template: FilenameTemplate,
    /// How strictly result file headers are checked.
    #[serde(default)]
    pub header_policy: HeaderPolicy,
    /// Which records feed the summaries.
    #[serde(default)]
    pub scope: SummaryScope,
    /// The traffic types to summarize.
    #[serde(default = "default_traffic_types")]
    pub traffic_types: Vec<TrafficType>,
}

fn default_pattern() -> String {
    crate::source::DEFAULT_PATTERN.to_owned()
}

fn default_traffic_types() -> Vec<TrafficType> {
    TrafficType::KNOWN.to_vec()
}

impl Config {
    /// A configuration with every optional field at its default.
    pub fn new(input_dir: impl Into<PathBuf>, csv_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            csv_dir: csv_dir.into(),
            summary_json: None,
            pattern: default_pattern(),
            template: FilenameTemplate::default(),
            header_policy: HeaderPolicy::default(),
            scope: SummaryScope::default(),
            traffic_types: default_traffic_types(),
        }
    }

    /// The directory source described by this configuration.
    pub fn source(&self) -> DirSource {
        DirSource::builder()
            .input_dir(&self.input_dir)
            .pattern(&self.pattern)
            .build()
    }

    /// The CSV sink described by this configuration.
    pub fn sink(&self) -> CsvSink {
        CsvSink::builder().csv_dir(&self.csv_dir).build()
    }

    /// The pipeline options described by this configuration.
    pub fn opts(&self) -> Opts {
        Opts::builder()
            .template(self.template.clone())
            .header_policy(self.header_policy)
            .traffic_types(self.traffic_types.clone())
            .scope(self.scope)
            .build()
    }
}

/// Reads a [`Config`] from a JSON file.
pub fn read_config(path: impl AsRef<Path>) -> Result<Config, Error> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        _ => Err(Error::UnknownFileType(path.into())),
    }
}
