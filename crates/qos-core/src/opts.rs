//! This module defines the [`Opts`] configuration which describes how result files are
//! recognized, parsed and summarized.

use crate::parse::{HeaderPolicy, RecordParser};
use crate::record::{FlowRecord, TrafficType};
use crate::template::FilenameTemplate;

/// Pipeline options.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct Opts {
    /// How the speed is read from file names.
    #[builder(default)]
    pub template: FilenameTemplate,
    /// How strictly headers are checked.
    #[builder(default)]
    pub header_policy: HeaderPolicy,
    /// The field delimiter of result files.
    #[builder(default = b',')]
    pub delimiter: u8,
    /// The traffic types to summarize. Records of other types are excluded and reported.
    #[builder(default = TrafficType::KNOWN.to_vec())]
    pub traffic_types: Vec<TrafficType>,
    /// Which records feed the summaries.
    #[builder(default)]
    pub scope: SummaryScope,
}

impl Default for Opts {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Opts {
    pub(crate) fn parser(&self) -> RecordParser {
        RecordParser::new(self.header_policy, self.delimiter)
    }
}

/// Which records of the dataset are summarized.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derivative::Derivative,
    serde::Serialize,
    serde::Deserialize,
)]
#[derivative(Default)]
#[serde(rename_all = "snake_case")]
pub enum SummaryScope {
    /// Only the per-run `Average` rows, so each run contributes one value per traffic type.
    #[derivative(Default)]
    Averages,
    /// Every row, including individual flows.
    AllRows,
}

impl SummaryScope {
    pub fn admits(self, record: &FlowRecord) -> bool {
        match self {
            SummaryScope::Averages => record.is_average(),
            SummaryScope::AllRows => true,
        }
    }
}
