//! The unified dataset: every run's rows, tagged with the run's speed and sorted.

use itertools::Itertools;

use crate::partition::Partition;
use crate::record::{FlowRecord, Row, TrafficType};
use crate::store::InputFile;
use crate::units::MetersPerSec;

/// The rows parsed from one run, along with the file they came from and the run's speed.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct RunTable {
    pub file: InputFile,
    pub speed: MetersPerSec,
    pub rows: Vec<Row>,
}

/// All ingested records, sorted by `(speed, traffic type)`. Records that compare equal are
/// ordered by source file path, then by their order within the file, so the result does not
/// depend on the order in which tables are aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<FlowRecord>,
}

impl Dataset {
    /// Tag every row with its run's speed and merge everything into one dataset.
    ///
    /// Returns an error if no table contributes a row.
    pub fn aggregate<I>(tables: I) -> Result<Self, EmptyDataset>
    where
        I: IntoIterator<Item = RunTable>,
    {
        let mut tables = tables.into_iter().collect::<Vec<_>>();
        // Several runs can share a speed (e.g. different node counts).
        tables.sort_by(|a, b| a.file.cmp(&b.file));
        let mut records = tables
            .into_iter()
            .flat_map(|RunTable { speed, rows, .. }| rows.into_iter().map(move |r| r.tag(speed)))
            .collect::<Vec<_>>();
        if records.is_empty() {
            return Err(EmptyDataset);
        }
        // `sort_by` is stable.
        records.sort_by(|a, b| {
            a.speed
                .cmp(&b.speed)
                .then_with(|| a.traffic_type.cmp(&b.traffic_type))
        });
        Ok(Self { records })
    }

    /// Get a reference to the dataset's records.
    pub fn records(&self) -> &[FlowRecord] {
        self.records.as_ref()
    }

    /// The distinct speeds in the dataset, ascending.
    pub fn speeds(&self) -> Vec<MetersPerSec> {
        self.records.iter().map(|r| r.speed).dedup().collect()
    }

    /// Split the dataset by traffic type.
    pub fn partition<'a>(&'a self, labels: &[TrafficType]) -> Partition<'a> {
        Partition::new(&self.records, labels)
    }

    delegate::delegate! {
        to self.records {
            /// The number of records.
            pub fn len(&self) -> usize;

            /// Returns true if the dataset has no records. Never true for an aggregated dataset.
            pub fn is_empty(&self) -> bool;

            /// Iterate over the records in order.
            pub fn iter(&self) -> std::slice::Iter<'_, FlowRecord>;
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a FlowRecord;
    type IntoIter = std::slice::Iter<'a, FlowRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// No run contributed any record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no records to analyze")]
pub struct EmptyDataset;
