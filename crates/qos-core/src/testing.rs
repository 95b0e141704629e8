use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::dataset::{Dataset, RunTable};
use crate::record::{FlowId, FlowRecord, Row, TrafficType};
use crate::store::{InputFile, Sink, Source, StoreError};
use crate::units::{Kbps, MetersPerSec, Millisecs, Percent};

pub(crate) const HEADER: &str = "FlowID,TrafficType,Throughput(kbps),Delay(ms),Jitter(ms),Loss(%)";

pub(crate) fn row(flow_id: FlowId, traffic_type: TrafficType, throughput: f64) -> Row {
    row_with(flow_id, traffic_type, throughput, 10.0)
}

pub(crate) fn row_with(
    flow_id: FlowId,
    traffic_type: TrafficType,
    throughput: f64,
    delay: f64,
) -> Row {
    Row {
        flow_id,
        traffic_type,
        throughput: Kbps::new(throughput),
        delay: Millisecs::new(delay),
        jitter: Millisecs::new(1.0),
        loss: Percent::ZERO,
    }
}

/// A table from a file named after `speed`.
pub(crate) fn run_table(speed: f64, rows: Vec<Row>) -> RunTable {
    let file = InputFile::new(format!("qos_dsr_20node_speed{speed}_10client.txt"));
    RunTable::new(file, MetersPerSec::new(speed), rows)
}

/// Result file contents with the standard header.
pub(crate) fn content(rows: &[&str]) -> String {
    std::iter::once(HEADER)
        .chain(rows.iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
}

/// An in-memory store. Files are discovered in name order.
#[derive(Debug, Default)]
pub(crate) struct MemStore {
    files: BTreeMap<String, String>,
    flows: Mutex<Vec<(String, Vec<Row>)>>,
    dataset: Mutex<Option<Vec<FlowRecord>>>,
}

impl MemStore {
    pub(crate) fn with(mut self, name: &str, content: impl Into<String>) -> Self {
        self.files.insert(name.to_owned(), content.into());
        self
    }

    pub(crate) fn flows(&self) -> Vec<(String, Vec<Row>)> {
        self.flows.lock().unwrap().clone()
    }

    pub(crate) fn dataset(&self) -> Option<Vec<FlowRecord>> {
        self.dataset.lock().unwrap().clone()
    }
}

impl Source for MemStore {
    fn discover(&self) -> Result<Vec<InputFile>, StoreError> {
        Ok(self.files.keys().map(InputFile::new).collect())
    }

    fn read(&self, file: &InputFile) -> Result<String, StoreError> {
        self.files.get(&file.name()).cloned().ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                file.name(),
            ))
        })
    }
}

impl Sink for MemStore {
    fn write_flows(&self, file: &InputFile, rows: &[&Row]) -> Result<(), StoreError> {
        let rows = rows.iter().map(|&r| r.clone()).collect();
        self.flows.lock().unwrap().push((file.name(), rows));
        Ok(())
    }

    fn write_dataset(&self, dataset: &Dataset) -> Result<(), StoreError> {
        *self.dataset.lock().unwrap() = Some(dataset.records().to_vec());
        Ok(())
    }
}
