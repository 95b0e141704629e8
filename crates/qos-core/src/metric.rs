//! The QoS metrics compared across runs.

use crate::record::{Column, FlowRecord};

/// A QoS metric of a [`FlowRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Throughput,
    Delay,
    Jitter,
    Loss,
}

/// Which end of a metric's range is desirable. This only affects how results are labeled, never
/// how they are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Metric {
    /// Every metric, in report order.
    pub const ALL: [Metric; 4] = [Metric::Throughput, Metric::Delay, Metric::Jitter, Metric::Loss];

    /// The value of this metric in `record`.
    pub fn value(self, record: &FlowRecord) -> f64 {
        match self {
            Metric::Throughput => record.throughput.into_f64(),
            Metric::Delay => record.delay.into_f64(),
            Metric::Jitter => record.jitter.into_f64(),
            Metric::Loss => record.loss.into_f64(),
        }
    }

    /// The result-file column holding this metric.
    pub const fn column(self) -> Column {
        match self {
            Metric::Throughput => Column::Throughput,
            Metric::Delay => Column::Delay,
            Metric::Jitter => Column::Jitter,
            Metric::Loss => Column::Loss,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Metric::Throughput => Direction::HigherIsBetter,
            Metric::Delay | Metric::Jitter | Metric::Loss => Direction::LowerIsBetter,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column().header())
    }
}
