//! Flow records. A [`Row`] is one line of an ns-3 QoS result file; a [`FlowRecord`] is the same
//! line tagged with the mobility speed of the run that produced it.

use std::str::FromStr;

use crate::units::{Kbps, MetersPerSec, Millisecs, Percent};

/// A flow identifier, or the sentinel marking a per-traffic-type average.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum FlowId {
    /// A flow monitor ID (always positive).
    #[display(fmt = "{}", _0)]
    Id(u32),
    /// The per-traffic-type average over all flows of a run.
    #[display(fmt = "Average")]
    Average,
}

impl FlowId {
    /// The text of the sentinel in the `FlowID` column.
    pub const AVERAGE: &'static str = "Average";
}

impl FromStr for FlowId {
    type Err = ParseFlowIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::AVERAGE {
            return Ok(FlowId::Average);
        }
        match s.parse::<u32>() {
            Ok(id) if id > 0 => Ok(FlowId::Id(id)),
            _ => Err(ParseFlowIdError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for FlowId {
    type Error = ParseFlowIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FlowId> for String {
    fn from(id: FlowId) -> Self {
        id.to_string()
    }
}

/// Error parsing a [`FlowId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is neither a positive flow ID nor `Average`")]
pub struct ParseFlowIdError(pub String);

/// The traffic class of a record. Variants are declared in display order, so the derived `Ord`
/// is the order used to sort datasets and reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrafficType {
    /// The aggregate over every flow of a run.
    Overall,
    VoIP,
    Video,
    /// A label the simulator emitted but the analysis does not know about.
    Other(String),
}

impl TrafficType {
    /// The labels the ns-3 scenario emits, in display order.
    pub const KNOWN: [TrafficType; 3] = [TrafficType::Overall, TrafficType::VoIP, TrafficType::Video];

    pub fn as_str(&self) -> &str {
        match self {
            TrafficType::Overall => "Overall",
            TrafficType::VoIP => "VoIP",
            TrafficType::Video => "Video",
            TrafficType::Other(label) => label,
        }
    }
}

impl std::fmt::Display for TrafficType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TrafficType {
    fn from(s: &str) -> Self {
        match s {
            "Overall" => TrafficType::Overall,
            "VoIP" => TrafficType::VoIP,
            "Video" => TrafficType::Video,
            other => TrafficType::Other(other.to_owned()),
        }
    }
}

impl From<String> for TrafficType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<TrafficType> for String {
    fn from(tt: TrafficType) -> Self {
        match tt {
            TrafficType::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

/// The columns of a QoS result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    FlowId,
    TrafficType,
    Throughput,
    Delay,
    Jitter,
    Loss,
}

impl Column {
    pub const COUNT: usize = 6;

    /// Every column, in the order the ns-3 scenario writes them.
    pub const ALL: [Column; Column::COUNT] = [
        Column::FlowId,
        Column::TrafficType,
        Column::Throughput,
        Column::Delay,
        Column::Jitter,
        Column::Loss,
    ];

    /// The header name of the column.
    pub const fn header(self) -> &'static str {
        match self {
            Column::FlowId => "FlowID",
            Column::TrafficType => "TrafficType",
            Column::Throughput => "Throughput(kbps)",
            Column::Delay => "Delay(ms)",
            Column::Jitter => "Jitter(ms)",
            Column::Loss => "Loss(%)",
        }
    }

    pub fn from_header(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == name)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// One parsed row of a result file.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Row {
    #[serde(rename = "FlowID")]
    pub flow_id: FlowId,
    #[serde(rename = "TrafficType")]
    pub traffic_type: TrafficType,
    #[serde(rename = "Throughput(kbps)")]
    pub throughput: Kbps,
    #[serde(rename = "Delay(ms)")]
    pub delay: Millisecs,
    #[serde(rename = "Jitter(ms)")]
    pub jitter: Millisecs,
    #[serde(rename = "Loss(%)")]
    pub loss: Percent,
}

impl Row {
    /// Returns true if this is a per-traffic-type average row.
    pub fn is_average(&self) -> bool {
        self.flow_id == FlowId::Average
    }

    /// Attach the speed of the run this row came from.
    pub fn tag(self, speed: MetersPerSec) -> FlowRecord {
        FlowRecord {
            flow_id: self.flow_id,
            traffic_type: self.traffic_type,
            throughput: self.throughput,
            delay: self.delay,
            jitter: self.jitter,
            loss: self.loss,
            speed,
        }
    }
}

/// A [`Row`] tagged with the mobility speed of its run. This is the unit of the unified
/// [`Dataset`](crate::dataset::Dataset).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FlowRecord {
    #[serde(rename = "FlowID")]
    pub flow_id: FlowId,
    #[serde(rename = "TrafficType")]
    pub traffic_type: TrafficType,
    #[serde(rename = "Throughput(kbps)")]
    pub throughput: Kbps,
    #[serde(rename = "Delay(ms)")]
    pub delay: Millisecs,
    #[serde(rename = "Jitter(ms)")]
    pub jitter: Millisecs,
    #[serde(rename = "Loss(%)")]
    pub loss: Percent,
    #[serde(rename = "Speed")]
    pub speed: MetersPerSec,
}

impl FlowRecord {
    /// Returns true if this is a per-traffic-type average record.
    pub fn is_average(&self) -> bool {
        self.flow_id == FlowId::Average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_id_parses_sentinel_and_ids() {
        assert_eq!("Average".parse::<FlowId>(), Ok(FlowId::Average));
        assert_eq!("17".parse::<FlowId>(), Ok(FlowId::Id(17)));
        assert!("0".parse::<FlowId>().is_err());
        assert!("average".parse::<FlowId>().is_err());
        assert!("-3".parse::<FlowId>().is_err());
    }

    #[test]
    fn traffic_types_sort_in_display_order() {
        let mut labels: Vec<TrafficType> = ["Video", "Background", "Overall", "VoIP", "Audio"]
            .into_iter()
            .map(TrafficType::from)
            .collect();
        labels.sort();
        let labels = labels.iter().map(TrafficType::as_str).collect::<Vec<_>>();
        assert_eq!(labels, ["Overall", "VoIP", "Video", "Audio", "Background"]);
    }

    #[test]
    fn columns_round_trip_through_headers() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::from_header("TxPackets"), None);
    }
}
