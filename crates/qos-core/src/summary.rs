//! Cross-run summaries: for every traffic type and metric, the extreme values and the speeds at
//! which they occur.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::metric::{Direction, Metric};
use crate::partition::Partition;
use crate::record::{FlowRecord, TrafficType};
use crate::units::MetersPerSec;

/// A metric value and the speed of the run it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, derive_new::new)]
pub struct Extremum {
    pub value: f64,
    pub speed: MetersPerSec,
}

/// The extrema of one metric within one traffic type.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SummaryFact {
    pub traffic_type: TrafficType,
    pub metric: Metric,
    pub min: Extremum,
    pub max: Extremum,
}

impl SummaryFact {
    /// The extremum on the desirable end of the metric.
    pub fn best(&self) -> Extremum {
        match self.metric.direction() {
            Direction::HigherIsBetter => self.max,
            Direction::LowerIsBetter => self.min,
        }
    }

    /// The extremum on the undesirable end of the metric.
    pub fn worst(&self) -> Extremum {
        match self.metric.direction() {
            Direction::HigherIsBetter => self.min,
            Direction::LowerIsBetter => self.max,
        }
    }
}

/// Compute the extrema of `metric` over `records`, which should all have type `traffic_type`.
///
/// When several records share an extreme value, the one with the smallest speed is reported,
/// regardless of the order of `records`. Returns `None` if `records` is empty.
pub fn analyze(
    records: &[&FlowRecord],
    traffic_type: &TrafficType,
    metric: Metric,
) -> Option<SummaryFact> {
    let mut observations = records
        .iter()
        .map(|r| Extremum::new(metric.value(r), r.speed));
    let first = observations.next()?;
    let (min, max) = observations.fold((first, first), |(min, max), x| {
        let min = match x.value.total_cmp(&min.value).then(x.speed.cmp(&min.speed)) {
            Ordering::Less => x,
            _ => min,
        };
        let max = match x.value.total_cmp(&max.value).then(max.speed.cmp(&x.speed)) {
            Ordering::Greater => x,
            _ => max,
        };
        (min, max)
    });
    Some(SummaryFact {
        traffic_type: traffic_type.clone(),
        metric,
        min,
        max,
    })
}

/// Every [`SummaryFact`] of a partition.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SummaryTable {
    /// Facts ordered by traffic type (display order), then metric.
    pub facts: Vec<SummaryFact>,
    /// Requested traffic types without any record.
    pub no_data: Vec<TrafficType>,
    /// Records left out because their traffic type was not requested, per label.
    pub excluded: BTreeMap<TrafficType, usize>,
}

impl SummaryTable {
    pub fn new(partition: &Partition<'_>) -> Self {
        let mut table = Self {
            excluded: partition.excluded_counts(),
            ..Default::default()
        };
        for (label, group) in partition.groups() {
            if group.is_empty() {
                table.no_data.push(label.clone());
                continue;
            }
            table.facts.extend(
                Metric::ALL
                    .into_iter()
                    .filter_map(|metric| analyze(group, label, metric)),
            );
        }
        table
    }

    /// The fact for one traffic type and metric, if there was data for it.
    pub fn get(&self, traffic_type: &TrafficType, metric: Metric) -> Option<&SummaryFact> {
        self.facts
            .iter()
            .find(|f| &f.traffic_type == traffic_type && f.metric == metric)
    }

    /// The facts of one traffic type, in metric order.
    pub fn for_traffic_type<'a>(
        &'a self,
        traffic_type: &'a TrafficType,
    ) -> impl Iterator<Item = &'a SummaryFact> + 'a {
        self.facts
            .iter()
            .filter(move |f| &f.traffic_type == traffic_type)
    }
}
