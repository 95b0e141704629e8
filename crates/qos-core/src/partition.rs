//! Splitting records by traffic type.

use std::collections::BTreeMap;

use crate::record::{FlowRecord, TrafficType};

/// Records grouped by traffic type. Each group keeps the order of the input; labels that were
/// requested but never seen have an empty group. Records whose label was not requested are kept
/// aside in [`Partition::excluded`].
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    groups: BTreeMap<TrafficType, Vec<&'a FlowRecord>>,
    excluded: Vec<&'a FlowRecord>,
}

impl<'a> Partition<'a> {
    pub fn new<I>(records: I, labels: &[TrafficType]) -> Self
    where
        I: IntoIterator<Item = &'a FlowRecord>,
    {
        let mut groups = labels
            .iter()
            .map(|label| (label.clone(), Vec::new()))
            .collect::<BTreeMap<_, _>>();
        let mut excluded = Vec::new();
        for record in records {
            match groups.get_mut(&record.traffic_type) {
                Some(group) => group.push(record),
                None => excluded.push(record),
            }
        }
        Self { groups, excluded }
    }

    /// The records of one traffic type. Empty if the label has no records or was not requested.
    pub fn get(&self, label: &TrafficType) -> &[&'a FlowRecord] {
        self.groups.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over the groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = (&TrafficType, &[&'a FlowRecord])> {
        self.groups
            .iter()
            .map(|(label, group)| (label, group.as_slice()))
    }

    /// Records whose traffic type was not requested, in input order.
    pub fn excluded(&self) -> &[&'a FlowRecord] {
        self.excluded.as_ref()
    }

    /// The number of excluded records per unrequested label.
    pub fn excluded_counts(&self) -> BTreeMap<TrafficType, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.excluded {
            *counts.entry(record.traffic_type.clone()).or_default() += 1;
        }
        counts
    }

    /// The number of records in all groups plus the excluded records.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum::<usize>() + self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
