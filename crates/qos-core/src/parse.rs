//! Parsing of ns-3 QoS result tables.
//!
//! A result file is delimited text: a header row naming the [columns](Column), then one row per
//! flow plus at most one `Average` row per traffic type. Header problems reject the whole file
//! with a [`SchemaMismatch`]. Problems with a single row reject only that row, reported as a
//! [`RecordError`].

use csv::StringRecord;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::record::{Column, FlowId, Row, TrafficType};
use crate::units::{Kbps, Millisecs, Percent};

/// How strictly the header row is checked.
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
pub enum HeaderPolicy {
    /// The header must consist of exactly the expected columns, in any order.
    #[derivative(Default)]
    Exact,
    /// Other columns may appear (the ns-3 scenario also writes `Routing`, `Speed`, `TxPackets`
    /// and `RxPackets`); they are ignored.
    AllowExtra,
}

/// Parses result tables.
#[derive(Debug, Clone, Copy, derive_new::new)]
pub struct RecordParser {
    header_policy: HeaderPolicy,
    delimiter: u8,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(HeaderPolicy::default(), b',')
    }
}

/// The rows kept from one table, and the rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    /// Valid rows, in file order.
    pub rows: Vec<Row>,
    /// One error per dropped row, in file order.
    pub rejected: Vec<RecordError>,
}

impl RecordParser {
    /// Parse a complete table.
    ///
    /// This fails only if the header is unusable. Rows that cannot be coerced, and rows that
    /// duplicate an earlier flow or average, are dropped and reported in
    /// [`ParsedRows::rejected`].
    pub fn parse(&self, content: &str) -> Result<ParsedRows, SchemaMismatch> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());
        let header = reader
            .headers()
            .map_err(|e| SchemaMismatch::Unreadable(e.to_string()))?;
        let index = self.locate(header)?;
        let width = header.len();

        let mut parsed = ParsedRows::default();
        let mut seen = Seen::default();
        for (row, result) in reader.records().enumerate() {
            let outcome = result
                .map_err(|e| RecordError::Unreadable {
                    row,
                    reason: e.to_string(),
                })
                .and_then(|record| {
                    if record.len() > width {
                        return Err(RecordError::ExtraFields {
                            row,
                            expected: width,
                            found: record.len(),
                        });
                    }
                    index.coerce(row, &record)
                })
                .and_then(|r| seen.admit(row, r));
            match outcome {
                Ok(r) => parsed.rows.push(r),
                Err(e) => parsed.rejected.push(e),
            }
        }
        Ok(parsed)
    }

    fn locate(&self, header: &StringRecord) -> Result<ColumnIndex, SchemaMismatch> {
        let mut positions = FxHashMap::default();
        for (i, name) in header.iter().enumerate() {
            if positions.insert(name, i).is_some() {
                return Err(SchemaMismatch::Duplicate(name.to_owned()));
            }
        }
        let mut index = [0; Column::COUNT];
        let mut missing = Vec::new();
        for column in Column::ALL {
            match positions.get(column.header()) {
                Some(&i) => index[column as usize] = i,
                None => missing.push(column.header().to_owned()),
            }
        }
        let unexpected = match self.header_policy {
            HeaderPolicy::Exact => header
                .iter()
                .filter(|name| Column::from_header(name).is_none())
                .map(str::to_owned)
                .collect(),
            HeaderPolicy::AllowExtra => Vec::new(),
        };
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(SchemaMismatch::Columns {
                missing,
                unexpected,
            });
        }
        Ok(ColumnIndex(index))
    }
}

// Field position of every column, indexed by `Column as usize`.
#[derive(Debug)]
struct ColumnIndex([usize; Column::COUNT]);

impl ColumnIndex {
    fn coerce(&self, row: usize, record: &StringRecord) -> Result<Row, RecordError> {
        let field = |column: Column| {
            record
                .get(self.0[column as usize])
                .filter(|s| !s.is_empty())
                .ok_or(RecordError::Coercion {
                    row,
                    column,
                    kind: CoercionKind::Missing,
                })
        };
        let quantity = |column: Column, max: f64| -> Result<f64, RecordError> {
            let text = field(column)?;
            let fail = |kind| RecordError::Coercion { row, column, kind };
            let value = text
                .parse::<f64>()
                .map_err(|_| fail(CoercionKind::NotNumeric(text.to_owned())))?;
            if !(value.is_finite() && (0.0..=max).contains(&value)) {
                return Err(fail(CoercionKind::OutOfRange(text.to_owned())));
            }
            // Normalizes `-0`.
            Ok(value.abs())
        };
        let flow_id = {
            let text = field(Column::FlowId)?;
            text.parse::<FlowId>().map_err(|_| RecordError::Coercion {
                row,
                column: Column::FlowId,
                kind: CoercionKind::BadFlowId(text.to_owned()),
            })?
        };
        Ok(Row {
            flow_id,
            traffic_type: TrafficType::from(field(Column::TrafficType)?),
            throughput: Kbps::new(quantity(Column::Throughput, f64::INFINITY)?),
            delay: Millisecs::new(quantity(Column::Delay, f64::INFINITY)?),
            jitter: Millisecs::new(quantity(Column::Jitter, f64::INFINITY)?),
            loss: Percent::new(quantity(Column::Loss, 100.0)?),
        })
    }
}

// Flow IDs and averages already admitted from the current file.
#[derive(Debug, Default)]
struct Seen {
    ids: FxHashSet<u32>,
    averages: FxHashSet<TrafficType>,
}

impl Seen {
    // CORRECTNESS: flow IDs are unique within a file, and there is at most one average per
    // traffic type.
    fn admit(&mut self, row: usize, r: Row) -> Result<Row, RecordError> {
        let fresh = match r.flow_id {
            FlowId::Id(id) => self.ids.insert(id),
            FlowId::Average => self.averages.insert(r.traffic_type.clone()),
        };
        if fresh {
            Ok(r)
        } else {
            Err(RecordError::DuplicateFlow {
                row,
                flow: r.flow_id,
                traffic_type: r.traffic_type,
            })
        }
    }
}

/// A header that does not match the expected columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    /// Required columns are missing, or (under [`HeaderPolicy::Exact`]) unknown columns are
    /// present.
    #[error("schema mismatch (missing {missing:?}, unexpected {unexpected:?})")]
    Columns {
        /// Required columns not in the header.
        missing: Vec<String>,
        /// Header columns that are not expected.
        unexpected: Vec<String>,
    },

    /// A column name appears twice.
    #[error("schema mismatch (column `{0}` appears more than once)")]
    Duplicate(String),

    /// The header row could not be read at all.
    #[error("unreadable header: {0}")]
    Unreadable(String),
}

/// A dropped row. Row numbers count data rows from zero; the header is not counted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A field could not be coerced to its column's type.
    #[error("row {row}, column {column}: {kind}")]
    Coercion {
        row: usize,
        column: Column,
        kind: CoercionKind,
    },

    /// The row repeats a flow ID, or a second average for the same traffic type.
    #[error("row {row}: duplicate {flow} record for {traffic_type}")]
    DuplicateFlow {
        row: usize,
        flow: FlowId,
        traffic_type: TrafficType,
    },

    /// The row has more fields than the header names.
    #[error("row {row}: {found} fields, header has {expected}")]
    ExtraFields {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The row is not valid delimited text.
    #[error("row {row}: {reason}")]
    Unreadable { row: usize, reason: String },
}

impl RecordError {
    /// The data row the error refers to.
    pub fn row(&self) -> usize {
        match self {
            RecordError::Coercion { row, .. }
            | RecordError::DuplicateFlow { row, .. }
            | RecordError::ExtraFields { row, .. }
            | RecordError::Unreadable { row, .. } => *row,
        }
    }
}

/// Why a field failed coercion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionKind {
    #[error("missing value")]
    Missing,

    #[error("`{0}` is not a number")]
    NotNumeric(String),

    #[error("`{0}` is out of range")]
    OutOfRange(String),

    #[error("`{0}` is not a flow ID")]
    BadFlowId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "FlowID,TrafficType,Throughput(kbps),Delay(ms),Jitter(ms),Loss(%)";

    fn table(rows: &[&str]) -> String {
        std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn parses_flows_and_averages_in_file_order() {
        let content = table(&[
            "1,VoIP,64.5,12.1,1.5,0.5",
            "2,Video,512,30.25,4,2",
            "Average,Overall,288.25,21.175,2.75,1.25",
            "Average,VoIP,64.5,12.1,1.5,0.5",
        ]);
        let parsed = RecordParser::default().parse(&content).unwrap();
        assert!(parsed.rejected.is_empty());
        let ids = parsed.rows.iter().map(|r| r.flow_id).collect::<Vec<_>>();
        assert_eq!(
            ids,
            [FlowId::Id(1), FlowId::Id(2), FlowId::Average, FlowId::Average]
        );
        let video = &parsed.rows[1];
        assert_eq!(video.traffic_type, TrafficType::Video);
        assert_eq!(video.throughput, Kbps::new(512.0));
        assert_eq!(video.delay, Millisecs::new(30.25));
        assert_eq!(video.loss, Percent::new(2.0));
    }

    #[test]
    fn column_order_does_not_matter() {
        let content = "Loss(%),Jitter(ms),Delay(ms),Throughput(kbps),TrafficType,FlowID\n\
                       3,2,1,100,VoIP,4";
        let parsed = RecordParser::default().parse(content).unwrap();
        let row = &parsed.rows[0];
        assert_eq!(row.flow_id, FlowId::Id(4));
        assert_eq!(row.throughput, Kbps::new(100.0));
        assert_eq!(row.loss, Percent::new(3.0));
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let content = "FlowID,TrafficType,Throughput(kbps),Delay(ms),Loss(%)\n1,VoIP,1,1,1";
        let err = RecordParser::default().parse(content).unwrap_err();
        assert_eq!(
            err,
            SchemaMismatch::Columns {
                missing: vec!["Jitter(ms)".into()],
                unexpected: vec![],
            }
        );
    }

    #[test]
    fn empty_content_is_a_schema_mismatch() {
        assert!(RecordParser::default().parse("").is_err());
    }

    #[test]
    fn extra_columns_depend_on_policy() {
        let content = "Routing,Speed,TrafficType,FlowID,TxPackets,RxPackets,Throughput(kbps),Delay(ms),Jitter(ms),Loss(%)\n\
                       DSR,5,VoIP,1,100,98,64,10,1,2\n\
                       DSR,5,Overall,Average,,,64,10,1,2";
        let exact = RecordParser::new(HeaderPolicy::Exact, b',');
        let err = exact.parse(content).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r###"schema mismatch (missing [], unexpected ["Routing", "Speed", "TxPackets", "RxPackets"])"###);

        let lenient = RecordParser::new(HeaderPolicy::AllowExtra, b',');
        let parsed = lenient.parse(content).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.rejected.is_empty());
        assert!(parsed.rows[1].is_average());
    }

    #[test]
    fn duplicate_header_is_a_schema_mismatch() {
        let content = format!("{HEADER},FlowID\n");
        let err = RecordParser::new(HeaderPolicy::AllowExtra, b',')
            .parse(&content)
            .unwrap_err();
        assert_eq!(err, SchemaMismatch::Duplicate("FlowID".into()));
    }

    #[test]
    fn bad_rows_are_dropped_and_reported() {
        let content = table(&[
            "1,VoIP,64,10,1,0",
            "2,VoIP,fast,10,1,0",
            "3,VoIP,64,,1,0",
            "4,VoIP,64,10,1,101",
            "x,VoIP,64,10,1,0",
            "5,VoIP,64,10",
            "6,Video,-1,10,1,0",
            "7,Video,512,20,2,1",
        ]);
        let parsed = RecordParser::default().parse(&content).unwrap();
        let kept = parsed.rows.iter().map(|r| r.flow_id).collect::<Vec<_>>();
        assert_eq!(kept, [FlowId::Id(1), FlowId::Id(7)]);
        let rejected = parsed
            .rejected
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(rejected, @r###"
        row 1, column Throughput(kbps): `fast` is not a number
        row 2, column Delay(ms): missing value
        row 3, column Loss(%): `101` is out of range
        row 4, column FlowID: `x` is not a flow ID
        row 5, column Jitter(ms): missing value
        row 6, column Throughput(kbps): `-1` is out of range
        "###);
        assert_eq!(
            parsed.rejected.iter().map(RecordError::row).collect::<Vec<_>>(),
            [1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn rows_wider_than_the_header_are_dropped() {
        let content = table(&["1,VoIP,64,10,1,0", "2,VoIP,64,10,1,0,7", "3,VoIP,64,10,1,0,,"]);
        for policy in [HeaderPolicy::Exact, HeaderPolicy::AllowExtra] {
            let parsed = RecordParser::new(policy, b',').parse(&content).unwrap();
            assert_eq!(parsed.rows.len(), 1);
            assert_eq!(
                parsed.rejected,
                [
                    RecordError::ExtraFields {
                        row: 1,
                        expected: 6,
                        found: 7,
                    },
                    RecordError::ExtraFields {
                        row: 2,
                        expected: 6,
                        found: 8,
                    },
                ]
            );
        }
        let first = RecordParser::default().parse(&content).unwrap().rejected[0].to_string();
        insta::assert_snapshot!(first, @"row 1: 7 fields, header has 6");
    }

    #[test]
    fn duplicates_violate_per_file_invariants() {
        let content = table(&[
            "1,VoIP,64,10,1,0",
            "1,Video,512,20,2,1",
            "Average,VoIP,64,10,1,0",
            "Average,Video,512,20,2,1",
            "Average,VoIP,65,11,1,0",
        ]);
        let parsed = RecordParser::default().parse(&content).unwrap();
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(
            parsed.rejected,
            [
                RecordError::DuplicateFlow {
                    row: 1,
                    flow: FlowId::Id(1),
                    traffic_type: TrafficType::Video,
                },
                RecordError::DuplicateFlow {
                    row: 4,
                    flow: FlowId::Average,
                    traffic_type: TrafficType::VoIP,
                },
            ]
        );
    }

    #[test]
    fn honors_delimiter_and_whitespace() {
        let content = "FlowID; TrafficType; Throughput(kbps); Delay(ms); Jitter(ms); Loss(%)\n\
                       Average; Overall; 500; 20; 2; 1.5";
        let parsed = RecordParser::new(HeaderPolicy::Exact, b';')
            .parse(content)
            .unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].traffic_type, TrafficType::Overall);
        assert_eq!(parsed.rows[0].loss, Percent::new(1.5));
    }
}
