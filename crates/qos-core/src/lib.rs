#![warn(unreachable_pub, missing_debug_implementations)]

//! The core of the MANET QoS comparison. This crate defines [the routine](run::run) that turns
//! a family of ns-3 result files into a [unified dataset](Dataset) and a [table of cross-run
//! extrema](SummaryTable).
//!
//! Reading and writing files is left to implementors of [`Source`] and [`Sink`].

pub mod dataset;
pub mod metric;
pub mod opts;
pub mod parse;
pub mod partition;
pub mod record;
pub mod run;
pub mod store;
pub mod summary;
pub mod template;
mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use dataset::{Dataset, EmptyDataset, RunTable};
pub use metric::{Direction, Metric};
pub use opts::{Opts, SummaryScope};
pub use parse::{HeaderPolicy, ParsedRows, RecordError, RecordParser, SchemaMismatch};
pub use partition::Partition;
pub use record::{Column, FlowId, FlowRecord, Row, TrafficType};
pub use run::{run, Error, FileError, FileOutcome, FileSummary, RunReport};
pub use store::{InputFile, NullSink, Sink, Source, StoreError};
pub use summary::{analyze, Extremum, SummaryFact, SummaryTable};
pub use template::{FilenameDefect, FilenameTemplate, MalformedFilename};
pub use units::{Kbps, MetersPerSec, Millisecs, Percent};
