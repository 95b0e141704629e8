//! The pipeline: discover, ingest, aggregate, partition and summarize.

use rayon::prelude::*;

use crate::dataset::{Dataset, EmptyDataset, RunTable};
use crate::opts::Opts;
use crate::parse::{ParsedRows, RecordError, RecordParser, SchemaMismatch};
use crate::partition::Partition;
use crate::record::TrafficType;
use crate::store::{InputFile, Sink, Source, StoreError};
use crate::summary::SummaryTable;
use crate::template::{FilenameTemplate, MalformedFilename};
use crate::units::MetersPerSec;

/// Run the comparison over every file `source` discovers.
///
/// Files that cannot be ingested are skipped and reported in [`RunReport::outcomes`]; the run
/// only fails if discovery or the sink fails, or if no file contributes a row.
pub fn run<S, K>(source: S, sink: K, opts: &Opts) -> Result<RunReport, Error>
where
    S: Source + Sync,
    K: Sink,
{
    let files = source.discover().map_err(Error::Source)?;
    log::info!("Discovered {} result files", files.len());

    let parser = opts.parser();
    let ingested = files
        .into_par_iter()
        .map(|file| {
            let result = ingest(&source, &file, &opts.template, &parser);
            (file, result)
        })
        .collect::<Vec<_>>();

    let mut outcomes = Vec::with_capacity(ingested.len());
    let mut tables = Vec::new();
    for (file, result) in ingested {
        match result {
            Ok((speed, parsed)) => {
                for e in &parsed.rejected {
                    log::warn!("{file}: dropped {e}");
                }
                let flows = parsed
                    .rows
                    .iter()
                    .filter(|r| !r.is_average())
                    .collect::<Vec<_>>();
                let nr_averages = parsed.rows.len() - flows.len();
                if nr_averages == 0 {
                    log::warn!("{file}: no Average rows");
                }
                if flows.is_empty() {
                    log::warn!("{file}: no flow rows");
                } else {
                    sink.write_flows(&file, &flows).map_err(Error::Sink)?;
                }
                let summary = FileSummary {
                    speed,
                    nr_flows: flows.len(),
                    nr_averages,
                    rejected: parsed.rejected,
                };
                log::debug!("{file}: {} rows at {speed}", parsed.rows.len());
                tables.push(RunTable::new(file.clone(), speed, parsed.rows));
                outcomes.push(FileOutcome::new(file, Ok(summary)));
            }
            Err(e) => {
                log::warn!("Skipping {file}: {e}");
                outcomes.push(FileOutcome::new(file, Err(e)));
            }
        }
    }

    let dataset = match Dataset::aggregate(tables) {
        Ok(dataset) => dataset,
        Err(EmptyDataset) => return Err(Error::EmptyDataset { outcomes }),
    };
    log::info!(
        "Aggregated {} records from {} speeds",
        dataset.len(),
        dataset.speeds().len()
    );
    sink.write_dataset(&dataset).map_err(Error::Sink)?;

    // Exclusions are counted over every record; the scope only selects what is summarized.
    let excluded = dataset.partition(&opts.traffic_types).excluded_counts();
    for (label, count) in &excluded {
        log::warn!("Excluded {count} records with unrecognized traffic type `{label}`");
    }
    let summaries = {
        let scoped = dataset.iter().filter(|r| opts.scope.admits(r));
        let mut table = SummaryTable::new(&Partition::new(scoped, &opts.traffic_types));
        table.excluded = excluded;
        table
    };

    Ok(RunReport {
        outcomes,
        dataset,
        summaries,
        traffic_types: opts.traffic_types.clone(),
    })
}

fn ingest<S: Source>(
    source: &S,
    file: &InputFile,
    template: &FilenameTemplate,
    parser: &RecordParser,
) -> Result<(MetersPerSec, ParsedRows), FileError> {
    let speed = template.extract(&file.name())?;
    let content = source.read(file).map_err(FileError::Read)?;
    let parsed = parser.parse(&content)?;
    Ok((speed, parsed))
}

/// What became of one discovered file.
#[derive(Debug, derive_new::new)]
pub struct FileOutcome {
    pub file: InputFile,
    pub result: Result<FileSummary, FileError>,
}

impl FileOutcome {
    pub fn is_ingested(&self) -> bool {
        self.result.is_ok()
    }
}

/// An ingested file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    /// The speed extracted from the file name.
    pub speed: MetersPerSec,
    /// Rows with a flow ID.
    pub nr_flows: usize,
    /// `Average` rows.
    pub nr_averages: usize,
    /// Rows that were dropped.
    pub rejected: Vec<RecordError>,
}

/// The result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    outcomes: Vec<FileOutcome>,
    dataset: Dataset,
    summaries: SummaryTable,
    traffic_types: Vec<TrafficType>,
}

impl RunReport {
    /// One outcome per discovered file, in discovery order.
    pub fn outcomes(&self) -> &[FileOutcome] {
        self.outcomes.as_ref()
    }

    /// The files that contributed to the dataset.
    pub fn ingested(&self) -> impl Iterator<Item = (&InputFile, &FileSummary)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|s| (&o.file, s)))
    }

    /// The files that were skipped, and why.
    pub fn skipped(&self) -> impl Iterator<Item = (&InputFile, &FileError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.file, e)))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn summaries(&self) -> &SummaryTable {
        &self.summaries
    }

    /// Partition the whole dataset, regardless of the summary scope.
    pub fn partition(&self) -> Partition<'_> {
        self.dataset.partition(&self.traffic_types)
    }
}

/// Why a file was skipped.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    MalformedFilename(#[from] MalformedFilename),

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),

    #[error("failed to read file: {0}")]
    Read(#[source] StoreError),
}

/// Pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not list its files.
    #[error("failed to discover result files")]
    Source(#[source] StoreError),

    /// No file contributed a row.
    #[error("no records were ingested from {} files", .outcomes.len())]
    EmptyDataset { outcomes: Vec<FileOutcome> },

    /// The sink failed to persist a table.
    #[error("failed to write output")]
    Sink(#[source] StoreError),
}
