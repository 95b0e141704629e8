use std::fmt::Write;
use std::path::Path;

use qos_core::{Dataset, Direction, RunReport, SummaryTable};

use crate::Error;

/// Render a run as a console report.
pub fn render(report: &RunReport) -> String {
    let mut s = String::new();
    let nr_ingested = report.ingested().count();
    let nr_skipped = report.skipped().count();
    writeln!(s, "Files: {nr_ingested} ingested, {nr_skipped} skipped").unwrap();
    for (file, summary) in report.ingested() {
        write!(
            s,
            "  ok      {file} (speed={} flows={} averages={}",
            summary.speed, summary.nr_flows, summary.nr_averages
        )
        .unwrap();
        if !summary.rejected.is_empty() {
            write!(s, " dropped={}", summary.rejected.len()).unwrap();
        }
        writeln!(s, ")").unwrap();
    }
    for (file, e) in report.skipped() {
        writeln!(s, "  skipped {file}: {e}").unwrap();
    }

    let dataset = report.dataset();
    let speeds = dataset
        .speeds()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(s, "Dataset: {} records at speeds {speeds}", dataset.len()).unwrap();
    render_averages(&mut s, dataset);
    render_summaries(&mut s, report.summaries());
    s
}

// The `Average` rows of every run, grouped by speed.
fn render_averages(s: &mut String, dataset: &Dataset) {
    let mut current = None;
    for record in dataset.iter().filter(|r| r.is_average()) {
        if current != Some(record.speed) {
            writeln!(
                s,
                "\nAverages at {}\n  {:<10} {:>16} {:>10} {:>10} {:>8}",
                record.speed, "", "Throughput(kbps)", "Delay(ms)", "Jitter(ms)", "Loss(%)"
            )
            .unwrap();
            current = Some(record.speed);
        }
        writeln!(
            s,
            "  {:<10} {:>16.2} {:>10.2} {:>10.2} {:>8.2}",
            record.traffic_type.as_str(),
            record.throughput.into_f64(),
            record.delay.into_f64(),
            record.jitter.into_f64(),
            record.loss.into_f64(),
        )
        .unwrap();
    }
}

fn render_summaries(s: &mut String, table: &SummaryTable) {
    let mut current = None;
    for fact in &table.facts {
        if current != Some(&fact.traffic_type) {
            writeln!(s, "\n{}", fact.traffic_type).unwrap();
            current = Some(&fact.traffic_type);
        }
        let (best, worst) = (fact.best(), fact.worst());
        let direction = match fact.metric.direction() {
            Direction::HigherIsBetter => "higher is better",
            Direction::LowerIsBetter => "lower is better",
        };
        writeln!(
            s,
            "  {:<17} best {:.2} at {}, worst {:.2} at {} ({direction})",
            fact.metric.to_string(),
            best.value,
            best.speed,
            worst.value,
            worst.speed,
        )
        .unwrap();
    }
    for label in &table.no_data {
        writeln!(s, "\n{label}: no data").unwrap();
    }
    if !table.excluded.is_empty() {
        let excluded = table
            .excluded
            .iter()
            .map(|(label, count)| format!("{label} ({count} records)"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(s, "\nExcluded: {excluded}").unwrap();
    }
}

/// Export a summary table as JSON.
pub fn write_summary_json(path: impl AsRef<Path>, table: &SummaryTable) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(table)?;
    std::fs::write(path, json)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
