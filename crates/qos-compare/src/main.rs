use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use qos_core::{HeaderPolicy, SummaryScope};
use qos_io::Config;

/// Compare ns-3 MANET QoS results across mobility speeds.
#[derive(Parser, Debug)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding the result files [default: data/txt]
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Directory receiving the CSV tables [default: data/csv]
    #[arg(long)]
    csv_dir: Option<PathBuf>,
    /// Export the summary table as JSON to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,
    /// Accept result files with columns beyond the required ones
    #[arg(long)]
    allow_extra_columns: bool,
    /// Which records feed the summaries
    #[arg(long, value_enum)]
    scope: Option<Scope>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Scope {
    Averages,
    All,
}

impl From<Scope> for SummaryScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Averages => SummaryScope::Averages,
            Scope::All => SummaryScope::AllRows,
        }
    }
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => qos_io::read_config(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => Config::new("data/txt", "data/csv"),
        };
        if let Some(dir) = self.input_dir {
            config.input_dir = dir;
        }
        if let Some(dir) = self.csv_dir {
            config.csv_dir = dir;
        }
        if let Some(path) = self.summary_json {
            config.summary_json = Some(path);
        }
        if self.allow_extra_columns {
            config.header_policy = HeaderPolicy::AllowExtra;
        }
        if let Some(scope) = self.scope {
            config.scope = scope.into();
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Args::parse().into_config()?;
    log::debug!("{config:?}");

    let report = qos_core::run(config.source(), config.sink(), &config.opts())
        .with_context(|| format!("comparison of {} failed", config.input_dir.display()))?;
    print!("{}", qos_io::render(&report));
    if let Some(path) = &config.summary_json {
        qos_io::write_summary_json(path, report.summaries())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
