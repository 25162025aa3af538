use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use chrono::NaiveDateTime;
use log::{info, warn};
use opioid_risk::utils::dates::ISO_FORMAT;
use opioid_risk::utils::io::{read_patient_records, write_json, write_parquet};
use opioid_risk::utils::logging::{
    create_cohort_progress_bar, finish_progress_bar, log_quality_report,
};
use opioid_risk::{AnalyticsConfig, RowKind, assess_quality, process_cohort_with_progress};

const USAGE: &str =
    "usage: opioid-risk <input.json> <output.{parquet|json}> [config.json] [as-of YYYY-MM-DDTHH:MM:SS]";

enum OutputFormat {
    Parquet,
    Json,
}

impl OutputFormat {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(Self::Parquet),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => bail!(
                "unsupported output extension for {}; expected .parquet or .json",
                path.display()
            ),
        }
    }
}

struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    as_of: NaiveDateTime,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let config = args.next().filter(|arg| !arg.is_empty()).map(PathBuf::from);
    let as_of = match args.next() {
        Some(text) => NaiveDateTime::parse_from_str(&text, ISO_FORMAT)
            .with_context(|| format!("invalid as-of timestamp {text:?}; {USAGE}"))?,
        None => chrono::Local::now().naive_local(),
    };

    Ok(Args {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        config,
        as_of,
    })
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let format = OutputFormat::from_path(&args.output)?;

    let config = match &args.config {
        Some(path) => AnalyticsConfig::from_json_file(path)
            .with_context(|| format!("failed to load analytics policy {}", path.display()))?,
        None => AnalyticsConfig::default(),
    };
    config.validate().context("invalid analytics policy")?;
    info!("Using policy: {config}");
    info!("Reference time: {}", args.as_of.format(ISO_FORMAT));

    let cohort = read_patient_records(&args.input)
        .with_context(|| format!("failed to read patient bundles {}", args.input.display()))?;
    if cohort.is_empty() {
        warn!("No patient bundles in {}", args.input.display());
    }

    for records in &cohort {
        log_quality_report(&assess_quality(records, &config));
    }

    let start = Instant::now();
    let progress = create_cohort_progress_bar(cohort.len() as u64, Some("Scoring patients"));
    let rows = process_cohort_with_progress(&cohort, &config, &args.as_of, &progress);
    finish_progress_bar(&progress, Some("Done"));

    let fallback_rows = rows
        .iter()
        .filter(|row| row.data_type() == RowKind::Demographics)
        .count();
    info!(
        "Flattened {} patients into {} rows in {:?} ({} demographics-only)",
        cohort.len(),
        rows.len(),
        start.elapsed(),
        fallback_rows
    );

    match format {
        OutputFormat::Parquet => write_parquet(&args.output, &rows),
        OutputFormat::Json => write_json(&args.output, &rows),
    }
    .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
