use std::path::PathBuf;

use anyhow::Context;
use bloodwork_core::{BloodworkSnapshot, PipelineConfig};
use bloodwork_report::{render_prompt_summary, summarize_reports_str};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bloodwork-cli",
    about = "Build per-marker bloodwork series from a JSON array of lab reports."
)]
struct Args {
    /// Path to the JSON reports file.
    #[arg(short, long)]
    input: PathBuf,

    /// Optional JSON file overriding the pipeline defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read file {:?}", args.input))?;

    let snapshot = summarize_reports_str(&data, &config)?;
    tracing::info!(series = snapshot.series_count(), "Snapshot ready");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print_text(&snapshot),
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {:?}", path))?;
    let config: PipelineConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config {:?}", path))?;
    config.validate()?;
    Ok(config)
}

fn print_text(snapshot: &BloodworkSnapshot) {
    let names = |series: &[bloodwork_core::MarkerSeries]| {
        series
            .iter()
            .map(|item| format!("{} ({}, {:?})", item.marker, item.trend, item.indicator()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!(
        "Generated at: {}\nSeries: {}\nFlagged: {}\nPrioritized: {}\nOther: {}\n",
        snapshot.generated_at,
        snapshot.series_count(),
        snapshot.flagged_markers.join(", "),
        names(&snapshot.prioritized),
        names(&snapshot.other)
    );

    let mut ordered: Vec<_> = snapshot
        .prioritized
        .iter()
        .chain(snapshot.other.iter())
        .cloned()
        .collect();
    ordered.sort_by(|a, b| a.marker.cmp(&b.marker));
    print!("{}", render_prompt_summary(&ordered));
}
