use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fhx::{
    CharsetPolicy, CompositeFilter, EventType, FilterType, FireHistoryDocument, ReaderConfig,
    SampleDepthFilterType, Season,
};

#[derive(Parser, Debug)]
#[command(name = "fhx-inspect", version)]
#[command(about = "Summarise an FHX fire-history file and optionally print composite years")]
struct Args {
    /// FHX file to inspect
    input: PathBuf,

    /// Force a charset label (e.g. windows-1252) instead of auto-detecting
    #[arg(long)]
    charset: Option<String>,

    /// Print composite event years
    #[arg(long)]
    composite: bool,

    /// Event variant for the composite: fire, injury or fire_or_injury
    #[arg(long, default_value = "fire")]
    event_type: String,

    /// Composite filter: number_of_events, percentage_of_events or percentage_of_recording
    #[arg(long, default_value = "number_of_events")]
    filter_type: String,

    /// Composite threshold (event count or percent)
    #[arg(long, default_value_t = 1.0)]
    threshold: f64,

    /// Minimum sample depth for a year to qualify
    #[arg(long, default_value_t = 1)]
    min_samples: usize,

    /// Depth basis: min_num_samples or min_num_recorder_samples
    #[arg(long)]
    depth_type: Option<String>,

    /// Load the composite filter from a JSON file instead of the flags above
    #[arg(long)]
    filter_config: Option<PathBuf>,

    /// Dump the series list as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.charset {
        Some(label) => ReaderConfig::forced(label.clone()),
        None => ReaderConfig::default(),
    };
    let doc = FireHistoryDocument::open_with_config(&args.input, &config)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    print_summary(&doc, &config, &mut out)?;

    if args.composite || args.filter_config.is_some() {
        let filter = composite_filter(&args)?;
        let years = doc.composite(&filter);
        writeln!(
            out,
            "composite: {} / {} >= {} with depth >= {}",
            filter.event_type, filter.filter_type, filter.threshold, filter.min_samples
        )?;
        let listed: Vec<String> = years.iter().map(i32::to_string).collect();
        writeln!(out, "composite_years={} [{}]", years.len(), listed.join(" "))?;
    }

    if args.json {
        serde_json::to_writer_pretty(&mut out, doc.series()).context("failed to write series json")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn print_summary(doc: &FireHistoryDocument, config: &ReaderConfig, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "file={}", doc.name().unwrap_or("-"))?;
    let charset = match &config.charset {
        CharsetPolicy::AutoDetect => "auto",
        CharsetPolicy::Force { .. } => "forced",
    };
    writeln!(out, "format={} encoding={} ({charset})", doc.format(), doc.encoding())?;
    writeln!(
        out,
        "years={}..={} ({}) samples={}",
        doc.first_year(),
        doc.last_year(),
        doc.year_count(),
        doc.sample_count()
    )?;
    writeln!(
        out,
        "syntax_ok={} bad_lines={:?}",
        doc.passes_basic_syntax_check(),
        doc.bad_lines()
    )?;
    for event_type in EventType::ALL {
        let first = doc
            .first_event_year(event_type)
            .map_or_else(|| "-".to_string(), |year| year.to_string());
        writeln!(out, "{event_type}: first={first}")?;
    }
    let seasons = doc.seasonal_tally();
    let by_season: Vec<String> = Season::ALL
        .iter()
        .map(|season| format!("{}={}", season.letter(), seasons.totals.fire_seasons.get(*season)))
        .collect();
    writeln!(
        out,
        "scars: fire={} injury={} markers={} seasons [{}]",
        seasons.totals.fire,
        seasons.totals.injury,
        seasons.totals.markers,
        by_season.join(" ")
    )?;
    writeln!(out, "series={}", doc.series().len())?;
    for warning in doc.warnings() {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(())
}

fn composite_filter(args: &Args) -> Result<CompositeFilter> {
    if let Some(path) = &args.filter_config {
        return CompositeFilter::from_json_file(path)
            .with_context(|| format!("failed to load filter config {}", path.display()));
    }
    let event_type: EventType = args.event_type.parse()?;
    let filter_type: FilterType = args.filter_type.parse()?;
    let mut filter = CompositeFilter::new(event_type, filter_type, args.threshold, args.min_samples);
    if let Some(depth_type) = &args.depth_type {
        filter = filter.with_depth_type(depth_type.parse::<SampleDepthFilterType>()?);
    }
    Ok(filter)
}
