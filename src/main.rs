use anyhow::{Context, Result};
use caption_split::output::DirectorySink;
use caption_split::segmentation::SegmenterConfig;
use caption_split::source::FileSource;
use caption_split::{run_batch, ReportEntry};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scanned page images to split
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for photo and caption sections
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// JSON file with segmenter settings; missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-channel color tolerance as a fraction of 255 (overrides config)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Write a JSON report of every page to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SegmenterConfig::default(),
    };
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    config.validate().context("Invalid segmenter config")?;
    tracing::debug!("Segmenter config: {:?}", config);

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker pool")?;
    }

    let sink = DirectorySink::new(&args.output_dir).context("Failed to initialize output")?;
    let sources: Vec<FileSource> = args.inputs.iter().map(FileSource::new).collect();

    tracing::info!("Processing {} images", sources.len());
    let started = Instant::now();

    // No recognition backend is wired into the binary; pages are only split
    let entries = run_batch(&sources, &config, None, &sink);

    let failed = entries.iter().filter(|entry| entry.is_error()).count();
    let split = entries.iter().filter(|entry| entry.split).count();
    tracing::info!(
        "Done in {:.1}s: {} split, {} unsplit, {} failed",
        started.elapsed().as_secs_f64(),
        split,
        entries.len() - split - failed,
        failed
    );

    if let Some(path) = &args.report {
        write_report(path, &entries)?;
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(path: &Path) -> Result<SegmenterConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    tracing::info!("Loaded segmenter config from {}", path.display());
    Ok(config)
}

fn write_report(path: &Path, entries: &[ReportEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
