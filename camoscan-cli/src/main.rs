//! camoscan CLI - highlight camouflaged regions in an image file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camoscan::codec::write_file;
use camoscan::{Config, DetectionStats, VisualizationPipeline};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "camoscan")]
#[command(about = "Render overlay, spectral and mask images of camouflage-like texture")]
#[command(version)]
struct Cli {
    /// Image to analyse.
    input: PathBuf,

    /// Directory for the output images (defaults to the input's directory).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// YAML or JSON file overriding detector and rendering parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Long-edge cap of the working resolution.
    #[arg(long)]
    max_dimension: Option<u32>,

    /// Print detection statistics as JSON.
    #[arg(long)]
    stats_json: bool,

    /// Base log level, overridden by RUST_LOG.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write daily-rotated log files here.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::setup_logging(&cli.log_level, cli.log_dir.as_deref())?;

    let config = load_config(&cli)?;
    let pipeline = VisualizationPipeline::new(config).context("invalid configuration")?;

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let out = pipeline
        .run(&bytes)
        .with_context(|| format!("failed to process {}", cli.input.display()))?;

    let dir = output_dir(&cli.input, cli.output_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    for (suffix, encoded) in [
        ("overlay", &out.overlay),
        ("spectral", &out.spectral),
        ("mask", &out.mask),
    ] {
        let path = artifact_path(&dir, &cli.input, suffix);
        write_file(&path, encoded)?;
        info!(path = %path.display(), "Wrote {}", suffix);
    }

    print_stats(&out.stats, cli.stats_json)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(max_dimension) = cli.max_dimension {
        config.max_dimension = max_dimension;
    }
    Ok(config)
}

fn output_dir(input: &Path, requested: Option<&Path>) -> PathBuf {
    match requested {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    }
}

/// `<dir>/<stem>_<suffix>.png`
fn artifact_path(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    dir.join(format!("{}_{}.png", stem, suffix))
}

fn print_stats(stats: &DetectionStats, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!(
        "working resolution: {}x{}",
        stats.working_width, stats.working_height
    );
    println!("anomalous pixels:   {}", stats.anomalous_pixels);
    println!("mask pixels:        {}", stats.mask_pixels);
    println!("coverage:           {:.2}%", stats.coverage_percent);
    println!("mean score:         {:.1}", stats.mean_score);
    println!("peak score:         {}", stats.peak_score);
    Ok(())
}
