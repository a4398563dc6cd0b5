//! Command-line interface for Durchsicht.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use durchsicht::{CancelFlag, ProgressUpdate, ReconstructionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "durchsicht",
    version,
    about = "Rebuild scanned PDFs as searchable documents",
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconstruct a scanned PDF into a searchable one
    Reconstruct {
        /// Input PDF file
        input: PathBuf,

        /// Output path (defaults to `<input>_searchable.pdf`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML configuration file; explicit flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Tesseract language code
        #[arg(short, long)]
        language: Option<String>,

        /// Raster scale multiplier (accuracy vs. latency)
        #[arg(long)]
        scale: Option<f64>,

        /// Confidence threshold below which pages are flagged for review
        #[arg(long)]
        threshold: Option<f64>,

        /// Reconstruct even when the document already carries a text layer
        #[arg(long)]
        force: bool,

        /// Print the confidence report as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Check whether a PDF needs OCR reconstruction
    Detect {
        /// Input PDF file
        input: PathBuf,

        /// How many leading pages to inspect
        #[arg(long)]
        pages: Option<usize>,

        /// Print the verdict as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Wrap a PNG or JPEG image into a single-page PDF
    ImageToPdf {
        /// Input image file
        input: PathBuf,

        /// Output path (defaults to `<input>.pdf`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Reconstruct {
            input,
            output,
            config,
            language,
            scale,
            threshold,
            force,
            json,
        } => {
            let config = build_config(config.as_deref(), language, scale, threshold, None)?;
            reconstruct(&input, output, config, force, json).await
        }
        Command::Detect { input, pages, json } => {
            let config = build_config(None, None, None, None, pages)?;
            detect(&input, config, json).await
        }
        Command::ImageToPdf { input, output } => image_to_pdf(&input, output).await,
    }
}

fn init_tracing(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Start from the config file (or defaults) and layer explicit flags on top.
fn build_config(
    config_path: Option<&Path>,
    language: Option<String>,
    scale: Option<f64>,
    threshold: Option<f64>,
    detection_pages: Option<usize>,
) -> Result<ReconstructionConfig> {
    let mut config = match config_path {
        Some(path) => ReconstructionConfig::from_toml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ReconstructionConfig::default(),
    };

    if let Some(language) = language {
        config.language = language;
    }
    if let Some(scale) = scale {
        config.raster_scale = scale;
    }
    if let Some(threshold) = threshold {
        config.low_confidence_threshold = threshold;
    }
    if let Some(pages) = detection_pages {
        config.scan_detection_page_cap = pages;
    }

    config.validate()?;
    Ok(config)
}

async fn reconstruct(
    input: &Path,
    output: Option<PathBuf>,
    config: ReconstructionConfig,
    force: bool,
    json: bool,
) -> Result<()> {
    let payload = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    tracing::debug!(
        input = %input.display(),
        bytes = payload.len(),
        language = %config.language,
        scale = config.raster_scale,
        "starting reconstruction"
    );

    if !force {
        let needs_ocr = durchsicht::needs_ocr_bytes(payload.clone(), config.clone()).await?;
        if !needs_ocr {
            bail!(
                "{} already carries a text layer; pass --force to reconstruct anyway",
                input.display()
            );
        }
    }

    let progress: Arc<durchsicht::ProgressCallback> = Arc::new(|update: ProgressUpdate| {
        if update.percent_within_page == 0.0 {
            eprintln!("Processing page {} of {}...", update.page_index + 1, update.page_count);
        }
    });

    let output_path = output.unwrap_or_else(|| default_output_path(input, "_searchable", "pdf"));
    let result = durchsicht::reconstruct_bytes_with_progress(payload, config, progress, None::<CancelFlag>).await?;

    tokio::fs::write(&output_path, &result.pdf)
        .await
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
    } else {
        println!(
            "Wrote {} ({} pages)",
            output_path.display(),
            result.report.per_page_confidence.len()
        );
        if result.report.low_confidence_pages.is_empty() {
            println!("All pages recognized with acceptable confidence");
        } else {
            let pages = result
                .report
                .low_confidence_pages
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("Low recognition confidence on pages: {pages} - review recommended");
        }
    }

    Ok(())
}

async fn detect(input: &Path, config: ReconstructionConfig, json: bool) -> Result<()> {
    let payload = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let needs_ocr = durchsicht::needs_ocr_bytes(payload, config).await?;

    if json {
        println!("{}", serde_json::json!({ "needs_ocr": needs_ocr }));
    } else if needs_ocr {
        println!("{}: scanned document, OCR reconstruction needed", input.display());
    } else {
        println!("{}: text-bearing document, no OCR needed", input.display());
    }

    Ok(())
}

async fn image_to_pdf(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let payload = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let pdf = durchsicht::image_to_pdf(&payload).map_err(durchsicht::DurchsichtError::from)?;

    let output_path = output.unwrap_or_else(|| default_output_path(input, "", "pdf"));
    tokio::fs::write(&output_path, &pdf)
        .await
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("Wrote {}", output_path.display());
    Ok(())
}

fn default_output_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}
