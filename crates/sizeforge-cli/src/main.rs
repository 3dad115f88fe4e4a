//! sizeforge CLI
//!
//! Generate DOCX, XLSX, PPTX, PDF, PST and ZIP files of a requested size.

mod config;
mod progress;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::Config;
use progress::{GenerationProgress, format_bytes, format_deviation};
use sizeforge_core::{FormatKind, Generated, TargetBytes, generate_file, output, parse_size};

/// sizeforge - generate documents of an exact size
#[derive(Parser)]
#[command(name = "sizeforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target size: "150KB", "2.5MB", or a bare number of megabytes
    #[arg(required = true)]
    size: String,

    /// Output file (default: <format>_<size>.<ext>)
    output: Option<PathBuf>,

    /// Document format: docx, xlsx, pptx, pdf, pst, zip
    #[arg(short, long, default_value = "docx")]
    format: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Accepted shortfall in bytes (overrides the per-format default)
    #[arg(long)]
    tolerance: Option<u64>,

    /// Maximum number of padded builds
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Program that writes PST files from a filler manifest
    #[arg(long)]
    mail_engine: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Reject bad input before touching the filesystem
    let target = parse_size(&cli.size)?;
    let format: FormatKind = cli.format.parse()?;

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };
    apply_overrides(&mut config, &cli);

    // Validate configuration
    config.validate()?;

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| output::default_file_name(format, &cli.size));

    tracing::info!("Generating {} of {} at {}", format, target, path.display());

    let progress = GenerationProgress::new(format.as_str(), target.get());
    let generated = match generate_file(format, target, &config.generate_options(), &path) {
        Ok(generated) => generated,
        Err(e) => {
            progress.abandon();
            return Err(e.into());
        }
    };
    progress.finish_with_message(format!("Generated {}", path.display()));

    report(&path, target, &generated);

    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(tolerance) = cli.tolerance {
        config.engine.tolerance = Some(tolerance);
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.engine.max_iterations = max_iterations;
    }
    if let Some(engine) = &cli.mail_engine {
        config.mailbox.engine = Some(engine.clone());
    }
}

fn report(path: &std::path::Path, target: TargetBytes, generated: &Generated) {
    println!("File: {}", path.display());
    println!(
        "Size: {} ({} bytes)",
        format_bytes(generated.size()),
        generated.size()
    );
    println!(
        "Target: {} ({} bytes)",
        format_bytes(target.get()),
        target.get()
    );
    println!("Iterations: {}", generated.iterations);

    if generated.is_approximate() {
        eprintln!(
            "warning: size is approximate ({} from target)",
            format_deviation(generated.deviation())
        );
    }
}
