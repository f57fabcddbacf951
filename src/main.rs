//! Margplot - Marginal-Probability Trace Plotter
//!
//! A CLI tool that reads newline-delimited JSON traces of
//! (condition, probability) readings and renders them as line charts
//! (SVG/PNG) or TikZ/pgfplots documents.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable trace, malformed record, missing
//!       legend entry, inconsistent series, write failure, etc.)

mod cli;
mod config;
mod models;
mod render;
mod trace;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use render::chart::{self, ImageFormat};
use render::tikz;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("Margplot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Rendering failed: {}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .margplot.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".margplot.toml");

    if path.exists() {
        eprintln!(".margplot.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .margplot.toml")?;

    println!("Created .margplot.toml with default settings.");
    println!("Edit it to customize the curve order, legend table, and chart size.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the selected rendering pipeline.
fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.format {
        OutputFormat::Svg => run_chart(&args, &config, ImageFormat::Svg),
        OutputFormat::Png => run_chart(&args, &config, ImageFormat::Png),
        OutputFormat::Tikz => run_tikz(&args, &config),
    }
}

/// Chart pipeline: aggregate every entry, draw one line per condition.
fn run_chart(args: &Args, config: &Config, format: ImageFormat) -> Result<()> {
    let input = args.input_path();

    let series = trace::read_trace(input, trace::EntryFilter::All)?;
    info!(
        "Aggregated {} series from {}",
        series.len(),
        input.display()
    );

    let output = args.chart_output();
    chart::render_chart(&series, &config.chart, &output, format)?;

    println!("Chart saved to: {}", output.display());
    Ok(())
}

/// TikZ pipeline: aggregate with the auxiliary-predicate filter, check
/// series consistency, then emit the document.
fn run_tikz(args: &Args, config: &Config) -> Result<()> {
    let input = args.input_path();

    let series = trace::read_trace(input, trace::EntryFilter::SkipAuxiliary)?;
    info!(
        "Aggregated {} series from {}",
        series.len(),
        input.display()
    );

    let document = tikz::build_document(&series, &config.tikz)?;

    // Echo the generated blocks before writing, as a visual check.
    println!("{}", document.preamble);
    println!("{}", document.curves);

    let out_dir = Path::new(&config.tikz.out_dir);
    let output = tikz::derive_output_path(input, args.max_lines, out_dir);
    tikz::write_document(&document.render(), &output)?;

    println!("TikZ document saved to: {}", output.display());
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .margplot.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
