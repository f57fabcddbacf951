//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::{Path, PathBuf};

/// Margplot - chart renderer for marginal-probability traces
///
/// Reads a newline-delimited JSON trace of (condition, probability)
/// readings and renders a line chart (SVG/PNG) or a TikZ/pgfplots
/// document with one curve per configured condition.
///
/// Examples:
///   margplot trace.json
///   margplot trace.json --format png --output marginals.png
///   margplot trace.json 40 --format tikz --out-dir ./tikz_output
///   margplot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the NDJSON trace file (one JSON record per line)
    #[arg(value_name = "TRACE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Line-count annotation for the TikZ output filename
    ///
    /// Only interpolated into the generated filename; the trace is
    /// always read in full.
    #[arg(value_name = "MAX_LINES")]
    pub max_lines: Option<u64>,

    /// Output format (svg, png, tikz)
    #[arg(short, long, default_value = "svg", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for chart formats (svg/png)
    ///
    /// Defaults to marginals.svg or marginals.png next to the working
    /// directory, matching the chosen format.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for TikZ documents
    ///
    /// The directory must already exist; it is never created.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Chart title (svg/png formats)
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Chart width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Chart height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .margplot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .margplot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// SVG line chart (default)
    #[default]
    Svg,
    /// PNG line chart
    Png,
    /// TikZ/pgfplots document
    Tikz,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the input trace path, empty if not set (should be validated first).
    pub fn input_path(&self) -> &Path {
        self.input.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let input = self.input_path();
        if !input.exists() {
            return Err(format!("Trace file does not exist: {}", input.display()));
        }
        if !input.is_file() {
            return Err(format!("Trace path is not a file: {}", input.display()));
        }

        if let Some(width) = self.width {
            if width == 0 {
                return Err("Width must be at least 1 pixel".to_string());
            }
        }
        if let Some(height) = self.height {
            if height == 0 {
                return Err("Height must be at least 1 pixel".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.format != OutputFormat::Tikz && self.out_dir.is_some() {
            return Err("--out-dir only applies to --format tikz".to_string());
        }
        if self.format == OutputFormat::Tikz && self.output.is_some() {
            return Err("--output only applies to chart formats (svg/png)".to_string());
        }

        Ok(())
    }

    /// Returns the chart output path, defaulting per format.
    pub fn chart_output(&self) -> PathBuf {
        if let Some(ref output) = self.output {
            return output.clone();
        }
        match self.format {
            OutputFormat::Png => PathBuf::from("marginals.png"),
            _ => PathBuf::from("marginals.svg"),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
