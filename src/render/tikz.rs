//! TikZ/pgfplots document generation.
//!
//! Builds a `tikzpicture` with one `\addplot` curve per configured
//! condition, styled from the legend table. The preamble, curve blocks,
//! and closing block are kept separate so the workflow can echo the
//! first two to stdout before writing the full document.

use crate::config::{LegendEntry, TikzConfig};
use crate::models::{SeriesMap, TraceError};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIKZ_END: &str = "
    \\end{axis}
\\end{tikzpicture}
";

/// A rendered document, split into its echoable parts.
#[derive(Debug, Clone)]
pub struct TikzDocument {
    /// Axis environment header, parameterized by the series length.
    pub preamble: String,
    /// All curve blocks, concatenated in plot order.
    pub curves: String,
}

impl TikzDocument {
    /// The complete document text.
    pub fn render(&self) -> String {
        [self.preamble.as_str(), self.curves.as_str(), TIKZ_END].join("\n")
    }
}

/// Build the document for the given series and configuration.
///
/// The series must be length-consistent, and every condition in the
/// configured plot order must be present both in the series and in the
/// legend table.
pub fn build_document(series: &SeriesMap, config: &TikzConfig) -> Result<TikzDocument, TraceError> {
    let timepoints = series.check_consistent()?;

    let mut curves = String::new();
    for condition in &config.prop_order {
        let values = series.get(condition).ok_or_else(|| TraceError::MissingSeries {
            condition: condition.clone(),
        })?;
        let legend = config.legend.get(condition).ok_or_else(|| TraceError::MissingLegend {
            condition: condition.clone(),
        })?;
        curves.push_str(&render_curve(legend, values));
    }

    Ok(TikzDocument {
        preamble: render_preamble(timepoints),
        curves,
    })
}

fn render_preamble(timepoints: usize) -> String {
    let xticks = (0..timepoints)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r"
\begin{{tikzpicture}}
    \begin{{axis}}[
        xlabel={{Iteration}},
        ylabel={{Marginal}},
        xmin=0, xmax={xmax},
        ymin=0, ymax=1,
        xtick={{{xticks}}},
        ytick={{0,0.2,0.4,0.6,0.8,1}},
        legend pos=north west,
        ymajorgrids=true,
        grid style=dashed,
    ]
",
        xmax = timepoints.saturating_sub(1),
    )
}

fn render_curve(legend: &LegendEntry, values: &[f64]) -> String {
    format!(
        r"
    \addplot[
        color={color},
        mark={mark},
        ]
        coordinates {{
        {coordinates}
        }};
        \addlegendentry{{{label}}}
",
        color = legend.color,
        mark = legend.mark,
        coordinates = format_coordinates(values),
        label = legend.label,
    )
}

/// Formats probabilities as `(index,value)` pairs with no separator.
fn format_coordinates(values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(index, probability)| format!("({},{})", index, probability))
        .collect()
}

/// Derive the document path from the trace name and the optional
/// line-count annotation: `<stem>_<max_lines-or-None>_plot.tex`.
pub fn derive_output_path(input: &Path, max_lines: Option<u64>, out_dir: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("trace");
    let annotation = match max_lines {
        Some(n) => n.to_string(),
        None => "None".to_string(),
    };
    out_dir.join(format!("{}_{}_plot.tex", stem, annotation))
}

/// Write the document to a file. The parent directory must exist.
pub fn write_document(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path).with_context(|| {
        format!(
            "Failed to create {} (does the output directory exist?)",
            path.display()
        )
    })?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
