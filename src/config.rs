//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.margplot.toml` files. The curve order and legend table that used
//! to be edit-the-source constants live here, so different traces can
//! ship different orderings and legends without touching the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chart image settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// TikZ document settings.
    #[serde(default)]
    pub tikz: TikzConfig,
}

/// Chart image settings (svg/png formats).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_title() -> String {
    "Probability of Conditions Over Time".to_string()
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

/// How one curve is drawn in the TikZ document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// TikZ color name (e.g. `red`).
    pub color: String,
    /// pgfplots mark shape (e.g. `triangle`, `square`, `o`).
    pub mark: String,
    /// Human-readable legend label.
    pub label: String,
}

impl LegendEntry {
    fn new(color: &str, mark: &str, label: &str) -> Self {
        Self {
            color: color.to_string(),
            mark: mark.to_string(),
            label: label.to_string(),
        }
    }
}

/// TikZ document settings: which curves to plot, in what order, and
/// how each is styled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TikzConfig {
    /// Conditions to plot, in plot order. Each must appear in the trace
    /// and in the legend table.
    #[serde(default = "default_prop_order")]
    pub prop_order: Vec<String>,

    /// Output directory for generated documents. Must already exist.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Per-condition curve styling.
    #[serde(default = "default_legend")]
    pub legend: BTreeMap<String, LegendEntry>,
}

impl Default for TikzConfig {
    fn default() -> Self {
        Self {
            prop_order: default_prop_order(),
            legend: default_legend(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_prop_order() -> Vec<String> {
    vec![
        "lonely[sub=test_Jack0]",
        "exciting[sub=test_Jill0]",
        "like[obj=test_Jack0,sub=test_Jill0]",
        "like[obj=test_Jill0,sub=test_Jack0]",
        "date[obj=test_Jill0,sub=test_Jack0]",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_legend() -> BTreeMap<String, LegendEntry> {
    [
        (
            "lonely[sub=test_Jack0]",
            LegendEntry::new("red", "triangle", "lonely boy"),
        ),
        (
            "exciting[sub=test_Jill0]",
            LegendEntry::new("green", "square", "exciting girl"),
        ),
        (
            "like[obj=test_Jack0,sub=test_Jill0]",
            LegendEntry::new("blue", "o", "girl likes boy"),
        ),
        (
            "like[obj=test_Jill0,sub=test_Jack0]",
            LegendEntry::new("yellow", "triangle", "boy likes girl"),
        ),
        (
            "date[obj=test_Jill0,sub=test_Jack0]",
            LegendEntry::new("orange", "square", "boy dates girl"),
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_out_dir() -> String {
    "./tikz_output".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".margplot.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref title) = args.title {
            self.chart.title = title.clone();
        }
        if let Some(width) = args.width {
            self.chart.width = width;
        }
        if let Some(height) = args.height {
            self.chart.height = height;
        }
        if let Some(ref out_dir) = args.out_dir {
            self.tikz.out_dir = out_dir.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chart.title, "Probability of Conditions Over Time");
        assert_eq!(config.tikz.prop_order.len(), 5);
        assert_eq!(config.tikz.out_dir, "./tikz_output");
        // Every default curve has a legend entry under the same key.
        for prop in &config.tikz.prop_order {
            assert!(config.tikz.legend.contains_key(prop), "no legend for {}", prop);
        }
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[chart]
title = "Marginals"
width = 800

[tikz]
prop_order = ["a", "b"]
out_dir = "./figures"

[tikz.legend.a]
color = "red"
mark = "o"
label = "first"

[tikz.legend.b]
color = "blue"
mark = "square"
label = "second"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.chart.title, "Marginals");
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, default_height());
        assert_eq!(config.tikz.prop_order, vec!["a", "b"]);
        assert_eq!(config.tikz.out_dir, "./figures");
        assert_eq!(
            config.tikz.legend.get("a"),
            Some(&LegendEntry::new("red", "o", "first"))
        );
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[chart]"));
        assert!(toml_str.contains("prop_order"));
        assert!(toml_str.contains("lonely[sub=test_Jack0]"));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let parsed: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(parsed.tikz.prop_order, default_prop_order());
        assert_eq!(parsed.tikz.legend, default_legend());
    }
}
