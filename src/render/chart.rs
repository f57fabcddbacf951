//! Line chart rendering via plotters.
//!
//! Draws one line per condition with the timepoint index on the x-axis
//! and probability on the y-axis, with a legend keyed by condition name.

use crate::config::ChartConfig;
use crate::models::SeriesMap;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Image backend for the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

/// Render the aggregated series as a line chart at `path`.
pub fn render_chart(
    series: &SeriesMap,
    config: &ChartConfig,
    path: &Path,
    format: ImageFormat,
) -> Result<()> {
    let size = (config.width, config.height);
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_line_chart(root, series, config)
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_line_chart(root, series, config)
        }
    }
}

fn draw_line_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &SeriesMap,
    config: &ChartConfig,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    // Probabilities live in [0, 1]; only the x-range depends on the data.
    let x_max = series
        .iter()
        .map(|(_, values)| values.len())
        .max()
        .unwrap_or(0)
        .saturating_sub(1)
        .max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0usize..x_max, 0.0f64..1.0f64)?;

    chart
        .configure_mesh()
        .x_desc("Timepoint")
        .y_desc("Probability")
        .draw()?;

    for (idx, (condition, values)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let legend_color = color.clone();
        chart
            .draw_series(LineSeries::new(
                values.iter().copied().enumerate(),
                color.stroke_width(2),
            ))?
            .label(condition)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], legend_color.stroke_width(2))
            });
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_series() -> SeriesMap {
        let mut series = SeriesMap::new();
        series.append("lonely", 0.9);
        series.append("exciting", 0.1);
        series.append("lonely", 0.8);
        series.append("exciting", 0.2);
        series
    }

    #[test]
    fn test_render_svg_chart() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("chart.svg");

        render_chart(
            &sample_series(),
            &ChartConfig::default(),
            &out,
            ImageFormat::Svg,
        )
        .unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("Probability of Conditions Over Time"));
        assert!(content.contains("lonely"));
        assert!(content.contains("exciting"));
    }

    #[test]
    fn test_render_empty_series_draws_frame() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("empty.svg");

        render_chart(
            &SeriesMap::new(),
            &ChartConfig::default(),
            &out,
            ImageFormat::Svg,
        )
        .unwrap();

        assert!(std::fs::read_to_string(&out).unwrap().contains("<svg"));
    }

    #[test]
    fn test_render_single_timepoint() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("single.svg");

        let mut series = SeriesMap::new();
        series.append("only", 0.5);

        render_chart(&series, &ChartConfig::default(), &out, ImageFormat::Svg).unwrap();
        assert!(out.exists());
    }
}
