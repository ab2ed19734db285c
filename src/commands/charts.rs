//! Static experiment charts rendered as SVG.
//!
//! The numbers are hand-recorded results from earlier benchmark runs and have
//! no link to the live pipeline.

use std::path::PathBuf;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::Layout;
use crate::errors::{PipelineError, Result};
use crate::fs_utils::{ensure_dir, write_text_file};

pub const GENERATION_TIME_CHART_FILE: &str = "generation_time_per_run.svg";
pub const GENERATION_RESULTS_CHART_FILE: &str = "generation_results.svg";

const LINE_CHART_SIZE: (u32, u32) = (1000, 600);
const BAR_CHART_SIZE: (u32, u32) = (600, 400);

#[derive(Debug, Clone, PartialEq)]
pub struct TimingSeries {
    pub label: &'static str,
    pub color: RGBColor,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x: Vec<u32>,
    pub series: Vec<TimingSeries>,
}

impl LineChart {
    /// Value range across every series, padded so markers stay off the frame.
    fn y_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .series
            .iter()
            .flat_map(|series| series.values.iter().copied())
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo > hi {
            return (0.0, 1.0);
        }
        let pad = ((hi - lo) * 0.05).max(1.0);
        (lo - pad, hi + pad)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: u32,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn total(&self) -> u32 {
        self.bars.iter().map(|bar| bar.value).sum()
    }
}

/// Wall-clock seconds for six runs at each Karras step count.
pub fn generation_time_chart() -> LineChart {
    LineChart {
        title: "Generation Time per Run for Different Karras Steps",
        x_label: "Run Number",
        y_label: "Generation Time (seconds)",
        x: vec![1, 2, 3, 4, 5, 6],
        series: vec![
            TimingSeries {
                label: "Karras Step 32",
                color: BLUE,
                values: vec![643.0, 645.0, 653.0, 651.0, 650.0, 648.0],
            },
            TimingSeries {
                label: "Karras Step 50",
                color: GREEN,
                values: vec![700.0, 710.0, 720.0, 715.0, 712.0, 720.0],
            },
            TimingSeries {
                label: "Karras Step 64",
                color: RED,
                values: vec![765.0, 770.0, 775.0, 780.0, 785.0, 778.0],
            },
        ],
    }
}

/// Manual quality grading of the meshes produced from 50 prompts.
pub fn generation_results_chart() -> BarChart {
    BarChart {
        title: "3D Model Generation Results from 50 Prompts",
        y_label: "Number of Prompts",
        bars: vec![
            Bar {
                label: "Good",
                value: 31,
                color: RGBColor(0x4C, 0xAF, 0x50),
            },
            Bar {
                label: "Moderate",
                value: 5,
                color: RGBColor(0xFF, 0xC1, 0x07),
            },
            Bar {
                label: "Failure",
                value: 14,
                color: RGBColor(0xF4, 0x43, 0x36),
            },
        ],
    }
}

pub async fn write_charts(layout: &Layout) -> Result<Vec<PathBuf>> {
    let dir = ensure_dir(&layout.charts_dir()).await?;

    let line_path = dir.join(GENERATION_TIME_CHART_FILE);
    let svg = render_line_chart(&generation_time_chart(), LINE_CHART_SIZE).map_err(|err| {
        PipelineError::Chart {
            path: line_path.clone(),
            reason: format!("{err:#}"),
        }
    })?;
    write_text_file(&line_path, &svg).await?;

    let bar_path = dir.join(GENERATION_RESULTS_CHART_FILE);
    let svg = render_bar_chart(&generation_results_chart(), BAR_CHART_SIZE).map_err(|err| {
        PipelineError::Chart {
            path: bar_path.clone(),
            reason: format!("{err:#}"),
        }
    })?;
    write_text_file(&bar_path, &svg).await?;

    for path in [&line_path, &bar_path] {
        tracing::info!(path = %path.display(), "wrote chart");
    }
    Ok(vec![line_path, bar_path])
}

/// One line with point markers per series, legend in the upper right.
pub fn render_line_chart(chart: &LineChart, size: (u32, u32)) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let x_first = chart.x.first().copied().unwrap_or(0);
        let x_last = chart.x.last().copied().unwrap_or(1).max(x_first + 1);
        let (y_min, y_max) = chart.y_range();

        let mut plot = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_first..x_last, y_min..y_max)?;

        plot.configure_mesh()
            .x_labels(chart.x.len())
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .draw()?;

        for series in &chart.series {
            let color = series.color;
            let points: Vec<(u32, f64)> = chart
                .x
                .iter()
                .copied()
                .zip(series.values.iter().copied())
                .collect();

            plot.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(series.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            plot.draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 4, color.filled())),
            )?;
        }

        plot.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

/// Bordered bars with the count printed above each one.
pub fn render_bar_chart(chart: &BarChart, size: (u32, u32)) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = chart.bars.iter().map(|bar| bar.value).max().unwrap_or(0) + 5;

        let mut plot = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(55)
            .build_cartesian_2d((0usize..chart.bars.len()).into_segmented(), 0u32..y_max)?;

        let bar_label = |value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => chart
                .bars
                .get(*index)
                .map(|bar| bar.label.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };
        plot.configure_mesh()
            .disable_x_mesh()
            .y_desc(chart.y_label)
            .x_label_formatter(&bar_label)
            .draw()?;

        let span = |index: usize, value: u32| {
            [
                (SegmentValue::Exact(index), 0),
                (SegmentValue::Exact(index + 1), value),
            ]
        };

        plot.draw_series(chart.bars.iter().enumerate().map(|(index, bar)| {
            let mut rect = Rectangle::new(span(index, bar.value), bar.color.filled());
            rect.set_margin(0, 0, 30, 30);
            rect
        }))?;
        plot.draw_series(chart.bars.iter().enumerate().map(|(index, bar)| {
            let mut rect = Rectangle::new(span(index, bar.value), BLACK.stroke_width(1));
            rect.set_margin(0, 0, 30, 30);
            rect
        }))?;

        let value_style = TextStyle::from(("sans-serif", 12).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        plot.draw_series(chart.bars.iter().enumerate().map(|(index, bar)| {
            Text::new(
                bar.value.to_string(),
                (SegmentValue::CenterOf(index), bar.value + 1),
                value_style.clone(),
            )
        }))?;

        root.present()?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_cover_fifty_prompts() {
        let chart = generation_results_chart();
        assert_eq!(chart.total(), 50);
        let labels: Vec<_> = chart.bars.iter().map(|bar| bar.label).collect();
        assert_eq!(labels, vec!["Good", "Moderate", "Failure"]);
    }

    #[test]
    fn every_series_has_one_value_per_run() {
        let chart = generation_time_chart();
        assert_eq!(chart.x, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(chart.series.len(), 3);
        assert!(chart.series.iter().all(|s| s.values.len() == chart.x.len()));
    }

    #[test]
    fn y_range_covers_all_series() {
        let (lo, hi) = generation_time_chart().y_range();
        assert!(lo < 643.0);
        assert!(hi > 785.0);
    }

    #[test]
    fn line_chart_marks_every_point() {
        let svg = render_line_chart(&generation_time_chart(), LINE_CHART_SIZE).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 18);
    }

    #[tokio::test]
    async fn charts_land_in_charts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let paths = write_charts(&layout).await.unwrap();
        assert_eq!(
            paths,
            vec![
                layout.charts_dir().join(GENERATION_TIME_CHART_FILE),
                layout.charts_dir().join(GENERATION_RESULTS_CHART_FILE),
            ]
        );
        for path in &paths {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"), "{} is not an SVG document", path.display());
        }
        let bars = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(bars.contains("<rect"));
    }
}
