use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::errors::SweepError;
use crate::types::ResultSet;

static FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Where and how the performance chart is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub path: PathBuf,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            path: PathBuf::from("performance_chart.png"),
            title: "Execution time vs. thread count".to_string(),
            width: 1000,
            height: 600,
        }
    }
}

impl ChartSpec {
    pub fn is_svg(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
    }
}

/// Legend text for one workload series.
pub fn series_label(workload: u64) -> String {
    format!("Steps: {}", workload)
}

/// Draw one line per workload (threads on x, seconds on y) and write the chart.
///
/// `max_threads` fixes the x axis so charts from sweeps with missing points
/// stay comparable. The image format follows the file extension: `.svg`
/// writes SVG, anything else a PNG bitmap.
pub fn render_chart(
    results: &ResultSet,
    max_threads: u32,
    spec: &ChartSpec,
) -> Result<(), SweepError> {
    let to_err = |e: anyhow::Error| SweepError::Render {
        path: spec.path.clone(),
        detail: format!("{:#}", e),
    };

    ensure_font().map_err(to_err)?;

    if let Some(parent) = spec.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| to_err(e.into()))?;
    }

    let size = (spec.width, spec.height);
    let drawn = if spec.is_svg() {
        draw(SVGBackend::new(&spec.path, size).into_drawing_area(), results, max_threads, spec)
    } else {
        draw(BitMapBackend::new(&spec.path, size).into_drawing_area(), results, max_threads, spec)
    };
    drawn.map_err(to_err)?;

    tracing::info!(path = %spec.path.display(), "chart written");
    Ok(())
}

fn ensure_font() -> Result<()> {
    FONT_REGISTERED
        .get_or_init(|| {
            register_font("sans-serif", FontStyle::Normal, FONT)
                .map_err(|_| "cannot load bundled font".to_string())
        })
        .clone()
        .map_err(|e| anyhow!(e))
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    results: &ResultSet,
    max_threads: u32,
    spec: &ChartSpec,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_max = f64::from(max_threads.max(1)) + 0.5;
    let y_max = results
        .max_seconds()
        .filter(|m| *m > 0.0)
        .map_or(1.0, |m| m * 1.1);

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(0.5f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Threads")
        .y_desc("Execution time [s]")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.2}", y))
        .draw()?;

    for (idx, series) in results.series().iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|m| (f64::from(m.threads), m.seconds))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(series_label(series.workload))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Measurement;

    fn sample_results() -> ResultSet {
        let mut results = ResultSet::new(&[100, 1000]);
        for t in 1..=4 {
            results.record(100, Measurement { threads: t, seconds: 1.0 / f64::from(t) });
            results.record(1000, Measurement { threads: t, seconds: 8.0 / f64::from(t) });
        }
        results
    }

    #[test]
    fn svg_detection_is_case_insensitive() {
        let mut spec = ChartSpec::default();
        assert!(!spec.is_svg());
        spec.path = PathBuf::from("out/chart.SVG");
        assert!(spec.is_svg());
    }

    #[test]
    fn label_names_workload() {
        assert_eq!(series_label(100000000), "Steps: 100000000");
    }

    #[test]
    fn renders_png() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let spec = ChartSpec {
            path: tmp.path().join("chart.png"),
            ..ChartSpec::default()
        };

        render_chart(&sample_results(), 4, &spec).unwrap();

        let bytes = std::fs::read(&spec.path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn renders_svg_with_legend() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let spec = ChartSpec {
            path: tmp.path().join("chart.svg"),
            title: "Scaling".to_string(),
            ..ChartSpec::default()
        };

        render_chart(&sample_results(), 4, &spec).unwrap();

        let svg = std::fs::read_to_string(&spec.path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Scaling"));
        assert!(svg.contains("Steps: 100"));
        assert!(svg.contains("Steps: 1000"));
    }

    #[test]
    fn renders_empty_result_set() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let spec = ChartSpec {
            path: tmp.path().join("empty.svg"),
            ..ChartSpec::default()
        };

        render_chart(&ResultSet::new(&[5]), 1, &spec).unwrap();

        assert!(spec.path.exists());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let spec = ChartSpec {
            path: tmp.path().join("nested/dir/chart.png"),
            ..ChartSpec::default()
        };

        render_chart(&sample_results(), 4, &spec).unwrap();

        assert!(spec.path.exists());
    }
}
