use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::app::ports::{ChartKind, ChartRenderer, ChartSpec};
use crate::error::ChartError;

type DrawResult = Result<(), Box<dyn Error>>;

/// SVG implementation of ChartRenderer built on plotters
pub struct PlottersSvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersSvgRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

impl ChartRenderer for PlottersSvgRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
        if let Some((label, value)) = spec.points.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ChartError::Render {
                path: path.to_path_buf(),
                message: format!("'{label}' has non-finite value {value}"),
            });
        }

        let size = (self.width, self.height);
        let drawn = match spec.kind {
            ChartKind::Line => draw_line(spec, path, size),
            ChartKind::Bar => draw_bars(spec, path, size),
            ChartKind::HorizontalBar => draw_horizontal_bars(spec, path, size),
        };
        drawn.map_err(|e| ChartError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Largest axis bound; keeps `upper - lower` finite so tick generation terminates
const AXIS_LIMIT: f64 = f64::MAX / 4.0;

/// Value axis always includes zero, with headroom above the largest value.
/// Non-finite values are ignored and the bounds never overflow.
fn value_range(points: &[(String, f64)]) -> Range<f64> {
    let finite = || points.iter().map(|(_, v)| *v).filter(|v| v.is_finite());
    let max = finite().fold(0.0_f64, f64::max);
    let min = finite().fold(0.0_f64, f64::min);
    let upper = if max > 0.0 { (max * 1.1).min(AXIS_LIMIT) } else { 1.0 };
    let lower = if min < 0.0 { (min * 1.1).max(-AXIS_LIMIT) } else { 0.0 };
    lower..upper
}

fn label_at(points: &[(String, f64)], idx: i32) -> String {
    usize::try_from(idx)
        .ok()
        .and_then(|i| points.get(i))
        .map(|(label, _)| label.clone())
        .unwrap_or_default()
}

fn segment_label(points: &[(String, f64)], segment: &SegmentValue<i32>, to_index: impl Fn(i32) -> i32) -> String {
    match segment {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => label_at(points, to_index(*i)),
        SegmentValue::Last => String::new(),
    }
}

fn draw_line(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let points = &spec.points;
    let last = (points.len() as i32 - 1).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(0..last, value_range(points))?;

    let x_label = |x: &i32| label_at(points, *x);
    chart
        .configure_mesh()
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .x_labels(points.len().max(2))
        .x_label_formatter(&x_label)
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().enumerate().map(|(i, (_, v))| (i as i32, *v)),
        &BLUE,
    ))?;
    chart.draw_series(
        points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| Circle::new((i as i32, *v), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_bars(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let points = &spec.points;
    let slots = points.len().max(1) as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d((0..slots).into_segmented(), value_range(points))?;

    let x_label = |x: &SegmentValue<i32>| segment_label(points, x, |i| i);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .x_labels(slots as usize)
        .x_label_formatter(&x_label)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(10)
            .data(points.iter().enumerate().map(|(i, (_, v))| (i as i32, *v))),
    )?;

    root.present()?;
    Ok(())
}

/// Horizontal bars with the first point at the top
fn draw_horizontal_bars(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let points = &spec.points;
    let slots = points.len().max(1) as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(200)
        .build_cartesian_2d(value_range(points), (0..slots).into_segmented())?;

    let y_label = |y: &SegmentValue<i32>| segment_label(points, y, |i| slots - 1 - i);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .y_labels(slots as usize)
        .y_label_formatter(&y_label)
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(5)
            .data(
                points
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| (slots - 1 - i as i32, *v)),
            ),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn spec(kind: ChartKind, points: Vec<(&str, f64)>) -> ChartSpec {
        ChartSpec {
            kind,
            title: "Test Chart".to_string(),
            x_desc: "Key".to_string(),
            y_desc: "Value".to_string(),
            points: points.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    #[test]
    fn test_renders_each_kind_as_svg() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PlottersSvgRenderer::default();
        let points = vec![("2022-03", 120.0), ("2022-04", 80.5), ("2022-05", 200.0)];

        for (kind, name) in [
            (ChartKind::Line, "line.svg"),
            (ChartKind::Bar, "bar.svg"),
            (ChartKind::HorizontalBar, "hbar.svg"),
        ] {
            let path = dir.path().join(name);
            renderer.render(&spec(kind, points.clone()), &path).unwrap();
            let svg = fs::read_to_string(&path).unwrap();
            assert!(svg.contains("<svg"), "{name} is not an svg document");
        }
    }

    #[test]
    fn test_renders_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PlottersSvgRenderer::default();
        let path = dir.path().join("empty.svg");

        renderer.render(&spec(ChartKind::Bar, Vec::new()), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_value_range_includes_zero() {
        let points = vec![("a".to_string(), -10.0), ("b".to_string(), 10.0)];
        let range = value_range(&points);
        assert!(range.start < -10.0 && range.end > 10.0);
        assert_eq!(value_range(&[]), 0.0..1.0);
    }

    #[test]
    fn test_value_range_stays_finite_for_huge_values() {
        let points = vec![
            ("a".to_string(), 1e308),
            ("b".to_string(), -1e308),
            ("c".to_string(), f64::INFINITY),
            ("d".to_string(), f64::NAN),
        ];
        let range = value_range(&points);
        assert!(range.start.is_finite() && range.end.is_finite());
        assert!((range.end - range.start).is_finite());
    }

    #[test]
    fn test_non_finite_point_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PlottersSvgRenderer::default();
        let path = dir.path().join("overflow.svg");

        let err = renderer
            .render(&spec(ChartKind::Line, vec![("2022-04", f64::INFINITY)]), &path)
            .unwrap_err();
        assert!(matches!(err, ChartError::Render { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_renders_near_max_finite_values() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PlottersSvgRenderer::default();
        let path = dir.path().join("huge.svg");

        renderer
            .render(&spec(ChartKind::Bar, vec![("Shipped", 1e308), ("Pending", 1.0)]), &path)
            .unwrap();
        assert!(path.exists());
    }
}
