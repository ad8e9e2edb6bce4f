//! Line and scatter chart recipes.

use std::sync::Arc;

use crate::charts::{assemble, AxisTicks, ChartStyle};
use crate::coords::{Cartesian2D, CoordRef};
use crate::element::{LinePlot, Plot, PlotElement, ScatterPoints};
use crate::error::{Error, Result};

fn split_xy(points: &[Vec<f64>]) -> Result<(Vec<f64>, Vec<f64>)> {
    if points.is_empty() {
        return Err(Error::EmptyData);
    }
    Ok((
        points.iter().map(|p| p[0]).collect(),
        points.iter().map(|p| p[1]).collect(),
    ))
}

fn fitted_coords(points: &[Vec<f64>], style: &ChartStyle) -> Result<Arc<Cartesian2D>> {
    let (xs, ys) = split_xy(points)?;
    Ok(Arc::new(Cartesian2D::linear_from_data(
        &xs,
        &ys,
        style.width,
        style.height,
    )?))
}

fn numeric_ticks(coords: &Cartesian2D) -> (AxisTicks, AxisTicks) {
    let (x_lo, x_hi) = coords.x_extent();
    let (y_lo, y_hi) = coords.y_extent();
    (
        AxisTicks::numeric(x_lo, x_hi, coords.x_is_log()),
        AxisTicks::numeric(y_lo, y_hi, coords.y_is_log()),
    )
}

/// Build a line chart from `(x, y)` points, sorted laterally.
///
/// # Errors
///
/// Fails on empty data.
pub fn line_chart(points: &[Vec<f64>], style: &ChartStyle) -> Result<Plot> {
    let coords = fitted_coords(points, style)?;
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));

    let coord_ref: CoordRef = coords.clone();
    let line = LinePlot::new(coord_ref, sorted)
        .stroke(crate::canvas::Stroke::new(style.palette.series[0], 1.5))
        .tagged("line");

    let (x_ticks, y_ticks) = numeric_ticks(&coords);
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(line)];
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

/// Build a scatter chart from `(x, y)` points.
///
/// # Errors
///
/// Fails on empty data.
pub fn scatter_chart(points: &[Vec<f64>], style: &ChartStyle) -> Result<Plot> {
    let coords = fitted_coords(points, style)?;

    let coord_ref: CoordRef = coords.clone();
    let markers = ScatterPoints::new(coord_ref, points.to_vec())
        .fill(style.palette.series[0])
        .tagged("points");

    let (x_ticks, y_ticks) = numeric_ticks(&coords);
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(markers)];
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Vec<f64>> {
        (0..20)
            .map(|i| {
                let x = f64::from(i);
                vec![x, x * x * 0.1 + 2.0]
            })
            .collect()
    }

    #[test]
    fn test_line_chart_assembles_in_order() {
        let style = ChartStyle {
            title: Some("growth".to_string()),
            ..ChartStyle::default()
        };
        let plot = line_chart(&sample_points(), &style).unwrap();
        let tags: Vec<&str> = plot.iter().filter_map(|e| e.tag()).collect();
        let pos = |t: &str| tags.iter().position(|x| *x == t).unwrap();
        assert!(pos("grid") < pos("axis"));
        assert!(pos("tick-label") < pos("line"));
        assert!(pos("line") < pos("title"));
    }

    #[test]
    fn test_scatter_chart_assembles() {
        let plot = scatter_chart(&sample_points(), &ChartStyle::default()).unwrap();
        assert!(plot.iter().any(|e| e.tag() == Some("points")));
    }

    #[test]
    fn test_empty_points_rejected() {
        assert!(line_chart(&[], &ChartStyle::default()).is_err());
        assert!(scatter_chart(&[], &ChartStyle::default()).is_err());
    }
}
