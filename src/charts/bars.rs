//! Bar chart recipes: plain, stacked, and clustered.

use std::sync::Arc;

use crate::charts::{assemble, AxisTicks, ChartStyle};
use crate::coords::{pad_range, Cartesian2D, CoordRef};
use crate::element::{Bars, ClusteredBars, Plot, PlotElement, StackedBars};
use crate::error::{Error, Result};

/// Lateral axis over category indices, extended half a bar width past
/// the outermost bar centers.
fn category_coords(count: usize, y_lo: f64, y_hi: f64, style: &ChartStyle) -> Result<Cartesian2D> {
    Cartesian2D::linear(
        -0.5,
        count as f64 - 0.5,
        y_lo,
        y_hi,
        style.width,
        style.height,
    )
}

fn check_lengths(categories: usize, values: usize) -> Result<()> {
    if categories == values {
        Ok(())
    } else {
        Err(Error::DataLengthMismatch {
            x_len: categories,
            y_len: values,
        })
    }
}

/// Vertical range covering the data and the zero baseline, padded 10%.
fn value_range(values: impl Iterator<Item = f64>) -> Result<(f64, f64)> {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    let mut any = false;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
        any = true;
    }
    if !any {
        return Err(Error::EmptyData);
    }
    Ok(pad_range(min, max))
}

/// Build a bar chart over labeled categories.
///
/// # Errors
///
/// Fails on mismatched input lengths or data with no finite values.
pub fn bar_chart(categories: &[String], values: &[f64], style: &ChartStyle) -> Result<Plot> {
    check_lengths(categories.len(), values.len())?;
    let (y_lo, y_hi) = value_range(values.iter().copied())?;
    let coords = Arc::new(category_coords(categories.len(), y_lo, y_hi, style)?);

    let points: Vec<Vec<f64>> = values
        .iter()
        .enumerate()
        .map(|(i, v)| vec![i as f64, *v])
        .collect();
    let coord_ref: CoordRef = coords.clone();
    let bars = Bars::new(coord_ref, points)
        .margin(0.1)?
        .fill(style.palette.series[0])
        .tagged("bars");

    let x_ticks = AxisTicks::categories(categories);
    let y_ticks = AxisTicks::numeric(y_lo, y_hi, false);
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(bars)];
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

/// Build a stacked bar chart: one stack per category, one segment per
/// value in that category's row.
///
/// # Errors
///
/// Fails on mismatched input lengths or data with no finite values.
pub fn stacked_bar_chart(
    categories: &[String],
    rows: &[Vec<f64>],
    style: &ChartStyle,
) -> Result<Plot> {
    check_lengths(categories.len(), rows.len())?;
    let totals = rows.iter().map(|r| r.iter().sum::<f64>());
    let (y_lo, y_hi) = value_range(totals)?;
    let coords = Arc::new(category_coords(categories.len(), y_lo, y_hi, style)?);

    let points: Vec<Vec<f64>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut p = vec![i as f64];
            p.extend_from_slice(row);
            p
        })
        .collect();
    let coord_ref: CoordRef = coords.clone();
    let stacked = StackedBars::new(coord_ref, points)
        .margin(0.1)?
        .fills(style.palette.series.clone())
        .tagged("bars");

    let x_ticks = AxisTicks::categories(categories);
    let y_ticks = AxisTicks::numeric(y_lo, y_hi, false);
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(stacked)];
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

/// Build a clustered bar chart: one cluster per category, one bar per
/// value in that category's row.
///
/// # Errors
///
/// Fails on mismatched input lengths or data with no finite values.
pub fn clustered_bar_chart(
    categories: &[String],
    rows: &[Vec<f64>],
    style: &ChartStyle,
) -> Result<Plot> {
    check_lengths(categories.len(), rows.len())?;
    let (y_lo, y_hi) = value_range(rows.iter().flatten().copied())?;
    let coords = Arc::new(category_coords(categories.len(), y_lo, y_hi, style)?);

    let points: Vec<Vec<f64>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut p = vec![i as f64];
            p.extend_from_slice(row);
            p
        })
        .collect();
    let coord_ref: CoordRef = coords.clone();
    let clustered = ClusteredBars::new(coord_ref, points)
        .margin(0.1)?
        .intra_cluster_margin(0.05)?
        .fills(style.palette.series.clone())
        .tagged("bars");

    let x_ticks = AxisTicks::categories(categories);
    let y_ticks = AxisTicks::numeric(y_lo, y_hi, false);
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(clustered)];
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    #[test]
    fn test_bar_chart_assembles_in_order() {
        let style = ChartStyle {
            title: Some("t".to_string()),
            x_title: Some("x".to_string()),
            y_title: Some("y".to_string()),
            ..ChartStyle::default()
        };
        let plot = bar_chart(&cats(3), &[4.0, 7.0, 2.0], &style).unwrap();
        let tags: Vec<&str> = plot.iter().filter_map(|e| e.tag()).collect();

        let pos = |t: &str| tags.iter().position(|x| *x == t).unwrap();
        assert!(pos("grid") < pos("axis"));
        assert!(pos("axis") < pos("tick"));
        assert!(pos("tick") < pos("tick-label"));
        assert!(pos("tick-label") < pos("bars"));
        assert!(pos("bars") < pos("title"));
        assert_eq!(*tags.last().unwrap(), "title");
    }

    #[test]
    fn test_bar_chart_length_mismatch() {
        let err = bar_chart(&cats(2), &[1.0], &ChartStyle::default());
        assert!(matches!(err, Err(Error::DataLengthMismatch { .. })));
    }

    #[test]
    fn test_many_categories_subsample_labels() {
        let n = 23;
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let plot = bar_chart(&cats(n), &values, &ChartStyle::default()).unwrap();
        let label_count = plot
            .iter()
            .filter(|e| e.tag() == Some("tick-label"))
            .count();
        // 5 of 23 categories plus 6 numeric y labels
        assert_eq!(label_count, 5 + 6);
    }

    #[test]
    fn test_stacked_bar_chart_assembles() {
        let plot = stacked_bar_chart(
            &cats(2),
            &[vec![3.0, 2.0], vec![1.0, 4.0]],
            &ChartStyle::default(),
        )
        .unwrap();
        assert!(plot.iter().any(|e| e.tag() == Some("bars")));
    }

    #[test]
    fn test_clustered_bar_chart_assembles() {
        let plot = clustered_bar_chart(
            &cats(2),
            &[vec![3.0, 2.0], vec![1.0, 4.0]],
            &ChartStyle::default(),
        )
        .unwrap();
        assert!(plot.iter().any(|e| e.tag() == Some("bars")));
    }

    #[test]
    fn test_negative_values_keep_zero_baseline() {
        let plot = bar_chart(&cats(2), &[-4.0, 3.0], &ChartStyle::default());
        assert!(plot.is_ok());
    }
}
