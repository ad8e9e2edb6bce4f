//! Distribution chart recipes: density estimates drawn as filled areas.

use std::sync::Arc;

use crate::charts::histogram::histogram_bins;
use crate::charts::{assemble, AxisTicks, ChartStyle};
use crate::color::Rgba;
use crate::coords::{pad_range, Cartesian2D, CoordRef};
use crate::element::{Area, Plot, PlotElement};
use crate::error::{Error, Result};

/// Binned density estimate: bin centers paired with normalized density
/// values, so the area under the curve is 1.
fn density(samples: &[f64]) -> Result<Vec<Vec<f64>>> {
    let bins = histogram_bins(samples, None, None)?;
    let n: usize = bins.counts.iter().sum();
    if n == 0 {
        return Err(Error::EmptyData);
    }
    let norm = n as f64 * bins.bin_width;
    Ok(bins
        .counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                bins.lo + (i as f64 + 0.5) * bins.bin_width,
                *c as f64 / norm,
            ]
        })
        .collect())
}

fn density_coords(
    curves: &[Vec<Vec<f64>>],
    style: &ChartStyle,
) -> Result<Arc<Cartesian2D>> {
    let x_min = curves
        .iter()
        .flatten()
        .map(|p| p[0])
        .fold(f64::INFINITY, f64::min);
    let x_max = curves
        .iter()
        .flatten()
        .map(|p| p[0])
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = curves
        .iter()
        .flatten()
        .map(|p| p[1])
        .fold(0.0, f64::max);
    let (x_lo, x_hi) = pad_range(x_min, x_max);
    Ok(Arc::new(Cartesian2D::linear(
        x_lo,
        x_hi,
        0.0,
        if y_max > 0.0 { y_max * 1.1 } else { 1.0 },
        style.width,
        style.height,
    )?))
}

fn translucent(color: Rgba) -> Rgba {
    Rgba::new(color.r, color.g, color.b, 140)
}

/// Build a distribution chart: a Freedman-Diaconis density estimate
/// drawn as a filled area.
///
/// # Errors
///
/// Fails on empty data.
pub fn distribution_chart(samples: &[f64], style: &ChartStyle) -> Result<Plot> {
    let curve = density(samples)?;
    let coords = density_coords(std::slice::from_ref(&curve), style)?;
    let coord_ref: CoordRef = coords.clone();

    let color = style.palette.series[0];
    let area = Area::new(coord_ref, curve)
        .fill(translucent(color))
        .stroke(crate::canvas::Stroke::new(color, 1.5))
        .tagged("distribution");

    let (x_lo, x_hi) = coords.x_extent();
    let (_, y_hi) = coords.y_extent();
    let x_ticks = AxisTicks::numeric(x_lo, x_hi, false);
    let y_ticks = AxisTicks::numeric(0.0, y_hi, false);
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(area)];
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

/// Build a stacked distribution chart: per-series densities accumulated
/// bottom-up, drawn largest-first so every layer stays visible.
///
/// # Errors
///
/// Fails on empty input or an empty series.
pub fn stacked_distribution_chart(series: &[Vec<f64>], style: &ChartStyle) -> Result<Plot> {
    if series.is_empty() {
        return Err(Error::EmptyData);
    }
    // common bins from the pooled samples keep the layers aligned
    let pooled: Vec<f64> = series.iter().flatten().copied().collect();
    let bins = histogram_bins(&pooled, None, None)?;

    let mut cumulative = vec![0.0f64; bins.counts.len()];
    let mut layers: Vec<Vec<Vec<f64>>> = Vec::new();
    for samples in series {
        if samples.is_empty() {
            return Err(Error::EmptyData);
        }
        let norm = samples.len() as f64 * bins.bin_width;
        let mut counts = vec![0usize; bins.counts.len()];
        for v in samples.iter().filter(|v| v.is_finite()) {
            let i = (((v - bins.lo) / bins.bin_width) as usize).min(counts.len() - 1);
            counts[i] += 1;
        }
        for (acc, c) in cumulative.iter_mut().zip(&counts) {
            *acc += *c as f64 / norm;
        }
        layers.push(
            cumulative
                .iter()
                .enumerate()
                .map(|(i, y)| vec![bins.lo + (i as f64 + 0.5) * bins.bin_width, *y])
                .collect(),
        );
    }

    let coords = density_coords(&layers, style)?;
    let coord_ref: CoordRef = coords.clone();

    let mut data: Vec<Box<dyn PlotElement>> = Vec::new();
    // topmost cumulative layer first, later series paint over it
    for (k, layer) in layers.into_iter().enumerate().rev() {
        let color = style.palette.series[k % style.palette.series.len()];
        data.push(Box::new(
            Area::new(coord_ref.clone(), layer)
                .fill(translucent(color))
                .stroke(crate::canvas::Stroke::new(color, 1.0))
                .tagged("distribution"),
        ));
    }

    let (x_lo, x_hi) = coords.x_extent();
    let (_, y_hi) = coords.y_extent();
    let x_ticks = AxisTicks::numeric(x_lo, x_hi, false);
    let y_ticks = AxisTicks::numeric(0.0, y_hi, false);
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn samples() -> Vec<f64> {
        (0..200).map(|i| f64::from(i % 40) * 0.5).collect()
    }

    #[test]
    fn test_density_integrates_to_one() {
        let curve = density(&samples()).unwrap();
        let bins = histogram_bins(&samples(), None, None).unwrap();
        let integral: f64 = curve.iter().map(|p| p[1] * bins.bin_width).sum();
        assert_relative_eq!(integral, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distribution_chart_assembles() {
        let plot = distribution_chart(&samples(), &ChartStyle::default()).unwrap();
        assert!(plot.iter().any(|e| e.tag() == Some("distribution")));
    }

    #[test]
    fn test_stacked_distribution_layers() {
        let series = vec![samples(), samples()];
        let plot = stacked_distribution_chart(&series, &ChartStyle::default()).unwrap();
        let count = plot
            .iter()
            .filter(|e| e.tag() == Some("distribution"))
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(distribution_chart(&[], &ChartStyle::default()).is_err());
        assert!(stacked_distribution_chart(&[], &ChartStyle::default()).is_err());
        let series = vec![samples(), Vec::new()];
        assert!(stacked_distribution_chart(&series, &ChartStyle::default()).is_err());
    }
}
