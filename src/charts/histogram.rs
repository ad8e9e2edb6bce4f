//! Histogram recipe.

use std::sync::Arc;

use crate::charts::{assemble, AxisTicks, ChartStyle};
use crate::coords::Cartesian2D;
use crate::element::{Bars, Plot, PlotElement};
use crate::error::{Error, Result};
use crate::stats;

/// Binned histogram data.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    /// Leftmost bin edge.
    pub lo: f64,
    /// Rightmost bin edge.
    pub hi: f64,
    /// Width of each bin.
    pub bin_width: f64,
    /// Per-bin sample counts.
    pub counts: Vec<usize>,
    /// Samples below `lo`; populated only when an underflow limit is set.
    pub underflow: usize,
    /// Samples above `hi`; populated only when an overflow limit is set.
    pub overflow: usize,
}

/// Bin `values` with the Freedman-Diaconis rule.
///
/// When an `underflow` or `overflow` limit is given, samples beyond it
/// are counted separately instead of binned.
///
/// # Errors
///
/// Fails when `values` holds no finite samples, or when the limits
/// leave an empty range.
pub fn histogram_bins(
    values: &[f64],
    underflow: Option<f64>,
    overflow: Option<f64>,
) -> Result<HistogramBins> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(Error::EmptyData);
    }

    let mut lo =
        underflow.unwrap_or_else(|| finite.iter().copied().fold(f64::INFINITY, f64::min));
    let mut hi =
        overflow.unwrap_or_else(|| finite.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    if lo > hi {
        return Err(Error::CoordinateDomain(format!(
            "histogram limits are inverted: [{lo}, {hi}]"
        )));
    }
    if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }

    let in_range: Vec<f64> = finite.iter().copied().filter(|v| *v >= lo && *v <= hi).collect();
    let under = finite.iter().filter(|v| **v < lo).count();
    let over = finite.iter().filter(|v| **v > hi).count();

    let bin_count = stats::freedman_diaconis_bins(&in_range);
    let bin_width = (hi - lo) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    for v in &in_range {
        let i = (((v - lo) / bin_width) as usize).min(bin_count - 1);
        counts[i] += 1;
    }

    Ok(HistogramBins {
        lo,
        hi,
        bin_width,
        counts,
        underflow: if underflow.is_some() { under } else { 0 },
        overflow: if overflow.is_some() { over } else { 0 },
    })
}

/// Build a histogram chart.
///
/// Out-of-limit samples become extra bars offset 1.5 bin widths beyond
/// the binned range, with `(-∞, x]` / `[x, +∞)` axis labels, and the
/// axis and grid extend to cover them. The offset is deliberately
/// measured in bin widths rather than raw data units, so the gap stays
/// proportional to the bars at any data scale.
///
/// # Errors
///
/// Fails on empty data, inverted limits, or a degenerate plot size.
pub fn histogram(
    values: &[f64],
    underflow: Option<f64>,
    overflow: Option<f64>,
    style: &ChartStyle,
) -> Result<Plot> {
    let bins = histogram_bins(values, underflow, overflow)?;
    let bw = bins.bin_width;

    let mut points: Vec<Vec<f64>> = bins
        .counts
        .iter()
        .enumerate()
        .map(|(i, c)| vec![bins.lo + (i as f64 + 0.5) * bw, *c as f64])
        .collect();
    let mut extra_ticks: Vec<(f64, String)> = Vec::new();
    if bins.underflow > 0 {
        let x = bins.lo - 1.5 * bw;
        points.push(vec![x, bins.underflow as f64]);
        extra_ticks.push((x, format!("(-∞, {}]", super::format_value(bins.lo))));
    }
    if bins.overflow > 0 {
        let x = bins.hi + 1.5 * bw;
        points.push(vec![x, bins.overflow as f64]);
        extra_ticks.push((x, format!("[{}, +∞)", super::format_value(bins.hi))));
    }

    // half a bar beyond the outermost bar centers
    let x_lo = points
        .iter()
        .map(|p| p[0])
        .fold(f64::INFINITY, f64::min)
        - bw / 2.0;
    let x_hi = points
        .iter()
        .map(|p| p[0])
        .fold(f64::NEG_INFINITY, f64::max)
        + bw / 2.0;
    let max_count = points.iter().map(|p| p[1]).fold(0.0, f64::max);
    let y_hi = if max_count > 0.0 { max_count * 1.1 } else { 1.0 };

    let coords = Arc::new(Cartesian2D::linear(
        x_lo,
        x_hi,
        0.0,
        y_hi,
        style.width,
        style.height,
    )?);

    let mut x_ticks = AxisTicks::numeric(bins.lo, bins.hi, false);
    x_ticks.ticks.extend(extra_ticks);
    let y_ticks = AxisTicks::numeric(0.0, max_count.max(1.0), false);

    let coord_ref: crate::coords::CoordRef = coords.clone();
    let bars = Bars::new(coord_ref, points)
        .margin(0.0)?
        .fill(style.palette.series[0])
        .tagged("bars");
    let data: Vec<Box<dyn PlotElement>> = vec![Box::new(bars)];

    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bins_cover_all_samples() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram_bins(&values, None, None).unwrap();
        assert!(bins.counts.len() >= 2);
        assert_eq!(bins.counts.iter().sum::<usize>(), 100);
        assert_eq!(bins.underflow, 0);
        assert_eq!(bins.overflow, 0);
    }

    #[test]
    fn test_binning_is_deterministic() {
        let values: Vec<f64> = (0..100).map(|i| f64::from(i) * 0.37).collect();
        let a = histogram_bins(&values, None, None).unwrap();
        let b = histogram_bins(&values, None, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_overflow_counted_separately() {
        let bins = histogram_bins(&[1.0, 2.0, 3.0, 100.0], None, Some(10.0)).unwrap();
        assert_eq!(bins.overflow, 1);
        assert_eq!(bins.underflow, 0);
        assert_eq!(bins.counts.iter().sum::<usize>(), 3);
        assert_relative_eq!(bins.hi, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_underflow_counted_separately() {
        let bins = histogram_bins(&[-5.0, 1.0, 2.0, 3.0], Some(0.0), None).unwrap();
        assert_eq!(bins.underflow, 1);
        assert_eq!(bins.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_inverted_limits_rejected() {
        assert!(histogram_bins(&[1.0, 2.0], Some(5.0), Some(1.0)).is_err());
    }

    #[test]
    fn test_constant_data_widened() {
        let bins = histogram_bins(&[4.0, 4.0, 4.0], None, None).unwrap();
        assert!(bins.hi > bins.lo);
        assert_eq!(bins.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_empty_data_rejected() {
        assert!(histogram_bins(&[], None, None).is_err());
        assert!(histogram_bins(&[f64::NAN], None, None).is_err());
    }

    #[test]
    fn test_histogram_chart_assembles() {
        let values: Vec<f64> = (0..50).map(|i| f64::from(i % 10)).collect();
        let style = ChartStyle {
            title: Some("counts".to_string()),
            ..ChartStyle::default()
        };
        let plot = histogram(&values, None, None, &style).unwrap();
        assert!(!plot.is_empty());
        let tags: Vec<&str> = plot.iter().filter_map(|e| e.tag()).collect();
        assert!(tags.contains(&"bars"));
        assert!(tags.contains(&"grid"));
        assert_eq!(*tags.last().unwrap(), "title");
    }

    #[test]
    fn test_overflow_bar_offset() {
        let plot = histogram(
            &[1.0, 2.0, 3.0, 100.0],
            None,
            Some(10.0),
            &ChartStyle::default(),
        )
        .unwrap();
        // one data element carrying the overflow bar
        let tags: Vec<&str> = plot.iter().filter_map(|e| e.tag()).collect();
        assert!(tags.contains(&"bars"));
    }
}
