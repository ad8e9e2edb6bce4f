//! Box-and-swarm chart recipe: jittered sample points per group with a
//! box-and-whisker summary drawn on top.

use std::sync::Arc;

use crate::charts::{assemble, AxisTicks, ChartStyle};
use crate::color::Rgba;
use crate::coords::{pad_range, Cartesian2D, CoordRef};
use crate::element::{BoxMarks, Plot, PlotElement, ScatterPoints};
use crate::error::{Error, Result};
use crate::stats::UniformSampler;

/// Lateral jitter half-width in category index units.
const JITTER: f64 = 0.2;

/// Box glyph width in category index units.
const BOX_WIDTH: f64 = 0.5;

/// Build a box-and-swarm chart from labeled sample groups.
///
/// Jitter is seeded per group, so the same input always produces the
/// same layout.
///
/// # Errors
///
/// Fails on empty input or a group with no samples.
pub fn box_swarm_chart(groups: &[(String, Vec<f64>)], style: &ChartStyle) -> Result<Plot> {
    if groups.is_empty() {
        return Err(Error::EmptyData);
    }
    let pooled: Vec<f64> = groups.iter().flat_map(|(_, s)| s.iter().copied()).collect();
    if pooled.is_empty() {
        return Err(Error::EmptyData);
    }
    let min = pooled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = pooled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (y_lo, y_hi) = pad_range(min, max);

    let coords = Arc::new(Cartesian2D::linear(
        -0.5,
        groups.len() as f64 - 0.5,
        y_lo,
        y_hi,
        style.width,
        style.height,
    )?);
    let coord_ref: CoordRef = coords.clone();

    let mut data: Vec<Box<dyn PlotElement>> = Vec::new();
    for (i, (_, samples)) in groups.iter().enumerate() {
        let mut sampler = UniformSampler::new(0x5EED ^ i as u64);
        let jittered: Vec<Vec<f64>> = samples
            .iter()
            .map(|v| {
                let dx = sampler.next_range(-JITTER, JITTER);
                vec![i as f64 + dx, *v]
            })
            .collect();
        let color = style.palette.series[i % style.palette.series.len()];
        data.push(Box::new(
            ScatterPoints::new(coord_ref.clone(), jittered)
                .radius(2.5)
                .fill(color)
                .tagged("swarm"),
        ));
        data.push(Box::new(
            BoxMarks::from_samples(coord_ref.clone(), i as f64, samples, BOX_WIDTH)?
                .fill(Rgba::new(color.r, color.g, color.b, 80))
                .tagged("box"),
        ));
    }

    let labels: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
    let x_ticks = AxisTicks::categories(&labels);
    let y_ticks = AxisTicks::numeric(y_lo, y_hi, false);
    Ok(assemble(&coords, style, &x_ticks, &y_ticks, data))
}
