//! Bar, stacked-bar and clustered-bar elements.
//!
//! All three share one geometry engine: bar quadrilaterals are laid out in
//! plot space from neighbor baseline midpoints, with the top edge found by
//! perpendicular projection onto the line through the tip. This keeps bars
//! correctly oriented under non-linear coordinate systems, where "up" is
//! not a constant direction.

use std::sync::Arc;

use crate::canvas::{Canvas, Path, Stroke};
use crate::color::Rgba;
use crate::coords::CoordRef;
use crate::element::PlotElement;
use crate::error::{Error, Result};
use crate::geometry::Point;

/// Maps a data point to its baseline foot in data space.
pub type BaselineFn = Arc<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>;

/// Baseline at a constant value on the last axis.
#[must_use]
pub fn constant_baseline(value: f64) -> BaselineFn {
    Arc::new(move |p: &[f64]| {
        let mut foot = p.to_vec();
        if let Some(last) = foot.last_mut() {
            *last = value;
        }
        foot
    })
}

/// One bar's quadrilateral: base-left, base-right, top-right, top-left.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BarQuad {
    pub(crate) base_left: Point,
    pub(crate) base_right: Point,
    pub(crate) top_right: Point,
    pub(crate) top_left: Point,
}

impl BarQuad {
    fn vertices(&self) -> [Point; 4] {
        [self.base_left, self.base_right, self.top_right, self.top_left]
    }

    fn is_degenerate(&self) -> bool {
        self.vertices().iter().any(|v| v.is_nan())
    }
}

/// Compute bar quadrilaterals for a sorted point sequence.
///
/// `margin` shrinks each bar symmetrically toward its own center line:
/// the edge between bar `i` and its neighbor interpolates the two feet
/// with weights `(0.5 + m/2)` (own) and `(0.5 - m/2)` (neighbor). Edge
/// bars synthesize a virtual neighbor by point-reflecting the real
/// neighbor's foot through their own, so they get interior widths.
///
/// Degenerate bars (any NaN vertex) come back as `None` and are skipped
/// by the callers rather than drawn.
pub(crate) fn bar_quads(
    coords: &CoordRef,
    points: &[Vec<f64>],
    baseline: &BaselineFn,
    margin: f64,
) -> Vec<Option<BarQuad>> {
    let feet: Vec<Point> = points.iter().map(|p| coords.to_plot(&baseline(p))).collect();
    let tips: Vec<Point> = points.iter().map(|p| coords.to_plot(p)).collect();

    (0..points.len())
        .map(|i| {
            let foot = feet[i];
            let tip = tips[i];

            let left_foot = neighbor_foot(&feet, i, true, coords);
            let right_foot = neighbor_foot(&feet, i, false, coords);

            // margin shrinks toward the bar's own center line
            let t = 0.5 - margin / 2.0;
            let base_left = foot.lerp(left_foot, t);
            let base_right = foot.lerp(right_foot, t);

            let quad = project_quad(base_left, base_right, foot, tip)?;
            if quad.is_degenerate() {
                None
            } else {
                Some(quad)
            }
        })
        .collect()
}

/// The neighboring foot used for bar `i`'s left or right edge, virtual
/// where the sequence ends.
fn neighbor_foot(feet: &[Point], i: usize, left: bool, coords: &CoordRef) -> Point {
    let n = feet.len();
    if left && i > 0 {
        return feet[i - 1];
    }
    if !left && i + 1 < n {
        return feet[i + 1];
    }
    if n > 1 {
        // reflect the existing neighbor through this bar's own foot
        let other = if left { feet[i + 1] } else { feet[i - 1] };
        return other.reflect_through(feet[i]);
    }
    // lone bar: no neighbor to mirror, fall back to a tenth of the canvas
    let (sx, sy) = coords.plot_size();
    let half = sx.max(sy) * 0.1;
    if left {
        feet[i] - Point::new(half, 0.0)
    } else {
        feet[i] + Point::new(half, 0.0)
    }
}

/// Project the base corners onto the line through `tip` perpendicular to
/// the foot-to-tip direction, producing the top corners.
fn project_quad(base_left: Point, base_right: Point, foot: Point, tip: Point) -> Option<BarQuad> {
    let dir = (tip - foot).normalize();
    if dir.is_nan() {
        return None;
    }
    let top_line_dir = dir.perpendicular();
    Some(BarQuad {
        base_left,
        base_right,
        top_right: base_right.project_onto_line(tip, top_line_dir),
        top_left: base_left.project_onto_line(tip, top_line_dir),
    })
}

/// Sort points by their first component, the lateral axis.
fn sort_points(mut points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    points.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
    points
}

fn check_fraction(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::FractionOutOfRange { name, value })
    }
}

/// Simple bars: one quadrilateral per data point.
#[derive(Clone)]
pub struct Bars {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    baseline: BaselineFn,
    margin: f64,
    fill: Rgba,
    stroke: Option<Stroke>,
    tag: Option<String>,
}

impl Bars {
    /// Create bars from 2-D data points `(x, y)`; the points are sorted by
    /// their lateral component.
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points: sort_points(points),
            baseline: constant_baseline(0.0),
            margin: 0.1,
            fill: Rgba::rgb(70, 130, 180),
            stroke: None,
            tag: None,
        }
    }

    /// Set the inter-bar margin fraction.
    ///
    /// # Errors
    ///
    /// Fails fast if `margin` is outside `[0, 1]`.
    pub fn margin(mut self, margin: f64) -> Result<Self> {
        self.margin = check_fraction("margin", margin)?;
        Ok(self)
    }

    /// Set the baseline function.
    #[must_use]
    pub fn baseline(mut self, baseline: BaselineFn) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Outline each bar.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub(crate) fn quads(&self) -> Vec<Option<BarQuad>> {
        bar_quads(&self.coords, &self.points, &self.baseline, self.margin)
    }
}

impl PlotElement for Bars {
    fn plot(&self, canvas: &mut dyn Canvas) {
        for quad in self.quads().into_iter().flatten() {
            let path = Path::polygon(&quad.vertices());
            canvas.fill_path(&path, self.fill, self.tag.as_deref());
            if let Some(stroke) = &self.stroke {
                canvas.stroke_path(&path, stroke, self.tag.as_deref());
            }
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl std::fmt::Debug for Bars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bars")
            .field("points", &self.points.len())
            .field("margin", &self.margin)
            .finish()
    }
}

/// Cumulative plot-space ratios of a stacked point's segment boundaries.
///
/// Segment thickness follows plot-space distance, not data-space value, so
/// non-linear coordinate systems distort segments correctly.
pub(crate) fn stack_ratios(coords: &CoordRef, x: f64, base: f64, segments: &[f64]) -> Vec<f64> {
    let foot = coords.to_plot(&[x, base]);
    let total: f64 = segments.iter().sum();
    let top = coords.to_plot(&[x, base + total]);
    let full = foot.distance(top);
    if full <= 0.0 {
        return vec![1.0; segments.len()];
    }

    let mut cumulative = base;
    segments
        .iter()
        .map(|v| {
            cumulative += v;
            foot.distance(coords.to_plot(&[x, cumulative])) / full
        })
        .collect()
}

/// Stacked bars: each data point is `(x, v1, v2, ..., vk)`; the segments
/// stack from the baseline upward.
#[derive(Clone)]
pub struct StackedBars {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    base_value: f64,
    margin: f64,
    fills: Vec<Rgba>,
    stroke: Option<Stroke>,
    tag: Option<String>,
}

impl StackedBars {
    /// Create stacked bars; points are sorted by their lateral component.
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points: sort_points(points),
            base_value: 0.0,
            margin: 0.1,
            fills: vec![Rgba::rgb(70, 130, 180), Rgba::rgb(255, 160, 64)],
            stroke: None,
            tag: None,
        }
    }

    /// Set the inter-bar margin fraction.
    ///
    /// # Errors
    ///
    /// Fails fast if `margin` is outside `[0, 1]`.
    pub fn margin(mut self, margin: f64) -> Result<Self> {
        self.margin = check_fraction("margin", margin)?;
        Ok(self)
    }

    /// Set the baseline value.
    #[must_use]
    pub fn base_value(mut self, value: f64) -> Self {
        self.base_value = value;
        self
    }

    /// Set per-segment fill colors (cycled when segments outnumber them).
    #[must_use]
    pub fn fills(mut self, fills: Vec<Rgba>) -> Self {
        self.fills = fills;
        self
    }

    /// Outline each segment.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl PlotElement for StackedBars {
    fn plot(&self, canvas: &mut dyn Canvas) {
        // the full-stack quad drives the outer geometry; segments carve it up
        let base = self.base_value;
        let stack_points: Vec<Vec<f64>> = self
            .points
            .iter()
            .map(|p| vec![p[0], base + p[1..].iter().sum::<f64>()])
            .collect();
        let baseline = constant_baseline(base);
        let quads = bar_quads(&self.coords, &stack_points, &baseline, self.margin);

        for (point, quad) in self.points.iter().zip(quads) {
            let Some(quad) = quad else { continue };
            let segments = &point[1..];
            let ratios = stack_ratios(&self.coords, point[0], base, segments);

            let mut prev = 0.0;
            for (k, ratio) in ratios.iter().enumerate() {
                let fill = self.fills[k % self.fills.len()];
                let poly = [
                    quad.base_left.lerp(quad.top_left, prev),
                    quad.base_right.lerp(quad.top_right, prev),
                    quad.base_right.lerp(quad.top_right, *ratio),
                    quad.base_left.lerp(quad.top_left, *ratio),
                ];
                if poly.iter().any(|v| v.is_nan()) {
                    continue;
                }
                let path = Path::polygon(&poly);
                canvas.fill_path(&path, fill, self.tag.as_deref());
                if let Some(stroke) = &self.stroke {
                    canvas.stroke_path(&path, stroke, self.tag.as_deref());
                }
                prev = *ratio;
            }
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl std::fmt::Debug for StackedBars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackedBars")
            .field("points", &self.points.len())
            .field("margin", &self.margin)
            .finish()
    }
}

/// Clustered bars: each data point is `(x, v1, v2, ..., vk)`; the lateral
/// span at `x` is subdivided into one slice per value.
#[derive(Clone)]
pub struct ClusteredBars {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    base_value: f64,
    margin: f64,
    intra_cluster_margin: f64,
    fills: Vec<Rgba>,
    stroke: Option<Stroke>,
    tag: Option<String>,
}

impl ClusteredBars {
    /// Create clustered bars; points are sorted by their lateral component.
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points: sort_points(points),
            base_value: 0.0,
            margin: 0.1,
            intra_cluster_margin: 0.05,
            fills: vec![
                Rgba::rgb(70, 130, 180),
                Rgba::rgb(255, 160, 64),
                Rgba::rgb(90, 170, 90),
            ],
            stroke: None,
            tag: None,
        }
    }

    /// Set the inter-cluster margin fraction.
    ///
    /// # Errors
    ///
    /// Fails fast if `margin` is outside `[0, 1]`.
    pub fn margin(mut self, margin: f64) -> Result<Self> {
        self.margin = check_fraction("margin", margin)?;
        Ok(self)
    }

    /// Set the margin fraction between bars inside one cluster.
    ///
    /// # Errors
    ///
    /// Fails fast if the value is outside `[0, 1]`.
    pub fn intra_cluster_margin(mut self, value: f64) -> Result<Self> {
        self.intra_cluster_margin = check_fraction("intra_cluster_margin", value)?;
        Ok(self)
    }

    /// Set the baseline value.
    #[must_use]
    pub fn base_value(mut self, value: f64) -> Self {
        self.base_value = value;
        self
    }

    /// Set per-series fill colors (cycled).
    #[must_use]
    pub fn fills(mut self, fills: Vec<Rgba>) -> Self {
        self.fills = fills;
        self
    }

    /// Outline each bar.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl PlotElement for ClusteredBars {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let base = self.base_value;
        // cluster extent comes from the tallest bar in the cluster
        let extent_points: Vec<Vec<f64>> = self
            .points
            .iter()
            .map(|p| {
                let max = p[1..].iter().copied().fold(f64::NEG_INFINITY, f64::max);
                vec![p[0], max]
            })
            .collect();
        let baseline = constant_baseline(base);
        let quads = bar_quads(&self.coords, &extent_points, &baseline, self.margin);

        for (point, quad) in self.points.iter().zip(quads) {
            let Some(quad) = quad else { continue };
            let values = &point[1..];
            let k = values.len();
            if k == 0 {
                continue;
            }

            let foot_plot = self.coords.to_plot(&[point[0], base]);
            for (j, value) in values.iter().enumerate() {
                // equal lateral slices between the cluster's base corners
                let slice_start = j as f64 / k as f64;
                let slice_end = (j + 1) as f64 / k as f64;
                let shrink = self.intra_cluster_margin / 2.0 / k as f64;
                let left = quad.base_left.lerp(quad.base_right, slice_start + shrink);
                let right = quad.base_left.lerp(quad.base_right, slice_end - shrink);

                let tip_plot = self.coords.to_plot(&[point[0], *value]);
                let rise = tip_plot - foot_plot;
                let slice_foot = left.lerp(right, 0.5);
                let tip = slice_foot + rise;

                let Some(bar) = project_quad(left, right, slice_foot, tip) else {
                    continue;
                };
                if bar.is_degenerate() {
                    continue;
                }
                let path = Path::polygon(&bar.vertices());
                let fill = self.fills[j % self.fills.len()];
                canvas.fill_path(&path, fill, self.tag.as_deref());
                if let Some(stroke) = &self.stroke {
                    canvas.stroke_path(&path, stroke, self.tag.as_deref());
                }
            }
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl std::fmt::Debug for ClusteredBars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusteredBars")
            .field("points", &self.points.len())
            .field("margin", &self.margin)
            .field("intra_cluster_margin", &self.intra_cluster_margin)
            .finish()
    }
}
