//! Coordinate systems mapping data space to plot space.
//!
//! A coordinate system is a (mostly) stateless mapping from data-space
//! points to plot-space points, with an inverse where one exists. Plot
//! space has Y growing downward, so every system flips the Y axis.
//!
//! Straightness and resolution queries drive the curve tracers: a straight
//! data-space segment stays straight in plot space only under linear
//! systems, or along directions with a zero component on every log axis.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Shared handle to a coordinate system. Elements are independent and may
/// be rendered in parallel, so the handle is `Send + Sync`.
pub type CoordRef = Arc<dyn CoordinateSystem + Send + Sync>;

/// Mapping between data space and plot space.
pub trait CoordinateSystem: fmt::Debug {
    /// Map a data-space point to plot space.
    fn to_plot(&self, data: &[f64]) -> Point;

    /// Map a plot-space point back to data space, if the system is
    /// invertible at that point.
    fn to_data(&self, point: Point) -> Option<Vec<f64>>;

    /// True if the whole mapping is affine.
    fn is_linear(&self) -> bool;

    /// True if straight data-space segments in `direction` remain straight
    /// in plot space.
    fn is_direction_straight(&self, direction: &[f64]) -> bool;

    /// Per-axis data-space step below which two points are visually
    /// indistinguishable in plot space.
    fn resolution(&self) -> Vec<f64>;

    /// One resolution-sized step from `data` in `direction`.
    fn around(&self, data: &[f64], direction: &[f64]) -> Vec<f64> {
        let res = self.resolution();
        let norm = (direction.iter().map(|d| d * d).sum::<f64>()).sqrt();
        data.iter()
            .zip(direction)
            .zip(&res)
            .map(|((p, d), r)| p + d / norm * r)
            .collect()
    }

    /// Plot-space extent `(scale_x, scale_y)` covered by the data range.
    fn plot_size(&self) -> (f64, f64);
}

/// One axis of a Cartesian system.
#[derive(Debug, Clone)]
pub enum AxisKind {
    /// Affine axis over `[min, max]`.
    Linear {
        /// Data minimum.
        min: f64,
        /// Data maximum.
        max: f64,
    },
    /// Logarithmic axis over `[min, max]`, operating on `ln(value)`.
    Log {
        /// Data minimum (must be positive).
        min: f64,
        /// Data maximum (must be positive).
        max: f64,
    },
    /// Categorical axis: each distinct value gets an equally spaced
    /// coordinate, in first-seen order. Data values are category indices.
    Categorical {
        /// Category labels in first-seen order.
        labels: Vec<String>,
    },
}

impl AxisKind {
    /// Map a data value to the unit interval.
    fn to_unit(&self, v: f64) -> f64 {
        match self {
            Self::Linear { min, max } => (v - min) / (max - min),
            Self::Log { min, max } => {
                if v <= 0.0 {
                    f64::NAN
                } else {
                    (v.ln() - min.ln()) / (max.ln() - min.ln())
                }
            }
            Self::Categorical { labels } => {
                let n = labels.len();
                if n <= 1 {
                    0.5
                } else {
                    v / (n - 1) as f64
                }
            }
        }
    }

    /// Map a unit-interval value back to data space.
    fn from_unit(&self, t: f64) -> f64 {
        match self {
            Self::Linear { min, max } => min + t * (max - min),
            Self::Log { min, max } => (min.ln() + t * (max.ln() - min.ln())).exp(),
            Self::Categorical { labels } => {
                let n = labels.len();
                if n <= 1 {
                    0.0
                } else {
                    t * (n - 1) as f64
                }
            }
        }
    }

    fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }

    /// Data-space step under which points become indistinguishable.
    ///
    /// Linear axes resolve at 1% of the data range. Log axes resolve
    /// finest at the domain minimum; reporting the step there means curve
    /// tracing never under-subdivides.
    fn resolution(&self) -> f64 {
        match self {
            Self::Linear { min, max } => (max - min) / 100.0,
            Self::Log { min, max } => {
                let ln_range = max.ln() - min.ln();
                min * ((ln_range / 100.0).exp() - 1.0)
            }
            Self::Categorical { labels } => (labels.len().max(2) - 1) as f64 / 100.0,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Linear { min, max } => {
                if !(max > min) {
                    return Err(Error::CoordinateDomain(format!(
                        "linear axis needs min < max, got [{min}, {max}]"
                    )));
                }
            }
            Self::Log { min, max } => {
                if *min <= 0.0 || *max <= 0.0 {
                    return Err(Error::CoordinateDomain(format!(
                        "log axis domain must be positive, got [{min}, {max}]"
                    )));
                }
                if !(max > min) {
                    return Err(Error::CoordinateDomain(format!(
                        "log axis needs min < max, got [{min}, {max}]"
                    )));
                }
            }
            Self::Categorical { labels } => {
                if labels.is_empty() {
                    return Err(Error::CoordinateDomain(
                        "categorical axis needs at least one category".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Two independent 1-D axes paired into a 2-D system.
///
/// Subsumes the pure-linear, pure-log, mixed log/linear and categorical
/// pairings; the named constructors cover the common ones.
#[derive(Debug, Clone)]
pub struct Cartesian2D {
    x: AxisKind,
    y: AxisKind,
    scale_x: f64,
    scale_y: f64,
}

impl Cartesian2D {
    /// Pair two arbitrary axes.
    ///
    /// # Errors
    ///
    /// Returns an error if either axis has an invalid domain.
    pub fn composite(x: AxisKind, y: AxisKind, scale_x: f64, scale_y: f64) -> Result<Self> {
        x.validate()?;
        y.validate()?;
        Ok(Self {
            x,
            y,
            scale_x,
            scale_y,
        })
    }

    /// Affine on both axes.
    pub fn linear(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<Self> {
        Self::composite(
            AxisKind::Linear {
                min: min_x,
                max: max_x,
            },
            AxisKind::Linear {
                min: min_y,
                max: max_y,
            },
            scale_x,
            scale_y,
        )
    }

    /// Logarithmic on both axes.
    pub fn logarithmic(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<Self> {
        Self::composite(
            AxisKind::Log {
                min: min_x,
                max: max_x,
            },
            AxisKind::Log {
                min: min_y,
                max: max_y,
            },
            scale_x,
            scale_y,
        )
    }

    /// Logarithmic X, affine Y.
    pub fn log_lin(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<Self> {
        Self::composite(
            AxisKind::Log {
                min: min_x,
                max: max_x,
            },
            AxisKind::Linear {
                min: min_y,
                max: max_y,
            },
            scale_x,
            scale_y,
        )
    }

    /// Affine X, logarithmic Y.
    pub fn lin_log(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<Self> {
        Self::composite(
            AxisKind::Linear {
                min: min_x,
                max: max_x,
            },
            AxisKind::Log {
                min: min_y,
                max: max_y,
            },
            scale_x,
            scale_y,
        )
    }

    /// Categorical X, affine Y. The common bar-chart pairing.
    pub fn categorical_linear(
        labels: Vec<String>,
        min_y: f64,
        max_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<Self> {
        Self::composite(
            AxisKind::Categorical { labels },
            AxisKind::Linear {
                min: min_y,
                max: max_y,
            },
            scale_x,
            scale_y,
        )
    }

    /// Affine system fitted to data extents, padded by the standard 10%
    /// layout convention on each side.
    pub fn linear_from_data(
        xs: &[f64],
        ys: &[f64],
        scale_x: f64,
        scale_y: f64,
    ) -> Result<Self> {
        let (min_x, max_x) = padded_extent(xs)?;
        let (min_y, max_y) = padded_extent(ys)?;
        Self::linear(min_x, max_x, min_y, max_y, scale_x, scale_y)
    }

    /// Category labels, if the X axis is categorical.
    #[must_use]
    pub fn x_labels(&self) -> Option<&[String]> {
        match &self.x {
            AxisKind::Categorical { labels } => Some(labels),
            _ => None,
        }
    }

    /// X axis data extent (index extent for categorical axes).
    #[must_use]
    pub fn x_extent(&self) -> (f64, f64) {
        axis_extent(&self.x)
    }

    /// Y axis data extent.
    #[must_use]
    pub fn y_extent(&self) -> (f64, f64) {
        axis_extent(&self.y)
    }

    /// True if the X axis is logarithmic.
    #[must_use]
    pub fn x_is_log(&self) -> bool {
        self.x.is_log()
    }

    /// True if the Y axis is logarithmic.
    #[must_use]
    pub fn y_is_log(&self) -> bool {
        self.y.is_log()
    }
}

fn axis_extent(axis: &AxisKind) -> (f64, f64) {
    match axis {
        AxisKind::Linear { min, max } | AxisKind::Log { min, max } => (*min, *max),
        AxisKind::Categorical { labels } => (0.0, (labels.len().max(2) - 1) as f64),
    }
}

impl CoordinateSystem for Cartesian2D {
    fn to_plot(&self, data: &[f64]) -> Point {
        let tx = self.x.to_unit(data[0]);
        let ty = self.y.to_unit(data[1]);
        // plot Y grows downward, data Y grows upward
        Point::new(tx * self.scale_x, self.scale_y - ty * self.scale_y)
    }

    fn to_data(&self, point: Point) -> Option<Vec<f64>> {
        let tx = point.x / self.scale_x;
        let ty = (self.scale_y - point.y) / self.scale_y;
        let x = self.x.from_unit(tx);
        let y = self.y.from_unit(ty);
        if x.is_finite() && y.is_finite() {
            Some(vec![x, y])
        } else {
            None
        }
    }

    fn is_linear(&self) -> bool {
        !self.x.is_log() && !self.y.is_log()
    }

    fn is_direction_straight(&self, direction: &[f64]) -> bool {
        if self.is_linear() {
            return true;
        }
        let x_ok = !self.x.is_log() || direction[0] == 0.0;
        let y_ok = !self.y.is_log() || direction[1] == 0.0;
        x_ok && y_ok
    }

    fn resolution(&self) -> Vec<f64> {
        vec![self.x.resolution(), self.y.resolution()]
    }

    fn plot_size(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }
}

/// Min/max of `values` padded by 10% of the range per side.
///
/// A degenerate (zero-width) range is widened by one unit per side so the
/// resulting axis stays usable.
pub fn padded_extent(values: &[f64]) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(Error::EmptyData);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(pad_range(min, max))
}

/// Pad `[min, max]` by 10% of the range per side.
#[must_use]
pub fn pad_range(min: f64, max: f64) -> (f64, f64) {
    let range = max - min;
    if range <= 0.0 {
        (min - 1.0, max + 1.0)
    } else {
        (min - range * 0.1, max + range * 0.1)
    }
}

/// Polyline approximation of the data-space segment `from -> to`.
///
/// Straight directions produce the two endpoints; curved directions are
/// subdivided into resolution-sized steps.
#[must_use]
pub fn trace_segment(
    coords: &dyn CoordinateSystem,
    from: &[f64],
    to: &[f64],
) -> Vec<Point> {
    let direction: Vec<f64> = to.iter().zip(from).map(|(t, f)| t - f).collect();
    if coords.is_direction_straight(&direction) {
        return vec![coords.to_plot(from), coords.to_plot(to)];
    }

    let res = coords.resolution();
    let steps = direction
        .iter()
        .zip(&res)
        .map(|(d, r)| if *r > 0.0 { (d.abs() / r).ceil() } else { 1.0 })
        .fold(1.0_f64, f64::max)
        .min(1024.0) as usize;

    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let p: Vec<f64> = from
                .iter()
                .zip(&direction)
                .map(|(f, d)| f + d * t)
                .collect();
            coords.to_plot(&p)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn linear_10() -> Cartesian2D {
        Cartesian2D::linear(0.0, 10.0, 0.0, 10.0, 100.0, 100.0).unwrap()
    }

    #[test]
    fn test_linear_forward() {
        let cs = linear_10();
        let p = cs.to_plot(&[5.0, 5.0]);
        assert_relative_eq!(p.x, 50.0);
        assert_relative_eq!(p.y, 50.0);
    }

    #[test]
    fn test_linear_y_flip() {
        let cs = linear_10();
        // data Y at the minimum lands at the bottom of plot space
        assert_relative_eq!(cs.to_plot(&[0.0, 0.0]).y, 100.0);
        assert_relative_eq!(cs.to_plot(&[0.0, 10.0]).y, 0.0);
    }

    #[test]
    fn test_linear_inverse() {
        let cs = linear_10();
        let d = cs.to_data(Point::new(50.0, 50.0)).unwrap();
        assert_relative_eq!(d[0], 5.0);
        assert_relative_eq!(d[1], 5.0);
    }

    #[test]
    fn test_log_round_trip() {
        let cs = Cartesian2D::logarithmic(1.0, 1000.0, 1.0, 100.0, 200.0, 200.0).unwrap();
        let p = cs.to_plot(&[10.0, 10.0]);
        let d = cs.to_data(p).unwrap();
        assert_relative_eq!(d[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(d[1], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_log_lin_round_trip() {
        let cs = Cartesian2D::log_lin(1.0, 1000.0, -5.0, 5.0, 200.0, 100.0).unwrap();
        let d = cs.to_data(cs.to_plot(&[100.0, 2.5])).unwrap();
        assert_relative_eq!(d[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(d[1], 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_lin_log_round_trip() {
        let cs = Cartesian2D::lin_log(-5.0, 5.0, 1.0, 1000.0, 100.0, 200.0).unwrap();
        let d = cs.to_data(cs.to_plot(&[2.5, 100.0])).unwrap();
        assert_relative_eq!(d[0], 2.5, epsilon = 1e-9);
        assert_relative_eq!(d[1], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_straightness_linear() {
        let cs = linear_10();
        assert!(cs.is_linear());
        assert!(cs.is_direction_straight(&[1.0, 1.0]));
    }

    #[test]
    fn test_straightness_log() {
        let cs = Cartesian2D::logarithmic(1.0, 100.0, 1.0, 100.0, 100.0, 100.0).unwrap();
        assert!(!cs.is_linear());
        assert!(cs.is_direction_straight(&[1.0, 0.0]));
        assert!(cs.is_direction_straight(&[0.0, 1.0]));
        assert!(!cs.is_direction_straight(&[1.0, 1.0]));
    }

    #[test]
    fn test_straightness_log_lin() {
        let cs = Cartesian2D::log_lin(1.0, 100.0, 0.0, 10.0, 100.0, 100.0).unwrap();
        // vertical moves avoid the log axis entirely
        assert!(cs.is_direction_straight(&[0.0, 1.0]));
        assert!(!cs.is_direction_straight(&[1.0, 0.5]));
    }

    #[test]
    fn test_resolution_linear() {
        let cs = linear_10();
        let res = cs.resolution();
        assert_relative_eq!(res[0], 0.1);
        assert_relative_eq!(res[1], 0.1);
    }

    #[test]
    fn test_log_rejects_non_positive_domain() {
        assert!(Cartesian2D::logarithmic(0.0, 10.0, 1.0, 10.0, 100.0, 100.0).is_err());
        assert!(Cartesian2D::logarithmic(1.0, 10.0, -1.0, 10.0, 100.0, 100.0).is_err());
    }

    #[test]
    fn test_log_non_positive_value_not_invertible() {
        let cs = Cartesian2D::logarithmic(1.0, 100.0, 1.0, 100.0, 100.0, 100.0).unwrap();
        assert!(cs.to_plot(&[-1.0, 10.0]).is_nan());
    }

    #[test]
    fn test_categorical_positions() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let cs = Cartesian2D::categorical_linear(labels, 0.0, 10.0, 100.0, 100.0).unwrap();
        assert_relative_eq!(cs.to_plot(&[0.0, 0.0]).x, 0.0);
        assert_relative_eq!(cs.to_plot(&[1.0, 0.0]).x, 50.0);
        assert_relative_eq!(cs.to_plot(&[2.0, 0.0]).x, 100.0);
        assert_eq!(cs.x_labels().unwrap().len(), 3);
    }

    #[test]
    fn test_around_moves_one_resolution_step() {
        let cs = linear_10();
        let moved = cs.around(&[5.0, 5.0], &[1.0, 0.0]);
        assert_relative_eq!(moved[0], 5.1);
        assert_relative_eq!(moved[1], 5.0);
    }

    #[test]
    fn test_pad_range() {
        let (lo, hi) = pad_range(0.0, 10.0);
        assert_relative_eq!(lo, -1.0);
        assert_relative_eq!(hi, 11.0);
    }

    #[test]
    fn test_pad_range_degenerate() {
        let (lo, hi) = pad_range(5.0, 5.0);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_padded_extent_empty() {
        assert!(padded_extent(&[]).is_err());
    }

    #[test]
    fn test_trace_straight_segment_is_two_points() {
        let cs = linear_10();
        let pts = trace_segment(&cs, &[0.0, 0.0], &[10.0, 10.0]);
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_trace_curved_segment_subdivides() {
        let cs = Cartesian2D::logarithmic(1.0, 100.0, 1.0, 100.0, 100.0, 100.0).unwrap();
        let pts = trace_segment(&cs, &[1.0, 1.0], &[100.0, 100.0]);
        assert!(pts.len() > 2);
        // endpoints preserved
        assert_relative_eq!(pts[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pts.last().unwrap().x, 100.0, epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn prop_linear_round_trip(x in -100.0..100.0f64, y in -100.0..100.0f64) {
            let cs = Cartesian2D::linear(-100.0, 100.0, -100.0, 100.0, 640.0, 480.0).unwrap();
            let d = cs.to_data(cs.to_plot(&[x, y])).unwrap();
            prop_assert!((d[0] - x).abs() < 1e-9);
            prop_assert!((d[1] - y).abs() < 1e-9);
        }

        #[test]
        fn prop_log_round_trip(x in 0.001..1000.0f64, y in 0.001..1000.0f64) {
            let cs = Cartesian2D::logarithmic(0.001, 1000.0, 0.001, 1000.0, 640.0, 480.0).unwrap();
            let d = cs.to_data(cs.to_plot(&[x, y])).unwrap();
            prop_assert!((d[0] - x).abs() < 1e-6 * x.max(1.0));
            prop_assert!((d[1] - y).abs() < 1e-6 * y.max(1.0));
        }
    }
}
