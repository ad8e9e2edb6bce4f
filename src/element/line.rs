//! Point, line, area, spline and box-mark elements.

use crate::canvas::{Canvas, Path, Stroke};
use crate::color::Rgba;
use crate::coords::{trace_segment, CoordRef};
use crate::element::PlotElement;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::stats;

/// Circular markers at data-space positions.
#[derive(Debug, Clone)]
pub struct ScatterPoints {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    radius: f64,
    fill: Rgba,
    stroke: Option<Stroke>,
    tag: Option<String>,
}

impl ScatterPoints {
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points,
            radius: 3.0,
            fill: Rgba::rgb(70, 130, 180),
            stroke: None,
            tag: None,
        }
    }

    /// Set the marker radius in plot units.
    #[must_use]
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Outline each marker.
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

impl PlotElement for ScatterPoints {
    fn plot(&self, canvas: &mut dyn Canvas) {
        for point in &self.points {
            let center = self.coords.to_plot(point);
            if center.is_nan() {
                continue;
            }
            let path = Path::circle(center, self.radius);
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

/// Trace a data-space point sequence into plot-space polyline runs.
///
/// Segments touching a NaN vertex are dropped, splitting the sequence
/// into separate runs rather than bridging the gap.
pub(crate) fn trace_runs(coords: &CoordRef, points: &[Vec<f64>]) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for pair in points.windows(2) {
        let segment = trace_segment(coords.as_ref(), &pair[0], &pair[1]);
        if segment.iter().any(|p| p.is_nan()) {
            if current.len() >= 2 {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            continue;
        }
        if current.is_empty() {
            current.extend_from_slice(&segment);
        } else {
            // the segment's first point repeats the previous last point
            current.extend_from_slice(&segment[1..]);
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// A polyline through data-space points, traced through the coordinate
/// system so it curves where the system does.
#[derive(Debug, Clone)]
pub struct LinePlot {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    stroke: Stroke,
    tag: Option<String>,
}

impl LinePlot {
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points,
            stroke: Stroke::new(Rgba::rgb(70, 130, 180), 1.5),
            tag: None,
        }
    }

    /// Set the stroke style.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl PlotElement for LinePlot {
    fn plot(&self, canvas: &mut dyn Canvas) {
        for run in trace_runs(&self.coords, &self.points) {
            canvas.stroke_path(&Path::polyline(&run), &self.stroke, self.tag.as_deref());
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// A filled region between a data-space point sequence and a constant
/// baseline on the last axis.
#[derive(Debug, Clone)]
pub struct Area {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    base_value: f64,
    fill: Rgba,
    stroke: Option<Stroke>,
    tag: Option<String>,
}

impl Area {
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points,
            base_value: 0.0,
            fill: Rgba::new(70, 130, 180, 128),
            stroke: None,
            tag: None,
        }
    }

    /// Set the baseline value.
    #[must_use]
    pub fn base_value(mut self, value: f64) -> Self {
        self.base_value = value;
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Stroke the upper edge.
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

impl PlotElement for Area {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let base_points: Vec<Vec<f64>> = self
            .points
            .iter()
            .map(|p| {
                let mut foot = p.clone();
                if let Some(last) = foot.last_mut() {
                    *last = self.base_value;
                }
                foot
            })
            .collect();

        for (top, base) in trace_runs(&self.coords, &self.points)
            .into_iter()
            .zip(trace_runs(&self.coords, &base_points))
        {
            let mut outline = top.clone();
            outline.extend(base.iter().rev());
            canvas.fill_path(&Path::polygon(&outline), self.fill, self.tag.as_deref());
            if let Some(stroke) = &self.stroke {
                canvas.stroke_path(&Path::polyline(&top), stroke, self.tag.as_deref());
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

/// A smooth curve through data-space points, rendered as Catmull-Rom
/// cubic segments in plot space.
#[derive(Debug, Clone)]
pub struct Spline {
    coords: CoordRef,
    points: Vec<Vec<f64>>,
    stroke: Stroke,
    tag: Option<String>,
}

impl Spline {
    #[must_use]
    pub fn new(coords: CoordRef, points: Vec<Vec<f64>>) -> Self {
        Self {
            coords,
            points,
            stroke: Stroke::new(Rgba::rgb(70, 130, 180), 1.5),
            tag: None,
        }
    }

    /// Set the stroke style.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Convert plot-space points into a Catmull-Rom path of cubic segments.
/// Endpoints are duplicated so the curve passes through every point.
pub(crate) fn catmull_rom_path(points: &[Point]) -> Path {
    let mut path = Path::new();
    let n = points.len();
    if n < 2 {
        return path;
    }
    path = path.move_to(points[0]);
    for i in 0..n - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < n { points[i + 2] } else { points[n - 1] };
        let c1 = p1 + (p2 - p0) * (1.0 / 6.0);
        let c2 = p2 - (p3 - p1) * (1.0 / 6.0);
        path = path.cubic_to(c1, c2, p2);
    }
    path
}

impl PlotElement for Spline {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let plot_points: Vec<Point> = self
            .points
            .iter()
            .map(|p| self.coords.to_plot(p))
            .filter(|p| !p.is_nan())
            .collect();
        if plot_points.len() < 2 {
            return;
        }
        let path = catmull_rom_path(&plot_points);
        canvas.stroke_path(&path, &self.stroke, self.tag.as_deref());
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// A box-and-whisker glyph summarizing a sample at one lateral position.
#[derive(Debug, Clone)]
pub struct BoxMarks {
    coords: CoordRef,
    x: f64,
    min: f64,
    q1: f64,
    median: f64,
    q3: f64,
    max: f64,
    width: f64,
    fill: Rgba,
    stroke: Stroke,
    tag: Option<String>,
}

impl BoxMarks {
    /// Summarize `samples` at lateral position `x`, with `width` in
    /// lateral data units.
    ///
    /// # Errors
    ///
    /// Fails on an empty sample.
    pub fn from_samples(coords: CoordRef, x: f64, samples: &[f64], width: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyData);
        }
        let (q1, q3) = stats::quartiles(samples);
        let median = stats::median(samples);
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            coords,
            x,
            min,
            q1,
            median,
            q3,
            max,
            width,
            fill: Rgba::new(70, 130, 180, 96),
            stroke: Stroke::new(Rgba::BLACK, 1.0),
            tag: None,
        })
    }

    /// Set the box fill color.
    #[must_use]
    pub fn fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Set the stroke style.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn at(&self, dx: f64, value: f64) -> Point {
        self.coords.to_plot(&[self.x + dx, value])
    }
}

impl PlotElement for BoxMarks {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let h = self.width / 2.0;
        let tag = self.tag.as_deref();

        let corners = [
            self.at(-h, self.q1),
            self.at(h, self.q1),
            self.at(h, self.q3),
            self.at(-h, self.q3),
        ];
        if corners.iter().any(|p| p.is_nan()) {
            return;
        }
        let body = Path::polygon(&corners);
        canvas.fill_path(&body, self.fill, tag);
        canvas.stroke_path(&body, &self.stroke, tag);

        let median = Path::polyline(&[self.at(-h, self.median), self.at(h, self.median)]);
        canvas.stroke_path(&median, &self.stroke, tag);

        // whiskers with half-width caps
        for (near, far) in [(self.q3, self.max), (self.q1, self.min)] {
            let stem = Path::polyline(&[self.at(0.0, near), self.at(0.0, far)]);
            canvas.stroke_path(&stem, &self.stroke, tag);
            let cap = Path::polyline(&[self.at(-h / 2.0, far), self.at(h / 2.0, far)]);
            canvas.stroke_path(&cap, &self.stroke, tag);
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BoundsCanvas;
    use crate::coords::Cartesian2D;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn coords() -> CoordRef {
        Arc::new(Cartesian2D::linear(0.0, 100.0, 0.0, 100.0, 100.0, 100.0).unwrap())
    }

    #[test]
    fn test_scatter_bounds_cover_markers() {
        let scatter =
            ScatterPoints::new(coords(), vec![vec![50.0, 50.0]]).radius(5.0);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        scatter.plot(&mut canvas);
        let b = canvas.bounds().unwrap();
        assert_relative_eq!(b.x, 45.0, epsilon = 1e-9);
        assert_relative_eq!(b.width, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scatter_skips_nan_points() {
        let scatter = ScatterPoints::new(coords(), vec![vec![f64::NAN, 10.0]]);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        scatter.plot(&mut canvas);
        assert!(canvas.bounds().is_none());
    }

    #[test]
    fn test_trace_runs_split_on_nan() {
        let points = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![f64::NAN, 20.0],
            vec![30.0, 30.0],
            vec![40.0, 40.0],
        ];
        let runs = trace_runs(&coords(), &points);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1].len(), 2);
    }

    #[test]
    fn test_line_plot_straight_under_linear() {
        let line = LinePlot::new(coords(), vec![vec![0.0, 0.0], vec![100.0, 100.0]]);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        line.plot(&mut canvas);
        let b = canvas.bounds().unwrap();
        assert_relative_eq!(b.width, 100.0, epsilon = 1e-9);
        assert_relative_eq!(b.height, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_line_subdivides_on_log_axis() {
        let log: CoordRef =
            Arc::new(Cartesian2D::log_lin(1.0, 100.0, 0.0, 100.0, 100.0, 100.0).unwrap());
        let runs = trace_runs(&log, &[vec![1.0, 0.0], vec![100.0, 100.0]]);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].len() > 2);
    }

    #[test]
    fn test_area_reaches_baseline() {
        let area = Area::new(coords(), vec![vec![10.0, 50.0], vec![90.0, 50.0]]);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        area.plot(&mut canvas);
        let b = canvas.bounds().unwrap();
        // baseline y=0 maps to the bottom of the plot
        assert_relative_eq!(b.y + b.height, 100.0, epsilon = 1e-9);
        assert_relative_eq!(b.y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_catmull_rom_interpolates_endpoints() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 80.0),
            Point::new(100.0, 20.0),
        ];
        let path = catmull_rom_path(&pts);
        let flat: Vec<Point> = path.points().collect();
        let first = flat.first().unwrap();
        let last = flat.last().unwrap();
        assert_relative_eq!(first.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(last.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(last.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_box_marks_from_samples() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        let marks = BoxMarks::from_samples(coords(), 50.0, &samples, 10.0).unwrap();
        assert_relative_eq!(marks.median, 3.0, epsilon = 1e-9);
        assert_relative_eq!(marks.min, 1.0, epsilon = 1e-9);
        assert_relative_eq!(marks.max, 5.0, epsilon = 1e-9);

        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        marks.plot(&mut canvas);
        let b = canvas.bounds().unwrap();
        // whiskers span the full sample range: data 1..5 maps to plot 95..99
        assert_relative_eq!(b.y, 95.0, epsilon = 1e-9);
        assert_relative_eq!(b.height, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_box_marks_empty_sample_errors() {
        assert!(BoxMarks::from_samples(coords(), 0.0, &[], 1.0).is_err());
    }
}
