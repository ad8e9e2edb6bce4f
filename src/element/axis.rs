//! Axis, tick, grid and label elements.

use crate::canvas::{Canvas, Path, Stroke, TextAnchor, TextSpan};
use crate::color::Rgba;
use crate::coords::{trace_segment, CoordRef};
use crate::element::PlotElement;
use crate::geometry::Point;

/// An axis line between two data-space points, with an optional arrowhead
/// at the far end.
#[derive(Debug, Clone)]
pub struct Axis {
    coords: CoordRef,
    start: Vec<f64>,
    end: Vec<f64>,
    stroke: Stroke,
    arrow: bool,
    arrow_size: f64,
    tag: Option<String>,
}

impl Axis {
    /// Create an axis from `start` to `end` in data space.
    #[must_use]
    pub fn new(coords: CoordRef, start: Vec<f64>, end: Vec<f64>) -> Self {
        Self {
            coords,
            start,
            end,
            stroke: Stroke::new(Rgba::BLACK, 1.0),
            arrow: false,
            arrow_size: 8.0,
            tag: None,
        }
    }

    /// Set the stroke style.
    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Draw an arrowhead at the end point.
    #[must_use]
    pub fn with_arrow(mut self) -> Self {
        self.arrow = true;
        self
    }

    /// Set the arrowhead size in plot units.
    #[must_use]
    pub fn arrow_size(mut self, size: f64) -> Self {
        self.arrow_size = size;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl PlotElement for Axis {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let points = trace_segment(self.coords.as_ref(), &self.start, &self.end);
        let path = Path::polyline(&points);
        if path.has_nan() {
            return;
        }
        canvas.stroke_path(&path, &self.stroke, self.tag.as_deref());

        if self.arrow && points.len() >= 2 {
            let tip = points[points.len() - 1];
            let dir = (tip - points[points.len() - 2]).normalize();
            if dir.is_nan() {
                return;
            }
            let n = dir.perpendicular();
            let back = tip - dir * self.arrow_size;
            let barbs = Path::polyline(&[
                back + n * (self.arrow_size / 2.0),
                tip,
                back - n * (self.arrow_size / 2.0),
            ]);
            canvas.stroke_path(&barbs, &self.stroke, self.tag.as_deref());
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// Tick marks at a list of data-space positions.
///
/// Ticks extend from each position along a fixed plot-space direction, so
/// their visual length is constant no matter how the coordinate system
/// curves.
#[derive(Debug, Clone)]
pub struct Ticks {
    coords: CoordRef,
    positions: Vec<Vec<f64>>,
    direction: Point,
    length: f64,
    stroke: Stroke,
    tag: Option<String>,
}

impl Ticks {
    /// Create ticks at the given data-space positions, extending along the
    /// plot-space `direction`.
    #[must_use]
    pub fn new(coords: CoordRef, positions: Vec<Vec<f64>>, direction: Point) -> Self {
        Self {
            coords,
            positions,
            direction,
            length: 5.0,
            stroke: Stroke::new(Rgba::BLACK, 1.0),
            tag: None,
        }
    }

    /// Set the tick length in plot units.
    #[must_use]
    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
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
}

impl PlotElement for Ticks {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let dir = self.direction.normalize();
        if dir.is_nan() {
            return;
        }
        for position in &self.positions {
            let p = self.coords.to_plot(position);
            if p.is_nan() {
                continue;
            }
            let path = Path::polyline(&[p, p + dir * self.length]);
            canvas.stroke_path(&path, &self.stroke, self.tag.as_deref());
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// Grid lines between pairs of data-space points.
///
/// Each line is traced through the coordinate system, so grid lines curve
/// correctly under log axes.
#[derive(Debug, Clone)]
pub struct Grid {
    coords: CoordRef,
    lines: Vec<(Vec<f64>, Vec<f64>)>,
    stroke: Stroke,
    tag: Option<String>,
}

impl Grid {
    /// Create a grid from `(start, end)` data-space pairs.
    #[must_use]
    pub fn new(coords: CoordRef, lines: Vec<(Vec<f64>, Vec<f64>)>) -> Self {
        Self {
            coords,
            lines,
            stroke: Stroke::new(Rgba::rgb(200, 200, 200), 0.5),
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

impl PlotElement for Grid {
    fn plot(&self, canvas: &mut dyn Canvas) {
        for (start, end) in &self.lines {
            let points = trace_segment(self.coords.as_ref(), start, end);
            let path = Path::polyline(&points);
            if path.has_nan() {
                continue;
            }
            canvas.stroke_path(&path, &self.stroke, self.tag.as_deref());
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// A text label anchored at a data-space position, with an optional
/// plot-space offset.
#[derive(Debug, Clone)]
pub struct Label {
    coords: CoordRef,
    position: Vec<f64>,
    offset: Point,
    text: String,
    size: f64,
    anchor: TextAnchor,
    angle: f64,
    color: Rgba,
    tag: Option<String>,
}

impl Label {
    /// Create a label at a data-space position.
    #[must_use]
    pub fn new(coords: CoordRef, position: Vec<f64>, text: impl Into<String>) -> Self {
        Self {
            coords,
            position,
            offset: Point::ORIGIN,
            text: text.into(),
            size: 12.0,
            anchor: TextAnchor::Middle,
            angle: 0.0,
            color: Rgba::BLACK,
            tag: None,
        }
    }

    /// Shift the label by a plot-space offset.
    #[must_use]
    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Set the font size.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the anchor.
    #[must_use]
    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the rotation angle in radians.
    #[must_use]
    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Set the text color.
    #[must_use]
    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The text span this label will draw.
    #[must_use]
    pub fn span(&self) -> TextSpan {
        let p = self.coords.to_plot(&self.position) + self.offset;
        TextSpan::new(p, self.text.clone(), self.size)
            .anchored(self.anchor)
            .rotated(self.angle)
            .colored(self.color)
    }
}

impl PlotElement for Label {
    fn plot(&self, canvas: &mut dyn Canvas) {
        let span = self.span();
        if span.position.is_nan() {
            return;
        }
        canvas.fill_text(&span, self.tag.as_deref());
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}
