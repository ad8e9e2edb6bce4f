//! The vector-canvas contract plot elements draw against.
//!
//! Elements never talk to a concrete backend; they build [`Path`]s and
//! text spans and hand them to a [`Canvas`]. The SVG backend lives in
//! [`crate::output::svg`]; [`BoundsCanvas`] is the throwaway measuring
//! target chart recipes use to resolve label offsets before real layout.
//!
//! Every canvas keeps a save/restore transform stack. An element that
//! changes the transform must restore it unconditionally before returning,
//! even if it ends up drawing nothing.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};

/// A single path construction command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    /// Begin a new subpath at the point.
    MoveTo(Point),
    /// Straight segment to the point.
    LineTo(Point),
    /// Cubic Bézier segment (control, control, end).
    CubicTo(Point, Point, Point),
    /// Close the current subpath.
    Close,
}

/// A path built from move/line/cubic/close commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCmd>,
}

impl Path {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new subpath.
    #[must_use]
    pub fn move_to(mut self, p: Point) -> Self {
        self.commands.push(PathCmd::MoveTo(p));
        self
    }

    /// Straight segment.
    #[must_use]
    pub fn line_to(mut self, p: Point) -> Self {
        self.commands.push(PathCmd::LineTo(p));
        self
    }

    /// Cubic Bézier segment.
    #[must_use]
    pub fn cubic_to(mut self, c1: Point, c2: Point, end: Point) -> Self {
        self.commands.push(PathCmd::CubicTo(c1, c2, end));
        self
    }

    /// Close the current subpath.
    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCmd::Close);
        self
    }

    /// Open polyline through the points.
    #[must_use]
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        for (i, p) in points.iter().enumerate() {
            path.commands.push(if i == 0 {
                PathCmd::MoveTo(*p)
            } else {
                PathCmd::LineTo(*p)
            });
        }
        path
    }

    /// Closed polygon through the points.
    #[must_use]
    pub fn polygon(points: &[Point]) -> Self {
        Self::polyline(points).close()
    }

    /// Axis-aligned rectangle.
    #[must_use]
    pub fn rect(r: Rect) -> Self {
        Self::polygon(&[
            Point::new(r.x, r.y),
            Point::new(r.x + r.width, r.y),
            Point::new(r.x + r.width, r.y + r.height),
            Point::new(r.x, r.y + r.height),
        ])
    }

    /// Circle approximated by four cubic Bézier arcs.
    #[must_use]
    pub fn circle(center: Point, radius: f64) -> Self {
        // magic constant for a cubic quarter-arc
        let k = 0.552_284_749_830_793_4 * radius;
        let (cx, cy, r) = (center.x, center.y, radius);
        Self::new()
            .move_to(Point::new(cx + r, cy))
            .cubic_to(
                Point::new(cx + r, cy + k),
                Point::new(cx + k, cy + r),
                Point::new(cx, cy + r),
            )
            .cubic_to(
                Point::new(cx - k, cy + r),
                Point::new(cx - r, cy + k),
                Point::new(cx - r, cy),
            )
            .cubic_to(
                Point::new(cx - r, cy - k),
                Point::new(cx - k, cy - r),
                Point::new(cx, cy - r),
            )
            .cubic_to(
                Point::new(cx + k, cy - r),
                Point::new(cx + r, cy - k),
                Point::new(cx + r, cy),
            )
            .close()
    }

    /// The path's commands.
    #[must_use]
    pub fn commands(&self) -> &[PathCmd] {
        &self.commands
    }

    /// True if the path contains no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True if any point in the path has a NaN coordinate.
    #[must_use]
    pub fn has_nan(&self) -> bool {
        self.commands.iter().any(|cmd| match cmd {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => p.is_nan(),
            PathCmd::CubicTo(a, b, c) => a.is_nan() || b.is_nan() || c.is_nan(),
            PathCmd::Close => false,
        })
    }

    /// Every point appearing in the path (control points included).
    pub(crate) fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|cmd| match cmd {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => vec![*p],
            PathCmd::CubicTo(a, b, c) => vec![*a, *b, *c],
            PathCmd::Close => vec![],
        })
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat cap at the endpoint.
    #[default]
    Butt,
    /// Semicircular cap.
    Round,
    /// Square cap extending past the endpoint.
    Square,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

/// Stroke style: color, width, caps, joins and optional dashing.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in plot units.
    pub width: f64,
    /// Cap style.
    pub cap: LineCap,
    /// Join style.
    pub join: LineJoin,
    /// Dash pattern (on/off lengths), `None` for solid.
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    /// Solid stroke with default caps and joins.
    #[must_use]
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::default(),
            join: LineJoin::default(),
            dash: None,
        }
    }

    /// Set a dash pattern.
    #[must_use]
    pub fn with_dash(mut self, dash: Vec<f64>) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Set the cap style.
    #[must_use]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }
}

/// Text anchor relative to the text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Position marks the start of the text.
    #[default]
    Start,
    /// Position marks the center.
    Middle,
    /// Position marks the end.
    End,
}

/// A positioned piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Anchor position (baseline).
    pub position: Point,
    /// Text content.
    pub text: String,
    /// Font size in plot units.
    pub size: f64,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Rotation around the position, radians, clockwise in Y-down space.
    pub angle: f64,
    /// Fill color.
    pub color: Rgba,
}

impl TextSpan {
    /// Create a text span with default anchor, angle and color.
    #[must_use]
    pub fn new(position: Point, text: impl Into<String>, size: f64) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            anchor: TextAnchor::default(),
            angle: 0.0,
            color: Rgba::BLACK,
        }
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

    /// Set the fill color.
    #[must_use]
    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

/// Deterministic text metrics shared by every canvas.
///
/// Real text shaping is out of scope; 0.6em average advance is close
/// enough for layout and keeps measurement reproducible across backends.
pub(crate) fn text_metrics(span: &TextSpan) -> Rect {
    let width = span.text.chars().count() as f64 * span.size * 0.6;
    let height = span.size;
    let x = match span.anchor {
        TextAnchor::Start => span.position.x,
        TextAnchor::Middle => span.position.x - width / 2.0,
        TextAnchor::End => span.position.x - width,
    };
    // baseline sits 80% down the em box
    Rect::new(x, span.position.y - height * 0.8, width, height)
}

/// 2D affine transform (row-major 2x3 matrix).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [f64; 6],
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Translation.
    #[must_use]
    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self {
            m: [1.0, 0.0, dx, 0.0, 1.0, dy],
        }
    }

    /// Non-uniform scale.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m: [sx, 0.0, 0.0, 0.0, sy, 0.0],
        }
    }

    /// Rotation by `angle` radians (clockwise in Y-down space).
    #[must_use]
    pub fn rotate(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [c, -s, 0.0, s, c, 0.0],
        }
    }

    /// Apply the transform to a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.m[0] * p.x + self.m[1] * p.y + self.m[2],
            self.m[3] * p.x + self.m[4] * p.y + self.m[5],
        )
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self {
            m: [
                a[0] * b[0] + a[1] * b[3],
                a[0] * b[1] + a[1] * b[4],
                a[0] * b[2] + a[1] * b[5] + a[2],
                a[3] * b[0] + a[4] * b[3],
                a[3] * b[1] + a[4] * b[4],
                a[3] * b[2] + a[4] * b[5] + a[5],
            ],
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Target surface for plot elements.
///
/// Transforms accumulate onto a current state; `save` pushes the state and
/// `restore` pops it. Tags flow through to backends that support tagging
/// (the SVG canvas turns them into element ids).
pub trait Canvas {
    /// Canvas extent `(width, height)` in plot units.
    fn size(&self) -> (f64, f64);

    /// Fill a path.
    fn fill_path(&mut self, path: &Path, fill: Rgba, tag: Option<&str>);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, tag: Option<&str>);

    /// Fill a text span.
    fn fill_text(&mut self, span: &TextSpan, tag: Option<&str>);

    /// Measure the bounding box a text span would occupy, without drawing.
    fn measure_text(&self, span: &TextSpan) -> Rect {
        text_metrics(span)
    }

    /// Blit a raster image into the given rectangle.
    fn draw_image(&mut self, rect: Rect, image: &Framebuffer, tag: Option<&str>);

    /// Push the current transform/clip state.
    fn save(&mut self);

    /// Pop to the previously saved state.
    fn restore(&mut self);

    /// Translate the current transform.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Scale the current transform.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Rotate the current transform by `angle` radians.
    fn rotate(&mut self, angle: f64);

    /// Intersect the current clip region with a rectangle.
    fn clip_rect(&mut self, rect: Rect);
}

/// State tracked per save/restore level.
#[derive(Debug, Clone, Default)]
pub(crate) struct CanvasState {
    pub(crate) transform: Transform,
    pub(crate) clip: Option<Rect>,
}

/// Measuring canvas: records the union bounding box of everything drawn.
///
/// Chart recipes render labels into one of these to learn text extents
/// before deciding title and axis-label offsets.
#[derive(Debug)]
pub struct BoundsCanvas {
    width: f64,
    height: f64,
    state: CanvasState,
    stack: Vec<CanvasState>,
    bounds: Option<Rect>,
}

impl BoundsCanvas {
    /// Create a measuring canvas of the given extent.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            state: CanvasState::default(),
            stack: Vec::new(),
            bounds: None,
        }
    }

    /// Union bounding box of everything drawn so far.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Current save/restore depth. Zero when balanced.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn grow(&mut self, p: Point) {
        if p.is_nan() {
            return;
        }
        let r = Rect::new(p.x, p.y, 0.0, 0.0);
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(r),
            None => r,
        });
    }

    fn grow_rect(&mut self, r: Rect) {
        self.grow(Point::new(r.x, r.y));
        self.grow(Point::new(r.x + r.width, r.y + r.height));
    }
}

impl Canvas for BoundsCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_path(&mut self, path: &Path, _fill: Rgba, _tag: Option<&str>) {
        let t = self.state.transform;
        for p in path.points() {
            self.grow(t.apply(p));
        }
    }

    fn stroke_path(&mut self, path: &Path, _stroke: &Stroke, _tag: Option<&str>) {
        let t = self.state.transform;
        for p in path.points() {
            self.grow(t.apply(p));
        }
    }

    fn fill_text(&mut self, span: &TextSpan, _tag: Option<&str>) {
        let r = text_metrics(span);
        let rot = Transform::translate(span.position.x, span.position.y)
            .then(&Transform::rotate(span.angle))
            .then(&Transform::translate(-span.position.x, -span.position.y));
        let t = self.state.transform.then(&rot);
        for corner in [
            Point::new(r.x, r.y),
            Point::new(r.x + r.width, r.y),
            Point::new(r.x, r.y + r.height),
            Point::new(r.x + r.width, r.y + r.height),
        ] {
            self.grow(t.apply(corner));
        }
    }

    fn draw_image(&mut self, rect: Rect, _image: &Framebuffer, _tag: Option<&str>) {
        let t = self.state.transform;
        let r = Rect::from_corners(
            t.apply(Point::new(rect.x, rect.y)),
            t.apply(Point::new(rect.x + rect.width, rect.y + rect.height)),
        );
        self.grow_rect(r);
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.then(&Transform::translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.then(&Transform::scale(sx, sy));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform.then(&Transform::rotate(angle));
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip = Some(match self.state.clip {
            Some(existing) => {
                let x0 = existing.x.max(rect.x);
                let y0 = existing.y.max(rect.y);
                let x1 = (existing.x + existing.width).min(rect.x + rect.width);
                let y1 = (existing.y + existing.height).min(rect.y + rect.height);
                Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
            }
            None => rect,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_path_polyline() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
        let path = Path::polyline(&pts);
        assert_eq!(path.commands().len(), 3);
        assert_eq!(path.commands()[0], PathCmd::MoveTo(pts[0]));
        assert_eq!(path.commands()[2], PathCmd::LineTo(pts[2]));
    }

    #[test]
    fn test_path_polygon_closes() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let path = Path::polygon(&pts);
        assert_eq!(*path.commands().last().unwrap(), PathCmd::Close);
    }

    #[test]
    fn test_path_nan_detection() {
        let path = Path::polyline(&[Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)]);
        assert!(path.has_nan());
        let clean = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(!clean.has_nan());
    }

    #[test]
    fn test_transform_compose() {
        let t = Transform::translate(10.0, 0.0).then(&Transform::scale(2.0, 2.0));
        // scale first, then translate
        let p = t.apply(Point::new(1.0, 1.0));
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn test_transform_rotate_quarter() {
        let p = Transform::rotate(std::f64::consts::FRAC_PI_2).apply(Point::new(1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds_canvas_tracks_paths() {
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        canvas.fill_path(
            &Path::rect(Rect::new(10.0, 20.0, 30.0, 40.0)),
            Rgba::BLACK,
            None,
        );
        let b = canvas.bounds().unwrap();
        assert_relative_eq!(b.x, 10.0);
        assert_relative_eq!(b.y, 20.0);
        assert_relative_eq!(b.width, 30.0);
        assert_relative_eq!(b.height, 40.0);
    }

    #[test]
    fn test_bounds_canvas_respects_translate() {
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.stroke_path(
            &Path::polyline(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]),
            &Stroke::new(Rgba::BLACK, 1.0),
            None,
        );
        canvas.restore();
        let b = canvas.bounds().unwrap();
        assert_relative_eq!(b.x, 5.0);
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_bounds_canvas_text() {
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        let span = TextSpan::new(Point::new(50.0, 50.0), "hello", 10.0)
            .anchored(TextAnchor::Middle);
        canvas.fill_text(&span, None);
        let b = canvas.bounds().unwrap();
        // 5 chars * 10px * 0.6 = 30 wide, centered on 50
        assert_relative_eq!(b.width, 30.0);
        assert_relative_eq!(b.x, 35.0);
    }

    #[test]
    fn test_measure_matches_metrics() {
        let canvas = BoundsCanvas::new(100.0, 100.0);
        let span = TextSpan::new(Point::new(0.0, 0.0), "abc", 12.0);
        let m = canvas.measure_text(&span);
        assert_relative_eq!(m.width, 3.0 * 12.0 * 0.6);
        assert_relative_eq!(m.height, 12.0);
    }

    #[test]
    fn test_clip_intersection() {
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        canvas.clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        canvas.clip_rect(Rect::new(25.0, 25.0, 50.0, 50.0));
        let clip = canvas.state.clip.unwrap();
        assert_relative_eq!(clip.x, 25.0);
        assert_relative_eq!(clip.width, 25.0);
    }

    #[test]
    fn test_nan_points_ignored_in_bounds() {
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        canvas.fill_path(
            &Path::polyline(&[Point::new(f64::NAN, 0.0), Point::new(10.0, 10.0)]),
            Rgba::BLACK,
            None,
        );
        let b = canvas.bounds().unwrap();
        assert_relative_eq!(b.x, 10.0);
    }

    #[test]
    fn test_circle_path_shape() {
        let path = Path::circle(Point::new(0.0, 0.0), 10.0);
        assert!(!path.is_empty());
        // all control points within the bounding square
        for p in path.points() {
            assert!(p.x.abs() <= 10.0 + 1e-9 && p.y.abs() <= 10.0 + 1e-9);
        }
    }
}
