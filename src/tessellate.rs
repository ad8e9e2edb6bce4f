//! Cell tessellation for scalar-field rendering.
//!
//! Regular grids map to exact rectangle or hexagon cells; irregular sample
//! sets get Voronoi cells, computed per site by clipping the bounding
//! rectangle against the perpendicular bisector of every other site.

use crate::geometry::{Point, Rect};

/// Clip a convex polygon to the half-plane of points at least as close to
/// `site` as to `other` (Sutherland-Hodgman against the bisector).
#[must_use]
pub fn clip_to_bisector(polygon: &[Point], site: Point, other: Point) -> Vec<Point> {
    let mid = site.lerp(other, 0.5);
    let normal = other - site;

    // signed distance along the bisector normal; <= 0 is the kept side
    let side = |p: Point| (p - mid).dot(normal);

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];
        let sc = side(current);
        let sn = side(next);

        if sc <= 0.0 {
            out.push(current);
        }
        if (sc < 0.0 && sn > 0.0) || (sc > 0.0 && sn < 0.0) {
            let t = sc / (sc - sn);
            out.push(current.lerp(next, t));
        }
    }
    out
}

/// Voronoi cell of `sites[index]` clipped to `bounds`.
///
/// Returns an empty polygon for degenerate input (NaN site, duplicate
/// sites collapsing the cell).
#[must_use]
pub fn voronoi_cell(sites: &[Point], index: usize, bounds: Rect) -> Vec<Point> {
    let site = sites[index];
    if site.is_nan() {
        return Vec::new();
    }

    let mut cell = vec![
        Point::new(bounds.x, bounds.y),
        Point::new(bounds.x + bounds.width, bounds.y),
        Point::new(bounds.x + bounds.width, bounds.y + bounds.height),
        Point::new(bounds.x, bounds.y + bounds.height),
    ];

    for (i, &other) in sites.iter().enumerate() {
        if i == index || other.is_nan() || other == site {
            continue;
        }
        cell = clip_to_bisector(&cell, site, other);
        if cell.len() < 3 {
            return Vec::new();
        }
    }
    cell
}

/// Voronoi cells for every site, clipped to `bounds`.
#[must_use]
pub fn voronoi_cells(sites: &[Point], bounds: Rect) -> Vec<Vec<Point>> {
    (0..sites.len())
        .map(|i| voronoi_cell(sites, i, bounds))
        .collect()
}

/// Axis-aligned rectangle cell centered on `center`.
#[must_use]
pub fn rect_cell(center: Point, width: f64, height: f64) -> Vec<Point> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    vec![
        Point::new(center.x - hw, center.y - hh),
        Point::new(center.x + hw, center.y - hh),
        Point::new(center.x + hw, center.y + hh),
        Point::new(center.x - hw, center.y + hh),
    ]
}

/// Hexagon cell centered on `center`.
///
/// `pointy_top` selects the vertex-up orientation (used by horizontal hex
/// grids); otherwise the flat-top orientation. `rx`/`ry` are the
/// half-extents of the hexagon's bounding box.
#[must_use]
pub fn hex_cell(center: Point, rx: f64, ry: f64, pointy_top: bool) -> Vec<Point> {
    let offset = if pointy_top {
        std::f64::consts::FRAC_PI_2
    } else {
        0.0
    };
    (0..6)
        .map(|i| {
            let angle = offset + f64::from(i) * std::f64::consts::FRAC_PI_3;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}

/// Area of a simple polygon (shoelace formula, absolute value).
#[must_use]
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Point-in-polygon test (even-odd rule).
#[must_use]
pub fn polygon_contains(vertices: &[Point], p: Point) -> bool {
    let mut inside = false;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}
