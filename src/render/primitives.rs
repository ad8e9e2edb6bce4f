//! Primitive rasterization onto a framebuffer.
//!
//! Used by the raster scalar-field mode when polygonal cells have to be
//! rendered into a pixel buffer.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

/// Draw a line using Bresenham's algorithm.
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        if x >= 0 && y >= 0 {
            fb.set_pixel(x as u32, y as u32, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Fill a convex or concave polygon using even-odd scanline filling.
///
/// Degenerate polygons (fewer than 3 vertices, NaN coordinates) are
/// silently skipped.
pub fn fill_polygon(fb: &mut Framebuffer, vertices: &[Point], color: Rgba) {
    if vertices.len() < 3 || vertices.iter().any(|v| v.is_nan()) {
        return;
    }

    let y_min = vertices
        .iter()
        .map(|v| v.y)
        .fold(f64::INFINITY, f64::min)
        .floor()
        .max(0.0) as i64;
    let y_max = vertices
        .iter()
        .map(|v| v.y)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil()
        .min(f64::from(fb.height())) as i64;

    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());

    for y in y_min..y_max {
        let scan_y = y as f64 + 0.5;
        crossings.clear();

        for i in 0..vertices.len() {
            let a = vertices[i];
            let b = vertices[(i + 1) % vertices.len()];
            if (a.y <= scan_y && b.y > scan_y) || (b.y <= scan_y && a.y > scan_y) {
                let t = (scan_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }

        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        for pair in crossings.chunks_exact(2) {
            let x_start = pair[0].round().max(0.0) as u32;
            let x_end = pair[1].round().max(0.0) as u32;
            if x_end > x_start {
                fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
            }
        }
    }
}

/// Outline a polygon edge by edge.
pub fn stroke_polygon(fb: &mut Framebuffer, vertices: &[Point], color: Rgba) {
    if vertices.len() < 2 || vertices.iter().any(|v| v.is_nan()) {
        return;
    }
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        draw_line(
            fb,
            a.x.round() as i32,
            a.y.round() as i32,
            b.x.round() as i32,
            b.y.round() as i32,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_line_horizontal() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);

        draw_line(&mut fb, 10, 50, 90, 50, Rgba::BLACK);

        assert_eq!(fb.get_pixel(10, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(90, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);

        draw_line(&mut fb, 10, 10, 90, 90, Rgba::BLACK);

        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_line_out_of_bounds_does_not_panic() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        draw_line(&mut fb, -10, -10, 110, 110, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_fill_polygon_square() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);

        fill_polygon(
            &mut fb,
            &[
                Point::new(20.0, 20.0),
                Point::new(80.0, 20.0),
                Point::new(80.0, 80.0),
                Point::new(20.0, 80.0),
            ],
            Rgba::RED,
        );

        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);

        fill_polygon(
            &mut fb,
            &[
                Point::new(50.0, 10.0),
                Point::new(90.0, 90.0),
                Point::new(10.0, 90.0),
            ],
            Rgba::BLUE,
        );

        assert_eq!(fb.get_pixel(50, 60), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(10, 20), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_degenerate_skipped() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);

        fill_polygon(&mut fb, &[Point::new(10.0, 10.0)], Rgba::RED);
        fill_polygon(
            &mut fb,
            &[
                Point::new(f64::NAN, 10.0),
                Point::new(50.0, 50.0),
                Point::new(10.0, 50.0),
            ],
            Rgba::RED,
        );

        assert_eq!(fb.get_pixel(30, 40), Some(Rgba::WHITE));
    }

    #[test]
    fn test_stroke_polygon() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);

        stroke_polygon(
            &mut fb,
            &[
                Point::new(20.0, 20.0),
                Point::new(80.0, 20.0),
                Point::new(80.0, 80.0),
                Point::new(20.0, 80.0),
            ],
            Rgba::GREEN,
        );

        assert_eq!(fb.get_pixel(50, 20), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::WHITE));
    }
}
