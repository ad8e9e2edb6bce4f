//! Scalar fields sampled on 2-D grids, and their renderer.
//!
//! A [`Function2DGrid`] holds scalar samples at data-space sites on a
//! rectangular, hexagonal, or irregular lattice. The renderer maps
//! values through a color scale and draws the field as point markers,
//! a cell tessellation, or a bilinearly resampled raster image.

use std::sync::Arc;

use crate::canvas::{Canvas, Path};
use crate::color::Rgba;
use crate::coords::CoordRef;
use crate::element::PlotElement;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::render::primitives;
use crate::scale::ColorScale;
use crate::tessellate;

/// Lattice arrangement of a sampled grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    /// Row-major rectangular lattice.
    Rectangular,
    /// Hexagonal lattice with odd rows shifted half a column.
    HexHorizontal,
    /// Hexagonal lattice with odd columns shifted half a row.
    HexVertical,
    /// No lattice structure; sites are arbitrary.
    Irregular,
}

/// Scalar samples at data-space sites.
#[derive(Debug, Clone)]
pub struct Function2DGrid {
    grid_type: GridType,
    sites: Vec<Point>,
    values: Vec<f64>,
    cols: usize,
    rows: usize,
}

impl Function2DGrid {
    /// Sample `f` on a rectangular lattice of cell centers.
    ///
    /// # Errors
    ///
    /// Fails when either dimension is zero.
    pub fn sample_rectangular(
        f: impl Fn(f64, f64) -> f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
        cols: usize,
        rows: usize,
    ) -> Result<Self> {
        Self::sample_lattice(f, x_range, y_range, cols, rows, GridType::Rectangular)
    }

    /// Sample `f` on a hexagonal lattice with horizontally offset rows.
    ///
    /// # Errors
    ///
    /// Fails when either dimension is zero.
    pub fn sample_hex_horizontal(
        f: impl Fn(f64, f64) -> f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
        cols: usize,
        rows: usize,
    ) -> Result<Self> {
        Self::sample_lattice(f, x_range, y_range, cols, rows, GridType::HexHorizontal)
    }

    /// Sample `f` on a hexagonal lattice with vertically offset columns.
    ///
    /// # Errors
    ///
    /// Fails when either dimension is zero.
    pub fn sample_hex_vertical(
        f: impl Fn(f64, f64) -> f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
        cols: usize,
        rows: usize,
    ) -> Result<Self> {
        Self::sample_lattice(f, x_range, y_range, cols, rows, GridType::HexVertical)
    }

    fn sample_lattice(
        f: impl Fn(f64, f64) -> f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
        cols: usize,
        rows: usize,
        grid_type: GridType,
    ) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions {
                width: cols as u32,
                height: rows as u32,
            });
        }
        let dx = (x_range.1 - x_range.0) / cols as f64;
        let dy = (y_range.1 - y_range.0) / rows as f64;
        let mut sites = Vec::with_capacity(cols * rows);
        let mut values = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            for c in 0..cols {
                let mut x = x_range.0 + (c as f64 + 0.5) * dx;
                let mut y = y_range.0 + (r as f64 + 0.5) * dy;
                match grid_type {
                    GridType::HexHorizontal if r % 2 == 1 => x += dx / 2.0,
                    GridType::HexVertical if c % 2 == 1 => y += dy / 2.0,
                    _ => {}
                }
                sites.push(Point::new(x, y));
                values.push(f(x, y));
            }
        }
        Ok(Self {
            grid_type,
            sites,
            values,
            cols,
            rows,
        })
    }

    /// Wrap arbitrary sites and values as an irregular grid.
    ///
    /// # Errors
    ///
    /// Fails on empty input or mismatched lengths.
    pub fn from_samples(sites: Vec<Point>, values: Vec<f64>) -> Result<Self> {
        if sites.is_empty() {
            return Err(Error::EmptyData);
        }
        if sites.len() != values.len() {
            return Err(Error::DataLengthMismatch {
                x_len: sites.len(),
                y_len: values.len(),
            });
        }
        Ok(Self {
            grid_type: GridType::Irregular,
            sites,
            values,
            cols: 0,
            rows: 0,
        })
    }

    /// Lattice arrangement.
    #[must_use]
    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    /// Sample sites in data space.
    #[must_use]
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Sample values, parallel to [`Self::sites`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(min, max)` over finite values; `(0, 1)` when none exist.
    #[must_use]
    pub fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in self.values.iter().filter(|v| v.is_finite()) {
            min = min.min(*v);
            max = max.max(*v);
        }
        if min > max {
            (0.0, 1.0)
        } else {
            (min, max)
        }
    }

    /// Lattice step sizes `(dx, dy)` between adjacent sites.
    fn steps(&self) -> (f64, f64) {
        let dx = if self.cols > 1 {
            self.sites[1].x - self.sites[0].x
        } else {
            1.0
        };
        let dy = if self.rows > 1 {
            self.sites[self.cols].y - self.sites[0].y
        } else {
            1.0
        };
        (dx, dy)
    }

    fn value_at(&self, r: usize, c: usize) -> f64 {
        self.values[r * self.cols + c]
    }

    /// Resample onto a rectangular lattice.
    ///
    /// Hexagonal grids double their offset axis; each new site either
    /// coincides with an original sample or averages its 2 to 4 nearest
    /// lattice neighbors.
    ///
    /// # Errors
    ///
    /// Irregular grids have no lattice to resample from and fail with
    /// [`Error::IrregularGrid`].
    pub fn to_rectangular(&self) -> Result<Self> {
        match self.grid_type {
            GridType::Rectangular => Ok(self.clone()),
            GridType::HexHorizontal => Ok(self.double_axis(true)),
            GridType::HexVertical => Ok(self.double_axis(false)),
            GridType::Irregular => Err(Error::IrregularGrid),
        }
    }

    /// Double the offset axis of a hex grid into a rectangular lattice.
    fn double_axis(&self, horizontal: bool) -> Self {
        let (dx, dy) = self.steps();
        let origin = self.sites[0];
        let (cols, rows) = if horizontal {
            (self.cols * 2, self.rows)
        } else {
            (self.cols, self.rows * 2)
        };

        let mut sites = Vec::with_capacity(cols * rows);
        let mut values = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            for c in 0..cols {
                let (x, y) = if horizontal {
                    (origin.x + c as f64 * dx / 2.0, origin.y + r as f64 * dy)
                } else {
                    (origin.x + c as f64 * dx, origin.y + r as f64 * dy / 2.0)
                };
                sites.push(Point::new(x, y));
                values.push(self.hex_resample(r, c, horizontal));
            }
        }
        Self {
            grid_type: GridType::Rectangular,
            sites,
            values,
            cols,
            rows,
        }
    }

    /// Value at half-lattice index `(r, c)` of the doubled grid: the
    /// original sample when the site coincides with one, otherwise the
    /// mean of the 2 to 4 in-bounds lattice neighbors.
    fn hex_resample(&self, r: usize, c: usize, horizontal: bool) -> f64 {
        // on the doubled axis, original row r holds samples at half-index
        // parity matching the row's hex offset
        let (fine, coarse, offset_parity) = if horizontal {
            (c, r, r % 2)
        } else {
            (r, c, c % 2)
        };
        if fine % 2 == offset_parity {
            let orig_fine = fine / 2;
            return if horizontal {
                self.value_at(coarse, orig_fine)
            } else {
                self.value_at(orig_fine, coarse)
            };
        }

        let coarse_len = if horizontal { self.rows } else { self.cols };
        let fine_len = if horizontal { self.cols } else { self.rows };
        let mut sum = 0.0;
        let mut count = 0usize;

        // same row/column: left and right lattice neighbors
        let lower = (fine as i64 - 1 - offset_parity as i64) / 2;
        for orig in [lower, lower + 1] {
            if orig >= 0 && (orig as usize) < fine_len {
                sum += self.lattice_value(coarse, orig as usize, horizontal);
                count += 1;
            }
        }
        // adjacent rows/columns are offset the other way and hold a
        // sample directly at this half-index
        for adj in [coarse as i64 - 1, coarse as i64 + 1] {
            if adj < 0 || adj as usize >= coarse_len {
                continue;
            }
            let adj_parity = (adj as usize) % 2;
            if fine % 2 == adj_parity {
                let orig = fine / 2;
                if orig < fine_len {
                    sum += self.lattice_value(adj as usize, orig, horizontal);
                    count += 1;
                }
            }
        }
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }

    fn lattice_value(&self, coarse: usize, fine: usize, horizontal: bool) -> f64 {
        if horizontal {
            self.value_at(coarse, fine)
        } else {
            self.value_at(fine, coarse)
        }
    }

    /// Bilinear value at data-space `(x, y)` on a rectangular grid;
    /// `None` outside the sampled region.
    fn bilinear(&self, x: f64, y: f64) -> Option<f64> {
        let (dx, dy) = self.steps();
        let origin = self.sites[0];
        let fc = (x - origin.x) / dx;
        let fr = (y - origin.y) / dy;
        if fc < 0.0 || fr < 0.0 {
            return None;
        }
        let c0 = fc.floor() as usize;
        let r0 = fr.floor() as usize;
        if c0 + 1 >= self.cols || r0 + 1 >= self.rows {
            // clamp the last row and column onto their samples
            if c0 >= self.cols || r0 >= self.rows {
                return None;
            }
            return Some(self.value_at(r0.min(self.rows - 1), c0.min(self.cols - 1)));
        }
        let tx = fc - c0 as f64;
        let ty = fr - r0 as f64;
        let v00 = self.value_at(r0, c0);
        let v01 = self.value_at(r0, c0 + 1);
        let v10 = self.value_at(r0 + 1, c0);
        let v11 = self.value_at(r0 + 1, c0 + 1);
        let top = v00 + (v01 - v00) * tx;
        let bottom = v10 + (v11 - v10) * tx;
        Some(top + (bottom - top) * ty)
    }

    /// Data-space bounding rect of the sampled cells.
    fn cell_bounds(&self) -> Rect {
        let (dx, dy) = self.steps();
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for s in &self.sites {
            min.x = min.x.min(s.x);
            min.y = min.y.min(s.y);
            max.x = max.x.max(s.x);
            max.y = max.y.max(s.y);
        }
        Rect::from_corners(
            Point::new(min.x - dx.abs() / 2.0, min.y - dy.abs() / 2.0),
            Point::new(max.x + dx.abs() / 2.0, max.y + dy.abs() / 2.0),
        )
    }
}

/// How a scalar field is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One colored marker per sample site.
    SampledPoints,
    /// One filled cell per sample: lattice cells on regular grids,
    /// Voronoi cells on irregular ones.
    Tessellation,
    /// Bilinearly resampled raster image. Requires a lattice.
    Raster,
}

/// Draws a [`Function2DGrid`] through a color scale.
#[derive(Debug, Clone)]
pub struct Function2DRenderer {
    coords: CoordRef,
    grid: Arc<Function2DGrid>,
    mode: RenderMode,
    scale: ColorScale,
    marker_radius: f64,
    tag: Option<String>,
}

impl Function2DRenderer {
    /// Create a renderer for `grid`.
    ///
    /// [`RenderMode::Raster`] needs a lattice for bilinear resampling;
    /// hex grids are resampled here, and irregular grids instead
    /// rasterize their Voronoi cells at draw time.
    #[must_use]
    pub fn new(coords: CoordRef, grid: Function2DGrid, mode: RenderMode) -> Self {
        let grid = if mode == RenderMode::Raster {
            match grid.to_rectangular() {
                Ok(rect) => rect,
                Err(_) => grid,
            }
        } else {
            grid
        };
        Self {
            coords,
            grid: Arc::new(grid),
            mode,
            scale: ColorScale::default(),
            marker_radius: 3.0,
            tag: None,
        }
    }

    /// Set the color scale.
    #[must_use]
    pub fn scale(mut self, scale: ColorScale) -> Self {
        self.scale = scale;
        self
    }

    /// Set the marker radius for [`RenderMode::SampledPoints`].
    #[must_use]
    pub fn marker_radius(mut self, radius: f64) -> Self {
        self.marker_radius = radius;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn color_for(&self, value: f64, range: (f64, f64)) -> Rgba {
        let span = range.1 - range.0;
        let t = if span > 0.0 {
            (value - range.0) / span
        } else {
            0.5
        };
        self.scale.sample(t)
    }

    fn plot_markers(&self, canvas: &mut dyn Canvas) {
        let range = self.grid.value_range();
        for (site, value) in self.grid.sites().iter().zip(self.grid.values()) {
            let center = self.coords.to_plot(&[site.x, site.y]);
            if center.is_nan() || !value.is_finite() {
                continue;
            }
            let path = Path::circle(center, self.marker_radius);
            canvas.fill_path(&path, self.color_for(*value, range), self.tag.as_deref());
        }
    }

    /// Data-space cell polygon around sample `i`, lattice-shaped where a
    /// lattice exists.
    fn cell(&self, i: usize) -> Vec<Point> {
        let site = self.grid.sites()[i];
        let (dx, dy) = self.grid.steps();
        match self.grid.grid_type() {
            GridType::Rectangular => tessellate::rect_cell(site, dx.abs(), dy.abs()),
            // hex cells circumscribe the lattice spacing so rows interlock
            GridType::HexHorizontal => {
                tessellate::hex_cell(site, dx.abs() / 2.0 * 2.0 / 3.0_f64.sqrt(), dy.abs() / 1.5, true)
            }
            GridType::HexVertical => {
                tessellate::hex_cell(site, dx.abs() / 1.5, dy.abs() / 2.0 * 2.0 / 3.0_f64.sqrt(), false)
            }
            GridType::Irregular => {
                let bounds = self.grid.cell_bounds();
                tessellate::voronoi_cell(self.grid.sites(), i, bounds)
            }
        }
    }

    fn plot_cells(&self, canvas: &mut dyn Canvas) {
        let range = self.grid.value_range();
        for (i, value) in self.grid.values().iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let cell = self.cell(i);
            if cell.len() < 3 {
                continue;
            }
            let plot_cell: Vec<Point> = cell
                .iter()
                .map(|v| self.coords.to_plot(&[v.x, v.y]))
                .collect();
            if plot_cell.iter().any(|p| p.is_nan()) {
                continue;
            }
            canvas.fill_path(
                &Path::polygon(&plot_cell),
                self.color_for(*value, range),
                self.tag.as_deref(),
            );
        }
    }

    /// Plot-space rect covering the grid's cells, normalized so width
    /// and height stay positive under the Y-flipped plot mapping.
    fn blit_rect(&self) -> Option<Rect> {
        let bounds = self.grid.cell_bounds();
        let a = self.coords.to_plot(&[bounds.x, bounds.y]);
        let b = self
            .coords
            .to_plot(&[bounds.x + bounds.width, bounds.y + bounds.height]);
        if a.is_nan() || b.is_nan() {
            return None;
        }
        Some(Rect::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        ))
    }

    fn plot_raster(&self, canvas: &mut dyn Canvas) {
        let Some(target) = self.blit_rect() else {
            return;
        };
        let width = target.width.ceil().max(1.0) as u32;
        let height = target.height.ceil().max(1.0) as u32;
        let Ok(mut image) = Framebuffer::new(width, height) else {
            return;
        };

        let range = self.grid.value_range();
        for py in 0..height {
            for px in 0..width {
                let plot = Point::new(
                    target.x + (f64::from(px) + 0.5) / f64::from(width) * target.width,
                    target.y + (f64::from(py) + 0.5) / f64::from(height) * target.height,
                );
                let Some(data) = self.coords.to_data(plot) else {
                    continue;
                };
                let Some(value) = self.grid.bilinear(data[0], data[1]) else {
                    continue;
                };
                if !value.is_finite() {
                    continue;
                }
                image.set_pixel(px, py, self.color_for(value, range));
            }
        }
        canvas.draw_image(target, &image, self.tag.as_deref());
    }

    /// Raster mode on an irregular grid: scanline-fill the Voronoi cells
    /// into a framebuffer, then blit the result as one image.
    fn plot_raster_cells(&self, canvas: &mut dyn Canvas) {
        let Some(target) = self.blit_rect() else {
            return;
        };
        let width = target.width.ceil().max(1.0) as u32;
        let height = target.height.ceil().max(1.0) as u32;
        let Ok(mut image) = Framebuffer::new(width, height) else {
            return;
        };

        let range = self.grid.value_range();
        for (i, value) in self.grid.values().iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let cell = self.cell(i);
            if cell.len() < 3 {
                continue;
            }
            let pixels: Vec<Point> = cell
                .iter()
                .map(|v| {
                    let p = self.coords.to_plot(&[v.x, v.y]);
                    Point::new(
                        (p.x - target.x) / target.width * f64::from(width),
                        (p.y - target.y) / target.height * f64::from(height),
                    )
                })
                .collect();
            if pixels.iter().any(|p| p.is_nan()) {
                continue;
            }
            let color = self.color_for(*value, range);
            primitives::fill_polygon(&mut image, &pixels, color);
            // outline in the same color to close seams between cells
            primitives::stroke_polygon(&mut image, &pixels, color);
        }
        canvas.draw_image(target, &image, self.tag.as_deref());
    }
}

impl PlotElement for Function2DRenderer {
    fn plot(&self, canvas: &mut dyn Canvas) {
        match self.mode {
            RenderMode::SampledPoints => self.plot_markers(canvas),
            RenderMode::Tessellation => self.plot_cells(canvas),
            // no lattice means no bilinear lookup; rasterize the cells
            RenderMode::Raster if self.grid.grid_type() == GridType::Irregular => {
                self.plot_raster_cells(canvas);
            }
            RenderMode::Raster => self.plot_raster(canvas),
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

    fn coords() -> CoordRef {
        Arc::new(Cartesian2D::linear(0.0, 10.0, 0.0, 10.0, 100.0, 100.0).unwrap())
    }

    /// Records the rect and framebuffer dimensions handed to `draw_image`.
    #[derive(Default)]
    struct BlitRecorder {
        target: Option<Rect>,
        dims: Option<(u32, u32)>,
    }

    impl Canvas for BlitRecorder {
        fn size(&self) -> (f64, f64) {
            (100.0, 100.0)
        }
        fn fill_path(&mut self, _path: &Path, _fill: Rgba, _tag: Option<&str>) {}
        fn stroke_path(
            &mut self,
            _path: &Path,
            _stroke: &crate::canvas::Stroke,
            _tag: Option<&str>,
        ) {
        }
        fn fill_text(&mut self, _span: &crate::canvas::TextSpan, _tag: Option<&str>) {}
        fn draw_image(&mut self, rect: Rect, image: &Framebuffer, _tag: Option<&str>) {
            self.target = Some(rect);
            self.dims = Some((image.width(), image.height()));
        }
        fn save(&mut self) {}
        fn restore(&mut self) {}
        fn translate(&mut self, _dx: f64, _dy: f64) {}
        fn scale(&mut self, _sx: f64, _sy: f64) {}
        fn rotate(&mut self, _angle: f64) {}
        fn clip_rect(&mut self, _rect: Rect) {}
    }

    #[test]
    fn test_rectangular_sampling_centers() {
        let grid = Function2DGrid::sample_rectangular(
            |x, y| x + y,
            (0.0, 10.0),
            (0.0, 10.0),
            5,
            5,
        )
        .unwrap();
        assert_eq!(grid.sites().len(), 25);
        // first cell center at (1, 1)
        assert_relative_eq!(grid.sites()[0].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(grid.sites()[0].y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(grid.values()[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hex_rows_are_offset() {
        let grid = Function2DGrid::sample_hex_horizontal(
            |_, _| 0.0,
            (0.0, 10.0),
            (0.0, 10.0),
            5,
            4,
        )
        .unwrap();
        let row0 = grid.sites()[0].x;
        let row1 = grid.sites()[5].x;
        assert_relative_eq!(row1 - row0, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let r = Function2DGrid::sample_rectangular(|_, _| 0.0, (0.0, 1.0), (0.0, 1.0), 0, 4);
        assert!(r.is_err());
    }

    #[test]
    fn test_value_range_skips_nonfinite() {
        let grid = Function2DGrid::from_samples(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
            vec![3.0, f64::NAN, 7.0],
        )
        .unwrap();
        assert_eq!(grid.value_range(), (3.0, 7.0));
    }

    #[test]
    fn test_to_rectangular_identity() {
        let grid = Function2DGrid::sample_rectangular(
            |x, y| x * y,
            (0.0, 4.0),
            (0.0, 4.0),
            4,
            4,
        )
        .unwrap();
        let rect = grid.to_rectangular().unwrap();
        assert_eq!(rect.sites().len(), 16);
        assert_eq!(rect.values(), grid.values());
    }

    #[test]
    fn test_to_rectangular_doubles_hex_axis() {
        let grid = Function2DGrid::sample_hex_horizontal(
            |x, _| x,
            (0.0, 8.0),
            (0.0, 4.0),
            4,
            4,
        )
        .unwrap();
        let rect = grid.to_rectangular().unwrap();
        assert_eq!(rect.grid_type(), GridType::Rectangular);
        assert_eq!(rect.sites().len(), 32);
        // sites coinciding with originals keep their values exactly
        assert_relative_eq!(rect.values()[0], grid.values()[0], epsilon = 1e-9);
    }

    #[test]
    fn test_hex_resample_averages_neighbors() {
        // constant field stays constant through resampling
        let grid = Function2DGrid::sample_hex_horizontal(
            |_, _| 5.0,
            (0.0, 8.0),
            (0.0, 4.0),
            4,
            4,
        )
        .unwrap();
        let rect = grid.to_rectangular().unwrap();
        for v in rect.values() {
            assert_relative_eq!(*v, 5.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_irregular_to_rectangular_fails() {
        let grid = Function2DGrid::from_samples(
            vec![Point::new(0.0, 0.0), Point::new(3.0, 1.0)],
            vec![1.0, 2.0],
        )
        .unwrap();
        assert!(matches!(grid.to_rectangular(), Err(Error::IrregularGrid)));
    }

    #[test]
    fn test_raster_mode_falls_back_on_irregular() {
        let grid = Function2DGrid::from_samples(
            vec![Point::new(2.0, 2.0), Point::new(8.0, 3.0)],
            vec![1.0, 2.0],
        )
        .unwrap();
        let renderer = Function2DRenderer::new(coords(), grid, RenderMode::Raster);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        renderer.plot(&mut canvas);
        // rasterizes voronoi cells and blits one image
        assert!(canvas.bounds().is_some());
    }

    #[test]
    fn test_raster_blit_covers_grid_with_positive_extent() {
        // full-range grid: the blit must span the whole plot, with the
        // rect normalized despite the Y-flipped mapping
        let grid = Function2DGrid::sample_rectangular(
            |x, y| x + y,
            (0.0, 10.0),
            (0.0, 10.0),
            10,
            10,
        )
        .unwrap();
        let renderer = Function2DRenderer::new(coords(), grid, RenderMode::Raster);
        let mut canvas = BlitRecorder::default();
        renderer.plot(&mut canvas);

        let rect = canvas.target.unwrap();
        assert_relative_eq!(rect.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rect.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rect.width, 100.0, epsilon = 1e-9);
        assert_relative_eq!(rect.height, 100.0, epsilon = 1e-9);
        assert_eq!(canvas.dims, Some((100, 100)));
    }

    #[test]
    fn test_irregular_raster_blit_has_positive_extent() {
        let grid = Function2DGrid::from_samples(
            vec![
                Point::new(2.0, 2.0),
                Point::new(8.0, 3.0),
                Point::new(5.0, 8.0),
            ],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap();
        let renderer = Function2DRenderer::new(coords(), grid, RenderMode::Raster);
        let mut canvas = BlitRecorder::default();
        renderer.plot(&mut canvas);

        let rect = canvas.target.unwrap();
        assert!(rect.width > 0.0 && rect.height > 0.0);
        let (w, h) = canvas.dims.unwrap();
        assert!(w > 1 && h > 1);
    }

    #[test]
    fn test_bilinear_interpolates_midpoints() {
        let grid = Function2DGrid::sample_rectangular(
            |x, _| x,
            (0.0, 4.0),
            (0.0, 4.0),
            4,
            4,
        )
        .unwrap();
        // halfway between cell centers at x = 0.5 and x = 1.5
        let v = grid.bilinear(1.0, 1.0).unwrap();
        assert_relative_eq!(v, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bilinear_outside_is_none() {
        let grid = Function2DGrid::sample_rectangular(
            |x, _| x,
            (0.0, 4.0),
            (0.0, 4.0),
            4,
            4,
        )
        .unwrap();
        assert!(grid.bilinear(-1.0, 1.0).is_none());
    }

    #[test]
    fn test_sampled_points_draw() {
        let grid = Function2DGrid::sample_rectangular(
            |x, y| x - y,
            (0.0, 10.0),
            (0.0, 10.0),
            3,
            3,
        )
        .unwrap();
        let renderer =
            Function2DRenderer::new(coords(), grid, RenderMode::SampledPoints);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        renderer.plot(&mut canvas);
        assert!(canvas.bounds().is_some());
    }

    #[test]
    fn test_tessellation_covers_grid() {
        let grid = Function2DGrid::sample_rectangular(
            |x, y| x * y,
            (0.0, 10.0),
            (0.0, 10.0),
            5,
            5,
        )
        .unwrap();
        let renderer =
            Function2DRenderer::new(coords(), grid, RenderMode::Tessellation);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        renderer.plot(&mut canvas);
        let b = canvas.bounds().unwrap();
        assert_relative_eq!(b.width, 100.0, epsilon = 1e-9);
        assert_relative_eq!(b.height, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_voronoi_tessellation_for_irregular() {
        let grid = Function2DGrid::from_samples(
            vec![
                Point::new(2.0, 2.0),
                Point::new(8.0, 3.0),
                Point::new(5.0, 8.0),
            ],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap();
        let renderer =
            Function2DRenderer::new(coords(), grid, RenderMode::Tessellation);
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        renderer.plot(&mut canvas);
        assert!(canvas.bounds().is_some());
    }
}
