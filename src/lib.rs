//! # Plotline
//!
//! A charting layer over a 2-D vector canvas: coordinate systems map
//! data space to plot space, composable plot elements draw into an
//! abstract [`canvas::Canvas`], and chart recipes assemble complete
//! figures (axes, grids, ticks, labels, data) from raw data.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plotline::charts::{bar_chart, ChartStyle};
//! use plotline::output::SvgCanvas;
//!
//! let categories = vec!["a".to_string(), "b".to_string(), "c".to_string()];
//! let plot = bar_chart(&categories, &[3.0, 1.0, 4.0], &ChartStyle::default())?;
//!
//! let mut canvas = SvgCanvas::new(800.0, 600.0).unique_tags();
//! plot.render(&mut canvas);
//! canvas.write_to_file("bars.svg")?;
//! ```
//!
//! ## Architecture
//!
//! - [`coords`]: the [`coords::CoordinateSystem`] trait and Cartesian
//!   implementations (linear, logarithmic, categorical axes).
//! - [`element`]: drawable units owning data plus a coordinate system
//!   reference, rendered in list order by an [`element::Plot`].
//! - [`charts`]: one-call recipes that compute ranges, derive axis
//!   furniture, and assemble ordered element lists.
//! - [`output`]: the SVG canvas backend and PNG encoding.

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Geometric primitives (points, lines, rectangles).
pub mod geometry;

/// Data-space to plot-space coordinate systems.
pub mod coords;

/// Value-to-color scales.
pub mod scale;

/// Statistical helpers (quantiles, binning, regression, smoothing).
pub mod stats;

/// Cell geometry for grid and Voronoi tessellations.
pub mod tessellate;

// ============================================================================
// Drawing Modules
// ============================================================================

/// The abstract drawing surface: paths, strokes, text, transforms.
pub mod canvas;

/// Pixel buffer for rasterized content.
pub mod framebuffer;

/// Raster drawing routines over the framebuffer.
pub mod render;

/// Plot elements and the ordered element list.
pub mod element;

/// Chart composition recipes.
pub mod charts;

/// Output backends (SVG canvas, PNG encoding).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for plotline operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use plotline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, Path, Stroke, TextAnchor, TextSpan};
    pub use crate::charts::{
        bar_chart, box_swarm_chart, clustered_bar_chart, distribution_chart, histogram,
        line_chart, scatter_chart, stacked_bar_chart, stacked_distribution_chart, ChartStyle,
        Palette,
    };
    pub use crate::color::{Hsla, Rgba};
    pub use crate::coords::{pad_range, Cartesian2D, CoordRef, CoordinateSystem};
    pub use crate::element::{
        Area, Axis, Bars, BoxMarks, ClusteredBars, Function2DGrid, Function2DRenderer, Grid,
        GridType, Label, LinePlot, Plot, PlotElement, RenderMode, ScatterPoints, Spline,
        StackedBars, Ticks, TrendLine, TrendModel,
    };
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Line, Point, Rect};
    pub use crate::output::{PngEncoder, SvgCanvas};
    pub use crate::scale::ColorScale;
}
