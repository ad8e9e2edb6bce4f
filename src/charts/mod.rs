//! Ready-made chart recipes.
//!
//! Every recipe follows one template: fit a coordinate system to the
//! data with the 10% padding convention, derive axis and grid anchor
//! points by round-tripping a fixed plot-space stroke margin back into
//! data space, measure labels on a throwaway canvas to place titles,
//! and assemble everything in a fixed draw order with the grid at the
//! bottom and the chart title on top.

use std::sync::Arc;

use crate::canvas::{BoundsCanvas, TextAnchor};
use crate::color::Rgba;
use crate::coords::{Cartesian2D, CoordRef};
use crate::element::{Axis, Grid, Label, Plot, PlotElement, Ticks};
use crate::geometry::Point;

pub mod bars;
pub mod box_swarm;
pub mod distribution;
pub mod histogram;
pub mod line;

pub use bars::{bar_chart, clustered_bar_chart, stacked_bar_chart};
pub use box_swarm::box_swarm_chart;
pub use distribution::{distribution_chart, stacked_distribution_chart};
pub use histogram::{histogram, histogram_bins, HistogramBins};
pub use line::{line_chart, scatter_chart};

/// Plot-space distance between the data rectangle and chart furniture.
pub(crate) const STROKE_MARGIN: f64 = 10.0;

/// Default number of tick intervals per axis.
pub(crate) const TICK_INTERVALS: usize = 5;

/// Shared color table for all recipes.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Fill colors for data series, cycled.
    pub series: Vec<Rgba>,
    /// Axis and tick stroke color.
    pub axis: Rgba,
    /// Grid line color.
    pub grid: Rgba,
    /// Label and title text color.
    pub text: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            series: vec![
                Rgba::rgb(70, 130, 180),
                Rgba::rgb(255, 160, 64),
                Rgba::rgb(90, 170, 90),
                Rgba::rgb(200, 90, 90),
                Rgba::rgb(150, 110, 190),
                Rgba::rgb(120, 120, 120),
            ],
            axis: Rgba::BLACK,
            grid: Rgba::rgb(200, 200, 200),
            text: Rgba::BLACK,
        }
    }
}

/// Recipe appearance and sizing options.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Plot-space width of the data rectangle.
    pub width: f64,
    /// Plot-space height of the data rectangle.
    pub height: f64,
    /// Chart title, drawn on top of everything.
    pub title: Option<String>,
    /// Horizontal axis title.
    pub x_title: Option<String>,
    /// Vertical axis title, drawn rotated.
    pub y_title: Option<String>,
    /// Color table.
    pub palette: Palette,
}

impl ChartStyle {
    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the horizontal axis title.
    #[must_use]
    pub fn x_title(mut self, title: impl Into<String>) -> Self {
        self.x_title = Some(title.into());
        self
    }

    /// Set the vertical axis title.
    #[must_use]
    pub fn y_title(mut self, title: impl Into<String>) -> Self {
        self.y_title = Some(title.into());
        self
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: None,
            x_title: None,
            y_title: None,
            palette: Palette::default(),
        }
    }
}

/// The eight data-space anchor points of the chart frame: the plot
/// rectangle's corners pushed [`STROKE_MARGIN`] plot units outward on
/// one axis at a time, round-tripped back into data space.
///
/// Anchoring furniture at these points keeps axis and grid lines a
/// constant pixel distance outside the data extent no matter how the
/// coordinate system curves.
#[derive(Debug, Clone)]
pub(crate) struct MarginFrame {
    pub(crate) bottom_left: Vec<f64>,
    pub(crate) bottom_right: Vec<f64>,
    pub(crate) left_bottom: Vec<f64>,
    pub(crate) left_top: Vec<f64>,
    pub(crate) top_left: Vec<f64>,
    pub(crate) top_right: Vec<f64>,
    pub(crate) right_bottom: Vec<f64>,
    pub(crate) right_top: Vec<f64>,
}

impl MarginFrame {
    /// Round-trip the expanded plot rectangle through the inverse
    /// mapping; `None` when the system is not invertible there.
    pub(crate) fn derive(coords: &CoordRef) -> Option<Self> {
        let (w, h) = coords.plot_size();
        let m = STROKE_MARGIN;
        let at = |x: f64, y: f64| coords.to_data(Point::new(x, y));
        Some(Self {
            bottom_left: at(0.0, h + m)?,
            bottom_right: at(w, h + m)?,
            left_bottom: at(-m, h)?,
            left_top: at(-m, 0.0)?,
            top_left: at(0.0, -m)?,
            top_right: at(w, -m)?,
            right_bottom: at(w + m, h)?,
            right_top: at(w + m, 0.0)?,
        })
    }
}

/// Evenly spaced tick values across `[min, max]`, geometric on log axes.
pub(crate) fn tick_values(min: f64, max: f64, log: bool) -> Vec<f64> {
    (0..=TICK_INTERVALS)
        .map(|i| {
            let t = i as f64 / TICK_INTERVALS as f64;
            if log {
                (min.ln() + t * (max.ln() - min.ln())).exp()
            } else {
                min + t * (max - min)
            }
        })
        .collect()
}

/// Category subsampling step so at most [`TICK_INTERVALS`] + 1 labels
/// are drawn.
pub(crate) fn category_step(count: usize) -> usize {
    count.div_ceil(TICK_INTERVALS).max(1)
}

/// Compact numeric formatting for tick labels.
pub(crate) fn format_value(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if a >= 1e6 || a < 1e-3 {
        format!("{v:.2e}")
    } else if (v - v.round()).abs() < 1e-9 * a.max(1.0) {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Bounding box of a set of labels, measured by drawing them onto a
/// throwaway canvas and reading the recorded bounds back.
fn measure_labels(labels: &[Label], coords: &CoordRef) -> Option<crate::geometry::Rect> {
    let (w, h) = coords.plot_size();
    let mut canvas = BoundsCanvas::new(w, h);
    for label in labels {
        label.plot(&mut canvas);
    }
    canvas.bounds()
}

/// Tick positions and labels along one axis.
pub(crate) struct AxisTicks {
    /// `(data value on this axis, label text)` pairs.
    pub(crate) ticks: Vec<(f64, String)>,
}

impl AxisTicks {
    pub(crate) fn numeric(min: f64, max: f64, log: bool) -> Self {
        Self {
            ticks: tick_values(min, max, log)
                .into_iter()
                .map(|v| (v, format_value(v)))
                .collect(),
        }
    }

    pub(crate) fn categories(labels: &[String]) -> Self {
        let step = category_step(labels.len());
        Self {
            ticks: labels
                .iter()
                .enumerate()
                .step_by(step)
                .map(|(i, l)| (i as f64, l.clone()))
                .collect(),
        }
    }
}

/// Assemble the full chart: grid, axes, ticks, labels, titles, the data
/// elements, then the chart title, in that fixed order.
pub(crate) fn assemble(
    coords: &Arc<Cartesian2D>,
    style: &ChartStyle,
    x_ticks: &AxisTicks,
    y_ticks: &AxisTicks,
    data: Vec<Box<dyn PlotElement>>,
) -> Plot {
    let coords: CoordRef = coords.clone();
    let mut plot = Plot::new();
    let palette = &style.palette;

    let Some(frame) = MarginFrame::derive(&coords) else {
        // non-invertible system: render the data without furniture
        for element in data {
            plot.push(element);
        }
        return plot;
    };
    let (y_lo, y_hi) = (frame.left_bottom[1], frame.left_top[1]);
    let (x_lo, x_hi) = (frame.bottom_left[0], frame.bottom_right[0]);

    // grid spans the data rectangle at every tick position
    let mut grid_lines = Vec::new();
    for (x, _) in &x_ticks.ticks {
        grid_lines.push((vec![*x, y_lo], vec![*x, y_hi]));
    }
    for (y, _) in &y_ticks.ticks {
        grid_lines.push((vec![x_lo, *y], vec![x_hi, *y]));
    }
    plot.push(Box::new(
        Grid::new(coords.clone(), grid_lines)
            .stroke(crate::canvas::Stroke::new(palette.grid, 0.5))
            .tagged("grid"),
    ));

    let axis_stroke = crate::canvas::Stroke::new(palette.axis, 1.0);
    plot.push(Box::new(
        Axis::new(coords.clone(), frame.bottom_left.clone(), frame.bottom_right.clone())
            .stroke(axis_stroke.clone())
            .tagged("axis"),
    ));
    plot.push(Box::new(
        Axis::new(coords.clone(), frame.left_bottom.clone(), frame.left_top.clone())
            .stroke(axis_stroke.clone())
            .tagged("axis"),
    ));

    // ticks sit on the margin lines, extending outward in plot space
    let x_tick_points: Vec<Vec<f64>> = x_ticks
        .ticks
        .iter()
        .map(|(x, _)| vec![*x, frame.bottom_left[1]])
        .collect();
    let y_tick_points: Vec<Vec<f64>> = y_ticks
        .ticks
        .iter()
        .map(|(y, _)| vec![frame.left_bottom[0], *y])
        .collect();
    plot.push(Box::new(
        Ticks::new(coords.clone(), x_tick_points, Point::new(0.0, 1.0))
            .stroke(axis_stroke.clone())
            .tagged("tick"),
    ));
    plot.push(Box::new(
        Ticks::new(coords.clone(), y_tick_points, Point::new(-1.0, 0.0))
            .stroke(axis_stroke)
            .tagged("tick"),
    ));

    let mut x_labels = Vec::new();
    for (x, text) in &x_ticks.ticks {
        x_labels.push(
            Label::new(coords.clone(), vec![*x, frame.bottom_left[1]], text.clone())
                .offset(Point::new(0.0, 18.0))
                .colored(palette.text)
                .tagged("tick-label"),
        );
    }
    let mut y_labels = Vec::new();
    for (y, text) in &y_ticks.ticks {
        y_labels.push(
            Label::new(coords.clone(), vec![frame.left_bottom[0], *y], text.clone())
                .offset(Point::new(-8.0, 4.0))
                .anchored(TextAnchor::End)
                .colored(palette.text)
                .tagged("tick-label"),
        );
    }
    let x_label_bounds = measure_labels(&x_labels, &coords);
    let y_label_bounds = measure_labels(&y_labels, &coords);
    for label in x_labels.into_iter().chain(y_labels) {
        plot.push(Box::new(label));
    }

    // axis titles clear the measured tick labels
    let (w, h) = coords.plot_size();
    if let Some(text) = &style.x_title {
        let below = x_label_bounds.map_or(h + STROKE_MARGIN + 18.0, |b| b.y + b.height);
        let anchor = coords.to_plot(&[x_lo, y_lo]);
        plot.push(Box::new(
            Label::new(coords.clone(), vec![x_lo, y_lo], text.clone())
                .offset(Point::new(w / 2.0 - anchor.x, below + 20.0 - anchor.y))
                .colored(palette.text)
                .tagged("axis-title"),
        ));
    }
    if let Some(text) = &style.y_title {
        let beside = y_label_bounds.map_or(-STROKE_MARGIN - 24.0, |b| b.x);
        let anchor = coords.to_plot(&[x_lo, y_lo]);
        plot.push(Box::new(
            Label::new(coords.clone(), vec![x_lo, y_lo], text.clone())
                .offset(Point::new(beside - 12.0 - anchor.x, h / 2.0 - anchor.y))
                .rotated(-std::f64::consts::FRAC_PI_2)
                .colored(palette.text)
                .tagged("axis-title"),
        ));
    }

    for element in data {
        plot.push(element);
    }

    if let Some(text) = &style.title {
        let anchor = coords.to_plot(&[x_lo, y_hi]);
        plot.push(Box::new(
            Label::new(coords.clone(), vec![x_lo, y_hi], text.clone())
                .offset(Point::new(w / 2.0 - anchor.x, -STROKE_MARGIN - 8.0 - anchor.y))
                .size(16.0)
                .colored(palette.text)
                .tagged("title"),
        ));
    }
    plot
}
