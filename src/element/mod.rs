//! Drawable plot elements.
//!
//! Every chart decomposes into a flat, ordered list of elements; each
//! element owns its data, a coordinate system handle, and presentation
//! attributes, and draws itself statelessly against any [`Canvas`].

use crate::canvas::Canvas;
use crate::coords::CoordRef;

pub mod axis;
pub mod bars;
pub mod field;
pub mod line;
pub mod trend;

pub use axis::{Axis, Grid, Label, Ticks};
pub use bars::{Bars, ClusteredBars, StackedBars};
pub use field::{Function2DGrid, Function2DRenderer, GridType, RenderMode};
pub use line::{Area, BoxMarks, LinePlot, ScatterPoints, Spline};
pub use trend::{TrendLine, TrendModel};

/// A drawable unit of a chart.
///
/// Elements are configured fluently at construction time, then drawn any
/// number of times; `plot` must not mutate the element. An element that
/// changes the canvas transform restores it before returning.
pub trait PlotElement {
    /// Draw the element onto the canvas.
    fn plot(&self, canvas: &mut dyn Canvas);

    /// The coordinate system used by this element.
    fn coordinates(&self) -> &CoordRef;

    /// Optional tag propagated to the canvas for interactive output.
    fn tag(&self) -> Option<&str> {
        None
    }
}

/// An ordered, append/remove-only list of plot elements.
///
/// Rendering walks the list front to back: elements added later draw on
/// top of earlier ones. Chart recipes rely on this for their fixed
/// grid-under-axes-under-data-under-title stacking.
#[derive(Default)]
pub struct Plot {
    elements: Vec<Box<dyn PlotElement>>,
}

impl Plot {
    /// Create an empty plot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element; it will draw on top of everything added so far.
    pub fn push(&mut self, element: Box<dyn PlotElement>) {
        self.elements.push(element);
    }

    /// Remove the element at `index`, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Box<dyn PlotElement> {
        self.elements.remove(index)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the plot holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate the elements in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn PlotElement> {
        self.elements.iter().map(AsRef::as_ref)
    }

    /// Render every element in order onto the canvas.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for element in &self.elements {
            element.plot(canvas);
        }
    }
}

impl std::fmt::Debug for Plot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plot")
            .field("elements", &self.elements.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BoundsCanvas, Path, Stroke};
    use crate::color::Rgba;
    use crate::coords::Cartesian2D;
    use crate::geometry::Point;
    use std::sync::Arc;

    struct Dot {
        coords: CoordRef,
        at: Point,
    }

    impl PlotElement for Dot {
        fn plot(&self, canvas: &mut dyn Canvas) {
            canvas.stroke_path(
                &Path::polyline(&[self.at, self.at + Point::new(1.0, 0.0)]),
                &Stroke::new(Rgba::BLACK, 1.0),
                None,
            );
        }

        fn coordinates(&self) -> &CoordRef {
            &self.coords
        }
    }

    fn coords() -> CoordRef {
        Arc::new(Cartesian2D::linear(0.0, 10.0, 0.0, 10.0, 100.0, 100.0).unwrap())
    }

    #[test]
    fn test_plot_ordering() {
        let mut plot = Plot::new();
        plot.push(Box::new(Dot {
            coords: coords(),
            at: Point::new(1.0, 1.0),
        }));
        plot.push(Box::new(Dot {
            coords: coords(),
            at: Point::new(2.0, 2.0),
        }));
        assert_eq!(plot.len(), 2);

        let removed = plot.remove(0);
        assert_eq!(plot.len(), 1);
        let _ = removed;
    }

    #[test]
    fn test_plot_render_visits_all() {
        let mut plot = Plot::new();
        for i in 0..3 {
            plot.push(Box::new(Dot {
                coords: coords(),
                at: Point::new(f64::from(i) * 10.0, 0.0),
            }));
        }
        let mut canvas = BoundsCanvas::new(100.0, 100.0);
        plot.render(&mut canvas);
        let b = canvas.bounds().unwrap();
        assert!(b.width >= 20.0);
    }
}
