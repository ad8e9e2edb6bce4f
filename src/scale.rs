//! Color scales for value-to-color mappings.
//!
//! The scalar-field renderer colors samples through a function from a
//! normalized value in `[0, 1]` to a color; [`ColorScale`] is the stock
//! implementation: a piecewise-linear gradient over a list of stops.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Piecewise-linear gradient over equally spaced color stops.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
}

impl ColorScale {
    /// Create a new color scale from equally spaced stops.
    ///
    /// # Errors
    ///
    /// Returns an error if `colors` is empty.
    pub fn new(colors: Vec<Rgba>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::Rendering(
                "color scale requires at least one color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Sample the gradient at `t` in `[0, 1]` (clamped).
    #[must_use]
    pub fn sample(&self, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f64).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f64 - segment as f64;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    /// Sequential blue scale.
    #[must_use]
    pub fn blues() -> Self {
        Self {
            colors: vec![
                Rgba::rgb(247, 251, 255),
                Rgba::rgb(198, 219, 239),
                Rgba::rgb(107, 174, 214),
                Rgba::rgb(33, 113, 181),
                Rgba::rgb(8, 48, 107),
            ],
        }
    }

    /// Viridis scale (perceptually uniform).
    #[must_use]
    pub fn viridis() -> Self {
        Self {
            colors: vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
        }
    }

    /// Heat scale (black-red-yellow-white).
    #[must_use]
    pub fn heat() -> Self {
        Self {
            colors: vec![
                Rgba::rgb(0, 0, 0),
                Rgba::rgb(128, 0, 0),
                Rgba::rgb(255, 0, 0),
                Rgba::rgb(255, 128, 0),
                Rgba::rgb(255, 255, 0),
                Rgba::rgb(255, 255, 255),
            ],
        }
    }

    /// Greyscale.
    #[must_use]
    pub fn greyscale() -> Self {
        Self {
            colors: vec![Rgba::BLACK, Rgba::WHITE],
        }
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::viridis()
    }
}
