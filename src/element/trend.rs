//! Fitted trend lines over scattered data.
//!
//! A trend line fits a model to the data at construction time, so bad
//! fits fail fast, then draws the fitted curve across the coordinate
//! system's visible extent. Sampling is uniform in plot space, which
//! keeps the curve smooth on logarithmic axes, and the curve is clipped
//! to the vertical extent with bisection at the crossings. A curve
//! that meets the window boundary at anything other than exactly two
//! points is degenerate and draws nothing.

use crate::canvas::{Canvas, Path, Stroke};
use crate::color::Rgba;
use crate::coords::CoordRef;
use crate::element::line::trace_runs;
use crate::element::PlotElement;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::stats;

/// Trend model to fit.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendModel {
    /// `y = a + b·x`.
    Linear,
    /// `y = a·e^(b·x)`. With a fixed intercept `a`, only the rate is
    /// fitted; the intercept must be positive.
    Exponential {
        /// Fixed intercept, or `None` to fit it.
        intercept: Option<f64>,
    },
    /// `y = a + b·ln(x)`.
    Logarithmic,
    /// `y = a·x^b`.
    Power,
    /// Polynomial of the given degree, least-squares fitted.
    Polynomial {
        /// Polynomial degree.
        degree: usize,
    },
    /// Centered moving average over the given window.
    MovingAverage {
        /// Window width in points.
        window: usize,
    },
}

/// The result of fitting a model.
#[derive(Debug, Clone)]
enum Fitted {
    Linear { intercept: f64, slope: f64 },
    Exponential { scale: f64, rate: f64 },
    Logarithmic { intercept: f64, slope: f64 },
    Power { scale: f64, exponent: f64 },
    Polynomial { coefficients: Vec<f64> },
    Averaged { points: Vec<Vec<f64>> },
}

impl Fitted {
    /// Evaluate the fitted function; NaN outside its domain.
    fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Linear { intercept, slope } => intercept + slope * x,
            Self::Exponential { scale, rate } => scale * (rate * x).exp(),
            Self::Logarithmic { intercept, slope } => {
                if x <= 0.0 {
                    f64::NAN
                } else {
                    intercept + slope * x.ln()
                }
            }
            Self::Power { scale, exponent } => {
                if x <= 0.0 {
                    f64::NAN
                } else {
                    scale * x.powf(*exponent)
                }
            }
            Self::Polynomial { coefficients } => {
                // Horner, coefficients stored lowest-order first
                coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
            }
            Self::Averaged { .. } => f64::NAN,
        }
    }
}

fn fit(model: &TrendModel, points: &[Vec<f64>]) -> Result<Fitted> {
    if points.is_empty() {
        return Err(Error::EmptyData);
    }
    let mut sorted: Vec<(f64, f64)> = points.iter().map(|p| (p[0], p[1])).collect();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let xs: Vec<f64> = sorted.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = sorted.iter().map(|p| p.1).collect();

    match model {
        TrendModel::Linear => {
            let (intercept, slope) = stats::linear_fit(&xs, &ys)?;
            Ok(Fitted::Linear { intercept, slope })
        }
        TrendModel::Exponential { intercept } => {
            if let Some(a) = intercept {
                if *a <= 0.0 {
                    return Err(Error::Regression(format!(
                        "exponential intercept must be positive, got {a}"
                    )));
                }
            }
            if ys.iter().any(|y| *y <= 0.0) {
                return Err(Error::Regression(
                    "exponential fit requires positive values".into(),
                ));
            }
            match intercept {
                Some(a) => {
                    // slope-only fit through the fixed intercept
                    let num: f64 = xs.iter().zip(&ys).map(|(x, y)| x * (y / a).ln()).sum();
                    let den: f64 = xs.iter().map(|x| x * x).sum();
                    if den == 0.0 {
                        return Err(Error::Regression(
                            "exponential fit needs nonzero lateral spread".into(),
                        ));
                    }
                    Ok(Fitted::Exponential {
                        scale: *a,
                        rate: num / den,
                    })
                }
                None => {
                    let log_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
                    let (a, b) = stats::linear_fit(&xs, &log_ys)?;
                    Ok(Fitted::Exponential {
                        scale: a.exp(),
                        rate: b,
                    })
                }
            }
        }
        TrendModel::Logarithmic => {
            if xs.iter().any(|x| *x <= 0.0) {
                return Err(Error::Regression(
                    "logarithmic fit requires positive lateral values".into(),
                ));
            }
            let log_xs: Vec<f64> = xs.iter().map(|x| x.ln()).collect();
            let (intercept, slope) = stats::linear_fit(&log_xs, &ys)?;
            Ok(Fitted::Logarithmic { intercept, slope })
        }
        TrendModel::Power => {
            if xs.iter().any(|x| *x <= 0.0) || ys.iter().any(|y| *y <= 0.0) {
                return Err(Error::Regression(
                    "power fit requires positive values on both axes".into(),
                ));
            }
            let log_xs: Vec<f64> = xs.iter().map(|x| x.ln()).collect();
            let log_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
            let (a, b) = stats::linear_fit(&log_xs, &log_ys)?;
            Ok(Fitted::Power {
                scale: a.exp(),
                exponent: b,
            })
        }
        TrendModel::Polynomial { degree } => {
            let coefficients = stats::polynomial_fit(&xs, &ys, *degree)?;
            Ok(Fitted::Polynomial { coefficients })
        }
        TrendModel::MovingAverage { window } => {
            let averaged = stats::moving_average(&ys, *window);
            Ok(Fitted::Averaged {
                points: xs
                    .iter()
                    .zip(averaged)
                    .map(|(x, y)| vec![*x, y])
                    .collect(),
            })
        }
    }
}

/// A curve fitted to data points, drawn across the visible extent.
#[derive(Debug, Clone)]
pub struct TrendLine {
    coords: CoordRef,
    fitted: Fitted,
    stroke: Stroke,
    tag: Option<String>,
}

/// Plot-space sampling density for fitted curves.
const CURVE_SAMPLES: usize = 256;

const BISECT_STEPS: usize = 48;

impl TrendLine {
    /// Fit `model` to 2-D data points.
    ///
    /// # Errors
    ///
    /// Fails on empty data, on singular fits, or on model domain
    /// violations such as an exponential fit over non-positive values.
    pub fn new(coords: CoordRef, points: &[Vec<f64>], model: TrendModel) -> Result<Self> {
        let fitted = fit(&model, points)?;
        Ok(Self {
            coords,
            fitted,
            stroke: Stroke::new(Rgba::rgb(200, 60, 60), 1.5).with_dash(vec![6.0, 4.0]),
            tag: None,
        })
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

    /// Fitted value at `x`; NaN outside the model's domain.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.fitted.eval(x)
    }

    /// Data x at a plot-space x position, via the inverse mapping.
    fn data_x(&self, px: f64) -> Option<f64> {
        let (_, h) = self.coords.plot_size();
        self.coords.to_data(Point::new(px, h / 2.0)).map(|d| d[0])
    }

    /// Vertical data extent, from the plot corners.
    fn y_extent(&self) -> Option<(f64, f64)> {
        let (w, h) = self.coords.plot_size();
        let bottom = self.coords.to_data(Point::new(w / 2.0, h))?[1];
        let top = self.coords.to_data(Point::new(w / 2.0, 0.0))?[1];
        Some((bottom.min(top), bottom.max(top)))
    }

    /// Bisect in plot-x for the point where the curve crosses `bound`.
    /// `px_in` is on the inside of the bound, `px_out` beyond it.
    fn bisect_crossing(&self, mut px_in: f64, mut px_out: f64, bound: f64) -> Option<Vec<f64>> {
        let side_in = (self.fitted.eval(self.data_x(px_in)?) - bound).signum();
        for _ in 0..BISECT_STEPS {
            let mid = (px_in + px_out) / 2.0;
            let y = self.fitted.eval(self.data_x(mid)?);
            if y.is_finite() && (y - bound).signum() == side_in {
                px_in = mid;
            } else {
                px_out = mid;
            }
        }
        let x = self.data_x(px_in)?;
        Some(vec![x, bound])
    }

    /// Sample the fitted curve uniformly in plot space, clipped to the
    /// vertical extent, as data-space point runs. Also counts the
    /// curve's intersections with the window boundary: each crossing of
    /// the vertical extent, plus an edge intersection whenever the
    /// curve is in view at the left or right window edge.
    fn sample_runs(&self) -> (Vec<Vec<Vec<f64>>>, usize) {
        let (w, _) = self.coords.plot_size();
        let Some((y_min, y_max)) = self.y_extent() else {
            return (Vec::new(), 0);
        };

        let mut runs: Vec<Vec<Vec<f64>>> = Vec::new();
        let mut current: Vec<Vec<f64>> = Vec::new();
        let mut prev: Option<(f64, f64, bool)> = None;
        let mut intersections = 0usize;

        for i in 0..=CURVE_SAMPLES {
            let px = w * i as f64 / CURVE_SAMPLES as f64;
            let Some(x) = self.data_x(px) else { continue };
            let y = self.fitted.eval(x);
            let inside = y.is_finite() && y >= y_min && y <= y_max;
            if inside && (i == 0 || i == CURVE_SAMPLES) {
                intersections += 1;
            }

            if let Some((prev_px, prev_y, prev_inside)) = prev {
                if inside != prev_inside && prev_y.is_finite() && y.is_finite() {
                    // crossing between samples: pin it down by bisection
                    intersections += 1;
                    let bound = if y.max(prev_y) > y_max { y_max } else { y_min };
                    let (px_in, px_out) = if inside { (px, prev_px) } else { (prev_px, px) };
                    if let Some(crossing) = self.bisect_crossing(px_in, px_out, bound) {
                        current.push(crossing);
                        if !inside && current.len() >= 2 {
                            runs.push(std::mem::take(&mut current));
                        }
                    }
                }
            }
            if inside {
                current.push(vec![x, y]);
            } else if current.len() >= 2 {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            prev = Some((px, y, inside));
        }
        if current.len() >= 2 {
            runs.push(current);
        }
        (runs, intersections)
    }
}

impl PlotElement for TrendLine {
    fn plot(&self, canvas: &mut dyn Canvas) {
        if let Fitted::Averaged { points } = &self.fitted {
            for run in trace_runs(&self.coords, points) {
                canvas.stroke_path(&Path::polyline(&run), &self.stroke, self.tag.as_deref());
            }
            return;
        }
        // a curve is drawn only when it meets the window boundary at
        // exactly two points; anything else is degenerate and skipped
        let (runs, intersections) = self.sample_runs();
        if intersections != 2 {
            return;
        }
        for run in runs {
            let plot_points: Vec<Point> = run.iter().map(|p| self.coords.to_plot(p)).collect();
            if plot_points.iter().any(|p| p.is_nan()) {
                continue;
            }
            canvas.stroke_path(
                &Path::polyline(&plot_points),
                &self.stroke,
                self.tag.as_deref(),
            );
        }
    }

    fn coordinates(&self) -> &CoordRef {
        &self.coords
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}
