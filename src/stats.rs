//! Numeric helpers: quantiles, binning rules, least-squares fits.
//!
//! These back the histogram/distribution recipes (Freedman-Diaconis
//! binning), the box glyphs (quartiles) and the trend lines (regression).

use crate::error::{Error, Result};

/// Sorted copy of the input, NaNs pushed to the end.
fn sorted(data: &[f64]) -> Vec<f64> {
    let mut v = data.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v
}

/// Linearly interpolated quantile of `data` at `p` in `[0, 1]`.
///
/// Safe for any non-empty input length; a single element is every
/// quantile of itself.
#[must_use]
pub fn quantile(data: &[f64], p: f64) -> f64 {
    let v = sorted(data);
    if v.is_empty() {
        return f64::NAN;
    }
    if v.len() == 1 {
        return v[0];
    }
    let pos = p.clamp(0.0, 1.0) * (v.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    v[lo] + (v[hi] - v[lo]) * frac
}

/// Median of the data.
#[must_use]
pub fn median(data: &[f64]) -> f64 {
    quantile(data, 0.5)
}

/// First and third quartiles `(q1, q3)`; always `q3 >= q1`.
#[must_use]
pub fn quartiles(data: &[f64]) -> (f64, f64) {
    (quantile(data, 0.25), quantile(data, 0.75))
}

/// Interquartile range.
#[must_use]
pub fn iqr(data: &[f64]) -> f64 {
    let (q1, q3) = quartiles(data);
    q3 - q1
}

/// Freedman-Diaconis bin count: `bin width = 2·IQR·n^(-1/3)`,
/// `count = ceil(range / width)`, never fewer than 2 bins.
///
/// Falls back to Sturges' rule when the IQR is zero.
#[must_use]
pub fn freedman_diaconis_bins(data: &[f64]) -> usize {
    let n = data.len();
    if n < 2 {
        return 2;
    }

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return 2;
    }

    let width = 2.0 * iqr(data) / (n as f64).cbrt();
    let count = if width > 0.0 {
        (range / width).ceil() as usize
    } else {
        // Sturges
        ((n as f64).log2().ceil() + 1.0) as usize
    };
    count.max(2)
}

/// Ordinary least squares line `y = intercept + slope * x`.
///
/// # Errors
///
/// Returns an error on fewer than two points or zero x-variance.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<(f64, f64)> {
    if xs.len() != ys.len() {
        return Err(Error::DataLengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    let n = xs.len();
    if n < 2 {
        return Err(Error::Regression(
            "linear fit needs at least two points".to_string(),
        ));
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if sxx == 0.0 {
        return Err(Error::Regression("zero variance in x".to_string()));
    }

    let slope = sxy / sxx;
    Ok((mean_y - slope * mean_x, slope))
}

/// Polynomial least squares of the given degree; coefficients returned
/// lowest power first.
///
/// Solved via the normal equations with Gaussian elimination and partial
/// pivoting.
///
/// # Errors
///
/// Returns an error on length mismatch, too few points for the degree, or
/// a singular system.
pub fn polynomial_fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    if xs.len() != ys.len() {
        return Err(Error::DataLengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    let n = xs.len();
    let terms = degree + 1;
    if n < terms {
        return Err(Error::Regression(format!(
            "degree {degree} fit needs at least {terms} points, got {n}"
        )));
    }

    // normal equations: (V^T V) c = V^T y, with V the Vandermonde matrix
    let mut ata = vec![vec![0.0; terms]; terms];
    let mut atb = vec![0.0; terms];

    for (x, y) in xs.iter().zip(ys) {
        let mut powers = vec![1.0; terms];
        for k in 1..terms {
            powers[k] = powers[k - 1] * x;
        }
        for i in 0..terms {
            atb[i] += powers[i] * y;
            for j in 0..terms {
                ata[i][j] += powers[i] * powers[j];
            }
        }
    }

    solve_linear_system(&mut ata, &mut atb)?;
    Ok(atb)
}

/// In-place Gaussian elimination with partial pivoting; solution left in `b`.
fn solve_linear_system(a: &mut [Vec<f64>], b: &mut [f64]) -> Result<()> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if a[pivot_row][col].abs() < 1e-12 {
            return Err(Error::Regression("singular system".to_string()));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    for col in (0..n).rev() {
        let mut sum = b[col];
        for k in (col + 1)..n {
            sum -= a[col][k] * b[k];
        }
        b[col] = sum / a[col][col];
    }

    Ok(())
}

/// Centered moving average with the given window (clamped at the ends).
#[must_use]
pub fn moving_average(ys: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let half = window / 2;
    (0..ys.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(ys.len());
            ys[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}

/// Small deterministic xorshift64* uniform sampler.
///
/// Used for swarm jitter where reproducible output matters more than
/// statistical quality.
#[derive(Debug, Clone)]
pub struct UniformSampler {
    state: u64,
}

impl UniformSampler {
    /// Create a sampler from a seed (zero is remapped).
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed },
        }
    }

    /// Next value uniformly distributed in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        let bits = x.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11;
        bits as f64 / (1u64 << 53) as f64
    }

    /// Next value uniformly distributed in `[lo, hi)`.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_odd() {
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_median_even() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_quartiles_small_inputs() {
        // lengths 1 through 4 must not panic and must keep q3 >= q1
        for len in 1..=4 {
            let data: Vec<f64> = (0..len).map(|i| i as f64).collect();
            let (q1, q3) = quartiles(&data);
            assert!(q3 >= q1, "len {len}: q3 {q3} < q1 {q1}");
        }
    }

    #[test]
    fn test_iqr_known_value() {
        let data: Vec<f64> = (1..=5).map(f64::from).collect();
        assert_relative_eq!(iqr(&data), 2.0);
    }

    #[test]
    fn test_freedman_diaconis_uniform() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = freedman_diaconis_bins(&data);
        assert!(bins >= 2);
        // deterministic: same input, same output
        assert_eq!(bins, freedman_diaconis_bins(&data));
    }

    #[test]
    fn test_freedman_diaconis_floor() {
        assert_eq!(freedman_diaconis_bins(&[1.0]), 2);
        assert_eq!(freedman_diaconis_bins(&[5.0; 100]), 2);
    }

    #[test]
    fn test_freedman_diaconis_zero_iqr_falls_back() {
        // IQR zero but range nonzero: mostly-constant data with outliers
        let mut data = vec![5.0; 96];
        data.extend([0.0, 0.0, 10.0, 10.0]);
        assert!(freedman_diaconis_bins(&data) >= 2);
    }

    #[test]
    fn test_linear_fit_exact() {
        let xs: Vec<f64> = (0..10).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let (intercept, slope) = linear_fit(&xs, &ys).unwrap();
        assert_relative_eq!(intercept, 1.0, epsilon = 1e-9);
        assert_relative_eq!(slope, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_fit_errors() {
        assert!(linear_fit(&[1.0], &[1.0]).is_err());
        assert!(linear_fit(&[1.0, 1.0], &[1.0, 2.0]).is_err());
        assert!(linear_fit(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_polynomial_fit_quadratic() {
        let xs: Vec<f64> = (-5..=5).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 - x + 0.5 * x * x).collect();
        let c = polynomial_fit(&xs, &ys, 2).unwrap();
        assert_relative_eq!(c[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(c[1], -1.0, epsilon = 1e-6);
        assert_relative_eq!(c[2], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_polynomial_fit_too_few_points() {
        assert!(polynomial_fit(&[1.0, 2.0], &[1.0, 2.0], 3).is_err());
    }

    #[test]
    fn test_moving_average_flat() {
        let ys = vec![2.0; 10];
        let avg = moving_average(&ys, 3);
        for v in avg {
            assert_relative_eq!(v, 2.0);
        }
    }

    #[test]
    fn test_moving_average_window_one() {
        let ys = vec![1.0, 5.0, 3.0];
        assert_eq!(moving_average(&ys, 1), ys);
    }

    #[test]
    fn test_uniform_sampler_range() {
        let mut s = UniformSampler::new(42);
        for _ in 0..1000 {
            let v = s.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_sampler_deterministic() {
        let mut a = UniformSampler::new(7);
        let mut b = UniformSampler::new(7);
        for _ in 0..10 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_uniform_sampler_zero_seed() {
        let mut s = UniformSampler::new(0);
        let _ = s.next_f64();
    }
}
