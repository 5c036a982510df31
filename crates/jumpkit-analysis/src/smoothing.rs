//! Savitzky-Golay smoothing for noisy landmark trajectories.
//!
//! Fits a low-order polynomial over a sliding window by least squares.
//! Preserves peak position and height better than a moving average.

use jumpkit_core::{Error, Result};
use nalgebra::DMatrix;

/// Savitzky-Golay filter with polynomial edge fitting
#[derive(Debug, Clone)]
pub struct SavitzkyGolayFilter {
    window_size: usize,
    poly_order: usize,
    /// Least-squares projection: row `r` evaluates the window fit at offset `r`
    projection: DMatrix<f64>,
}

impl SavitzkyGolayFilter {
    /// Create a new Savitzky-Golay filter
    ///
    /// # Arguments
    /// * `window_size` - Must be odd and > poly_order
    /// * `poly_order` - Polynomial order (typically 2 or 3)
    pub fn new(window_size: usize, poly_order: usize) -> Result<Self> {
        if window_size % 2 == 0 {
            return Err(Error::InvalidInput(format!(
                "Savitzky-Golay window must be odd, got {window_size}"
            )));
        }
        if window_size <= poly_order {
            return Err(Error::InvalidInput(format!(
                "Savitzky-Golay window {window_size} must exceed polynomial order {poly_order}"
            )));
        }

        let projection = Self::compute_projection(window_size, poly_order)?;

        Ok(Self {
            window_size,
            poly_order,
            projection,
        })
    }

    /// H = A (AᵀA)⁻¹ Aᵀ over the Vandermonde matrix A of centered offsets
    fn compute_projection(window_size: usize, poly_order: usize) -> Result<DMatrix<f64>> {
        let half = (window_size / 2) as f64;
        let a = DMatrix::from_fn(window_size, poly_order + 1, |i, j| {
            (i as f64 - half).powi(j as i32)
        });

        let normal = a.transpose() * &a;
        let inverse = normal.try_inverse().ok_or_else(|| {
            Error::InvalidInput("Savitzky-Golay normal matrix is singular".to_string())
        })?;

        Ok(&a * inverse * a.transpose())
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// Convolution weights applied to interior samples
    pub fn coefficients(&self) -> Vec<f64> {
        let center = self.window_size / 2;
        self.projection.row(center).iter().copied().collect()
    }

    /// Smooth a signal. Signals shorter than the window are returned unchanged.
    pub fn filter_signal(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let w = self.window_size;
        if n < w {
            return signal.to_vec();
        }

        let half = w / 2;
        let apply = |row: usize, window: &[f64]| -> f64 {
            self.projection
                .row(row)
                .iter()
                .zip(window)
                .map(|(c, x)| c * x)
                .sum()
        };

        let mut result = Vec::with_capacity(n);

        // Leading edge: evaluate the fit of the first window
        let head = &signal[..w];
        for row in 0..half {
            result.push(apply(row, head));
        }

        for i in half..(n - half) {
            result.push(apply(half, &signal[i - half..=i + half]));
        }

        // Trailing edge: evaluate the fit of the last window
        let tail = &signal[n - w..];
        for row in (w - half)..w {
            result.push(apply(row, tail));
        }

        result
    }
}
