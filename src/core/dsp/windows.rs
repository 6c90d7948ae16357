//! Window function implementations

use std::f64::consts::PI;
use std::ops::Deref;

use crate::error::{FeatureError, Result};

/// Read-only window coefficients, one per frame sample
#[derive(Debug, Clone, PartialEq)]
pub struct Window(Vec<f64>);

impl Window {
    /// Multiply `samples` element-wise by the window
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        samples.iter().zip(&self.0).map(|(s, w)| s * w).collect()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.0
    }
}

impl Deref for Window {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Symmetric Hann window, `0.5 * (1 - cos(2*pi*i / (length - 1)))`
///
/// Lengths of 0 and 1 are rejected since the denominator would be zero.
pub fn hann_window(length: usize) -> Result<Window> {
    if length <= 1 {
        return Err(FeatureError::InvalidWindowLength(length));
    }
    let denom = (length - 1) as f64;
    Ok(Window(
        (0..length)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = hann_window(5).unwrap();
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (w, e) in window.iter().zip(expected) {
            assert!((w - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hann_is_symmetric() {
        let window = hann_window(2048).unwrap();
        assert_eq!(window.len(), 2048);
        for i in 0..1024 {
            assert!((window[i] - window[2047 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_lengths_rejected() {
        assert_eq!(hann_window(0), Err(FeatureError::InvalidWindowLength(0)));
        assert_eq!(hann_window(1), Err(FeatureError::InvalidWindowLength(1)));
        assert!(hann_window(2).is_ok());
    }
}
