//! Core traits for streaming estimators
//!
//! Every estimator implements the base [`Sketch`] trait. Quantile estimators
//! additionally implement [`QuantileSketch`].

use core::fmt::Debug;

/// Error raised at the boundary of an estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchError {
    /// Target quantile is outside `[0, 1]` (or NaN)
    InvalidQuantile(f64),
    /// Query issued before the estimator has seen enough samples
    InsufficientData {
        required: u64,
        seen: u64,
    },
    /// Sample is NaN or infinite
    NonFiniteSample(f64),
}

impl core::fmt::Display for SketchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SketchError::InvalidQuantile(p) => {
                write!(f, "invalid quantile {}: must be between 0 and 1 (inclusive)", p)
            }
            SketchError::InsufficientData { required, seen } => {
                write!(f, "insufficient data: need {} samples, have {}", required, seen)
            }
            SketchError::NonFiniteSample(v) => write!(f, "non-finite sample: {}", v),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SketchError {}

/// Core trait for all streaming estimators
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    ///
    /// Returns an error if the item is rejected; the sketch is left unchanged.
    fn update(&mut self, item: &Self::Item) -> Result<(), SketchError>;

    /// Reset sketch to empty state
    fn clear(&mut self);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Single-quantile estimation sketches
///
/// Unlike a full quantile summary, the target quantile is fixed when the
/// sketch is built and every query answers for that one target.
pub trait QuantileSketch: Sketch {
    /// The value type being tracked
    type Value: PartialOrd + Clone;

    /// Add a value to the sketch
    fn add(&mut self, value: Self::Value) -> Result<(), SketchError>;

    /// The quantile this sketch tracks (0.0 to 1.0)
    fn target(&self) -> f64;

    /// Current estimate of the target quantile
    fn quantile(&self) -> Result<Self::Value, SketchError>;

    /// Get minimum value seen
    fn min(&self) -> Option<Self::Value>;

    /// Get maximum value seen
    fn max(&self) -> Option<Self::Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SketchError::InvalidQuantile(1.5).to_string(),
            "invalid quantile 1.5: must be between 0 and 1 (inclusive)"
        );
        assert_eq!(
            SketchError::InsufficientData {
                required: 5,
                seen: 3
            }
            .to_string(),
            "insufficient data: need 5 samples, have 3"
        );
        assert_eq!(
            SketchError::NonFiniteSample(f64::INFINITY).to_string(),
            "non-finite sample: inf"
        );
    }
}
