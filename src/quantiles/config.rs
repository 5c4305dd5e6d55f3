//! Configuration for the P² estimator

use crate::traits::SketchError;

const DEFAULT_QUANTILE: f64 = 0.5;

/// How a [`P2Quantile`](super::P2Quantile) turns its five markers into an estimate
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Read the marker that tracks the target quantile.
    ///
    /// The middle marker follows the target; at `p = 0` and `p = 1` the outer
    /// markers are the exact running minimum and maximum and are returned
    /// instead.
    #[default]
    Marker,
    /// Treat the five markers as the 0/25/50/75/100th percentiles and
    /// interpolate linearly between them.
    ///
    /// Only meaningful when the estimator tracks the median, since that is
    /// the one configuration in which the markers sit on the quartiles.
    QuartileGrid,
}

/// The configuration struct for constructing a [`P2Quantile`](super::P2Quantile)
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct P2Config {
    /// Target quantile in `[0, 1]`
    pub quantile: f64,
    /// Read-out policy used by queries
    pub interpolation: Interpolation,
}

impl P2Config {
    /// Construct a config tracking `quantile` with the default read-out.
    ///
    /// The value is checked when the estimator is built, see [`P2Config::validate`].
    pub fn new(quantile: f64) -> Self {
        P2Config {
            quantile,
            interpolation: Interpolation::default(),
        }
    }

    /// Config tracking the median
    pub fn median() -> Self {
        Self::new(DEFAULT_QUANTILE)
    }

    /// Replace the read-out policy
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Check that the target quantile lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), SketchError> {
        // NaN fails both comparisons
        if (0.0..=1.0).contains(&self.quantile) {
            Ok(())
        } else {
            Err(SketchError::InvalidQuantile(self.quantile))
        }
    }

    /// Per-sample advance of each marker's desired position
    pub(crate) fn increments(&self) -> [f64; 5] {
        let p = self.quantile;
        [0.0, p / 2.0, p, (1.0 + p) / 2.0, 1.0]
    }
}

impl Default for P2Config {
    fn default() -> Self {
        Self::median()
    }
}
