//! P² quantile estimator
//!
//! Implementation of the piecewise-parabolic (P²) algorithm of Jain and
//! Chlamtac for estimating a single quantile of a stream in O(1) time and
//! space per sample. Nothing but five markers is ever stored.
//!
//! # Markers
//!
//! The estimator keeps five markers. Each has a value (an estimate of the data
//! at some rank), an actual position (the rank it currently occupies among the
//! samples seen) and a desired position (the rank it should occupy for the
//! target quantile `p`). The outer markers track the minimum and maximum, the
//! middle one tracks `p`, and the remaining two track `p/2` and `(1+p)/2`.
//!
//! After each sample every interior marker whose position has drifted a full
//! rank from its desired position is moved by exactly one rank, and its value
//! is corrected with a parabolic prediction, or a linear one if the parabola
//! would overshoot a neighbour.
//!
//! # Thread Safety
//!
//! Ingestion takes `&mut self` and queries take `&self`, so sharing an
//! estimator across threads needs the usual `Mutex`/`RwLock` wrapping.

use super::config::{Interpolation, P2Config};
use super::observer::{Adjustment, Correction, MarkerObserver, Silent};
use crate::traits::{QuantileSketch, Sketch, SketchError};

/// Number of samples collected before the estimator can answer queries
pub const WARMUP_SAMPLES: u64 = 5;

const INITIAL_POSITIONS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

/// Snapshot of the five marker values
///
/// Field names follow the median configuration; for other targets `median`
/// holds the estimate of `p`, and `q1`/`q3` the supporting quantiles
/// `p/2` and `(1+p)/2`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Markers {
    /// Smallest sample seen
    pub min: f64,
    /// Lower supporting marker
    pub q1: f64,
    /// Marker tracking the target quantile
    pub median: f64,
    /// Upper supporting marker
    pub q3: f64,
    /// Largest sample seen
    pub max: f64,
}

impl Markers {
    fn from_array(m: [f64; 5]) -> Self {
        Markers {
            min: m[0],
            q1: m[1],
            median: m[2],
            q3: m[3],
            max: m[4],
        }
    }

    /// Marker values in ascending order
    pub fn to_array(&self) -> [f64; 5] {
        [self.min, self.q1, self.median, self.q3, self.max]
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Markers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Markers", 5)?;
        state.serialize_field("min", &self.min)?;
        state.serialize_field("q1", &self.q1)?;
        state.serialize_field("median", &self.median)?;
        state.serialize_field("q3", &self.q3)?;
        state.serialize_field("max", &self.max)?;
        state.end()
    }
}

/// P² single-quantile estimator
///
/// Tracks one quantile `p`, fixed at construction, using five markers.
///
/// - O(1) time per sample, no allocation
/// - Exact minimum and maximum
/// - Queries need at least five samples
///
/// # Example
///
/// ```
/// use p2quantile::quantiles::P2Quantile;
/// use p2quantile::traits::QuantileSketch;
///
/// let mut p90 = P2Quantile::new(0.9).unwrap();
///
/// for i in 1..=1000 {
///     p90.ingest(i as f64).unwrap();
/// }
///
/// let estimate = p90.quantile().unwrap();
/// assert!((estimate - 900.0).abs() < 10.0);
/// ```
#[derive(Clone, Debug)]
pub struct P2Quantile<O = Silent> {
    config: P2Config,
    /// Per-sample advance of each desired position
    increments: [f64; 5],
    /// Number of samples ingested
    count: u64,
    /// Marker values; arrival order until warm-up completes
    markers: [f64; 5],
    /// Actual marker ranks
    positions: [f64; 5],
    /// Ideal (fractional) marker ranks
    desired: [f64; 5],
    observer: O,
}

impl P2Quantile<Silent> {
    /// Create an estimator for the quantile `p` (0.0 to 1.0)
    ///
    /// Returns [`SketchError::InvalidQuantile`] if `p` is outside `[0, 1]`.
    pub fn new(p: f64) -> Result<Self, SketchError> {
        Self::with_config(P2Config::new(p))
    }

    /// Create an estimator from a full configuration
    pub fn with_config(config: P2Config) -> Result<Self, SketchError> {
        Self::with_observer(config, Silent)
    }
}

impl<O: MarkerObserver> P2Quantile<O> {
    /// Create an estimator that reports warm-up and marker moves to `observer`
    pub fn with_observer(config: P2Config, observer: O) -> Result<Self, SketchError> {
        config.validate()?;
        Ok(Self {
            increments: config.increments(),
            config,
            count: 0,
            markers: [0.0; 5],
            positions: INITIAL_POSITIONS,
            desired: INITIAL_POSITIONS,
            observer,
        })
    }

    /// Feed one sample
    ///
    /// NaN and infinite samples are rejected with
    /// [`SketchError::NonFiniteSample`] and leave the estimator untouched.
    pub fn ingest(&mut self, sample: f64) -> Result<(), SketchError> {
        if !sample.is_finite() {
            return Err(SketchError::NonFiniteSample(sample));
        }

        self.count += 1;
        if self.count <= WARMUP_SAMPLES {
            self.markers[(self.count - 1) as usize] = sample;
            if self.count == WARMUP_SAMPLES {
                self.seed();
            }
            return Ok(());
        }

        self.classify(sample);
        self.advance();
        self.adjust();
        Ok(())
    }

    /// Sort the first five samples into place
    fn seed(&mut self) {
        self.markers.sort_unstable_by(|a, b| a.total_cmp(b));
        self.positions = INITIAL_POSITIONS;
        self.desired = INITIAL_POSITIONS;
        self.observer.warmed_up(&Markers::from_array(self.markers));
    }

    /// Locate the cell the sample falls into and bump the positions above it
    ///
    /// A new extreme replaces the outer marker. The top position is bumped on
    /// every sample so it always equals the count.
    fn classify(&mut self, sample: f64) {
        let m = &mut self.markers;
        let first = if sample < m[0] {
            m[0] = sample;
            1
        } else if sample < m[1] {
            1
        } else if sample < m[2] {
            2
        } else if sample < m[3] {
            3
        } else if sample < m[4] {
            4
        } else {
            m[4] = sample;
            4
        };

        for position in &mut self.positions[first..] {
            *position += 1.0;
        }
    }

    /// Advance desired positions and keep actual positions strictly increasing
    fn advance(&mut self) {
        for (desired, increment) in self.desired.iter_mut().zip(self.increments) {
            *desired += increment;
        }
        for i in 1..5 {
            self.positions[i] = self.positions[i].max(self.positions[i - 1] + 1.0);
        }
    }

    /// Move each drifted interior marker by one rank
    ///
    /// Candidates are computed from the markers as they stood before this
    /// round. A candidate is dropped for this round if the lower neighbour
    /// already moved past it.
    fn adjust(&mut self) {
        let markers = self.markers;
        let positions = self.positions;

        for i in 1..=3 {
            let Some((step, to, correction)) =
                Self::correction(&markers, &positions, self.desired[i], i)
            else {
                continue;
            };

            let position = positions[i] + step;
            if to < self.markers[i - 1] || position < self.positions[i - 1] + 1.0 {
                continue;
            }

            self.markers[i] = to;
            self.positions[i] = position;
            self.observer.adjusted(
                self.count,
                &Adjustment {
                    index: i,
                    step,
                    from: markers[i],
                    to,
                    position,
                    correction,
                },
            );
        }
    }

    /// Candidate move for marker `i`, or `None` if it should stay put
    fn correction(
        m: &[f64; 5],
        n: &[f64; 5],
        desired: f64,
        i: usize,
    ) -> Option<(f64, f64, Correction)> {
        let delta = desired - n[i];
        let step = if delta >= 1.0 && n[i + 1] > n[i] + 1.0 {
            1.0
        } else if delta <= -1.0 && n[i - 1] < n[i] - 1.0 {
            -1.0
        } else {
            return None;
        };

        // each slope is taken over its own segment
        let parabolic = m[i]
            + step / (n[i + 1] - n[i - 1])
                * ((m[i + 1] - m[i]) * (n[i] - n[i - 1] + step) / (n[i + 1] - n[i])
                    + (m[i] - m[i - 1]) * (n[i + 1] - n[i] - step) / (n[i] - n[i - 1]));

        if m[i - 1] < parabolic && parabolic < m[i + 1] {
            return Some((step, parabolic, Correction::Parabolic));
        }

        let j = if step > 0.0 { i + 1 } else { i - 1 };
        let linear = m[i] + step * (m[j] - m[i]) / (n[j] - n[i]);
        Some((step, linear, Correction::Linear))
    }

    fn ensure_warm(&self) -> Result<(), SketchError> {
        if self.count < WARMUP_SAMPLES {
            Err(SketchError::InsufficientData {
                required: WARMUP_SAMPLES,
                seen: self.count,
            })
        } else {
            Ok(())
        }
    }

    fn quartile_grid(m: &[f64; 5], p: f64) -> f64 {
        fn lerp(a: f64, b: f64, t: f64) -> f64 {
            a + (b - a) * t
        }

        if p <= 0.0 {
            m[0]
        } else if p >= 1.0 {
            m[4]
        } else if p <= 0.25 {
            lerp(m[0], m[1], p / 0.25)
        } else if p <= 0.5 {
            lerp(m[1], m[2], (p - 0.25) / 0.25)
        } else if p <= 0.75 {
            lerp(m[2], m[3], (p - 0.5) / 0.25)
        } else {
            lerp(m[3], m[4], (p - 0.75) / 0.25)
        }
    }

    fn estimate(&self) -> Result<f64, SketchError> {
        self.ensure_warm()?;
        let p = self.config.quantile;
        let m = &self.markers;
        Ok(match self.config.interpolation {
            Interpolation::Marker if p <= 0.0 => m[0],
            Interpolation::Marker if p >= 1.0 => m[4],
            Interpolation::Marker => m[2],
            Interpolation::QuartileGrid => Self::quartile_grid(m, p),
        })
    }

    /// Desired rank of the middle marker
    ///
    /// This is a rank, not a value from the stream: after `n` samples it is
    /// roughly `3 + (n - 5) * p`. Useful only for inspecting how far the
    /// middle marker lags its target.
    pub fn desired_rank(&self) -> Result<f64, SketchError> {
        self.ensure_warm()?;
        Ok(self.desired[2])
    }

    /// Current marker values, or `None` during warm-up
    pub fn markers(&self) -> Option<Markers> {
        self.ensure_warm().ok()?;
        Some(Markers::from_array(self.markers))
    }

    /// Current marker positions, or `None` during warm-up
    pub fn positions(&self) -> Option<[f64; 5]> {
        self.ensure_warm().ok()?;
        Some(self.positions)
    }

    /// The configuration this estimator was built with
    pub fn config(&self) -> &P2Config {
        &self.config
    }

    /// Observer receiving warm-up and adjustment notifications
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the observer, e.g. to drain what it collected
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consume the estimator and return its observer
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Samples seen so far, in sorted order once warm-up is complete
    fn seen(&self) -> &[f64] {
        let len = self.count.min(WARMUP_SAMPLES) as usize;
        &self.markers[..len]
    }

    fn reset(&mut self) {
        self.count = 0;
        self.markers = [0.0; 5];
        self.positions = INITIAL_POSITIONS;
        self.desired = INITIAL_POSITIONS;
    }
}

impl<O> Sketch for P2Quantile<O>
where
    O: MarkerObserver + Clone + core::fmt::Debug,
{
    type Item = f64;

    fn update(&mut self, item: &f64) -> Result<(), SketchError> {
        self.ingest(*item)
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl<O> QuantileSketch for P2Quantile<O>
where
    O: MarkerObserver + Clone + core::fmt::Debug,
{
    type Value = f64;

    fn add(&mut self, value: f64) -> Result<(), SketchError> {
        self.ingest(value)
    }

    fn target(&self) -> f64 {
        self.config.quantile
    }

    fn quantile(&self) -> Result<f64, SketchError> {
        self.estimate()
    }

    fn min(&self) -> Option<f64> {
        self.seen().iter().copied().reduce(f64::min)
    }

    fn max(&self) -> Option<f64> {
        self.seen().iter().copied().reduce(f64::max)
    }
}

// ============================================================================
// Tests
// ============================================================================
