//! Quantile estimation algorithms
//!
//! This module provides a constant-memory estimator for a single quantile
//! (percentile) of a data stream.
//!
//! # Algorithms
//!
//! - [`P2Quantile`]: P² estimator tracking one quantile with five markers
//!
//! # Example
//!
//! ```
//! use p2quantile::quantiles::{P2Config, P2Quantile};
//! use p2quantile::traits::QuantileSketch;
//!
//! let mut median = P2Quantile::with_config(P2Config::median()).unwrap();
//!
//! for value in [8.0, 1.0, 6.0, 3.0, 5.0, 2.0, 9.0, 4.0, 7.0, 10.0] {
//!     median.ingest(value).unwrap();
//! }
//!
//! println!("Median: {}", median.quantile().unwrap());
//! println!("Markers: {:?}", median.markers());
//! ```

mod config;
mod observer;
mod p2;

pub use config::{Interpolation, P2Config};
#[cfg(feature = "log")]
pub use observer::LogObserver;
pub use observer::{Adjustment, Correction, MarkerObserver, Silent};
pub use p2::{Markers, P2Quantile, WARMUP_SAMPLES};
