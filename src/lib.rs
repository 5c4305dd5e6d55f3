//! # p2quantile
//!
//! Constant-memory streaming quantile estimation for Rust.
//!
//! p2quantile implements the P² (piecewise-parabolic) algorithm of Jain and
//! Chlamtac. An estimator tracks one quantile of an unbounded stream with five
//! markers, updating them in O(1) time per sample and never storing the input.
//!
//! ## Features
//!
//! - **Single pass**: every sample is seen once and then discarded
//! - **Fixed footprint**: no allocation, the estimator is a plain value
//! - **Exact extremes**: the running minimum and maximum are tracked exactly
//! - **Observable**: warm-up and marker moves can be reported to a [`MarkerObserver`](quantiles::MarkerObserver)
//!
//! ## Quick Start
//!
//! ```rust
//! use p2quantile::prelude::*;
//!
//! // Track the 95th percentile of request latencies
//! let mut p95 = P2Quantile::new(0.95).unwrap();
//! for latency_ms in [12.0, 15.0, 11.0, 240.0, 13.0, 14.0, 16.0, 12.5] {
//!     p95.ingest(latency_ms).unwrap();
//! }
//! println!("p95 latency: ~{}ms", p95.quantile().unwrap());
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`SketchError`](traits::SketchError):
//!
//! ```rust
//! use p2quantile::prelude::*;
//!
//! assert!(P2Quantile::new(1.5).is_err());
//!
//! let mut median = P2Quantile::new(0.5).unwrap();
//! assert!(median.ingest(f64::NAN).is_err());
//!
//! median.ingest(1.0).unwrap();
//! assert!(matches!(
//!     median.quantile(),
//!     Err(SketchError::InsufficientData { required: 5, seen: 1 })
//! ));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support (`std::error::Error` impls)
//! - `log` (default): [`LogObserver`](quantiles::LogObserver) forwarding to the `log` facade
//! - `serde`: Serialization of [`Markers`](quantiles::Markers) and [`P2Config`](quantiles::P2Config)
//! - `full`: Enable all of the above

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core traits always available
pub mod traits;

pub mod quantiles;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::quantiles::{Interpolation, Markers, P2Config, P2Quantile, WARMUP_SAMPLES};
}

pub use quantiles::P2Quantile;
pub use traits::SketchError;
