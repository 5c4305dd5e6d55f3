//! Hooks into the P² update loop
//!
//! A [`MarkerObserver`] is called at two points: once when warm-up completes
//! and the markers are first sorted, and once per marker move committed by the
//! adjustment step. Observers never influence the estimate.

use super::p2::Markers;

/// Which formula produced a marker's new value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Correction {
    /// Piecewise-parabolic prediction through the marker and both neighbours
    Parabolic,
    /// Linear step toward the neighbour in the direction of movement
    Linear,
}

/// A single committed marker move
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Adjustment {
    /// Interior marker index (1, 2 or 3)
    pub index: usize,
    /// Rank step, `+1.0` or `-1.0`
    pub step: f64,
    /// Marker value before the move
    pub from: f64,
    /// Marker value after the move
    pub to: f64,
    /// Marker position after the move
    pub position: f64,
    /// Formula that produced `to`
    pub correction: Correction,
}

/// Receives notifications from a [`P2Quantile`](super::P2Quantile)
///
/// Both methods default to doing nothing.
pub trait MarkerObserver {
    /// Called once, right after the fifth sample is sorted into the markers
    fn warmed_up(&mut self, markers: &Markers) {
        let _ = markers;
    }

    /// Called for each marker move committed while ingesting a sample
    fn adjusted(&mut self, count: u64, adjustment: &Adjustment) {
        let _ = (count, adjustment);
    }
}

/// Observer that ignores every notification
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Silent;

impl MarkerObserver for Silent {}

impl<O: MarkerObserver + ?Sized> MarkerObserver for &mut O {
    fn warmed_up(&mut self, markers: &Markers) {
        (**self).warmed_up(markers);
    }

    fn adjusted(&mut self, count: u64, adjustment: &Adjustment) {
        (**self).adjusted(count, adjustment);
    }
}

/// Observer forwarding notifications to the [`log`] facade
///
/// Warm-up is logged at `debug`, marker moves at `trace`, both under the
/// `p2quantile` target.
#[cfg(feature = "log")]
#[cfg_attr(docsrs, doc(cfg(feature = "log")))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogObserver;

#[cfg(feature = "log")]
impl MarkerObserver for LogObserver {
    fn warmed_up(&mut self, markers: &Markers) {
        log::debug!(
            target: "p2quantile",
            "markers seeded: [{}, {}, {}, {}, {}]",
            markers.min,
            markers.q1,
            markers.median,
            markers.q3,
            markers.max
        );
    }

    fn adjusted(&mut self, count: u64, adjustment: &Adjustment) {
        log::trace!(
            target: "p2quantile",
            "n={} marker {} {:?} step {}: {} -> {} at position {}",
            count,
            adjustment.index,
            adjustment.correction,
            adjustment.step,
            adjustment.from,
            adjustment.to,
            adjustment.position
        );
    }
}

#[cfg(all(test, feature = "std", feature = "log"))]
mod tests {
    use super::*;
    use std::string::{String, ToString};
    use std::sync::Mutex;
    use std::vec::Vec;

    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.target() == "p2quantile"
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                self.lines
                    .lock()
                    .unwrap()
                    .push(std::format!("{} {}", record.level(), record.args()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    #[test]
    fn test_log_observer_emits_records() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let mut observer = LogObserver;
        observer.warmed_up(&Markers {
            min: 1.0,
            q1: 2.0,
            median: 3.0,
            q3: 4.0,
            max: 5.0,
        });
        observer.adjusted(
            7,
            &Adjustment {
                index: 3,
                step: 1.0,
                from: 4.0,
                to: 5.5,
                position: 5.0,
                correction: Correction::Parabolic,
            },
        );

        let lines = LOGGER.lines.lock().unwrap();
        assert!(lines.contains(&"DEBUG markers seeded: [1, 2, 3, 4, 5]".to_string()));
        assert!(lines.contains(
            &"TRACE n=7 marker 3 Parabolic step 1: 4 -> 5.5 at position 5".to_string()
        ));
    }

    #[test]
    fn test_silent_is_noop() {
        let mut observer = Silent;
        observer.warmed_up(&Markers {
            min: 0.0,
            q1: 0.0,
            median: 0.0,
            q3: 0.0,
            max: 0.0,
        });
        assert_eq!(observer, Silent);
    }
}
