//! Orientation change detector, polled once per control-loop iteration.
//!
//! Gravity pulls roughly 1 g onto whichever axis points down, so the
//! first axis (in X, Y, Z priority order) whose magnitude reaches the
//! threshold names the orientation:
//!
//! ```text
//! X → Vertical    Y → Lateral    Z → Horizontal
//! ```
//!
//! Reports are edge-triggered.  Holding the device still yields one
//! event at the transition, not one per iteration.  An iteration where
//! no axis reaches the threshold emits nothing and keeps the last
//! reported orientation, but re-arms the detector so the next crossing
//! is reported even if it lands on the same orientation.

use crate::config::GRAVITY_THRESHOLD;
use crate::event::{Axis, EventCode, Orientation};

/// Accelerometer driver surface consumed by the monitor.
pub trait Accelerometer {
    type Error;

    /// Signed raw reading of one axis.
    fn read_axis(&mut self, axis: Axis) -> Result<i16, Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationConfig {
    /// Minimum `|reading|` that counts as gravity on an axis.
    pub threshold: u16,
}

impl OrientationConfig {
    pub const DEFAULT: Self = Self {
        threshold: GRAVITY_THRESHOLD,
    };
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tracks the last reported orientation across loop iterations.
pub struct OrientationMonitor {
    config: OrientationConfig,
    last_reported: Option<Orientation>,
    rearmed: bool,
}

impl OrientationMonitor {
    pub const fn new(config: OrientationConfig) -> Self {
        Self {
            config,
            last_reported: None,
            rearmed: false,
        }
    }

    pub fn last_reported(&self) -> Option<Orientation> {
        self.last_reported
    }

    /// Sample the axes once and return the change event, if any.
    ///
    /// A failed axis read is logged and skipped for this iteration.
    pub fn poll<A: Accelerometer>(&mut self, accel: &mut A) -> Option<EventCode> {
        let mut over_threshold = false;
        let mut read_failed = false;

        for axis in Axis::ALL {
            let reading = match accel.read_axis(axis) {
                Ok(value) => value,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Accelerometer read failed on {}", axis);
                    read_failed = true;
                    continue;
                }
            };

            if reading.unsigned_abs() < self.config.threshold {
                continue;
            }
            over_threshold = true;

            let orientation = axis.orientation();
            if self.rearmed || self.last_reported != Some(orientation) {
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Orientation: {} -> {} ({}={})",
                    self.last_reported,
                    orientation,
                    axis,
                    reading
                );
                self.last_reported = Some(orientation);
                self.rearmed = false;
                return Some(EventCode::OrientationChanged(orientation));
            }
        }

        // An unreadable axis might have been the one over threshold.
        if !over_threshold && !read_failed {
            self.rearmed = true;
        }
        None
    }
}

impl Default for OrientationMonitor {
    fn default() -> Self {
        Self::new(OrientationConfig::DEFAULT)
    }
}
