//! Finger-snap gesture classifier.
//!
//! Two interrupt sources drive one small state machine:
//!
//! - **Edge** - the sound sensor's digital output toggled.  After
//!   debouncing, the first edge of a quiet period opens a window and
//!   arms the periodic tick; every accepted edge bumps the edge count.
//! - **Tick** - the window timer fired.  After `window_ticks` ticks the
//!   window closes, the edge count is classified and the tick is
//!   disarmed until the next first edge.
//!
//! A snap produces two edges (rise + fall), so:
//!
//! ```text
//! edges at close   event
//! --------------   ----------
//!       2          SnapSingle
//!       4          SnapDouble
//!   anything else  (dropped)
//! ```
//!
//! Counts other than 2 and 4 are discarded on purpose, including 6 or
//! more.  It is not an "even count" rule.
//!
//! ## Mutual exclusion
//!
//! Both handlers run their whole body inside the same critical-section
//! mutex, so an edge landing on the closing tick is applied either
//! entirely before or entirely after it.  The section covers only the
//! window state; it is never held across a wait.
//!
//! ## Debounce
//!
//! Debouncing is a timestamp comparison against the last accepted
//! edge rather than a busy-wait with interrupts masked.  The tick and
//! the serial receivers keep running while a snap rings out.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::{
    SNAP_DEBOUNCE_MS, SNAP_DOUBLE_EDGES, SNAP_SINGLE_EDGES, SNAP_WINDOW_TICKS,
};
use crate::event::EventCode;


/// Control surface of the periodic window timer.
///
/// The timer keeps its period; these only gate whether its firings
/// reach [`SnapClassifier::on_tick`].
pub trait TickControl {
    fn enable_tick_events(&mut self);
    fn disable_tick_events(&mut self);
}

/// Timing parameters of the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnapConfig {
    /// Minimum spacing between accepted edges (ms).
    pub debounce_ms: u64,
    /// Ticks from the first edge until the window closes.
    pub window_ticks: u8,
}

impl SnapConfig {
    pub const DEFAULT: Self = Self {
        debounce_ms: SNAP_DEBOUNCE_MS,
        window_ticks: SNAP_WINDOW_TICKS,
    };
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Snapshot of the window counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnapWindowState {
    /// Accepted edges since the window opened.
    pub edge_count: u8,
    /// Ticks since the window opened.
    pub tick_count: u8,
    /// True between the first edge and the closing tick.
    pub window_open: bool,
}

struct Inner {
    window: SnapWindowState,
    last_edge_ms: Option<u64>,
}

/// Debounce + window state machine turning sensor edges into gestures.
///
/// `const`-constructible so it can live in a `static` shared by the
/// edge and tick handlers.
pub struct SnapClassifier {
    config: SnapConfig,
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl SnapClassifier {
    pub const fn new(config: SnapConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(RefCell::new(Inner {
                window: SnapWindowState {
                    edge_count: 0,
                    tick_count: 0,
                    window_open: false,
                },
                last_edge_ms: None,
            })),
        }
    }

    pub fn config(&self) -> SnapConfig {
        self.config
    }

    /// Copy of the current window counters.
    pub fn state(&self) -> SnapWindowState {
        self.inner.lock(|inner| inner.borrow().window)
    }

    /// Sound-sensor edge handler.
    ///
    /// `now_ms` is a monotonic timestamp of the edge.  Returns `false`
    /// when the edge was swallowed by the debounce.
    pub fn on_edge<T: TickControl>(&self, now_ms: u64, timer: &mut T) -> bool {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();

            if let Some(last) = inner.last_edge_ms {
                if now_ms.saturating_sub(last) < self.config.debounce_ms {
                    return false;
                }
            }
            inner.last_edge_ms = Some(now_ms);

            let window = &mut inner.window;
            if window.edge_count == 0 {
                window.tick_count = 0;
                window.window_open = true;
                timer.enable_tick_events();
            }
            window.edge_count = window.edge_count.saturating_add(1);
            true
        })
    }

    /// Window timer handler.
    ///
    /// Returns the gesture to enqueue when this tick closes the window
    /// with a recognised edge count.
    pub fn on_tick<T: TickControl>(&self, timer: &mut T) -> Option<EventCode> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let window = &mut inner.window;

            // A stray firing after disarm must not count.
            if !window.window_open {
                return None;
            }

            window.tick_count = window.tick_count.saturating_add(1);
            if window.tick_count < self.config.window_ticks {
                return None;
            }

            let edges = window.edge_count;
            let gesture = classify(edges);
            match gesture {
                Some(_event) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Snap window closed: {} edges -> {}", edges, _event);
                }
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Snap window closed: {} edges discarded", edges);
                }
            }

            window.edge_count = 0;
            window.window_open = false;
            timer.disable_tick_events();
            gesture
        })
    }
}

impl Default for SnapClassifier {
    fn default() -> Self {
        Self::new(SnapConfig::DEFAULT)
    }
}

/// Map an edge count at window close to a gesture.
pub fn classify(edge_count: u8) -> Option<EventCode> {
    match edge_count {
        SNAP_SINGLE_EDGES => Some(EventCode::SnapSingle),
        SNAP_DOUBLE_EDGES => Some(EventCode::SnapDouble),
        _ => None,
    }
}
