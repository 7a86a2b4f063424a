//! Bounded classified-event queue.
//!
//! Any number of interrupt-context producers (edge detector, window
//! tick, both serial receivers) may insert concurrently; only the
//! control loop removes.  Storage is an `embassy_sync` channel over a
//! critical-section mutex, used through its non-blocking `try_*` half
//! since neither side may wait.
//!
//! When full, the queue rejects the newest event and counts the drop.
//! Already-queued events are never overwritten.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::error::QueueFull;
use crate::event::EventCode;

/// Multi-producer, single-consumer FIFO of [`EventCode`]s.
///
/// `const`-constructible so it can live in a `static`.
pub struct EventQueue<const N: usize> {
    events: Channel<CriticalSectionRawMutex, EventCode, N>,
    dropped: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Append an event. Callable from interrupt context.
    pub fn insert(&self, event: EventCode) -> Result<(), QueueFull> {
        self.events.try_send(event).map_err(|TrySendError::Full(rejected)| {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            QueueFull(rejected)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Remove the oldest event. Only the control loop calls this.
    pub fn consume(&self) -> Option<EventCode> {
        self.events.try_receive().ok()
    }

    /// Number of events rejected because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `event`, logging instead of failing when the queue is full.
///
/// Interrupt handlers have nowhere to propagate an error to, so they
/// publish through this.
pub fn publish<const N: usize>(queue: &EventQueue<N>, event: EventCode) {
    if let Err(QueueFull(_rejected)) = queue.insert(event) {
        #[cfg(feature = "defmt")]
        defmt::warn!("Event queue full - dropped {}", _rejected);
    }
}
