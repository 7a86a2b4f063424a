//! Unified error type for snapsense.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use crate::event::EventCode;

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Serial
    /// A message is still being chained out on this link.
    TransmitBusy,

    /// The outgoing message does not fit the transmit buffer.
    MessageTooLong,
}

/// Rejection returned by [`EventQueue::insert`](crate::queue::EventQueue::insert).
///
/// Hands the event back to the producer, which decides whether to log it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub EventCode);
