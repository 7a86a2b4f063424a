//! Event core for snapsense.
//!
//! Everything here is pure logic that runs both on the nRF52840 and on
//! the host, so it can be tested without hardware:
//!
//! - [`snap`] - debounce + window state machine for snap gestures
//! - [`orientation`] - edge-triggered orientation change detector
//! - [`serial`] - line assembly and transmit chaining for the two links
//! - [`queue`] - interrupt-safe bounded event queue
//! - [`dispatcher`] - the non-blocking control loop
//!
//! Usage: `cargo test` on the host.
//!
//! The embedded binary (`main.rs`, `--features embedded`) wires these
//! to GPIOTE, the RTC-backed tick, UARTE and TWIM.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod orientation;
pub mod queue;
pub mod serial;
pub mod snap;

pub use dispatcher::{EventDispatcher, EventHandler};
pub use error::{Error, QueueFull};
pub use event::{Axis, EventCode, Link, Orientation};
pub use orientation::{Accelerometer, OrientationConfig, OrientationMonitor};
pub use queue::{publish, EventQueue};
pub use serial::{LineAssembler, MessageChannel, TxStatus, UartDriver};
pub use snap::{SnapClassifier, SnapConfig, SnapWindowState, TickControl};

/// Queue type shared by every producer and the control loop.
pub type SystemEventQueue = EventQueue<{ config::EVENT_QUEUE_CAPACITY }>;
