//! nRF52840 glue between peripherals and the event core.
//!
//! Producer tasks run on a high-priority interrupt executor, so they
//! preempt the thread-mode control loop the way the raw interrupt
//! handlers would:
//!
//! - **sound** - GPIOTE edge → snap classifier
//! - **tick** - RTC-backed ticker, gated by the classifier's window
//! - **link** - UARTE receive/transmit for terminal and broker
//!
//! The control loop itself reads the accelerometer (**accel**) and hands
//! events to **handler**.

pub mod accel;
pub mod handler;
pub mod link;
pub mod sound;
pub mod tick;
