//! The control loop.
//!
//! Single-threaded and cooperative.  Each iteration:
//!
//! 1. polls the orientation monitor once (its event, if any, joins the
//!    queue behind whatever the interrupt producers already queued);
//! 2. if the queue is non-empty, removes exactly one event and hands it
//!    to the handler synchronously;
//! 3. returns immediately - no sleep, no idle wait.
//!
//! Orientation polling and dispatch only get CPU time between handler
//! calls, so handlers must return quickly.

use crate::event::EventCode;
use crate::orientation::{Accelerometer, OrientationMonitor};
use crate::queue::{publish, EventQueue};

/// Final consumer of every dispatched event.
pub trait EventHandler {
    fn handle(&mut self, event: EventCode);
}

impl<F: FnMut(EventCode)> EventHandler for F {
    fn handle(&mut self, event: EventCode) {
        self(event)
    }
}

pub struct EventDispatcher<'q, const N: usize> {
    queue: &'q EventQueue<N>,
    orientation: OrientationMonitor,
}

impl<'q, const N: usize> EventDispatcher<'q, N> {
    pub fn new(queue: &'q EventQueue<N>, orientation: OrientationMonitor) -> Self {
        Self { queue, orientation }
    }

    pub fn orientation(&self) -> &OrientationMonitor {
        &self.orientation
    }

    /// One loop iteration.  Returns the event handed to `handler`, if any.
    pub fn run_once<A, H>(&mut self, accel: &mut A, handler: &mut H) -> Option<EventCode>
    where
        A: Accelerometer,
        H: EventHandler,
    {
        if let Some(event) = self.orientation.poll(accel) {
            publish(self.queue, event);
        }

        if self.queue.is_empty() {
            return None;
        }
        let event = self.queue.consume()?;
        handler.handle(event);
        Some(event)
    }

    /// Loop forever.
    pub fn run<A, H>(&mut self, accel: &mut A, handler: &mut H) -> !
    where
        A: Accelerometer,
        H: EventHandler,
    {
        loop {
            self.run_once(accel, handler);
        }
    }
}
