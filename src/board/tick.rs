//! Snap window timer.
//!
//! A `Ticker` with the window period runs only while the classifier
//! holds the gate open.  Arming restarts the ticker, so the first tick
//! lands one full period after the window's first edge and a window
//! always spans exactly `SNAP_WINDOW_TICKS` periods (600 ms).
//!
//! A free-running hardware timer that merely has its events unmasked
//! would place the first tick anywhere inside the first period, giving
//! a 540-600 ms window instead.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::debug;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use snapsense::config::SNAP_TICK_PERIOD_MS;
use snapsense::{publish, SnapClassifier, SystemEventQueue, TickControl};

static ARMED: AtomicBool = AtomicBool::new(false);
static ARM_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Handle through which the classifier arms and disarms the tick.
#[derive(Clone, Copy, Default)]
pub struct TickGate;

impl TickControl for TickGate {
    fn enable_tick_events(&mut self) {
        ARMED.store(true, Ordering::Release);
        ARM_SIGNAL.signal(());
    }

    fn disable_tick_events(&mut self) {
        ARMED.store(false, Ordering::Release);
    }
}

/// Run the window timer loop.
pub async fn tick_task(classifier: &'static SnapClassifier, queue: &'static SystemEventQueue) -> ! {
    let mut gate = TickGate;
    let period = Duration::from_millis(SNAP_TICK_PERIOD_MS);

    loop {
        ARM_SIGNAL.wait().await;
        debug!("Snap window opened");

        let mut ticker = Ticker::every(period);
        while ARMED.load(Ordering::Acquire) {
            ticker.next().await;
            if let Some(event) = classifier.on_tick(&mut gate) {
                publish(queue, event);
            }
        }
    }
}
