//! Sound sensor edge input.
//!
//! The KY-038 module's digital output toggles when the microphone level
//! crosses the trimmer threshold; a finger snap gives one rising and one
//! falling edge.  Every edge is timestamped and handed to the
//! classifier, which does its own debouncing.

use crate::board::tick::TickGate;
use defmt::trace;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::Instant;
use snapsense::SnapClassifier;

/// Run the sound-sensor edge loop.
pub async fn edge_task(pin: AnyPin, classifier: &'static SnapClassifier) -> ! {
    let mut sensor = Input::new(pin, Pull::None);
    let mut gate = TickGate;

    loop {
        sensor.wait_for_any_edge().await;

        let now_ms = Instant::now().as_millis();
        if classifier.on_edge(now_ms, &mut gate) {
            trace!("Sound edge accepted at {} ms", now_ms);
        }
    }
}
