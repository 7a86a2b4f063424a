//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, thresholds, buffer sizes and pin assignments
//! live here so they can be tuned in one place.  Nothing is
//! reconfigurable at runtime.

// Snap gesture classification

/// Debounce interval applied to sound-sensor edges (ms).
///
/// An edge arriving sooner than this after the last accepted edge is
/// treated as bounce from the same physical snap.
pub const SNAP_DEBOUNCE_MS: u64 = 100;

/// Period of the window timer tick (ms).
pub const SNAP_TICK_PERIOD_MS: u64 = 60;

/// Window length in ticks. 10 × 60 ms = 600 ms.
pub const SNAP_WINDOW_TICKS: u8 = 10;

/// Edge count classified as a single snap (two edges per snap).
pub const SNAP_SINGLE_EDGES: u8 = 2;

/// Edge count classified as a double snap.
pub const SNAP_DOUBLE_EDGES: u8 = 4;

// Orientation

/// Minimum absolute axis reading that counts as "gravity on this axis".
///
/// The accelerometer runs in ±2 g 14-bit mode (4096 counts/g), so this
/// is roughly half a g.
pub const GRAVITY_THRESHOLD: u16 = 2000;

// Event queue

/// Capacity of the classified-event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

// Serial links

/// Longest line a serial link can assemble before bytes are dropped.
pub const SERIAL_LINE_CAPACITY: usize = 64;

/// Longest outgoing message a serial link can chain.
pub const SERIAL_TX_CAPACITY: usize = 64;

/// Terminal (debug console) baud rate.
pub const TERMINAL_BAUD: u32 = 115_200;

/// Broker bridge (Wi-Fi/MQTT co-processor) baud rate.
pub const BROKER_BAUD: u32 = 115_200;

// Accelerometer

/// 7-bit I²C address of the MMA8451Q with SA0 pulled high.
pub const ACCEL_I2C_ADDR: u8 = 0x1D;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the actual `embassy_nrf::peripherals::*`
// types are picked in `main.rs`.  Adjust for your custom PCB.
//
//   Sound sensor DO   → P0.03
//   Terminal UARTE0   → TX P0.06, RX P0.08
//   Broker   UARTE1   → TX P1.02, RX P1.01
//   Accel I²C SDA     → P0.26
//   Accel I²C SCL     → P0.27
