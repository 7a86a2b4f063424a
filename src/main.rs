//! snapsense firmware entry point (nRF52840).
//!
//! Producers (sound edge, window tick, serial receive/transmit) are
//! Embassy tasks on a high-priority interrupt executor.  Thread mode
//! runs the control loop: poll orientation, dispatch one event, repeat,
//! never sleeping.  The producers preempt it whenever they have work.
//!
//! Flash with `cargo run --release --features embedded` (probe-rs).

#![no_std]
#![no_main]

mod board;

use board::handler::AppHandler;
use board::link::{self, SerialLink};
use board::{accel, sound, tick};
use cortex_m_rt::entry;
use defmt::{error, info, unwrap};
use embassy_executor::InterruptExecutor;
use embassy_nrf::gpio::{AnyPin, Pin as _};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::buffered_uarte::{self, BufferedUarte, BufferedUarteRx, BufferedUarteTx};
use embassy_nrf::peripherals::{TIMER0, TIMER1, UARTE0, UARTE1};
use embassy_nrf::{bind_interrupts, peripherals, twim, uarte};
use snapsense::config::{ACCEL_I2C_ADDR, BROKER_BAUD, TERMINAL_BAUD};
use snapsense::{
    EventDispatcher, Link, OrientationMonitor, SnapClassifier, SnapConfig, SystemEventQueue,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UARTE0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
    UARTE1 => buffered_uarte::InterruptHandler<peripherals::UARTE1>;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

// Shared state

static EVENT_QUEUE: SystemEventQueue = SystemEventQueue::new();
static SNAP: SnapClassifier = SnapClassifier::new(SnapConfig::DEFAULT);
static TERMINAL: SerialLink = SerialLink::new(Link::Terminal);
static BROKER: SerialLink = SerialLink::new(Link::Broker);

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

// UARTE ring buffers
const UART_BUF_LEN: usize = 128;
static TERMINAL_RX_BUF: StaticCell<[u8; UART_BUF_LEN]> = StaticCell::new();
static TERMINAL_TX_BUF: StaticCell<[u8; UART_BUF_LEN]> = StaticCell::new();
static BROKER_RX_BUF: StaticCell<[u8; UART_BUF_LEN]> = StaticCell::new();
static BROKER_TX_BUF: StaticCell<[u8; UART_BUF_LEN]> = StaticCell::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_HIGH.on_interrupt()
}

// Producer tasks

#[embassy_executor::task]
async fn sound_edge_task(pin: AnyPin) -> ! {
    sound::edge_task(pin, &SNAP).await
}

#[embassy_executor::task]
async fn snap_tick_task() -> ! {
    tick::tick_task(&SNAP, &EVENT_QUEUE).await
}

#[embassy_executor::task]
async fn terminal_rx_task(rx: BufferedUarteRx<'static, UARTE0, TIMER0>) -> ! {
    link::rx_task(&TERMINAL, rx, &EVENT_QUEUE).await
}

#[embassy_executor::task]
async fn terminal_tx_task(tx: BufferedUarteTx<'static, UARTE0>) -> ! {
    link::tx_task(&TERMINAL, tx).await
}

#[embassy_executor::task]
async fn broker_rx_task(rx: BufferedUarteRx<'static, UARTE1, TIMER1>) -> ! {
    link::rx_task(&BROKER, rx, &EVENT_QUEUE).await
}

#[embassy_executor::task]
async fn broker_tx_task(tx: BufferedUarteTx<'static, UARTE1>) -> ! {
    link::tx_task(&BROKER, tx).await
}

fn uart_config(baud: u32) -> uarte::Config {
    let mut config = uarte::Config::default();
    config.baudrate = match baud {
        9_600 => uarte::Baudrate::BAUD9600,
        57_600 => uarte::Baudrate::BAUD57600,
        _ => uarte::Baudrate::BAUD115200,
    };
    config
}

#[entry]
fn main() -> ! {
    let p = embassy_nrf::init(Default::default());
    info!("snapsense starting");

    // - Serial links -
    // Each buffered UARTE takes a timer and two PPI channels to count
    // received bytes while DMA keeps running.
    let terminal = BufferedUarte::new(
        p.UARTE0,
        p.TIMER0,
        p.PPI_CH0,
        p.PPI_CH1,
        p.PPI_GROUP0,
        Irqs,
        p.P0_08,
        p.P0_06,
        uart_config(TERMINAL_BAUD),
        TERMINAL_RX_BUF.init([0; UART_BUF_LEN]),
        TERMINAL_TX_BUF.init([0; UART_BUF_LEN]),
    );
    let (terminal_rx, terminal_tx) = terminal.split();

    let broker = BufferedUarte::new(
        p.UARTE1,
        p.TIMER1,
        p.PPI_CH2,
        p.PPI_CH3,
        p.PPI_GROUP1,
        Irqs,
        p.P1_01,
        p.P1_02,
        uart_config(BROKER_BAUD),
        BROKER_RX_BUF.init([0; UART_BUF_LEN]),
        BROKER_TX_BUF.init([0; UART_BUF_LEN]),
    );
    let (broker_rx, broker_tx) = broker.split();

    // - Producers on the interrupt executor -
    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let spawner = EXECUTOR_HIGH.start(interrupt::EGU1_SWI1);

    unwrap!(spawner.spawn(snap_tick_task()));
    unwrap!(spawner.spawn(sound_edge_task(p.P0_03.degrade())));
    unwrap!(spawner.spawn(terminal_rx_task(terminal_rx)));
    unwrap!(spawner.spawn(terminal_tx_task(terminal_tx)));
    unwrap!(spawner.spawn(broker_rx_task(broker_rx)));
    unwrap!(spawner.spawn(broker_tx_task(broker_tx)));

    // - Accelerometer (blocking I²C from the loop) -
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut accel = accel::Mma8451::new(i2c, ACCEL_I2C_ADDR);
    if let Err(e) = accel.init() {
        error!("Accelerometer init failed: {}", defmt::Debug2Format(&e));
    }

    // - Control loop -
    let mut dispatcher = EventDispatcher::new(&EVENT_QUEUE, OrientationMonitor::default());
    let mut handler = AppHandler::new(&TERMINAL, &BROKER);

    info!("Control loop running");
    dispatcher.run(&mut accel, &mut handler)
}
