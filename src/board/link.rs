//! UARTE glue for the terminal and broker links.
//!
//! Each link keeps its line assembler and message channel behind one
//! critical-section mutex.  Three parties touch it:
//!
//! - the receive task, one byte at a time out of the buffered UARTE's
//!   ring buffer;
//! - the transmit task, after each byte is handed to the UARTE;
//! - the control loop's handler, taking lines and starting sends.
//!
//! `send_char` does not touch the peripheral itself; it parks the byte
//! in a `Signal` that wakes the transmit task.

use core::cell::RefCell;

use defmt::warn;
use embassy_nrf::buffered_uarte::{BufferedUarteRx, BufferedUarteTx};
use embassy_nrf::timer::Instance as TimerInstance;
use embassy_nrf::uarte::Instance;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use snapsense::config::{SERIAL_LINE_CAPACITY, SERIAL_TX_CAPACITY};
use snapsense::{
    Error, LineAssembler, Link, MessageChannel, SystemEventQueue, UartDriver,
};

/// Driver side of a link as seen by its [`MessageChannel`].
struct Port {
    rx: LineAssembler<SERIAL_LINE_CAPACITY>,
    outgoing: Option<u8>,
}

impl UartDriver for Port {
    fn has_complete_message(&self) -> bool {
        self.rx.has_complete_message()
    }

    fn send_char(&mut self, byte: u8) {
        self.outgoing = Some(byte);
    }

    fn last_received_char(&self) -> u8 {
        self.rx.last_received_char()
    }
}

struct LinkState {
    port: Port,
    channel: MessageChannel<SERIAL_TX_CAPACITY>,
}

/// One serial link, `const`-constructible for use in a `static`.
pub struct SerialLink {
    state: Mutex<CriticalSectionRawMutex, RefCell<LinkState>>,
    tx_byte: Signal<CriticalSectionRawMutex, u8>,
}

impl SerialLink {
    pub const fn new(link: Link) -> Self {
        Self {
            state: Mutex::new(RefCell::new(LinkState {
                port: Port {
                    rx: LineAssembler::new(),
                    outgoing: None,
                },
                channel: MessageChannel::new(link),
            })),
            tx_byte: Signal::new(),
        }
    }

    /// Receive path: assemble the byte, queue `MessageReady` for a
    /// finished line.
    fn on_rx_byte(&self, byte: u8, queue: &SystemEventQueue) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let LinkState { port, channel } = &mut *state;
            port.rx.push(byte);
            channel.publish_receive_complete(port, queue);
        })
    }

    /// Transmit-complete path: chain the next byte, if any.
    fn on_tx_done(&self) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let LinkState { port, channel } = &mut *state;
            channel.on_transmit_character_sent(port);
            self.flush(port);
        })
    }

    fn on_error(&self) {
        self.state.lock(|state| {
            let state = state.borrow();
            state.channel.on_error(&state.port);
        });
    }

    fn flush(&self, port: &mut Port) {
        if let Some(byte) = port.outgoing.take() {
            self.tx_byte.signal(byte);
        }
    }

    /// Start sending `message`; fails while a previous one is in flight.
    pub fn send(&self, message: &[u8]) -> Result<(), Error> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let LinkState { port, channel } = &mut *state;
            let result = channel.begin_send(message, port);
            self.flush(port);
            result
        })
    }

    /// Take the completed line, if one is waiting.
    pub fn take_line(&self) -> Option<Vec<u8, SERIAL_LINE_CAPACITY>> {
        self.state
            .lock(|state| state.borrow_mut().port.rx.take_line())
    }
}

/// Receive loop.  The buffered UARTE keeps DMA running into its ring
/// buffer; bytes are fed to the link one at a time, like a
/// per-character RX interrupt.
pub async fn rx_task<U: Instance, T: TimerInstance>(
    link: &'static SerialLink,
    mut rx: BufferedUarteRx<'static, U, T>,
    queue: &'static SystemEventQueue,
) -> ! {
    let mut chunk = [0u8; 16];

    loop {
        match rx.read(&mut chunk).await {
            Ok(n) => {
                for &byte in &chunk[..n] {
                    link.on_rx_byte(byte, queue);
                }
            }
            Err(e) => {
                warn!("UARTE receive error: {}", e);
                link.on_error();
            }
        }
    }
}

/// Transmit loop - writes each chained byte, then reports completion.
pub async fn tx_task<U: Instance>(link: &'static SerialLink, mut tx: BufferedUarteTx<'static, U>) -> ! {
    loop {
        let byte = link.tx_byte.wait().await;

        if let Err(e) = tx.write(&[byte]).await {
            warn!("UARTE transmit error: {}", e);
            link.on_error();
        }
        link.on_tx_done();
    }
}
