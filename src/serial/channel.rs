//! Event-facing half of a serial link.

use heapless::Vec;

use crate::error::{Error, QueueFull};
use crate::event::{EventCode, Link};
use crate::queue::EventQueue;

/// Byte-level UART driver surface consumed by a [`MessageChannel`].
pub trait UartDriver {
    /// A complete line is waiting to be taken.
    fn has_complete_message(&self) -> bool;

    /// Put one byte on the wire.  Completion comes back through
    /// [`MessageChannel::on_transmit_character_sent`].
    fn send_char(&mut self, byte: u8);

    fn last_received_char(&self) -> u8;
}

/// Transmit-side state of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxStatus {
    Idle,
    Sending,
}

/// Receive-completion detector plus transmit chaining for one link.
pub struct MessageChannel<const N: usize> {
    link: Link,
    announced: bool,
    tx: Vec<u8, N>,
    cursor: usize,
    status: TxStatus,
}

impl<const N: usize> MessageChannel<N> {
    pub const fn new(link: Link) -> Self {
        Self {
            link,
            announced: false,
            tx: Vec::new(),
            cursor: 0,
            status: TxStatus::Idle,
        }
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == TxStatus::Idle
    }

    /// Receive-interrupt hook, called after every received byte.
    ///
    /// Yields `MessageReady` while a completed line is waiting and has
    /// not been announced yet.  The announcement only sticks once
    /// [`mark_announced`](Self::mark_announced) confirms the event was
    /// queued, so a rejected event is offered again on the next byte.
    pub fn on_receive_complete<D: UartDriver>(&mut self, driver: &D) -> Option<EventCode> {
        if !driver.has_complete_message() {
            self.announced = false;
            return None;
        }
        if self.announced {
            return None;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{} link: line complete (last byte {=u8:#x})",
            self.link,
            driver.last_received_char()
        );
        Some(EventCode::MessageReady(self.link))
    }

    /// The pending `MessageReady` reached the queue; stay quiet until
    /// the line is taken.
    pub fn mark_announced(&mut self) {
        self.announced = true;
    }

    /// Run the receive hook and queue its event.  A full queue leaves
    /// the line unannounced so the next received byte retries.
    pub fn publish_receive_complete<D: UartDriver, const M: usize>(
        &mut self,
        driver: &D,
        queue: &EventQueue<M>,
    ) {
        let Some(event) = self.on_receive_complete(driver) else {
            return;
        };
        match queue.insert(event) {
            Ok(()) => self.mark_announced(),
            Err(QueueFull(_rejected)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Event queue full - {} retried on next byte", _rejected);
            }
        }
    }

    /// Start chaining `message` out.  The first byte goes out now, the
    /// rest one per transmit-complete interrupt.
    pub fn begin_send<D: UartDriver>(&mut self, message: &[u8], driver: &mut D) -> Result<(), Error> {
        if self.status == TxStatus::Sending {
            return Err(Error::TransmitBusy);
        }
        if message.is_empty() {
            return Ok(());
        }

        self.tx.clear();
        self.tx
            .extend_from_slice(message)
            .map_err(|_| Error::MessageTooLong)?;

        self.cursor = 1;
        self.status = TxStatus::Sending;
        driver.send_char(self.tx[0]);
        Ok(())
    }

    /// Transmit-complete hook: send the next byte or go idle.
    pub fn on_transmit_character_sent<D: UartDriver>(&mut self, driver: &mut D) {
        if self.status != TxStatus::Sending {
            return;
        }
        match self.tx.get(self.cursor).copied() {
            Some(byte) => {
                self.cursor += 1;
                driver.send_char(byte);
            }
            None => {
                self.cursor = 0;
                self.tx.clear();
                self.status = TxStatus::Idle;
            }
        }
    }

    /// Channel error interrupt (framing, parity, overrun).
    ///
    /// Detection only; nothing is reset or retried.
    pub fn on_error<D: UartDriver>(&self, driver: &D) {
        let _last = driver.last_received_char();
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "{} link: channel error after {=u8:#x} (not handled)",
            self.link,
            _last
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingUart {
        complete: bool,
        last: u8,
        sent: std::vec::Vec<u8>,
    }

    impl UartDriver for RecordingUart {
        fn has_complete_message(&self) -> bool {
            self.complete
        }

        fn send_char(&mut self, byte: u8) {
            self.sent.push(byte);
        }

        fn last_received_char(&self) -> u8 {
            self.last
        }
    }

    /// Simulate the transmit-complete interrupt until the link idles.
    fn drain(channel: &mut MessageChannel<16>, uart: &mut RecordingUart) -> usize {
        let mut interrupts = 0;
        while !channel.is_idle() {
            channel.on_transmit_character_sent(uart);
            interrupts += 1;
        }
        interrupts
    }

    #[test]
    fn announces_completed_line_once() {
        let queue: EventQueue<4> = EventQueue::new();
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Terminal);
        let mut uart = RecordingUart::default();

        channel.publish_receive_complete(&uart, &queue);
        assert!(queue.is_empty());

        uart.complete = true;
        channel.publish_receive_complete(&uart, &queue);
        // More bytes before the line is taken: no duplicate.
        channel.publish_receive_complete(&uart, &queue);
        channel.publish_receive_complete(&uart, &queue);
        assert_eq!(queue.len(), 1);

        // Line taken, next one completes.
        uart.complete = false;
        channel.publish_receive_complete(&uart, &queue);
        uart.complete = true;
        channel.publish_receive_complete(&uart, &queue);

        assert_eq!(queue.consume(), Some(EventCode::MessageReady(Link::Terminal)));
        assert_eq!(queue.consume(), Some(EventCode::MessageReady(Link::Terminal)));
        assert!(queue.is_empty());
    }

    #[test]
    fn unconfirmed_announcement_is_offered_again() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Broker);
        let uart = RecordingUart {
            complete: true,
            ..Default::default()
        };

        let ready = Some(EventCode::MessageReady(Link::Broker));
        assert_eq!(channel.on_receive_complete(&uart), ready);
        assert_eq!(channel.on_receive_complete(&uart), ready);

        channel.mark_announced();
        assert_eq!(channel.on_receive_complete(&uart), None);
    }

    #[test]
    fn full_queue_defers_announcement_to_next_byte() {
        let queue: EventQueue<1> = EventQueue::new();
        queue.insert(EventCode::SnapSingle).unwrap();

        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Terminal);
        let uart = RecordingUart {
            complete: true,
            ..Default::default()
        };

        channel.publish_receive_complete(&uart, &queue);
        assert_eq!(queue.dropped(), 1);

        queue.consume();
        channel.publish_receive_complete(&uart, &queue);
        assert_eq!(queue.consume(), Some(EventCode::MessageReady(Link::Terminal)));

        // Announced now, later bytes stay quiet.
        channel.publish_receive_complete(&uart, &queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn event_names_its_link() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Broker);
        let uart = RecordingUart {
            complete: true,
            ..Default::default()
        };
        assert_eq!(
            channel.on_receive_complete(&uart),
            Some(EventCode::MessageReady(Link::Broker))
        );
    }

    #[test]
    fn chains_message_one_byte_per_interrupt() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Broker);
        let mut uart = RecordingUart::default();

        channel.begin_send(b"SNAP\r\n", &mut uart).unwrap();
        assert_eq!(uart.sent, b"S");
        assert_eq!(channel.status(), TxStatus::Sending);

        channel.on_transmit_character_sent(&mut uart);
        assert_eq!(uart.sent, b"SN");

        // 4 more bytes, then one interrupt that finds the end.
        assert_eq!(drain(&mut channel, &mut uart), 5);
        assert_eq!(uart.sent, b"SNAP\r\n");
        assert!(channel.is_idle());
    }

    #[test]
    fn busy_channel_rejects_new_message() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Broker);
        let mut uart = RecordingUart::default();

        channel.begin_send(b"first", &mut uart).unwrap();
        assert_eq!(channel.begin_send(b"second", &mut uart), Err(Error::TransmitBusy));

        drain(&mut channel, &mut uart);
        channel.begin_send(b"second", &mut uart).unwrap();
        drain(&mut channel, &mut uart);
        assert_eq!(uart.sent, b"firstsecond");
    }

    #[test]
    fn oversized_message_is_rejected() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Terminal);
        let mut uart = RecordingUart::default();

        let result = channel.begin_send(&[b'x'; 17], &mut uart);
        assert_eq!(result, Err(Error::MessageTooLong));
        assert!(channel.is_idle());
        assert!(uart.sent.is_empty());
    }

    #[test]
    fn empty_message_sends_nothing() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Terminal);
        let mut uart = RecordingUart::default();

        channel.begin_send(b"", &mut uart).unwrap();
        assert!(channel.is_idle());
        assert!(uart.sent.is_empty());
    }

    #[test]
    fn spurious_tx_interrupt_while_idle_is_ignored() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Terminal);
        let mut uart = RecordingUart::default();

        channel.on_transmit_character_sent(&mut uart);
        assert!(uart.sent.is_empty());
        assert!(channel.is_idle());
    }

    #[test]
    fn transmit_does_not_disturb_receive() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Terminal);
        let mut uart = RecordingUart::default();

        channel.begin_send(b"hello", &mut uart).unwrap();
        channel.on_transmit_character_sent(&mut uart);
        uart.complete = true;
        assert_eq!(
            channel.on_receive_complete(&uart),
            Some(EventCode::MessageReady(Link::Terminal))
        );
        drain(&mut channel, &mut uart);
        assert_eq!(uart.sent, b"hello");
    }

    #[test]
    fn error_hook_changes_nothing() {
        let mut channel: MessageChannel<16> = MessageChannel::new(Link::Broker);
        let mut uart = RecordingUart::default();

        channel.begin_send(b"ab", &mut uart).unwrap();
        uart.last = 0xFF;
        channel.on_error(&uart);
        assert_eq!(channel.status(), TxStatus::Sending);
        drain(&mut channel, &mut uart);
        assert_eq!(uart.sent, b"ab");
    }
}
