//! Serial message links (terminal console and broker bridge).
//!
//! Each link is split in two halves:
//!
//! 1. **Line assembler** - driver-side receive buffer.  Bytes arrive one
//!    interrupt at a time; a `\r` or `\n` completes the line.
//! 2. **Message channel** - what the event core sees.  It turns a
//!    completed receive into `MessageReady(link)` and chains an outgoing
//!    message out one byte per transmit-complete interrupt.
//!
//! Channel error interrupts are detected but not recovered from:
//! [`MessageChannel::on_error`] only logs.

pub mod channel;
pub mod line;

pub use channel::{MessageChannel, TxStatus, UartDriver};
pub use line::LineAssembler;
