//! Receive-side line assembly.

use heapless::Vec;

/// Accumulates received bytes into one line.
///
/// - `\r` or `\n` completes a non-empty line; empty lines (e.g. the
///   `\n` of a `\r\n` pair) are ignored.
/// - While a completed line waits to be taken, further bytes are
///   dropped.
/// - A line longer than `N` is dropped whole: bytes are discarded until
///   the next terminator.
pub struct LineAssembler<const N: usize> {
    buf: Vec<u8, N>,
    complete: bool,
    overflowed: bool,
    last: u8,
}

impl<const N: usize> LineAssembler<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            complete: false,
            overflowed: false,
            last: 0,
        }
    }

    /// Feed one received byte.  Returns `true` if it completed a line.
    pub fn push(&mut self, byte: u8) -> bool {
        self.last = byte;

        if self.complete {
            return false;
        }

        if byte == b'\r' || byte == b'\n' {
            if self.overflowed {
                self.overflowed = false;
                self.buf.clear();
                return false;
            }
            if self.buf.is_empty() {
                return false;
            }
            self.complete = true;
            return true;
        }

        if !self.overflowed && self.buf.push(byte).is_err() {
            self.overflowed = true;
        }
        false
    }

    pub fn has_complete_message(&self) -> bool {
        self.complete
    }

    pub fn last_received_char(&self) -> u8 {
        self.last
    }

    /// Hand out the completed line and start a fresh one.
    pub fn take_line(&mut self) -> Option<Vec<u8, N>> {
        if !self.complete {
            return None;
        }
        self.complete = false;
        Some(core::mem::take(&mut self.buf))
    }
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}
