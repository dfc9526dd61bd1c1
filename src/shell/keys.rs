//! Key sequence decoder.
//!
//! Key codes pack up to four input bytes into a `u32`, first byte in the
//! most significant position: the up arrow `ESC [ A` is `0x1B5B4100`. The
//! decoder accumulates bytes the same way and compares them against the
//! bound codes one byte at a time.

use crate::registry::KeyAction;

/// Result of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy)]
pub enum Decoded {
    /// The byte extends a partially matched sequence.
    Pending,
    /// A sequence completed.
    Action(KeyAction),
    /// The byte is ordinary input.
    Literal(u8),
}

/// Accumulator for partially matched key sequences.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyDecoder {
    value: u32,
}

impl KeyDecoder {
    /// An idle decoder.
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Bytes matched so far, packed like a key code. 0 when idle.
    pub fn pending(&self) -> u32 {
        self.value
    }

    /// Feed one byte against the bound `(code, action)` pairs, in order.
    ///
    /// The first binding that agrees with the accumulated bytes and has
    /// `byte` in the next position wins. A byte that matches nothing resets
    /// the decoder and is returned as [`Decoded::Literal`]; the bytes that
    /// were pending before it are discarded.
    pub fn feed<I>(&mut self, byte: u8, keys: I) -> Decoded
    where
        I: IntoIterator<Item = (u32, KeyAction)>,
    {
        let (offset, filter) = if self.value & 0x0000_FF00 != 0 {
            (0, 0xFFFF_FF00)
        } else if self.value & 0x00FF_0000 != 0 {
            (8, 0xFFFF_0000)
        } else if self.value & 0xFF00_0000 != 0 {
            (16, 0xFF00_0000)
        } else {
            (24, 0x0000_0000)
        };
        let shifted = u32::from(byte) << offset;

        for (code, action) in keys {
            if code & filter != self.value || code & (0xFF << offset) != shifted {
                continue;
            }
            self.value |= shifted;
            if offset == 0 || code & (0xFF << (offset - 8)) == 0 {
                self.value = 0;
                return Decoded::Action(action);
            }
            return Decoded::Pending;
        }

        if self.value != 0 {
            trace!("key sequence {=u32:x} abandoned", self.value);
        }
        self.value = 0;
        Decoded::Literal(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [(u32, KeyAction); 4] = [
        (0x1B5B_4100, KeyAction::HistoryUp),
        (0x1B5B_337E, KeyAction::Delete),
        (0x0900_0000, KeyAction::Tab),
        (0x0D0A_0000, KeyAction::Enter),
    ];

    fn feed_all(decoder: &mut KeyDecoder, bytes: &[u8]) -> Vec<Decoded> {
        bytes.iter().map(|&b| decoder.feed(b, KEYS)).collect()
    }

    #[test]
    fn single_byte_key_fires_immediately() {
        let mut decoder = KeyDecoder::new();
        assert!(matches!(
            decoder.feed(0x09, KEYS),
            Decoded::Action(KeyAction::Tab)
        ));
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn three_and_four_byte_sequences() {
        let mut decoder = KeyDecoder::new();
        let out = feed_all(&mut decoder, b"\x1b[A");
        assert!(matches!(out[0], Decoded::Pending));
        assert!(matches!(out[1], Decoded::Pending));
        assert!(matches!(out[2], Decoded::Action(KeyAction::HistoryUp)));

        let out = feed_all(&mut decoder, b"\x1b[3~");
        assert!(matches!(out[3], Decoded::Action(KeyAction::Delete)));
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn two_byte_enter() {
        let mut decoder = KeyDecoder::new();
        assert!(matches!(decoder.feed(b'\r', KEYS), Decoded::Pending));
        assert!(matches!(
            decoder.feed(b'\n', KEYS),
            Decoded::Action(KeyAction::Enter)
        ));
    }

    #[test]
    fn mismatch_drops_prefix_and_passes_byte() {
        let mut decoder = KeyDecoder::new();
        assert!(matches!(decoder.feed(0x1B, KEYS), Decoded::Pending));
        assert!(matches!(decoder.feed(b'x', KEYS), Decoded::Literal(b'x')));
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn plain_text_passes_through() {
        let mut decoder = KeyDecoder::new();
        assert!(matches!(decoder.feed(b'a', KEYS), Decoded::Literal(b'a')));
    }
}
