//! Manchester line coding for the VLC bit stream.
//!
//! Each byte travels as a 20-half-bit word: a stop marker pair in the top
//! bits, one two-bit pair per data bit (a `1` becomes `0b10`, a `0` becomes
//! `0b01`), and a start marker pair in the bottom bits. The transmitter
//! shifts the word out LSB first, so the wire order is start marker, data
//! LSB first, stop marker.
//!
//! ## Purpose
//!
//! A bare on-off optical link carries no clock. Manchester coding guarantees
//! a level transition inside every bit period, letting the receiver recover
//! timing from the data signal itself and realign after noise:
//!
//! - Every bit period contains an edge (self-clocking)
//! - The start/stop marker pairs give the receiver a fixed pattern to test
//!   the rolling register against, at any bit offset
//!
//! ## Functions
//!
//! - [`encode`]: converts a byte into its 20-half-bit word
//! - [`frame_aligned`]: tests a receive register for word alignment
//! - [`word_body`]: extracts the 16 data half-bits from an aligned register
//! - [`decode`]: recovers the byte from a word body
//!
//! The receiver shifts sampled half-bits in from the LSB end, so an aligned
//! register holds the transmitted word bit-reversed; [`decode`] accounts for
//! that ordering.

use crate::consts::START_STOP_MASK;

/// Encodes a byte into its 20-half-bit Manchester word.
///
/// The source MSB is written first so that, shifted out LSB first, the wire
/// carries the data bits LSB first between the start and stop markers.
pub fn encode(data: u8) -> u32 {
    let mut data = data;
    // Stop marker pair ends up in the top bits, emitted last.
    let mut word: u32 = 0x02;
    word <<= 2;
    for _ in 0..8 {
        if data & 0x80 != 0 {
            word |= 0x02;
        } else {
            word |= 0x01;
        }
        word <<= 2;
        data <<= 1;
    }
    // Start marker pair, emitted first.
    word | 0x01
}

/// Tests whether a receive register currently holds a word-aligned pattern:
/// the trailing half-bit of the previous stop marker, a start marker, and a
/// closing stop marker in the expected positions.
pub fn frame_aligned(register: u32) -> bool {
    register & START_STOP_MASK == START_STOP_MASK
}

/// Extracts the 16 data half-bits of a word-aligned receive register.
///
/// Only meaningful when [`frame_aligned`] holds (or at an exact word-length
/// bit count once the byte layer is synchronized); higher layers must
/// validate framing before trusting the result.
pub fn word_body(register: u32) -> u16 {
    ((register >> 2) & 0xFFFF) as u16
}

/// Decodes a word body back into the original byte.
///
/// Pairs are read LSB-pair first; because the receiver shifts bits in from
/// the LSB end, the register pair order is the reverse of the wire order and
/// the first pair read belongs to the source MSB.
pub fn decode(body: u16) -> u8 {
    let mut data: u8 = 0;
    for i in (0..16).step_by(2) {
        data <<= 1;
        if (body >> i) & 0x03 == 0x01 {
            data |= 0x01;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SYNC_SYMBOL, SYNC_WORD_BODY, WORD_HALF_BITS};

    /// Shifts a transmitted word through a noiseless wire into a receive
    /// register: emitted LSB first, shifted in from the LSB end. The seed bit
    /// models the trailing stop half-bit of the preceding word.
    fn through_wire(word: u32) -> u32 {
        let mut register: u32 = 0x01;
        for i in 0..WORD_HALF_BITS {
            register = (register << 1) | ((word >> i) & 0x01);
        }
        register
    }

    #[test]
    fn round_trip_all_byte_values() {
        for b in 0..=255u8 {
            let register = through_wire(encode(b));
            assert!(frame_aligned(register), "byte {b:#04x} not aligned");
            assert_eq!(decode(word_body(register)), b);
        }
    }

    #[test]
    fn sync_symbol_has_known_word_body() {
        let register = through_wire(encode(SYNC_SYMBOL));
        assert_eq!(word_body(register), SYNC_WORD_BODY);
    }

    #[test]
    fn encode_brackets_data_with_markers() {
        let word = encode(0x00);
        // Start marker in the low pair, stop marker in the top pair.
        assert_eq!(word & 0x03, 0x01);
        assert_eq!((word >> 18) & 0x03, 0x02);
    }

    #[test]
    fn unaligned_register_is_rejected() {
        let register = through_wire(encode(0x41));
        assert!(frame_aligned(register));
        assert!(!frame_aligned(register << 1));
        assert!(!frame_aligned(register >> 1));
        assert!(!frame_aligned(0));
    }

    #[test]
    fn alternating_idle_never_aligns() {
        let mut register: u32 = 0;
        for i in 0..64 {
            register = (register << 1) | (i & 0x01);
            assert!(!frame_aligned(register));
        }
    }
}
