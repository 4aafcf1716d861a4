//! Constants used across the VLC protocol implementation.
//!
//! This module defines the protocol-wide constants for frame layout,
//! Manchester word format, buffer sizing, and receiver tuning.
//!
//! ## Key Concepts
//!
//! - **Framing**: every physical frame is `3 × 0xAA` preamble, a sync byte,
//!   a start flag, the payload, and an end flag.
//! - **Manchester word**: each byte travels as 10 symbols / 20 half-bits with
//!   start/stop markers bracketing the data pairs, so the receiver can realign
//!   on the bit stream after noise.
//! - **Oversampling**: the receiver samples the ADC `N` times per half-bit to
//!   improve edge-timing accuracy.
//!
//! These values should be used wherever framing or buffer logic is implemented
//! to ensure consistent message boundaries and timing alignment.

/// Synchronization symbol sent after the preamble, before the frame data.
pub const SYNC_SYMBOL: u8 = 0xD5;

/// Flag marking the start of the frame data.
pub const START_FLAG: u8 = 0x02;

/// Flag marking the end of the frame data.
pub const END_FLAG: u8 = 0x03;

/// Byte value repeated as the frame preamble (alternating half-bits on the wire).
pub const PREAMBLE_BYTE: u8 = 0xAA;

/// Number of preamble bytes at the head of every frame.
pub const PREAMBLE_LEN: usize = 3;

/// Maximum payload size (in bytes) of a single physical frame.
pub const DATA_MAX: usize = 50;

/// Framing overhead: preamble, sync, start flag, and end flag.
pub const FRAME_OVERHEAD: usize = PREAMBLE_LEN + 3;

/// Maximum total frame length, payload plus framing overhead.
pub const FRAME_MAX: usize = DATA_MAX + FRAME_OVERHEAD;

/// Symbols per Manchester word: start marker, eight data bits, stop marker.
pub const WORD_LENGTH: u8 = 10;

/// Half-bits per Manchester word (two per symbol).
pub const WORD_HALF_BITS: u8 = WORD_LENGTH * 2;

/// Half-bit pair encoding the start marker of a word.
pub const START_SYMBOL: u32 = 0x02;

/// Half-bit pair encoding the stop marker of a word.
pub const STOP_SYMBOL: u32 = 0x01;

/// Pattern mask a word-aligned receive register must satisfy:
/// previous stop half-bit, start marker, 16 data half-bits, stop marker.
pub const START_STOP_MASK: u32 = (STOP_SYMBOL << 20) | (START_SYMBOL << 18) | STOP_SYMBOL;

/// The 16 data half-bits of [`SYNC_SYMBOL`] as seen in an aligned receive register.
pub const SYNC_WORD_BODY: u16 = 0x6665;

/// Fill pattern the transmitter emits between frames (alternating half-bits).
pub const IDLE_PATTERN: u32 = 0xAAAA_AAAA;

/// Default ADC samples taken per half-bit on the receiver.
pub const DEFAULT_OVERSAMPLING: u8 = 4;

/// Default ADC difference threshold separating a genuine level change from noise.
pub const DEFAULT_THRESHOLD: i32 = 1;

/// Default board clock feeding the bit-clock timer, in Hz.
pub const BOARD_FREQUENCY_HZ: u32 = 14_745_600;

/// Default half-bit rate of the optical link, in Hz.
pub const COMMUNICATION_FREQUENCY_HZ: u32 = 2_000;

/// Default timer prescaler between the board clock and the comparator.
pub const TIMER_PRESCALER: u32 = 8;

/// Wait between fragmented frames on reassembly, in milliseconds.
pub const FRAGMENT_WAIT_MS: u32 = 5_000;

/// Payload offset of the two hex characters carrying the continuation flag.
pub const CONTROL_BIT_OFFSET: usize = 2;

/// Continuation flag: top bit of the decoded header byte.
pub const CONTROL_BIT_MASK: u8 = 0x80;
