//! Byte-level framing: the RX frame assembler and the TX frame builder.
//!
//! This layer sits above the bit-level demodulator. The assembler consumes
//! decoded bytes one at a time, tracking sync/start/end markers in a bounded
//! buffer; the builder wraps an outgoing payload with preamble, sync, start
//! and end markers. Frame layout:
//!
//! ```text
//! 0xAA 0xAA 0xAA | 0xD5 | 0x02 | payload (≤ 50 bytes) | 0x03
//! ```
//!
//! A completed or overflowed frame always returns the assembler to
//! `WaitingSynchronize`; there are no retries at this level, the stream
//! simply resynchronizes on the next sync byte.

use crate::consts::{
    DATA_MAX, END_FLAG, FRAME_MAX, FRAME_OVERHEAD, PREAMBLE_BYTE, PREAMBLE_LEN, START_FLAG,
    SYNC_SYMBOL,
};
use crate::error::VlcError;

/// Byte-level state of the receive framing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiverState {
    /// Scanning for the synchronization symbol.
    #[default]
    WaitingSynchronize,
    /// Sync seen, waiting for the start flag.
    Synchronized,
    /// Start flag received.
    Started,
    /// Accumulating frame data.
    Receiving,
}

/// Result of feeding one decoded byte to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Byte consumed; the frame is still in progress.
    Accepted,
    /// Byte ignored; still waiting for synchronization.
    Rejected,
    /// The end flag arrived; a complete frame is available.
    Complete,
    /// The frame exceeded the buffer bound and was discarded.
    Overflow,
}

/// Bounded byte-oriented frame assembler.
///
/// Long-lived: one instance serves the whole reception session, resetting
/// itself to `WaitingSynchronize` after every completed or overflowed frame.
#[derive(Debug)]
pub struct FrameAssembler {
    buf: [u8; FRAME_MAX],
    index: i16,
    size: i16,
    payload_start: usize,
    state: ReceiverState,
}

impl FrameAssembler {
    /// Creates an assembler waiting for synchronization.
    pub fn new() -> Self {
        Self {
            buf: [0; FRAME_MAX],
            index: -1,
            size: -1,
            payload_start: 1,
            state: ReceiverState::WaitingSynchronize,
        }
    }

    /// Current framing state.
    pub fn state(&self) -> ReceiverState {
        self.state
    }

    /// Write index into the frame buffer; `-1` while idle.
    pub fn index(&self) -> i16 {
        self.index
    }

    /// Size of the last completed frame including the end flag; `-1` if the
    /// last frame overflowed or none completed yet.
    pub fn size(&self) -> i16 {
        self.size
    }

    /// Payload of the last completed frame: the bytes between the start and
    /// end flags. Empty if no frame completed.
    pub fn payload(&self) -> &[u8] {
        if self.size < 2 {
            return &[];
        }
        let end = (self.size - 1) as usize;
        if self.payload_start >= end {
            return &[];
        }
        &self.buf[self.payload_start..end]
    }

    /// Consumes one decoded byte and advances the framing state machine.
    pub fn add_byte(&mut self, data: u8) -> FrameEvent {
        if data == SYNC_SYMBOL {
            self.index = 0;
            self.size = 0;
            self.payload_start = 1;
            self.state = ReceiverState::Synchronized;
            return FrameEvent::Accepted;
        }
        if self.state == ReceiverState::WaitingSynchronize {
            return FrameEvent::Rejected;
        }
        // Bound check before the store: a START or END landing in the last
        // slot must not open a write past the buffer.
        if self.index as usize >= FRAME_MAX {
            self.index = -1;
            self.size = -1;
            self.state = ReceiverState::WaitingSynchronize;
            return FrameEvent::Overflow;
        }
        self.buf[self.index as usize] = data;
        self.index += 1;
        if data == START_FLAG {
            self.payload_start = self.index as usize;
            self.state = ReceiverState::Started;
            FrameEvent::Accepted
        } else if data == END_FLAG {
            self.size = self.index;
            self.index = -1;
            self.state = ReceiverState::WaitingSynchronize;
            FrameEvent::Complete
        } else {
            self.state = ReceiverState::Receiving;
            FrameEvent::Accepted
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a complete physical frame for `payload` into `frame`.
///
/// Layout: three preamble bytes, the sync symbol, the start flag, the
/// payload, and the end flag. Returns the total frame length.
pub fn build_frame(payload: &[u8], frame: &mut [u8; FRAME_MAX]) -> Result<usize, VlcError> {
    if payload.len() > DATA_MAX {
        return Err(VlcError::PayloadTooLong);
    }
    frame[..PREAMBLE_LEN].fill(PREAMBLE_BYTE);
    frame[PREAMBLE_LEN] = SYNC_SYMBOL;
    frame[PREAMBLE_LEN + 1] = START_FLAG;
    frame[PREAMBLE_LEN + 2..PREAMBLE_LEN + 2 + payload.len()].copy_from_slice(payload);
    frame[PREAMBLE_LEN + 2 + payload.len()] = END_FLAG;
    Ok(payload.len() + FRAME_OVERHEAD)
}
