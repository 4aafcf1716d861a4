//! Edge-detection demodulator for the VLC receive path.
//!
//! The receiver oversamples the photodiode ADC at `N` samples per half-bit
//! and reconstructs the Manchester bit stream from level transitions rather
//! than absolute levels: each new sample is classified against the previous
//! one (`+1` rising, `-1` falling, `0` unchanged), short runs are discarded
//! as noise, and accepted edges shift half-bits into a rolling register that
//! is continuously tested for the start/stop word pattern.
//!
//! A level held for longer than one nominal half-bit width means the line
//! code produced two identical half-bits back to back; the detector inserts
//! the repeated half-bit once before the new one, which is how Manchester
//! self-clocking survives missing mid-dwell edges.

use crate::consts::{DEFAULT_OVERSAMPLING, DEFAULT_THRESHOLD, SYNC_WORD_BODY, WORD_HALF_BITS};
use crate::manchester;

/// Result of feeding one ADC sample to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The level did not produce a new accepted edge; nothing was inserted.
    Repeated,
    /// Half-bits were inserted but no complete word is available yet.
    Pending,
    /// A complete word body is ready for [`manchester::decode`].
    Character(u16),
    /// The synchronization word was matched while searching for alignment.
    SyncWord,
}

/// Rolling edge detector and bit-register state for one receive channel.
///
/// Feed it one raw ADC sample per tick via [`sample`](EdgeDetector::sample).
/// The caller reports whether the byte layer is already synchronized, which
/// selects between the two word-completion triggers: continuous pattern
/// matching while searching, and an exact half-bit count once locked.
#[derive(Debug)]
pub struct EdgeDetector {
    oversampling: u16,
    threshold: i32,
    /// Previous raw ADC reading.
    last_raw: u16,
    /// Classification of the run preceding the newest sample.
    previous: i8,
    /// Samples seen since the last accepted edge, saturating at `4N`.
    run_length: u16,
    /// Half-bits inserted since the last completed word. Deliberately
    /// clamped at `8N` rather than a fixed ceiling so the window scales
    /// with the oversampling factor (32 at the default `N = 4`).
    since_sync: u16,
    /// Rolling register of received half-bits, newest in the LSB.
    register: u32,
}

impl EdgeDetector {
    /// Creates a detector for the given oversampling factor and ADC delta
    /// threshold.
    pub fn new(oversampling: u8, threshold: i32) -> Self {
        Self {
            oversampling: oversampling as u16,
            threshold,
            last_raw: 0,
            previous: 0,
            run_length: 0,
            since_sync: 0,
            register: 0,
        }
    }

    /// Current rolling register contents, newest half-bit in the LSB.
    pub fn register(&self) -> u32 {
        self.register
    }

    /// Previous raw ADC reading, usable as a fallback when a conversion
    /// read fails (an unchanged level inserts nothing).
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    /// Processes one raw ADC sample.
    ///
    /// Classifies the sample against the previous one, debounces the
    /// transition, and on an accepted edge inserts half-bits into the rolling
    /// register, testing it for a completed word after each insertion.
    pub fn sample(&mut self, raw: u16, synchronized: bool) -> SampleOutcome {
        let delta = raw as i32 - self.last_raw as i32;
        let current: i8 = if delta > self.threshold {
            1
        } else if -delta > self.threshold {
            -1
        } else {
            0
        };
        self.last_raw = raw;

        // A transition is only a genuine edge if the level before it held
        // for at least two samples; shorter runs merge into the counter.
        let outcome = if current == 0 || current == self.previous || self.run_length < 2 {
            if self.run_length < 4 * self.oversampling {
                self.run_length += 1;
            }
            SampleOutcome::Pending
        } else {
            let outcome = self.insert_bits(current, synchronized);
            if self.since_sync > 8 * self.oversampling {
                self.since_sync = 8 * self.oversampling;
            }
            self.run_length = 0;
            outcome
        };
        self.previous = current;
        outcome
    }

    /// Inserts the half-bit(s) implied by an accepted edge and tests the
    /// register after each insertion.
    fn insert_bits(&mut self, level: i8, synchronized: bool) -> SampleOutcome {
        if (self.register & 0x01) as i8 == level {
            // The register already ends on this level; no new information.
            return SampleOutcome::Repeated;
        }
        let mut outcome = SampleOutcome::Pending;
        let mut sync_seen = false;
        if self.run_length > self.oversampling + 1 {
            // The level held longer than one half-bit width: the dwell spans
            // two identical half-bits, insert the repeat before the new one.
            let repeat = self.register & 0x01;
            self.register = (self.register << 1) | repeat;
            self.since_sync += 1;
            match self.classify(synchronized) {
                SampleOutcome::Pending => {}
                hit => {
                    self.since_sync = 0;
                    sync_seen = hit == SampleOutcome::SyncWord;
                    outcome = hit;
                }
            }
        }
        self.register = (self.register << 1) | u32::from(level > 0);
        self.since_sync += 1;
        if !sync_seen {
            match self.classify(synchronized) {
                SampleOutcome::Pending => {}
                hit => {
                    self.since_sync = 0;
                    outcome = hit;
                }
            }
        }
        outcome
    }

    /// Tests the rolling register for a completed word.
    ///
    /// While unsynchronized the pattern is tested on every insertion, at any
    /// bit offset. Once the byte layer is synchronized the test additionally
    /// accepts an exact word-length half-bit count without the marker match.
    fn classify(&self, synchronized: bool) -> SampleOutcome {
        if self.since_sync >= WORD_HALF_BITS as u16 || !synchronized {
            if manchester::frame_aligned(self.register) {
                let body = manchester::word_body(self.register);
                if !synchronized && body == SYNC_WORD_BODY {
                    return SampleOutcome::SyncWord;
                }
                return SampleOutcome::Character(body);
            } else if synchronized && self.since_sync == WORD_HALF_BITS as u16 {
                return SampleOutcome::Character(manchester::word_body(self.register));
            }
        }
        SampleOutcome::Pending
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSAMPLING, DEFAULT_THRESHOLD)
    }
}
