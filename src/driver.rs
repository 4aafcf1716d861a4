//! Software VLC modem driver.
//!
//! This module provides the [`VlcDriver`] struct, a software-defined modem
//! for LED/photodiode Visible Light Communication links. The driver owns all
//! transmit and receive state and is advanced exclusively by
//! [`tick()`](VlcDriver::tick), called from a periodic timer interrupt or a
//! blocking delay loop.
//!
//! The role — transmitter or receiver — is fixed when the driver is built:
//! each tick performs exactly one of "emit the next half-bit" or "take one
//! ADC sample". There is no runtime role switching.
//!
//! ## Transmission
//!
//! The transmitter shifts a 20-half-bit Manchester word out of a digital pin
//! LSB first, one half-bit per tick. When a word drains it loads the next
//! frame byte, or falls back to the alternating idle pattern when no frame
//! is armed. Foreground code arms a frame with
//! [`send_frame()`](VlcDriver::send_frame) and polls
//! [`wait_frame_sent()`](VlcDriver::wait_frame_sent) for completion; the
//! tick handler is the only writer of the in-flight state.
//!
//! ## Reception
//!
//! The receiver feeds each ADC sample through the
//! [`EdgeDetector`](crate::demod::EdgeDetector), decodes completed Manchester
//! words into bytes, and pushes them into the
//! [`FrameAssembler`](crate::frame::FrameAssembler). Completed frames are
//! collected with [`receive_frame()`](VlcDriver::receive_frame).
//!
//! ## Concurrency
//!
//! With the `timer-isr` tick source the driver lives in a
//! `critical_section::Mutex`, so foreground calls and the tick handler are
//! mutually excluded; arming a frame is a single state update relative to
//! `tick()`. See [`crate::timer`].

use crate::adc::AdcChannel;
use crate::consts::{FRAME_MAX, IDLE_PATTERN, SYNC_SYMBOL, WORD_HALF_BITS};
use crate::demod::{EdgeDetector, SampleOutcome};
use crate::error::VlcError;
use crate::frame::{build_frame, FrameAssembler, FrameEvent, ReceiverState};
use crate::manchester;
use embedded_hal::digital::OutputPin;

use core::convert::Infallible;
#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Fixed operating role of a [`VlcDriver`].
///
/// Chosen at construction; the tick dispatch never changes it. A node that
/// needs both directions instantiates two drivers on separate hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Emit half-bits on the transmit pin, one per tick.
    Transmitter,
    /// Sample the ADC, oversampling each half-bit.
    Receiver,
}

/// A software-driven VLC modem for an LED transmitter and photodiode receiver.
///
/// ## Type Parameters
///
/// - `TX`: an [`embedded_hal::digital::OutputPin`] driving the LED
/// - `ADC`: an [`AdcChannel`] sampling the photodiode amplifier
///
/// Transmitter-only nodes use [`NoAdc`](crate::adc::NoAdc) for `ADC`;
/// receiver-only nodes use [`NoPin`] for `TX`.
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use softvlc::adc::NoAdc;
/// use softvlc::driver::VlcDriver;
///
/// let tx_pin = Pin::new(&[PinTransaction::set(PinState::High)]);
/// let mut driver: VlcDriver<Pin, NoAdc> = VlcDriver::transmitter(tx_pin);
/// driver.send_frame(b"hello").unwrap();
/// // driver.tick() now emits half-bits until the frame drains.
/// # driver.tx.as_mut().unwrap().done();
/// ```
#[derive(Debug)]
pub struct VlcDriver<TX, ADC>
where
    TX: OutputPin,
    ADC: AdcChannel,
{
    role: Role,
    /// Transmit pin (transmitter role).
    pub tx: Option<TX>,
    /// ADC channel (receiver role).
    pub adc: Option<ADC>,
    /// Bit-level demodulator state.
    pub demod: EdgeDetector,
    assembler: FrameAssembler,

    // TX state, written by the tick handler once armed.
    manchester_word: u32,
    half_bit_counter: u8,
    frame: [u8; FRAME_MAX],
    frame_index: i16,
    frame_size: i16,

    // Completed payload, snapshotted out of the assembler at tick time so
    // the next frame arriving before the foreground polls cannot clobber it.
    #[cfg(not(feature = "std"))]
    rx_payload: Vec<u8, FRAME_MAX>,
    #[cfg(feature = "std")]
    rx_payload: Vec<u8>,
    rx_frame_ready: bool,

    /// Frames transmitted to completion.
    pub tx_good: u16,
    /// Frames received and completed.
    pub rx_good: u16,
    /// Frames discarded for exceeding the buffer bound.
    pub rx_bad: u16,
}

impl<TX, ADC> VlcDriver<TX, ADC>
where
    TX: OutputPin,
    ADC: AdcChannel,
{
    /// Creates a transmitter around the given LED pin.
    ///
    /// The pin is driven high initially: the lamp stays lit between frames,
    /// and the idle pattern keeps it flickering above the receiver threshold.
    pub fn transmitter(tx: TX) -> Self {
        let mut tx = tx;
        let _ = tx.set_high();
        Self {
            role: Role::Transmitter,
            tx: Some(tx),
            adc: None,
            demod: EdgeDetector::default(),
            assembler: FrameAssembler::new(),
            manchester_word: 0xFFFF_FFFF,
            half_bit_counter: WORD_HALF_BITS,
            frame: [0; FRAME_MAX],
            frame_index: -1,
            frame_size: -1,
            rx_payload: Vec::new(),
            rx_frame_ready: false,
            tx_good: 0,
            rx_good: 0,
            rx_bad: 0,
        }
    }

    /// Creates a receiver around the given ADC channel, kicking off the
    /// first conversion so a result is ready by the first tick.
    pub fn receiver(adc: ADC, detector: EdgeDetector) -> Self {
        let mut adc = adc;
        adc.start_conversion();
        Self {
            role: Role::Receiver,
            tx: None,
            adc: Some(adc),
            demod: detector,
            assembler: FrameAssembler::new(),
            manchester_word: 0xFFFF_FFFF,
            half_bit_counter: WORD_HALF_BITS,
            frame: [0; FRAME_MAX],
            frame_index: -1,
            frame_size: -1,
            rx_payload: Vec::new(),
            rx_frame_ready: false,
            tx_good: 0,
            rx_good: 0,
            rx_bad: 0,
        }
    }

    /// Configured role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Advances the modem by one timing tick.
    ///
    /// Must be called at the half-bit rate for a transmitter, and at the
    /// half-bit rate times the oversampling factor for a receiver; jitter
    /// directly corrupts decoding. Each call performs exactly one of the two
    /// role-specific steps.
    pub fn tick(&mut self) {
        match self.role {
            Role::Transmitter => self.send_half_bit(),
            Role::Receiver => self.sample(),
        }
    }

    /// Emits the next half-bit and, at word boundaries, loads the next frame
    /// byte or the idle pattern.
    fn send_half_bit(&mut self) {
        let Some(tx) = self.tx.as_mut() else { return };
        if self.manchester_word & 0x01 != 0 {
            let _ = tx.set_high();
        } else {
            let _ = tx.set_low();
        }
        self.half_bit_counter -= 1;
        self.manchester_word >>= 1;
        if self.half_bit_counter == 0 {
            self.manchester_word = IDLE_PATTERN;
            if self.frame_index >= 0 {
                if self.frame_index < self.frame_size {
                    self.manchester_word = manchester::encode(self.frame[self.frame_index as usize]);
                    self.frame_index += 1;
                } else {
                    // END consumed: the frame is on the wire.
                    self.frame_index = -1;
                    self.frame_size = -1;
                    self.tx_good += 1;
                    debug!("tx frame sent ({})", self.tx_good);
                }
            }
            self.half_bit_counter = WORD_HALF_BITS;
        }
    }

    /// Reads one ADC sample, retriggers the converter, and advances the
    /// demodulator and framing machines.
    fn sample(&mut self) {
        let fallback = self.demod.last_raw();
        let Some(adc) = self.adc.as_mut() else { return };
        let raw = adc.read().unwrap_or(fallback);
        adc.start_conversion();

        let synchronized = self.assembler.state() != ReceiverState::WaitingSynchronize;
        match self.demod.sample(raw, synchronized) {
            SampleOutcome::Character(body) => self.handle_byte(manchester::decode(body)),
            SampleOutcome::SyncWord => self.handle_byte(SYNC_SYMBOL),
            SampleOutcome::Pending | SampleOutcome::Repeated => {}
        }
    }

    fn handle_byte(&mut self, byte: u8) {
        match self.assembler.add_byte(byte) {
            FrameEvent::Complete => {
                self.rx_payload.clear();
                let _ = self.rx_payload.extend_from_slice(self.assembler.payload());
                self.rx_frame_ready = true;
                self.rx_good += 1;
                debug!("rx frame complete ({} bytes)", self.assembler.size());
            }
            FrameEvent::Overflow => {
                self.rx_bad += 1;
                debug!("rx frame overflow");
            }
            FrameEvent::Accepted | FrameEvent::Rejected => {}
        }
    }

    /// Builds and arms a frame for transmission.
    ///
    /// The tick handler starts draining the frame at the next word boundary.
    /// Errors with [`VlcError::TxBusy`] if a frame is still in flight:
    /// rearming mid-frame is a caller programming error, and the in-flight
    /// frame is left untouched. Under the `timer-isr` tick source all
    /// foreground access runs inside a critical section, so the arm is
    /// atomic relative to `tick()`.
    pub fn send_frame(&mut self, payload: &[u8]) -> Result<(), VlcError> {
        if self.role != Role::Transmitter {
            return Err(VlcError::WrongRole);
        }
        if self.frame_index >= 0 {
            return Err(VlcError::TxBusy);
        }
        let total = build_frame(payload, &mut self.frame)?;
        self.frame_index = 0;
        self.frame_size = total as i16;
        debug!("tx frame armed ({} bytes)", total);
        Ok(())
    }

    /// Completion poll for the in-flight frame.
    ///
    /// Returns `WouldBlock` until the tick handler has consumed the end flag
    /// and reset the frame index. Use `nb::block!` to spin, or re-poll on a
    /// delay for the original fixed-interval behavior.
    pub fn wait_frame_sent(&self) -> nb::Result<(), Infallible> {
        if self.frame_index >= 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Takes the payload of the last completed frame, if any.
    ///
    /// Returns `WouldBlock` until the tick handler completes a frame. The
    /// payload excludes all framing markers and is the snapshot taken when
    /// the end flag arrived, so a following frame already in flight cannot
    /// alter it.
    #[cfg(not(feature = "std"))]
    pub fn receive_frame(&mut self) -> nb::Result<Vec<u8, FRAME_MAX>, VlcError> {
        if self.role != Role::Receiver {
            return Err(nb::Error::Other(VlcError::WrongRole));
        }
        if !self.rx_frame_ready {
            return Err(nb::Error::WouldBlock);
        }
        self.rx_frame_ready = false;
        Ok(core::mem::take(&mut self.rx_payload))
    }

    /// Takes the payload of the last completed frame, if any.
    ///
    /// Returns `WouldBlock` until the tick handler completes a frame. The
    /// payload excludes all framing markers and is the snapshot taken when
    /// the end flag arrived, so a following frame already in flight cannot
    /// alter it.
    #[cfg(feature = "std")]
    pub fn receive_frame(&mut self) -> nb::Result<Vec<u8>, VlcError> {
        if self.role != Role::Receiver {
            return Err(nb::Error::Other(VlcError::WrongRole));
        }
        if !self.rx_frame_ready {
            return Err(nb::Error::WouldBlock);
        }
        self.rx_frame_ready = false;
        Ok(core::mem::take(&mut self.rx_payload))
    }
}

/// Placeholder output pin for receiver-only nodes.
///
/// Satisfies the driver's `TX` parameter where no transmit path exists;
/// all level changes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl embedded_hal::digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adc::NoAdc;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn transmitter_initialization() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: VlcDriver<PinMock, NoAdc> = VlcDriver::transmitter(tx);

        assert_eq!(driver.role(), Role::Transmitter);
        assert!(driver.wait_frame_sent().is_ok());
        driver.tx.as_mut().map(|tx| tx.done()).unwrap();
    }

    #[test]
    fn send_frame_rejects_rearming_in_flight() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: VlcDriver<PinMock, NoAdc> = VlcDriver::transmitter(tx);

        assert!(driver.send_frame(b"AB").is_ok());
        assert_eq!(driver.wait_frame_sent(), Err(nb::Error::WouldBlock));
        assert_eq!(driver.send_frame(b"CD"), Err(VlcError::TxBusy));
        driver.tx.as_mut().map(|tx| tx.done()).unwrap();
    }

    #[test]
    fn send_frame_rejects_wrong_role() {
        let mut driver: VlcDriver<NoPin, NoAdc> =
            VlcDriver::receiver(NoAdc, EdgeDetector::default());
        assert_eq!(driver.send_frame(b"A"), Err(VlcError::WrongRole));
        assert_eq!(driver.receive_frame(), Err(nb::Error::WouldBlock));

        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: VlcDriver<PinMock, NoAdc> = VlcDriver::transmitter(tx);
        assert_eq!(
            driver.receive_frame(),
            Err(nb::Error::Other(VlcError::WrongRole))
        );
        driver.tx.as_mut().map(|tx| tx.done()).unwrap();
    }

    #[cfg(feature = "std")]
    #[test]
    fn tick_emits_initial_word_then_armed_frame() {
        use crate::consts::{END_FLAG, PREAMBLE_BYTE, START_FLAG};

        let payload = [0x41u8];
        let frame_bytes = [
            PREAMBLE_BYTE,
            PREAMBLE_BYTE,
            PREAMBLE_BYTE,
            SYNC_SYMBOL,
            START_FLAG,
            payload[0],
            END_FLAG,
        ];

        // Constructor drives the pin high, then every tick sets a level:
        // 20 half-bits of the initial all-ones word, then 20 per frame byte.
        let mut expected = vec![PinTransaction::set(PinState::High)];
        expected.extend((0..WORD_HALF_BITS).map(|_| PinTransaction::set(PinState::High)));
        for byte in frame_bytes {
            let word = manchester::encode(byte);
            expected.extend((0..WORD_HALF_BITS).map(|i| {
                PinTransaction::set(if (word >> i) & 0x01 != 0 {
                    PinState::High
                } else {
                    PinState::Low
                })
            }));
        }

        let tx = PinMock::new(&expected);
        let mut driver: VlcDriver<PinMock, NoAdc> = VlcDriver::transmitter(tx);
        assert!(driver.send_frame(&payload).is_ok());

        let ticks = WORD_HALF_BITS as usize * (1 + frame_bytes.len());
        for _ in 0..ticks {
            driver.tick();
        }

        assert!(driver.wait_frame_sent().is_ok());
        assert_eq!(driver.tx_good, 1);
        driver.tx.as_mut().map(|tx| tx.done()).unwrap();
    }

    #[cfg(feature = "std")]
    #[test]
    fn receiver_decodes_a_transmitted_frame() {
        use crate::adc::mock::ScriptedAdc;
        use crate::consts::{END_FLAG, PREAMBLE_BYTE, START_FLAG};

        const OVERSAMPLING: usize = 4;
        const HIGH: u16 = 600;

        // Half-bit stream of a whole frame, preceded by idle alternation
        // ending on a high half-bit as the transmitter's fill pattern does.
        let mut halfbits: Vec<u8> = vec![0, 1, 0, 1, 0, 1];
        for byte in [
            PREAMBLE_BYTE,
            PREAMBLE_BYTE,
            PREAMBLE_BYTE,
            SYNC_SYMBOL,
            START_FLAG,
            0x41,
            0x42,
            END_FLAG,
        ] {
            let word = manchester::encode(byte);
            halfbits.extend((0..WORD_HALF_BITS).map(|i| ((word >> i) & 0x01) as u8));
        }
        let samples: Vec<u16> = halfbits
            .iter()
            .flat_map(|&b| std::iter::repeat(if b == 1 { HIGH } else { 0 }).take(OVERSAMPLING))
            .collect();
        let ticks = samples.len();

        let adc = ScriptedAdc::new(samples);
        let mut driver: VlcDriver<NoPin, ScriptedAdc> =
            VlcDriver::receiver(adc, EdgeDetector::default());

        for _ in 0..ticks {
            driver.tick();
        }

        assert!(driver.adc.as_ref().unwrap().is_exhausted());
        assert_eq!(driver.rx_good, 1);
        assert_eq!(driver.receive_frame(), Ok(vec![0x41, 0x42]));
        // Drained: the next poll blocks again.
        assert_eq!(driver.receive_frame(), Err(nb::Error::WouldBlock));
    }

    #[cfg(feature = "std")]
    #[test]
    fn unread_frame_survives_the_next_sync() {
        use crate::adc::mock::ScriptedAdc;
        use crate::consts::{END_FLAG, PREAMBLE_BYTE, START_FLAG};

        const OVERSAMPLING: usize = 4;
        const HIGH: u16 = 600;

        // A complete frame followed by the head of the next one: the new
        // sync resets the assembler before the foreground ever polls.
        let mut halfbits: Vec<u8> = vec![0, 1, 0, 1, 0, 1];
        for byte in [
            PREAMBLE_BYTE,
            PREAMBLE_BYTE,
            PREAMBLE_BYTE,
            SYNC_SYMBOL,
            START_FLAG,
            0x41,
            0x42,
            END_FLAG,
            PREAMBLE_BYTE,
            SYNC_SYMBOL,
        ] {
            let word = manchester::encode(byte);
            halfbits.extend((0..WORD_HALF_BITS).map(|i| ((word >> i) & 0x01) as u8));
        }
        let samples: Vec<u16> = halfbits
            .iter()
            .flat_map(|&b| std::iter::repeat(if b == 1 { HIGH } else { 0 }).take(OVERSAMPLING))
            .collect();
        let ticks = samples.len();

        let adc = ScriptedAdc::new(samples);
        let mut driver: VlcDriver<NoPin, ScriptedAdc> =
            VlcDriver::receiver(adc, EdgeDetector::default());

        for _ in 0..ticks {
            driver.tick();
        }

        // The completed payload was snapshotted at end-flag time, so the
        // fresh sync cannot clobber it.
        assert_eq!(driver.rx_good, 1);
        assert_eq!(driver.receive_frame(), Ok(vec![0x41, 0x42]));
    }
}
