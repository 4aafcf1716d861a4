//! ADC seam for the receive path.
//!
//! `embedded-hal` 1.0 carries no ADC trait, so the receiver defines its own
//! single-channel seam in the same spirit as the digital pin traits: the
//! hardware binding (channel mux, reference voltage, prescaler) lives in the
//! board-support implementation, the modem only sees raw conversion results.
//!
//! The tick handler reads the completed conversion and immediately retriggers
//! the converter so the next result is ready by the following tick.

/// A single-channel analog-to-digital converter.
///
/// The reference voltage and input channel are selected when the
/// implementation is configured; they never change during reception.
pub trait AdcChannel {
    /// Error produced by a failed conversion read.
    type Error;

    /// Starts the next conversion. Must not block.
    fn start_conversion(&mut self);

    /// Reads the result of the previously started conversion, blocking until
    /// the converter reports completion.
    fn read(&mut self) -> Result<u16, Self::Error>;
}

/// Placeholder ADC for transmitter-only nodes.
///
/// Satisfies the driver's type parameter where no receive path exists;
/// every read returns zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAdc;

impl AdcChannel for NoAdc {
    type Error = core::convert::Infallible;

    fn start_conversion(&mut self) {}

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(0)
    }
}

#[cfg(all(test, feature = "std"))]
pub(crate) mod mock {
    //! Scripted ADC used by the demodulator and driver tests.

    use super::AdcChannel;
    use core::convert::Infallible;
    use std::collections::VecDeque;

    /// Replays a prerecorded sample stream; once exhausted, repeats the last
    /// sample (a held level produces no further edges).
    #[derive(Debug)]
    pub(crate) struct ScriptedAdc {
        samples: VecDeque<u16>,
        last: u16,
    }

    impl ScriptedAdc {
        pub(crate) fn new(samples: impl IntoIterator<Item = u16>) -> Self {
            Self {
                samples: samples.into_iter().collect(),
                last: 0,
            }
        }

        pub(crate) fn is_exhausted(&self) -> bool {
            self.samples.is_empty()
        }
    }

    impl AdcChannel for ScriptedAdc {
        type Error = Infallible;

        fn start_conversion(&mut self) {}

        fn read(&mut self) -> Result<u16, Self::Error> {
            if let Some(sample) = self.samples.pop_front() {
                self.last = sample;
            }
            Ok(self.last)
        }
    }
}
