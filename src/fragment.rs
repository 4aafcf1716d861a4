//! Message fragmentation over the frame layer.
//!
//! A frame payload carries at most [`DATA_MAX`](crate::consts::DATA_MAX)
//! bytes, so longer messages are chopped into fragments and sent as
//! consecutive frames. The receive side stitches fragments back together,
//! deciding whether another fragment follows from the continuation bit in
//! the message header: byte offsets 2 and 3 of each fragment hold an ASCII
//! hex pair whose decoded top bit marks "more fragments follow". Between
//! fragments the receiver idles for
//! [`FRAGMENT_WAIT_MS`](crate::consts::FRAGMENT_WAIT_MS) to let the sender
//! rearm.
//!
//! The layer is written against two narrow traits, [`FrameSender`] and
//! [`FrameReceiver`], rather than [`VlcDriver`](crate::driver::VlcDriver)
//! directly, so it also runs over any other framed link (a radio downlink,
//! a test harness).

use crate::consts::{CONTROL_BIT_MASK, CONTROL_BIT_OFFSET, FRAGMENT_WAIT_MS, FRAME_MAX};
use crate::conv::hex_pair_to_byte;
use crate::error::FragmentError;
use embedded_hal::delay::DelayNs;

/// Blocking sink for single frame payloads.
pub trait FrameSender {
    /// Transport error type.
    type Error;

    /// Sends one payload as a frame, blocking until it is on the wire.
    fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error>;
}

/// Blocking source of single frame payloads.
pub trait FrameReceiver {
    /// Transport error type.
    type Error;

    /// Receives one frame payload into `buf`, blocking until a frame
    /// completes, and returns the payload length.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Summary of a reassembled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassembly {
    /// Total reassembled message length in bytes.
    pub total_len: usize,
    /// Length of the final fragment.
    pub last_fragment_len: usize,
}

/// Sends `message` as a sequence of fragments of at most `fragment_size`
/// bytes each, returning the number of frames sent.
///
/// A `fragment_size` of zero disables fragmentation: the whole message goes
/// out as a single frame. An empty message still produces one empty frame,
/// so the receiver observes a delivery.
pub fn send_fragmented<S>(
    link: &mut S,
    message: &[u8],
    fragment_size: usize,
) -> Result<usize, FragmentError<S::Error>>
where
    S: FrameSender,
{
    if fragment_size == 0 || message.len() <= fragment_size {
        link.send(message).map_err(FragmentError::Link)?;
        return Ok(1);
    }
    let mut frames = 0;
    let mut rest = message;
    while !rest.is_empty() {
        let take = rest.len().min(fragment_size);
        let (chunk, tail) = rest.split_at(take);
        link.send(chunk).map_err(FragmentError::Link)?;
        frames += 1;
        rest = tail;
        debug!("fragment {} sent ({} bytes, {} left)", frames, take, rest.len());
    }
    Ok(frames)
}

/// Receives fragments until one without the continuation bit arrives,
/// reassembling them into `out`.
///
/// A fragment too short to carry the header hex pair is treated as final.
/// A header pair that is not valid hex fails with
/// [`FragmentError::InvalidHeader`]; a message longer than `out` fails with
/// [`FragmentError::BufferOverflow`]. Between fragments the provided delay
/// idles for the sender's rearm window.
pub fn receive_fragmented<R, D>(
    link: &mut R,
    delay: &mut D,
    out: &mut [u8],
) -> Result<Reassembly, FragmentError<R::Error>>
where
    R: FrameReceiver,
    D: DelayNs,
{
    let mut chunk = [0u8; FRAME_MAX];
    let mut total = 0;
    loop {
        let len = link.receive(&mut chunk).map_err(FragmentError::Link)?;
        let fragment = &chunk[..len];
        if total + len > out.len() {
            return Err(FragmentError::BufferOverflow);
        }
        out[total..total + len].copy_from_slice(fragment);
        total += len;

        if !continuation_flagged(fragment)? {
            return Ok(Reassembly {
                total_len: total,
                last_fragment_len: len,
            });
        }
        debug!("fragment continues ({} bytes so far)", total);
        delay.delay_ms(FRAGMENT_WAIT_MS);
    }
}

/// Reads the continuation bit from a fragment's header hex pair.
fn continuation_flagged<E>(fragment: &[u8]) -> Result<bool, FragmentError<E>> {
    if fragment.len() < CONTROL_BIT_OFFSET + 2 {
        return Ok(false);
    }
    let control = hex_pair_to_byte(fragment[CONTROL_BIT_OFFSET], fragment[CONTROL_BIT_OFFSET + 1])
        .ok_or(FragmentError::InvalidHeader)?;
    Ok(control & CONTROL_BIT_MASK != 0)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[derive(Debug, Default)]
    struct RecordingSender {
        frames: Vec<Vec<u8>>,
    }

    impl FrameSender for RecordingSender {
        type Error = Infallible;

        fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
            self.frames.push(payload.to_vec());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct ScriptedReceiver {
        frames: std::collections::VecDeque<Vec<u8>>,
    }

    impl ScriptedReceiver {
        fn new(frames: &[&[u8]]) -> Self {
            Self {
                frames: frames.iter().map(|f| f.to_vec()).collect(),
            }
        }
    }

    impl FrameReceiver for ScriptedReceiver {
        type Error = Infallible;

        fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let frame = self.frames.pop_front().unwrap_or_default();
            buf[..frame.len()].copy_from_slice(&frame);
            Ok(frame.len())
        }
    }

    #[test]
    fn splits_into_bounded_fragments() {
        let message: Vec<u8> = (0..23).collect();
        let mut link = RecordingSender::default();

        let frames = send_fragmented(&mut link, &message, 10).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(link.frames.len(), 3);
        assert_eq!(link.frames[0].len(), 10);
        assert_eq!(link.frames[1].len(), 10);
        assert_eq!(link.frames[2].len(), 3);
        let rejoined: Vec<u8> = link.frames.concat();
        assert_eq!(rejoined, message);
    }

    #[test]
    fn zero_fragment_size_sends_whole_message() {
        let message: Vec<u8> = (0..100).collect();
        let mut link = RecordingSender::default();

        let frames = send_fragmented(&mut link, &message, 0).unwrap();

        assert_eq!(frames, 1);
        assert_eq!(link.frames, vec![message]);
    }

    #[test]
    fn empty_message_still_produces_one_frame() {
        let mut link = RecordingSender::default();
        assert_eq!(send_fragmented(&mut link, &[], 10), Ok(1));
        assert_eq!(link.frames, vec![Vec::new()]);
    }

    #[test]
    fn reassembles_until_continuation_clears() {
        // "80" flags continuation, "00" ends the message.
        let mut link = ScriptedReceiver::new(&[b"AB80first".as_slice(), b"CD00last".as_slice()]);
        let mut out = [0u8; 64];

        let reassembly = receive_fragmented(&mut link, &mut NoopDelay, &mut out).unwrap();

        assert_eq!(reassembly.total_len, 17);
        assert_eq!(reassembly.last_fragment_len, 8);
        assert_eq!(&out[..17], b"AB80firstCD00last");
    }

    #[test]
    fn short_fragment_ends_the_message() {
        let mut link = ScriptedReceiver::new(&[b"ok".as_slice()]);
        let mut out = [0u8; 16];

        let reassembly = receive_fragmented(&mut link, &mut NoopDelay, &mut out).unwrap();

        assert_eq!(reassembly.total_len, 2);
        assert_eq!(&out[..2], b"ok");
    }

    #[test]
    fn invalid_header_is_reported() {
        let mut link = ScriptedReceiver::new(&[b"ABZZrest".as_slice()]);
        let mut out = [0u8; 16];

        assert_eq!(
            receive_fragmented(&mut link, &mut NoopDelay, &mut out),
            Err(FragmentError::InvalidHeader)
        );
    }

    #[test]
    fn overflowing_the_output_buffer_is_reported() {
        let mut link = ScriptedReceiver::new(&[b"AB80xxxxxx".as_slice(), b"AB80yyyyyy".as_slice()]);
        let mut out = [0u8; 12];

        assert_eq!(
            receive_fragmented(&mut link, &mut NoopDelay, &mut out),
            Err(FragmentError::BufferOverflow)
        );
    }
}
