//! Radio uplink seam for dual-path sensor nodes.
//!
//! Deployed nodes pair the optical link with a packet radio: telemetry that
//! cannot ride the light path (out of view, lamp off) falls back to the
//! radio. The modem does not drive any radio hardware itself; it only
//! defines the narrow [`RadioChannel`] seam the node firmware implements on
//! top of its radio stack, so the fragmentation layer and application code
//! stay transport-agnostic.

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Largest radio packet the seam carries.
pub const RADIO_MTU: usize = 255;

/// A received radio packet: application port plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioFrame {
    /// Application port the packet arrived on.
    pub port: u8,
    /// Packet payload.
    #[cfg(not(feature = "std"))]
    pub data: Vec<u8, RADIO_MTU>,
    /// Packet payload.
    #[cfg(feature = "std")]
    pub data: Vec<u8>,
}

/// A bidirectional packet radio link.
pub trait RadioChannel {
    /// Transport error type.
    type Error;

    /// Sends one packet on the given application port, blocking until the
    /// radio accepts it.
    fn send(&mut self, port: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Polls for a received packet. Returns `Ok(None)` when nothing is
    /// pending.
    fn receive(&mut self) -> Result<Option<RadioFrame>, Self::Error>;
}
