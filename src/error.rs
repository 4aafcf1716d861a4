//! Error taxonomy for the VLC modem.
//!
//! Bit- and byte-level anomalies (a lost sync pattern, a noise edge shorter
//! than the debounce window) are not errors: the decoder self-heals by
//! resynchronizing, so they never surface here. What does surface is caller
//! discipline (arming a frame while one is in flight, oversized payloads)
//! and fragmentation failures the caller can retry or abandon.

use thiserror::Error;

/// Errors raised by frame building and driver operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VlcError {
    /// The payload exceeds [`DATA_MAX`](crate::consts::DATA_MAX) bytes.
    #[error("payload exceeds the maximum frame data size")]
    PayloadTooLong,
    /// A transmit frame is already in flight. Arming a new frame before the
    /// previous one completed is a caller programming error; the in-flight
    /// frame is left untouched.
    #[error("a transmit frame is already in flight")]
    TxBusy,
    /// The operation does not match the role the driver was configured with.
    /// The role is fixed at construction and never switches at runtime.
    #[error("operation does not match the configured driver role")]
    WrongRole,
}

/// Errors raised during message fragmentation and reassembly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FragmentError<E> {
    /// The underlying frame link failed.
    #[error("frame link error")]
    Link(E),
    /// The reassembled message does not fit the caller's buffer.
    #[error("reassembly buffer overflow")]
    BufferOverflow,
    /// The fragment header bytes carrying the continuation flag are not
    /// valid hex characters.
    #[error("fragment header is not valid hex")]
    InvalidHeader,
}
