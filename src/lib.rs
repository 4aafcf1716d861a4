//! # softvlc
//!
//! A portable, no_std Rust driver for software-defined Visible Light Communication
//! (VLC): an LED/photodiode serial link driven entirely by a periodic timer tick.
//!
//! This driver implements a software VLC modem using:
//! - `embedded-hal` traits for the transmit pin and timing
//! - Manchester line coding so the receiver recovers the bit clock from the signal
//! - an ADC edge detector with oversampling and debounce for reception
//! - interrupt-safe driver access with `critical-section`
//! - optional tick sources using either timer interrupts or blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and replaces `heapless::Vec`s with `std::vec::Vec`s |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for bit timing |
//! | `timer-isr` (default) | Uses `critical_section::with` for bit timing |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Transmitter or receiver** in pure software (no UART or DMA); the role is
//!   fixed when the driver is constructed
//! - Manchester-coded 20-half-bit words with start/stop markers, so the bit
//!   stream realigns itself after noise
//! - Byte-oriented framing: `0xAA 0xAA 0xAA` preamble, `0xD5` sync, `0x02` start,
//!   payload, `0x03` end
//! - Message fragmentation across physical frames with a continuation flag
//! - Fully portable across AVR and ARM Cortex-M targets
//!
//! ## Usage
//!
//! ```ignore
//! use softvlc::driver::VlcDriver;
//!
//! let mut driver = VlcDriver::transmitter(tx_pin);
//! loop {
//!     driver.tick(); // Called once per half-bit (250 µs at 2 kHz half-bit rate)
//! }
//! ```
//!
//! Or, use `run_vlc_tick_loop()` with a `DelayNs` implementation:
//!
//! ```ignore
//! softvlc::timer::run_vlc_tick_loop(&mut driver, &mut delay, 250);
//! ```
//!
//! ## Integration Notes
//!
//! - The transmitter ticks once per half-bit; the receiver ticks `N` times per
//!   half-bit (oversampling, default 4). See [`timer::compare_value`].
//! - Timing precision is critical; jitter in the tick source corrupts decoding.
//! - Only one driver instance should be active at a time in interrupt-driven mode.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod fmt;

pub mod adc;
pub mod consts;
pub(crate) mod conv;
pub mod demod;
pub mod driver;
pub mod error;
pub mod fragment;
pub mod frame;
pub mod manchester;
pub mod radio;
pub mod timer;
