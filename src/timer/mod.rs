//! Timer and tick-loop utilities for the VLC driver.
//!
//! Logic for setting up the modem clock. This employs two approaches: an
//! interrupt service routine using `critical_section::with` (`timer-isr`
//! feature), or a busy-loop delay timer (`delay-loop` feature).
//!
//! Contains helpers for polling- and ISR-based scheduling, including:
//! - `compare_value`: runtime timer-compare calculator
//! - `const_compare_value`: compile-time timer-compare calculator
//! - `run_vlc_tick_loop`: blocking driver loop for DelayNs (feature `delay-loop`)
//! - `global_vlc_timer_tick` and `tick_vlc_timer!()`: interrupt-based tick
//!   callback wrapper (feature `timer-isr`)
//!
//! A transmitter ticks once per half-bit; a receiver ticks `oversampling`
//! times per half-bit. Both rates derive from the same communication
//! frequency, so a node's timer setup differs only in the compare value:
//!
//! | Role        | Tick rate at 2 kHz, N = 4 | Compare at 14.7456 MHz / 8 |
//! |-------------|---------------------------|----------------------------|
//! | Transmitter |                     2 kHz |                        922 |
//! | Receiver    |                     8 kHz |                        230 |

use crate::driver::Role;
use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use macros::*;

/// Ticks per second a driver in the given role needs.
///
/// The communication frequency is the half-bit rate on the wire; a receiver
/// multiplies it by its oversampling factor.
pub const fn tick_rate(comm_hz: u32, role: Role, oversampling: u8) -> u32 {
    match role {
        Role::Transmitter => comm_hz,
        Role::Receiver => comm_hz * oversampling as u32,
    }
}

/// Tick interval in microseconds for the given role.
///
/// For driving [`run_vlc_tick_loop`] or a HAL timer configured by period
/// rather than by compare value. Rounds to the nearest microsecond.
pub const fn tick_micros(comm_hz: u32, role: Role, oversampling: u8) -> u32 {
    let rate = tick_rate(comm_hz, role, oversampling);
    (1_000_000 + rate / 2) / rate
}

/// Computes the timer compare value for a CTC-style hardware timer.
///
/// # Arguments
/// - `board_hz`: CPU/timer input frequency in Hz
/// - `prescaler`: timer prescaler (e.g. 8, 64, 256)
/// - `comm_hz`: half-bit rate on the wire
/// - `role`: transmitter or receiver
/// - `oversampling`: receiver samples per half-bit (ignored for transmitters)
///
/// # Returns
/// The compare value, rounded to the nearest integer.
///
/// ```rust
/// use softvlc::driver::Role;
/// use softvlc::timer::compare_value;
///
/// assert_eq!(compare_value(14_745_600, 8, 2_000, Role::Transmitter, 4), 922);
/// assert_eq!(compare_value(14_745_600, 8, 2_000, Role::Receiver, 4), 230);
/// ```
pub fn compare_value(
    board_hz: u32,
    prescaler: u32,
    comm_hz: u32,
    role: Role,
    oversampling: u8,
) -> u32 {
    let ticks_per_second = board_hz as f64 / prescaler as f64;
    round(ticks_per_second / tick_rate(comm_hz, role, oversampling) as f64) as u32
}

/// Compile-time timer compare calculator.
///
/// Integer arithmetic with half-rate rounding, for `const` timer setup:
///
/// ```rust
/// use softvlc::driver::Role;
/// use softvlc::timer::const_compare_value;
///
/// const TX_COMPARE: u32 = const_compare_value(14_745_600, 8, 2_000, Role::Transmitter, 4);
/// assert_eq!(TX_COMPARE, 922);
/// ```
pub const fn const_compare_value(
    board_hz: u32,
    prescaler: u32,
    comm_hz: u32,
    role: Role,
    oversampling: u8,
) -> u32 {
    let rate = tick_rate(comm_hz, role, oversampling);
    let ticks_per_second = board_hz / prescaler;
    (ticks_per_second + rate / 2) / rate
}
