/// Declares a static global `VLC_DRIVER` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `VLC_DRIVER` suitable for use in
/// interrupt-based environments, where both the main thread and an ISR need
/// to safely access the shared driver state.
///
/// # Arguments
/// - `$tx`: The concrete type of the TX pin (must implement `OutputPin`;
///   [`NoPin`](crate::driver::NoPin) for receiver-only nodes)
/// - `$adc`: The concrete type of the ADC channel (must implement
///   [`AdcChannel`](crate::adc::AdcChannel); [`NoAdc`](crate::adc::NoAdc)
///   for transmitter-only nodes)
///
/// # Example
/// ```ignore
/// init_vlc_driver!(MyTxPinType, NoAdc);
/// ```
#[macro_export]
macro_rules! init_vlc_driver {
    ( $tx:ty, $adc:ty ) => {
        pub static VLC_DRIVER: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::driver::VlcDriver<$tx, $adc>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Installs a constructed driver into the global `VLC_DRIVER` singleton.
///
/// This macro parks a `VlcDriver` — built with `VlcDriver::transmitter` or
/// `VlcDriver::receiver` — inside the globally declared `VLC_DRIVER` created
/// by `init_vlc_driver!`.
///
/// # Example
/// ```ignore
/// fn main() {
///     setup_vlc_driver!(VlcDriver::transmitter(tx));
/// }
/// ```
///
/// # Notes
/// - Must be called inside a critical section-aware context (safe in `main()`).
/// - Requires `init_vlc_driver!` to have been used earlier.
#[macro_export]
macro_rules! setup_vlc_driver {
    ( $driver:expr ) => {
        $crate::critical_section::with(|cs| {
            let _ = VLC_DRIVER.borrow(cs).replace(Some($driver));
        });
    };
}

/// Calls `tick()` on the global `VLC_DRIVER` if it has been initialized.
///
/// This macro is intended to be invoked from a timer ISR or scheduler to
/// advance the modem state machine at regular intervals (every 500 µs for a
/// 2 kHz transmitter, every 125 µs for a receiver oversampling at 4).
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn TIM2() {
///     tick_vlc_timer!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `VLC_DRIVER` was declared with `init_vlc_driver!`
///   and initialized via `setup_vlc_driver!`.
/// - Safe to call repeatedly — will silently do nothing if the driver hasn't
///   been set up yet.
#[macro_export]
macro_rules! tick_vlc_timer {
    () => {
        $crate::critical_section::with(|cs| {
            if let Some(driver) = VLC_DRIVER.borrow(cs).borrow_mut().as_mut() {
                driver.tick();
            }
        });
    };
}
