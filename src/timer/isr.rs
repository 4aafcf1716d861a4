use crate::adc::AdcChannel;
use crate::driver::VlcDriver;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

/// Used to initialize the global static `VlcDriver` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```ignore
/// use softvlc::adc::NoAdc;
/// use softvlc::driver::VlcDriver;
/// use softvlc::timer::global_vlc_driver_init;
/// use core::cell::RefCell;
/// use critical_section::Mutex;
/// use some_hal::PD1;
///
/// static VLC_DRIVER: Mutex<RefCell<Option<VlcDriver<PD1, NoAdc>>>> =
///     global_vlc_driver_init::<PD1, NoAdc>();
/// ```
pub const fn global_vlc_driver_init<TX: OutputPin, ADC: AdcChannel>()
-> Mutex<RefCell<Option<VlcDriver<TX, ADC>>>> {
    Mutex::new(RefCell::new(None))
}

/// Stores a constructed driver in the global singleton.
///
/// The driver is built first — [`VlcDriver::transmitter`] or
/// [`VlcDriver::receiver`] — then parked here before the timer interrupt is
/// unmasked, so the first tick already finds it.
///
/// # Example
/// ```ignore
/// fn main() {
///     let driver = VlcDriver::transmitter(tx);
///     global_vlc_driver_setup(&VLC_DRIVER, driver);
/// }
/// ```
pub fn global_vlc_driver_setup<TX: OutputPin, ADC: AdcChannel>(
    global_driver: &'static Mutex<RefCell<Option<VlcDriver<TX, ADC>>>>,
    driver: VlcDriver<TX, ADC>,
) {
    critical_section::with(|cs| {
        let _ = global_driver.borrow(cs).replace(Some(driver));
    });
}

/// Runs the tick at each interrupt
///
/// # Arguments
/// * The global static `VlcDriver`
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn TIM2() {
///     global_vlc_timer_tick(&VLC_DRIVER);
/// }
/// ```
pub fn global_vlc_timer_tick<TX: OutputPin, ADC: AdcChannel>(
    global_driver: &'static Mutex<RefCell<Option<VlcDriver<TX, ADC>>>>,
) {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.tick();
        }
    });
}
