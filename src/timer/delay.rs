use crate::adc::AdcChannel;
use crate::driver::VlcDriver;
use embedded_hal::delay::DelayNs;

/// Runs a blocking loop that repeatedly calls `tick()` on the provided VLC driver.
///
/// This is a simple timing loop for use in environments where interrupts are
/// unavailable or undesired. It drives the modem's timing using a delay
/// provider implementing `embedded_hal::delay::DelayNs`.
///
/// # Arguments
/// - `driver`: A mutable reference to a `VlcDriver` instance.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `tick_us`: The delay between each tick call, in microseconds; see
///   [`tick_micros`](crate::timer::tick_micros) (500 for a 2 kHz transmitter,
///   125 for a receiver oversampling at 4).
///
/// # Example
/// ```ignore
/// use softvlc::timer::run_vlc_tick_loop;
/// let mut driver = VlcDriver::transmitter(tx);
/// run_vlc_tick_loop(&mut driver, &mut delay, 500);
/// ```
///
/// # Notes
/// - This loop will never return; it is intended for single-purpose polling firmware.
/// - For more efficient or concurrent applications, prefer interrupt-driven
///   tick scheduling.
/// - The delay accounts for none of `tick()`'s own execution time, so the
///   effective rate runs slightly slow; prefer a hardware timer where drift
///   matters.
pub fn run_vlc_tick_loop<D: DelayNs, TX, ADC>(
    driver: &mut VlcDriver<TX, ADC>,
    delay: &mut D,
    tick_us: u32,
) where
    TX: embedded_hal::digital::OutputPin,
    ADC: AdcChannel,
{
    loop {
        driver.tick();
        delay.delay_us(tick_us);
    }
}
