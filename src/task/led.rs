use apa102_spi::{Apa102, PixelOrder};
use embassy_time::{Duration, Timer};
use esp_hal::{Blocking, spi::master::Spi};
use smart_leds::{
    SmartLedsWrite,
    hsv::{Hsv, hsv2rgb},
};
use t_dongle_display::config;

const LED_FRAME: Duration = Duration::from_millis(config::LED_FRAME_MS);

// Brightness cap for the status pixel; full white right next to the panel
// is blinding.
const PIXEL_VALUE: u8 = 100;

/// Cycles the status pixel's hue forever.
///
/// Owns the hue counter outright and shares no state with the other tasks.
#[embassy_executor::task]
pub async fn status_pixel(spi: Spi<'static, Blocking>) {
    // The onboard APA102 expects blue-green-red pixel order.
    let mut pixel = Apa102::new_with_options(spi, 4, false, PixelOrder::BGR);

    let mut hue: u8 = 0;
    loop {
        let color = hsv2rgb(Hsv {
            hue,
            sat: 255,
            val: PIXEL_VALUE,
        });
        // An SPI write to the pixel does not fail.
        pixel.write(core::iter::once(color)).unwrap();

        hue = hue.wrapping_add(1);
        Timer::after(LED_FRAME).await;
    }
}
