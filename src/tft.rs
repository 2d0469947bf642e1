//! Bring-up for the onboard 80x160 ST7735 panel, run in landscape.

use alloc::boxed::Box;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Blocking,
    delay::Delay,
    gpio, peripherals,
    spi::{self, master::Spi},
    time::Rate,
};
use mipidsi::{
    Builder, Display,
    interface::SpiInterface,
    models::ST7735s,
    options::{ColorInversion, Orientation, Rotation},
};
use t_dongle_display::screen;

pub type Tft = Display<
    SpiInterface<
        'static,
        ExclusiveDevice<Spi<'static, Blocking>, gpio::Output<'static>, Delay>,
        gpio::Output<'static>,
    >,
    ST7735s,
    gpio::Output<'static>,
>;

const TFT_SPI_FREQ_MHZ: u32 = 26;
// Pixel data is staged here before going out on the bus.
const TFT_SPI_BUFFER: usize = 512;
// The visible 80x160 area sits offset inside the controller's RAM.
const TFT_OFFSET: (u16, u16) = (26, 1);

pub fn init(
    spi: peripherals::SPI2<'static>,
    pin_scl: peripherals::GPIO5<'static>,
    pin_sda: peripherals::GPIO3<'static>,
    pin_cs: gpio::Output<'static>,
    pin_dc: gpio::Output<'static>,
    pin_res: gpio::Output<'static>,
) -> Tft {
    let spi = Spi::new(
        spi,
        spi::master::Config::default()
            .with_frequency(Rate::from_mhz(TFT_SPI_FREQ_MHZ))
            .with_mode(spi::Mode::_0),
    )
    .unwrap()
    .with_sck(pin_scl)
    .with_mosi(pin_sda);

    let spi_device = ExclusiveDevice::new(spi, pin_cs, Delay::new()).unwrap();
    let buffer = Box::leak::<'static>(Box::new([0u8; TFT_SPI_BUFFER]));
    let interface = SpiInterface::new(spi_device, pin_dc, buffer);

    let mut delay = Delay::new();
    let mut display = Builder::new(ST7735s, interface)
        .reset_pin(pin_res)
        .display_size(80, 160)
        .display_offset(TFT_OFFSET.0, TFT_OFFSET.1)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Inverted)
        .init(&mut delay)
        .unwrap();

    // Boot splash, stays up until the first page flip.
    screen::draw_splash(&mut display).unwrap();

    display
}
