#![no_std]
#![no_main]
#![feature(impl_trait_in_assoc_type)]

extern crate alloc;

mod task;
mod tft;

use embassy_executor::{SpawnError, Spawner};
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio;
use esp_hal::spi;
use esp_hal::time::Rate;
use esp_hal::timer::systimer::SystemTimer;
use esp_hal::timer::timg::TimerGroup;

// NOTES
// - esp_println sends prints to 'jtag-serial' via the USB port

const BANNER: &str =
    const_format::formatcp!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    let esp_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(esp_config);
    esp_alloc::heap_allocator!(size: 72 * 1024);
    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);
    let rng = esp_hal::rng::Rng::new(peripherals.RNG);
    let timer1 = TimerGroup::new(peripherals.TIMG0);

    esp_println::logger::init_logger(log::LevelFilter::Info);
    log::info!("{BANNER} starting");

    //
    // T-Dongle-S3 pinout
    //
    let output_config = gpio::OutputConfig::default();
    // G0 reads the boot button, which pulls the line to GND when pressed.
    let pin_button = peripherals.GPIO0;
    // ST7735 panel on SPI2.
    let pin_tft_sda = peripherals.GPIO3;
    let pin_tft_scl = peripherals.GPIO5;
    let pin_tft_cs = gpio::Output::new(peripherals.GPIO4, gpio::Level::High, output_config);
    let pin_tft_dc = gpio::Output::new(peripherals.GPIO2, gpio::Level::Low, output_config);
    let pin_tft_res = gpio::Output::new(peripherals.GPIO1, gpio::Level::High, output_config);
    // The panel backlight is active low. Keep the handle so the pin stays driven.
    let _pin_tft_backlight = gpio::Output::new(peripherals.GPIO38, gpio::Level::Low, output_config);
    // APA102 status pixel on SPI3, data on G40, clock on G39.
    let pin_led_di = peripherals.GPIO40;
    let pin_led_ci = peripherals.GPIO39;

    // Bring up the panel; it holds the boot splash until the first page flip.
    let display = tft::init(
        peripherals.SPI2,
        pin_tft_scl,
        pin_tft_sda,
        pin_tft_cs,
        pin_tft_dc,
        pin_tft_res,
    );

    // SPI bus for the status pixel.
    let led_spi = spi::master::Spi::new(
        peripherals.SPI3,
        spi::master::Config::default()
            .with_frequency(Rate::from_mhz(1))
            .with_mode(spi::Mode::_0),
    )
    .unwrap()
    .with_sck(pin_led_ci)
    .with_mosi(pin_led_di);

    // Set up the WiFi.
    let (wifi_controller, wifi_interfaces) =
        task::wifi::init(timer1.timer0, peripherals.RADIO_CLK, peripherals.WIFI, rng)
            .await
            .unwrap();

    // Set up the network stack.
    let (net_stack, net_runner) = task::net::init(wifi_interfaces.sta, rng);

    // Get a shareable channel carrying button clicks to the session loop.
    let click_channel = task::button::init();

    //
    // Spawn tasks.
    || -> Result<(), SpawnError> {
        // Keep the wifi connected.
        spawner.spawn(task::wifi::permanent_connection(wifi_controller))?;

        // Run the network stack.
        spawner.spawn(task::net::stack_runner(net_runner))?;

        // Watch the boot button for clicks.
        spawner.spawn(task::button::watch(pin_button.into(), click_channel))?;

        // Cycle the status pixel's hue.
        spawner.spawn(task::led::status_pixel(led_spi))?;

        // Run the broker session, the carousel and the panel.
        spawner.spawn(task::session::run(net_stack, display, click_channel))?;

        Ok(())
    }()
    .unwrap();
}
