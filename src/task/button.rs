use alloc::boxed::Box;
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel};
use embassy_time::{Duration, Timer};
use esp_hal::gpio;

// A press shorter than this is treated as contact bounce.
const CLICK_SETTLE: Duration = Duration::from_millis(30);

const CHANNEL_BACKLOG: usize = 4;

#[derive(Clone, Copy, Debug)]
pub struct Click;

pub type ClickChannel = &'static channel::Channel<NoopRawMutex, Click, CHANNEL_BACKLOG>;

pub fn init() -> ClickChannel {
    Box::leak(Box::new(channel::Channel::new()))
}

/// Debounces the boot button and reports one click per press.
#[embassy_executor::task]
pub async fn watch(pin: gpio::AnyPin<'static>, clicks: ClickChannel) {
    // The button is wired to GND, so idle is high.
    let mut button =
        gpio::Input::new(pin, gpio::InputConfig::default().with_pull(gpio::Pull::Up));

    loop {
        button.wait_for_falling_edge().await;
        Timer::after(CLICK_SETTLE).await;

        // Still held after the settle time: a real press, not bounce.
        if button.is_low() {
            clicks.send(Click).await;
            button.wait_for_rising_edge().await;
            Timer::after(CLICK_SETTLE).await;
        }
    }
}
