use alloc::boxed::Box;
use embassy_time::{Duration, Timer};
use esp_hal::{peripherals, rng::Rng};
use esp_wifi::{
    EspWifiTimerSource,
    config::PowerSaveMode,
    wifi::{self, WifiState},
};
use t_dongle_display::config;

// How long to wait before attempting to reassociate after a failure.
const WIFI_RECONNECT_PAUSE: Duration = Duration::from_secs(5);

/// Initializes the WiFi in client mode.
///
/// Returns a WiFi controller and WiFi interfaces.
///
/// Sets the configured SSID and passphrase, and disables power save for
/// performance.
pub async fn init(
    timer: impl EspWifiTimerSource + 'static,
    radio_clocks: peripherals::RADIO_CLK<'static>,
    wifi: peripherals::WIFI<'static>,
    rng: Rng,
) -> Result<(wifi::WifiController<'static>, wifi::Interfaces<'static>), wifi::WifiError> {
    // Allow some time before initializing the (power-hungry) WiFi.
    Timer::after(Duration::from_millis(250)).await;

    let wifi_init =
        Box::leak::<'static>(Box::new(esp_wifi::init(timer, rng, radio_clocks).unwrap()));
    let (mut wifi_controller, wifi_interfaces) = esp_wifi::wifi::new(wifi_init, wifi)?;

    let wifi_client_config = wifi::ClientConfiguration {
        ssid: config::WIFI_SSID.try_into().unwrap(),
        password: config::WIFI_PASSWORD.try_into().unwrap(),
        ..Default::default()
    };
    wifi_controller.set_configuration(&wifi::Configuration::Client(wifi_client_config))?;

    // Disable power saving, can cause random packet delay and loss.
    wifi_controller.set_power_saving(PowerSaveMode::None)?;

    Ok((wifi_controller, wifi_interfaces))
}

/// Associates with the configured network and keeps reassociating after any
/// loss, forever. There is no attempt cap.
#[embassy_executor::task]
pub async fn permanent_connection(mut controller: wifi::WifiController<'static>) {
    log::info!("wifi: connecting to {}", config::WIFI_SSID);

    loop {
        // If we're still connected, wait until we disconnect.
        if wifi::wifi_state() == WifiState::StaConnected {
            controller
                .wait_for_event(wifi::WifiEvent::StaDisconnected)
                .await;
            log::warn!("wifi: association lost");
        }

        // Start the WiFi controller if necessary.
        if !matches!(controller.is_started(), Ok(true)) {
            log::debug!("wifi: starting controller");
            controller.start_async().await.unwrap();
        }

        match controller.connect_async().await {
            Ok(()) => log::info!("wifi: connected"),
            Err(error) => {
                log::warn!("wifi: connect error: {error:?}");
                Timer::after(WIFI_RECONNECT_PAUSE).await;
            }
        }
    }
}
