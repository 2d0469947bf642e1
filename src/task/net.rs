use alloc::boxed::Box;
use embassy_net as net;
use esp_hal::rng::Rng;
use esp_wifi::wifi;
use t_dongle_display::config;

/// Maximum number of sockets to allocate memory for: the broker session, a
/// DNS lookup, and one spare.
const NET_SOCKETS: usize = 3;

pub fn init(
    driver: wifi::WifiDevice<'static>,
    mut rng: Rng,
) -> (
    net::Stack<'static>,
    net::Runner<'static, wifi::WifiDevice<'static>>,
) {
    // IPv4 + DHCP, announcing the dongle's name to the router.
    let mut dhcp_config = net::DhcpConfig::default();
    dhcp_config.hostname = heapless::String::try_from(config::MQTT_CLIENT_ID).ok();
    let net_config = net::Config::dhcpv4(dhcp_config);

    // Memory resources for the network stack.
    let net_resources = Box::leak::<'static>(Box::new(net::StackResources::<NET_SOCKETS>::new()));

    let seed_64b = (rng.random() as u64) << 32 | rng.random() as u64;
    net::new(driver, net_config, net_resources, seed_64b)
}

/// Drives the network stack.
#[embassy_executor::task]
pub async fn stack_runner(mut runner: net::Runner<'static, wifi::WifiDevice<'static>>) {
    runner.run().await
}
