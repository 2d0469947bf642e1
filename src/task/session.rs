use crate::{
    task::button::{Click, ClickChannel},
    tft::Tft,
};
use embassy_futures::select::{Either4, select4};
use embassy_net::{
    IpAddress, Stack,
    dns::DnsQueryType,
    tcp::{ConnectError, TcpSocket},
};
use embassy_time::{Duration, Instant, Ticker, Timer};
use rust_mqtt::{
    client::{
        client::MqttClient,
        client_config::{ClientConfig, MqttVersion},
    },
    packet::v5::{publish_packet::QualityOfService, reason_codes::ReasonCode},
    utils::rng_generator::CountingRng,
};
use t_dongle_display::{
    carousel::Carousel,
    config,
    fan::FanCommand,
    link::{Link, LinkEvent, LinkState, LinkStep},
    readings::Readings,
    screen,
};
use thiserror::Error;

// Socket and client buffer sizes; the payloads here are tiny.
const TCP_BUFFER: usize = 1024;
const MQTT_BUFFER: usize = 512;
// How often the carousel is given a chance to flip.
const FLIP_POLL: Duration = Duration::from_millis(100);
// Keeps an otherwise idle session inside the broker's keep-alive window.
const PING_INTERVAL: Duration = Duration::from_secs(30);

const RECONNECT_PAUSE: Duration = Duration::from_millis(config::RECONNECT_PAUSE_MS);

#[derive(Debug, Error)]
enum SessionError {
    #[error("broker lookup failed")]
    Lookup,
    #[error("tcp connect failed: {0:?}")]
    Connect(ConnectError),
    #[error("mqtt failure: {0:?}")]
    Mqtt(ReasonCode),
}

enum Wake {
    Inbound,
    FlipTick,
    ButtonClick,
    PingTick,
}

/// The dongle's main loop.
///
/// Keeps the broker session alive forever and owns everything the panel
/// shows: the readings, the carousel, the fan command and the display
/// handle. Inbound messages are dispatched here, never concurrently with
/// the rest of the loop body.
#[embassy_executor::task]
pub async fn run(stack: Stack<'static>, mut display: Tft, clicks: ClickChannel) {
    let mut readings = Readings::new(config::TOPIC_INSIDE, config::TOPIC_OUTSIDE);
    let mut carousel = Carousel::new(config::PAGE_FLIP_INTERVAL_MS);
    let mut fan = FanCommand::new();
    let mut link = Link::new();

    loop {
        match link.step() {
            LinkStep::AwaitNetwork => {
                stack.wait_config_up().await;
                if let Some(ip_config) = stack.config_v4() {
                    log::info!("net: up, address {}", ip_config.address);
                }
                link.on(LinkEvent::NetworkUp);
            }
            LinkStep::Handshake | LinkStep::Poll => {
                log::info!(
                    "session: connecting to {}:{}",
                    config::BROKER_HOST,
                    config::BROKER_PORT
                );
                let error = session(
                    stack,
                    &mut display,
                    clicks,
                    &mut readings,
                    &mut carousel,
                    &mut fan,
                    &mut link,
                )
                .await;

                if !stack.is_link_up() {
                    log::warn!("session: network went away: {error}");
                    link.on(LinkEvent::NetworkLost);
                } else if link.state() == LinkState::Connected {
                    log::warn!("session: lost: {error}");
                    link.on(LinkEvent::SessionLost);
                } else {
                    log::warn!(
                        "session: refused: {error}, retrying in {}s",
                        RECONNECT_PAUSE.as_secs()
                    );
                    link.on(LinkEvent::SessionRefused);
                }
            }
            LinkStep::Pause => {
                Timer::after(RECONNECT_PAUSE).await;
                link.on(LinkEvent::RetryElapsed);
            }
        }
    }
}

/// Runs one broker session to completion: handshake, subscriptions, then the
/// poll loop until something fails.
async fn session(
    stack: Stack<'static>,
    display: &mut Tft,
    clicks: ClickChannel,
    readings: &mut Readings,
    carousel: &mut Carousel,
    fan: &mut FanCommand,
    link: &mut Link,
) -> SessionError {
    let mut rx_buffer = [0u8; TCP_BUFFER];
    let mut tx_buffer = [0u8; TCP_BUFFER];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);

    let address = match resolve(stack, config::BROKER_HOST).await {
        Ok(address) => address,
        Err(error) => return error,
    };
    if let Err(error) = socket.connect((address, config::BROKER_PORT)).await {
        return SessionError::Connect(error);
    }

    let mut mqtt_config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
    mqtt_config.add_client_id(config::MQTT_CLIENT_ID);
    if !config::MQTT_USERNAME.is_empty() {
        mqtt_config.add_username(config::MQTT_USERNAME);
        mqtt_config.add_password(config::MQTT_PASSWORD);
    }
    mqtt_config.max_packet_size = MQTT_BUFFER as u32;

    let mut write_buffer = [0u8; MQTT_BUFFER];
    let mut recv_buffer = [0u8; MQTT_BUFFER];
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut write_buffer,
        MQTT_BUFFER,
        &mut recv_buffer,
        MQTT_BUFFER,
        mqtt_config,
    );

    if let Err(reason) = client.connect_to_broker().await {
        return SessionError::Mqtt(reason);
    }
    for topic in [config::TOPIC_INSIDE, config::TOPIC_OUTSIDE] {
        if let Err(reason) = client.subscribe_to_topic(topic).await {
            return SessionError::Mqtt(reason);
        }
    }
    log::info!(
        "session: connected, subscribed to {} and {}",
        config::TOPIC_INSIDE,
        config::TOPIC_OUTSIDE
    );
    link.on(LinkEvent::SessionOpened);

    poll(&mut client, display, clicks, readings, carousel, fan).await
}

/// Multiplexes the connected session: inbound messages, carousel flips,
/// button clicks and keep-alive pings. Returns only on failure.
async fn poll(
    client: &mut MqttClient<'_, TcpSocket<'_>, 5, CountingRng>,
    display: &mut Tft,
    clicks: ClickChannel,
    readings: &mut Readings,
    carousel: &mut Carousel,
    fan: &mut FanCommand,
) -> SessionError {
    let mut flip_tick = Ticker::every(FLIP_POLL);
    let mut ping_tick = Ticker::every(PING_INTERVAL);

    loop {
        // Two phases: the select arm that received a message stores it while
        // the client is still borrowed, everything else acts afterwards.
        let wake = match select4(
            client.receive_message(),
            flip_tick.next(),
            clicks.receive(),
            ping_tick.next(),
        )
        .await
        {
            Either4::First(inbound) => match inbound {
                Ok((topic, payload)) => {
                    if readings.record(topic, payload) {
                        log::info!("session: {topic} updated");
                    }
                    Wake::Inbound
                }
                Err(reason) => return SessionError::Mqtt(reason),
            },
            Either4::Second(_) => Wake::FlipTick,
            Either4::Third(Click) => Wake::ButtonClick,
            Either4::Fourth(_) => Wake::PingTick,
        };

        match wake {
            Wake::Inbound => {}
            Wake::FlipTick => {
                let now_ms = Instant::now().as_millis() as u32;
                if let Some(page) = carousel.poll(now_ms) {
                    // Panel writes don't fail once the controller is up.
                    screen::Frame::compose(page, readings, fan.level())
                        .draw(display)
                        .unwrap();
                }
            }
            Wake::ButtonClick => {
                let level = fan.toggle();
                let payload = level.as_text();
                if let Err(reason) = client
                    .send_message(
                        config::TOPIC_FAN,
                        payload.as_bytes(),
                        QualityOfService::QoS0,
                        false,
                    )
                    .await
                {
                    return SessionError::Mqtt(reason);
                }
                log::info!("session: fan speed set to {level}");
                // Partial redraw: only the status block changed.
                screen::draw_fan_status(level, display).unwrap();
            }
            Wake::PingTick => {
                if let Err(reason) = client.send_ping().await {
                    return SessionError::Mqtt(reason);
                }
            }
        }
    }
}

async fn resolve(stack: Stack<'static>, host: &str) -> Result<IpAddress, SessionError> {
    // A dotted-quad host skips the DNS round trip.
    if let Ok(address) = host.parse::<core::net::Ipv4Addr>() {
        return Ok(IpAddress::Ipv4(address));
    }

    let addresses = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|_| SessionError::Lookup)?;
    addresses.first().copied().ok_or(SessionError::Lookup)
}
