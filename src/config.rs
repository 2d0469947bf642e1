//! Compile-time device configuration.
//!
//! Credentials and the broker address are baked in at build time: set the
//! `DONGLE_*` environment variables when building, or edit the defaults.

const fn from_env(value: Option<&'static str>, default: &'static str) -> &'static str {
    match value {
        Some(value) => value,
        None => default,
    }
}

// WiFi credentials.
pub const WIFI_SSID: &str = from_env(option_env!("DONGLE_WIFI_SSID"), "");
pub const WIFI_PASSWORD: &str = from_env(option_env!("DONGLE_WIFI_PASSWORD"), "");

// MQTT broker. The host may be a dotted-quad address or a DNS name.
pub const BROKER_HOST: &str = from_env(option_env!("DONGLE_BROKER_HOST"), "");
pub const BROKER_PORT: u16 = 1883;
pub const MQTT_CLIENT_ID: &str = "t-dongle-s3";
pub const MQTT_USERNAME: &str = from_env(option_env!("DONGLE_MQTT_USERNAME"), "");
pub const MQTT_PASSWORD: &str = from_env(option_env!("DONGLE_MQTT_PASSWORD"), "");

// One subscription per displayed value, plus the fan command output.
pub const TOPIC_INSIDE: &str = "/T9602-1/temp";
pub const TOPIC_OUTSIDE: &str = "/T9602/temp";
pub const TOPIC_FAN: &str = "fan01";

/// Shown for a topic until its first message arrives.
pub const WAITING_VALUE: &str = "Waiting...";

// Timing.
pub const PAGE_FLIP_INTERVAL_MS: u32 = 2000;
pub const LED_FRAME_MS: u64 = 50;
pub const RECONNECT_PAUSE_MS: u64 = 5000;
