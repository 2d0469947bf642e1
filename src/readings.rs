//! Last-received values for the two subscribed topics.

use crate::{carousel::Page, config};
use heapless::String;

/// Longest value kept per topic. The panel fits about sixteen of the large
/// glyphs; anything longer is cut at a char boundary.
pub const VALUE_CAP: usize = 48;

pub type Value = String<VALUE_CAP>;

struct Reading {
    topic: &'static str,
    value: Value,
}

/// Holds the most recent payload per subscribed topic, nothing older.
pub struct Readings {
    inside: Reading,
    outside: Reading,
}

impl Readings {
    pub fn new(inside_topic: &'static str, outside_topic: &'static str) -> Self {
        Readings {
            inside: Reading {
                topic: inside_topic,
                value: bounded(config::WAITING_VALUE),
            },
            outside: Reading {
                topic: outside_topic,
                value: bounded(config::WAITING_VALUE),
            },
        }
    }

    /// Stores `payload` as the latest value for `topic`.
    ///
    /// Messages on topics other than the two configured ones are dropped, as
    /// are payloads that aren't text. Empty payloads are stored as-is.
    pub fn record(&mut self, topic: &str, payload: &[u8]) -> bool {
        let Ok(text) = core::str::from_utf8(payload) else {
            log::debug!("readings: non-text payload on {topic} dropped");
            return false;
        };

        let reading = if topic == self.inside.topic {
            &mut self.inside
        } else if topic == self.outside.topic {
            &mut self.outside
        } else {
            log::debug!("readings: message on unhandled topic {topic}");
            return false;
        };

        reading.value = bounded(text);
        true
    }

    pub fn value(&self, page: Page) -> &str {
        match page {
            Page::Inside => &self.inside.value,
            Page::Outside => &self.outside.value,
        }
    }
}

/// Copies `text` into a bounded value, cutting at a char boundary if needed.
fn bounded(text: &str) -> Value {
    let mut value = Value::new();
    for ch in text.chars() {
        if value.push(ch).is_err() {
            break;
        }
    }
    value
}
