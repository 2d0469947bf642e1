//! Integration tests for the dongle's host-testable logic: the scenarios the
//! firmware's session loop runs through, driven without any hardware.

use t_dongle_display::carousel::{Carousel, Page};
use t_dongle_display::config;
use t_dongle_display::fan::FanCommand;
use t_dongle_display::link::{Link, LinkEvent, LinkState, LinkStep};
use t_dongle_display::readings::Readings;
use t_dongle_display::screen::Frame;

fn readings() -> Readings {
    Readings::new(config::TOPIC_INSIDE, config::TOPIC_OUTSIDE)
}

#[test]
fn an_inbound_temperature_shows_on_the_inside_page() {
    let mut store = readings();
    assert!(store.record(config::TOPIC_INSIDE, b"23.5"));

    let frame = Frame::compose(Page::Inside, &store, FanCommand::new().level());
    assert_eq!(frame.header, "Temp INSIDE:");
    assert_eq!(frame.value, "23.5");
}

#[test]
fn a_silent_topic_keeps_the_placeholder_forever() {
    let mut store = readings();
    // Plenty of traffic on the first topic, none ever on the second.
    for n in 0..50 {
        assert!(store.record(config::TOPIC_INSIDE, format!("{n}.0").as_bytes()));
    }
    assert_eq!(store.value(Page::Outside), "Waiting...");
}

#[test]
fn three_clicks_publish_the_expected_fan_sequence() {
    let mut fan = FanCommand::new();
    assert_eq!(fan.level().speed(), 10);

    let mut published = Vec::new();
    for _ in 0..3 {
        // What the session loop does per click: toggle, then publish the
        // new value as decimal text.
        let level = fan.toggle();
        published.push(level.as_text().as_str().to_owned());
    }
    assert_eq!(published, ["35", "10", "35"]);
    assert_eq!(fan.level().speed(), 35);
}

#[test]
fn the_carousel_walks_the_pages_while_messages_arrive() {
    let mut store = readings();
    let mut carousel = Carousel::new(config::PAGE_FLIP_INTERVAL_MS);

    store.record(config::TOPIC_INSIDE, b"21.0");
    store.record(config::TOPIC_OUTSIDE, b"-3.2");

    // First flip lands on the outside page.
    let page = carousel.poll(2000).expect("flip due");
    assert_eq!(page, Page::Outside);
    let frame = Frame::compose(page, &store, FanCommand::new().level());
    assert_eq!(frame.header, "Temp OUTSIDE:");
    assert_eq!(frame.value, "-3.2");

    // A fresh message replaces the value shown on the next flip back.
    store.record(config::TOPIC_INSIDE, b"22.8");
    let page = carousel.poll(4000).expect("flip due");
    assert_eq!(page, Page::Inside);
    assert_eq!(Frame::compose(page, &store, FanCommand::new().level()).value, "22.8");
}

#[test]
fn the_link_recovers_from_a_dropped_broker() {
    let mut link = Link::new();

    // Boot: network first, then the broker handshake.
    assert_eq!(link.step(), LinkStep::AwaitNetwork);
    link.on(LinkEvent::NetworkUp);
    assert_eq!(link.step(), LinkStep::Handshake);
    link.on(LinkEvent::SessionOpened);
    assert_eq!(link.step(), LinkStep::Poll);

    // Broker drops: retry immediately, get refused, wait out the pause,
    // re-verify the network, handshake again.
    link.on(LinkEvent::SessionLost);
    assert_eq!(link.step(), LinkStep::Handshake);
    link.on(LinkEvent::SessionRefused);
    assert_eq!(link.step(), LinkStep::Pause);
    link.on(LinkEvent::RetryElapsed);
    assert_eq!(link.step(), LinkStep::AwaitNetwork);
    link.on(LinkEvent::NetworkUp);
    link.on(LinkEvent::SessionOpened);
    assert_eq!(link.state(), LinkState::Connected);
}

#[test]
fn messages_on_foreign_topics_never_reach_the_panel() {
    let mut store = readings();
    store.record(config::TOPIC_FAN, b"35");
    store.record("/T9602-1/temperature", b"99.9");

    for page in [Page::Inside, Page::Outside] {
        assert_eq!(store.value(page), "Waiting...");
    }
}
