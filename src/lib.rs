//! Logic core for the T-Dongle-S3 MQTT display dongle.
//!
//! Everything in this crate is peripheral-free and builds on the host; the
//! firmware binary (behind the `embedded` feature) wires these pieces to the
//! radio, the panel, the status pixel and the button.

#![cfg_attr(not(test), no_std)]

pub mod carousel;
pub mod config;
pub mod fan;
pub mod link;
pub mod readings;
pub mod screen;
