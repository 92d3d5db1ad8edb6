// High-level overview:
//
// Protocol:              tcp/5577 frames
// Library Concept:  client <-------------> controller <--------> leds
//
// Implementing Binary:  magichome-shell (interactive debugging)
//
// A `DeviceClient` owns one `Connection` to one controller. Every operation
// encodes a `protocol::Command` into a frame and hands it to the connection,
// which reopens the session first when it was closed or has gone stale.

pub mod args;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod levels;
pub mod protocol;

pub use client::DeviceClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use levels::{ChannelLevels, Preset, PresetSelector};
