//! Player-state synchronization and track-selection core.
//!
//! Each active player instance is driven by one [`coordinator`] control
//! thread sitting between a [`adapter::NativePlayerAdapter`] (the per-OS
//! native engine) and a [`listener::PlaybackListener`] (the application
//! layer). Commands arrive through a [`PlayerHandle`]; native state-change
//! callbacks are marshaled through the same control thread so the listener
//! observes a consistent ordering of events.

#![deny(clippy::wildcard_imports)]

pub mod adapter;
mod config;
pub mod coordinator;
mod error;
pub mod listener;
pub mod media_item;

pub use config::PlayerConfig;
pub use coordinator::{CommandResponse, PlayerHandle, start_player};
pub use error::PlayerError;
