//! Cross-language schema types shared between the native player coordinator
//! and the application layer.
//!
//! Everything here is plain data: serde-derived so it can cross the platform
//! channel unchanged, with no reference to any particular native engine.

#![deny(clippy::wildcard_imports)]

mod command;
mod media;
mod state;
mod tracks;

pub use command::Command;
pub use media::{DEFAULT_MIME_TYPE, MediaItem, MediaMetadata};
pub use state::{
    PlaybackLifecycle, PlaybackState, PlayerStateSnapshot, VideoSize, derive_playback_state,
};
pub use tracks::{AUTO_TRACK_ID, PlayerTracksSnapshot, Track, TrackType};
