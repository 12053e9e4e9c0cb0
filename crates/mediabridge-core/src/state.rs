use serde::{Deserialize, Serialize};

use crate::media::MediaItem;

/// Playback state exposed to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Abstract native lifecycle state.
///
/// Platform adapters map their engine's lifecycle into this enum so the
/// playing/buffering derivation lives in exactly one place. An engine that is
/// waiting only because nothing is queued maps to `Idle`, not `Buffering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackLifecycle {
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// Derives the canonical playback state from the native engine's view.
///
/// The naive native "is playing" flag goes false while buffering even though
/// the playback intent is still active, so buffering-with-intent is reported
/// as `Playing`; buffering itself is surfaced separately on the snapshot.
pub fn derive_playback_state(
    is_playing: bool,
    play_when_ready: bool,
    lifecycle: PlaybackLifecycle,
) -> PlaybackState {
    let intent_active = play_when_ready
        && !matches!(
            lifecycle,
            PlaybackLifecycle::Ended | PlaybackLifecycle::Idle
        );
    if is_playing || intent_active {
        PlaybackState::Playing
    } else {
        PlaybackState::Paused
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

/// Fully-derived view of one player, recomputed from the native engine on
/// every request and safe to compute repeatedly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStateSnapshot {
    pub player_id: String,
    pub current_media_item: Option<MediaItem>,
    pub playback_position_ms: f64,
    pub playback_state: PlaybackState,
    pub playback_speed: f64,
    pub is_buffering: bool,
    pub is_fullscreen: bool,
    pub video_size: Option<VideoSize>,
}
