//! State snapshot assembly.

use mediabridge_core::{PlaybackLifecycle, PlayerStateSnapshot, derive_playback_state};

use crate::adapter::NativePlayerAdapter;
use crate::media_item;

use super::CoordinatorState;

/// Rebuilds the full state snapshot from live adapter queries. Nothing here
/// is cached; the adapter is the single source of truth for playback state.
pub(super) fn build_state_snapshot(
    state: &CoordinatorState,
    adapter: &dyn NativePlayerAdapter,
) -> PlayerStateSnapshot {
    let current_media_item = adapter
        .current_item()
        .map(|native| media_item::from_native(&native, adapter.duration_ms()));
    let lifecycle = adapter.lifecycle();
    let playback_state =
        derive_playback_state(adapter.is_playing(), adapter.play_when_ready(), lifecycle);

    PlayerStateSnapshot {
        player_id: state.player_id.clone(),
        current_media_item,
        playback_position_ms: adapter.position_ms(),
        playback_state,
        playback_speed: adapter.playback_speed(),
        is_buffering: lifecycle == PlaybackLifecycle::Buffering,
        is_fullscreen: state.is_fullscreen,
        video_size: adapter
            .video_size()
            .filter(|size| size.width > 0 && size.height > 0),
    }
}
