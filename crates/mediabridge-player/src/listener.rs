//! Outbound callback surface toward the application layer.

use mediabridge_core::{MediaItem, PlaybackState, PlayerStateSnapshot};

/// Receives player callbacks on the coordinator's control thread.
///
/// All methods default to no-ops so implementors only override what they
/// consume. Callbacks are invoked synchronously from the control thread;
/// implementations must not block.
pub trait PlaybackListener: Send + Sync + 'static {
    /// Full state snapshot. Pushed after every state-affecting command,
    /// after relevant native notifications, and on the periodic refresh.
    fn on_player_state_update(&self, snapshot: PlayerStateSnapshot) {
        let _ = snapshot;
    }

    /// The current item changed. `None` means playback ran off the end of
    /// the queue.
    fn on_media_item_transition(&self, item: Option<MediaItem>) {
        let _ = item;
    }

    /// Derived playing/paused state changed, with the current buffering
    /// flag.
    fn on_playback_state_changed(&self, state: PlaybackState, is_buffering: bool) {
        let _ = (state, is_buffering);
    }

    /// Playback position jumped outside normal progression (seek or item
    /// change).
    fn on_position_discontinuity(&self, position_ms: f64) {
        let _ = position_ms;
    }

    /// The current item played to its end.
    fn on_playback_ended(&self, item: Option<MediaItem>) {
        let _ = item;
    }

    fn on_picture_in_picture_mode_changed(&self, active: bool) {
        let _ = active;
    }
}
