use serde::{Deserialize, Serialize};

use crate::media::MediaItem;
use crate::tracks::TrackType;

/// Commands the application layer issues against one player instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Play,
    Pause,
    SeekTo {
        position_ms: f64,
    },
    /// Clamped to `[0, 1]` before dispatch.
    SetVolume {
        volume: f64,
    },
    SetPlaybackSpeed {
        speed: f64,
    },
    ReplaceCurrentMediaItem {
        item: MediaItem,
        autoplay: bool,
    },
    /// Appends to the native queue without altering current playback.
    QueueMediaItem {
        item: MediaItem,
    },
    /// `reset` clears the whole native queue; otherwise playback is paused in
    /// place, retaining position and queue.
    Stop {
        reset: bool,
    },
    /// `track_id` of `None` disables the track type entirely; `"auto"`
    /// returns selection to the native default heuristics.
    SetSelectedTrack {
        track_type: TrackType,
        track_id: Option<String>,
    },
    SetSelectedTrackByLanguage {
        track_type: TrackType,
        language: String,
    },
    SetFullscreen {
        is_fullscreen: bool,
    },
    Shutdown,
}
