use serde::{Deserialize, Serialize};

/// Sentinel track id that returns a track type to native automatic
/// selection.
pub const AUTO_TRACK_ID: &str = "auto";

/// Media characteristic a selectable track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackType {
    Audio,
    Text,
    Video,
}

/// One selectable rendition within a track type.
///
/// `id` is stable only for the lifetime of one loaded media item. Tracks the
/// native engine reports without any usable identifier are excluded from
/// snapshots entirely rather than surfaced with a synthetic id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub language: Option<String>,
    pub label: Option<String>,
    pub bitrate: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
    /// Computed against live native selection state, never stored.
    pub is_selected: bool,
}

/// Point-in-time view of the selectable tracks of the current media item.
///
/// Video tracks are ordered by descending height; audio and text follow the
/// native enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTracksSnapshot {
    pub player_id: String,
    pub audio_tracks: Vec<Track>,
    pub text_tracks: Vec<Track>,
    pub video_tracks: Vec<Track>,
}
