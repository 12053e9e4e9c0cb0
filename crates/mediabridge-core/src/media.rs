use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mime type assumed when the application layer does not provide one.
pub const DEFAULT_MIME_TYPE: &str = "application/x-mpegURL";

/// Canonical description of a playable source.
///
/// Constructed by the application layer, translated into a native-engine item
/// when loaded or queued, and translated back from the native item on every
/// transition and snapshot query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: String,
    pub mime_type: String,
    pub is_live: bool,
    pub metadata: MediaMetadata,
    /// Start offset applied when the item is loaded. Ignored for live
    /// content, and not expected to survive a round trip through the native
    /// metadata model.
    pub playback_start_position_ms: Option<f64>,
}

impl MediaItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            is_live: false,
            metadata: MediaMetadata::default(),
            playback_start_position_ms: None,
        }
    }
}

/// Descriptive metadata attached to a [`MediaItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artwork_uri: Option<String>,
    /// Populated only on the reverse mapping of the currently active native
    /// item; the duration of anything else is unknown or unreliable.
    pub duration_ms: Option<f64>,
    /// Flat application-defined bag. Embedded in the native metadata
    /// container under a reserved namespace prefix and required to round-trip
    /// losslessly through that namespacing.
    pub extras: HashMap<String, String>,
}
