//! Bidirectional mapping between the portable [`MediaItem`] model and the
//! native engine's item representation.
//!
//! Native metadata entry bags cannot carry typed side-channel data, so the
//! mime type and live flag travel as reserved marker entries and portable
//! extras are namespaced under [`EXTRAS_PREFIX`]. The reverse mapping strips
//! the namespace and never reports native-origin entries as extras.

use std::collections::HashMap;

use mediabridge_core::{DEFAULT_MIME_TYPE, MediaItem, MediaMetadata};

use crate::adapter::{NativeMediaItem, NativeMetadata};

/// Namespace prefix applied to every portable extras key before embedding.
pub const EXTRAS_PREFIX: &str = "media.bridge.extras.";
/// Reserved entry carrying the item's declared mime type.
pub const MIME_TYPE_KEY: &str = "media.bridge.player.mime_type";
/// Reserved entry present (as `"true"`) only on live streams.
pub const IS_LIVE_KEY: &str = "media.bridge.player.is_live";

/// Embeds a portable item into the native representation.
///
/// The mime marker is always written; the live marker only for live items,
/// so its absence reads back as not-live.
pub fn to_native(item: &MediaItem) -> NativeMediaItem {
    let mut entries = HashMap::with_capacity(item.metadata.extras.len() + 2);
    entries.insert(MIME_TYPE_KEY.to_string(), item.mime_type.clone());
    if item.is_live {
        entries.insert(IS_LIVE_KEY.to_string(), "true".to_string());
    }
    for (key, value) in &item.metadata.extras {
        entries.insert(format!("{EXTRAS_PREFIX}{key}"), value.clone());
    }

    NativeMediaItem {
        url: item.url.clone(),
        mime_type: Some(item.mime_type.clone()),
        metadata: NativeMetadata {
            title: item.metadata.title.clone(),
            artist: item.metadata.artist.clone(),
            artwork_uri: item.metadata.artwork_uri.clone(),
            entries,
        },
    }
}

/// Recovers a portable item from the native representation.
///
/// `duration_ms` is caller-provided because only the currently playing item
/// has a known duration; queued items map with `None`.
pub fn from_native(native: &NativeMediaItem, duration_ms: Option<f64>) -> MediaItem {
    let entries = &native.metadata.entries;
    let extras: HashMap<String, String> = entries
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(EXTRAS_PREFIX)
                .map(|stripped| (stripped.to_string(), value.clone()))
        })
        .collect();

    let mime_type = entries
        .get(MIME_TYPE_KEY)
        .cloned()
        .or_else(|| native.mime_type.clone())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
    let is_live = entries.get(IS_LIVE_KEY).is_some_and(|v| v == "true");

    MediaItem {
        url: native.url.clone(),
        mime_type,
        is_live,
        metadata: MediaMetadata {
            title: native.metadata.title.clone(),
            artist: native.metadata.artist.clone(),
            artwork_uri: native.metadata.artwork_uri.clone(),
            duration_ms,
            extras,
        },
        playback_start_position_ms: None,
    }
}
