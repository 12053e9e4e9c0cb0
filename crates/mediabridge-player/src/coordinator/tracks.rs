//! Track selection and tracks-snapshot assembly.

use tracing::debug;

use mediabridge_core::{AUTO_TRACK_ID, PlayerTracksSnapshot, Track, TrackType};

use crate::adapter::{NativePlayerAdapter, TrackFormat, TrackGroup};

/// Applies an explicit track selection.
///
/// `None` disables the whole track type; [`AUTO_TRACK_ID`] re-enables it and
/// returns selection to the engine's own heuristics; any other id pins the
/// matching rendition. When several groups expose the same id the last match
/// wins. An unknown id is a logged no-op.
pub(super) fn set_selected_track(
    adapter: &mut dyn NativePlayerAdapter,
    track_type: TrackType,
    track_id: Option<&str>,
) {
    let Some(track_id) = track_id else {
        adapter.set_track_type_disabled(track_type, true);
        return;
    };

    adapter.set_track_type_disabled(track_type, false);
    if track_id == AUTO_TRACK_ID {
        adapter.clear_track_overrides(track_type);
        return;
    }

    let mut selection: Option<(usize, usize)> = None;
    for (group_index, group) in typed_groups(adapter, track_type) {
        for (track_index, format) in group.formats.iter().enumerate() {
            if snapshot_track_id(format).as_deref() == Some(track_id) {
                selection = Some((group_index, track_index));
            }
        }
    }

    match selection {
        Some((group_index, track_index)) => {
            adapter.clear_track_overrides(track_type);
            adapter.set_track_override(track_type, group_index, track_index);
        }
        None => {
            debug!(?track_type, track_id, "no track matched requested id");
        }
    }
}

/// Pins the first group of `track_type` whose primary rendition declares
/// `language`. Returns whether a group matched.
pub(super) fn set_selected_track_by_language(
    adapter: &mut dyn NativePlayerAdapter,
    track_type: TrackType,
    language: &str,
) -> bool {
    for (group_index, group) in typed_groups(adapter, track_type) {
        let matched = group
            .formats
            .first()
            .is_some_and(|format| format.language.as_deref() == Some(language));
        if matched {
            adapter.set_track_type_disabled(track_type, false);
            adapter.clear_track_overrides(track_type);
            adapter.set_track_override(track_type, group_index, 0);
            return true;
        }
    }
    false
}

pub(super) fn build_tracks_snapshot(
    player_id: &str,
    adapter: &dyn NativePlayerAdapter,
) -> PlayerTracksSnapshot {
    PlayerTracksSnapshot {
        player_id: player_id.to_string(),
        audio_tracks: primary_tracks(adapter, TrackType::Audio),
        text_tracks: primary_tracks(adapter, TrackType::Text),
        video_tracks: video_tracks(adapter),
    }
}

/// Group index is positional within the type, matching the override
/// addressing the command side uses.
fn typed_groups(
    adapter: &dyn NativePlayerAdapter,
    track_type: TrackType,
) -> Vec<(usize, TrackGroup)> {
    adapter
        .track_groups()
        .into_iter()
        .filter(|group| group.track_type == track_type)
        .enumerate()
        .collect()
}

/// Audio and text groups surface one snapshot entry each, described by the
/// group's primary rendition. Groups without a usable id are excluded.
fn primary_tracks(adapter: &dyn NativePlayerAdapter, track_type: TrackType) -> Vec<Track> {
    typed_groups(adapter, track_type)
        .into_iter()
        .filter_map(|(_, group)| {
            let format = group.formats.first()?;
            let id = snapshot_track_id(format)?;
            Some(Track {
                id,
                language: format.language.clone(),
                label: format.label.clone(),
                bitrate: format.bitrate,
                width: format.width,
                height: format.height,
                frame_rate: format.frame_rate,
                is_selected: group.is_active,
            })
        })
        .collect()
}

/// Video snapshots enumerate every supported rendition; unsupported or
/// id-less ones are excluded. Sorted by descending height so the highest
/// quality lists first.
fn video_tracks(adapter: &dyn NativePlayerAdapter) -> Vec<Track> {
    let selected = adapter.track_override(TrackType::Video);
    let mut tracks: Vec<Track> = typed_groups(adapter, TrackType::Video)
        .into_iter()
        .flat_map(|(group_index, group)| {
            group
                .formats
                .into_iter()
                .enumerate()
                .filter_map(move |(track_index, format)| {
                    if !format.supported {
                        return None;
                    }
                    let id = format.id.clone()?;
                    let is_selected = selected.is_some_and(|o| {
                        o.group_index == group_index && o.track_index == track_index
                    });
                    let label = format.label.clone().or_else(|| {
                        match (format.width, format.height) {
                            (Some(w), Some(h)) => Some(format!("{w} x {h}")),
                            _ => None,
                        }
                    });
                    Some(Track {
                        id,
                        language: format.language,
                        label,
                        bitrate: format.bitrate,
                        width: format.width,
                        height: format.height,
                        frame_rate: format.frame_rate,
                        is_selected,
                    })
                })
        })
        .collect();
    tracks.sort_by(|a, b| b.height.unwrap_or(0).cmp(&a.height.unwrap_or(0)));
    tracks
}

/// Native track id, with language as the fallback identifier. No identifier
/// means the track cannot be addressed and is left out of snapshots.
fn snapshot_track_id(format: &TrackFormat) -> Option<String> {
    format.id.clone().or_else(|| format.language.clone())
}
