//! Native engine notification handling.

use tracing::{debug, trace, warn};

use mediabridge_core::{PlaybackLifecycle, TrackType, derive_playback_state};

use crate::adapter::{LoadToken, NativeNotification, NativePlayerAdapter};
use crate::error::PlayerError;
use crate::media_item;

use super::{CommandResponse, CoordinatorState, push_state_update};

pub(super) fn handle_notification(
    notification: NativeNotification,
    state: &mut CoordinatorState,
    adapter: &mut dyn NativePlayerAdapter,
) {
    match notification {
        NativeNotification::ItemTransition => on_item_transition(state, adapter),
        NativeNotification::PositionDiscontinuity { position_ms } => {
            if let Some(listener) = state.listener.as_ref() {
                listener.on_position_discontinuity(position_ms);
            }
            push_state_update(state, adapter);
        }
        NativeNotification::RateChange => push_state_update(state, adapter),
        NativeNotification::TrackSelectionChange => {
            // Selection state is recomputed on every tracks-snapshot query;
            // nothing cached here to invalidate.
            trace!(player_id = state.player_id, "native track selection changed");
        }
        NativeNotification::Lifecycle => on_lifecycle(state, adapter),
        NativeNotification::PlaybackEnded => {
            if let Some(listener) = state.listener.as_ref() {
                let item = adapter
                    .current_item()
                    .map(|native| media_item::from_native(&native, adapter.duration_ms()));
                listener.on_playback_ended(item);
            }
            push_state_update(state, adapter);
        }
        NativeNotification::PictureInPicture { active } => {
            if let Some(listener) = state.listener.as_ref() {
                listener.on_picture_in_picture_mode_changed(active);
            }
        }
        NativeNotification::PrepareCompleted { token, result } => {
            on_prepare_completed(state, adapter, token, result);
        }
    }
}

fn on_item_transition(state: &mut CoordinatorState, adapter: &mut dyn NativePlayerAdapter) {
    let item = adapter
        .current_item()
        .map(|native| media_item::from_native(&native, adapter.duration_ms()));
    if let Some(listener) = state.listener.as_ref() {
        listener.on_media_item_transition(item);
    }
    push_state_update(state, adapter);
}

fn on_lifecycle(state: &mut CoordinatorState, adapter: &mut dyn NativePlayerAdapter) {
    let lifecycle = adapter.lifecycle();
    let playback_state =
        derive_playback_state(adapter.is_playing(), adapter.play_when_ready(), lifecycle);
    if let Some(listener) = state.listener.as_ref() {
        listener.on_playback_state_changed(playback_state, lifecycle == PlaybackLifecycle::Buffering);
    }
    push_state_update(state, adapter);
}

/// Completes (or discards) the pending load matching `token`.
///
/// A stale completion, one whose token no longer matches the pending load,
/// belongs to a superseded request; its caller already got
/// [`PlayerError::LoadSuperseded`] and the completion is dropped without any
/// further effect.
fn on_prepare_completed(
    state: &mut CoordinatorState,
    adapter: &mut dyn NativePlayerAdapter,
    token: LoadToken,
    result: Result<(), String>,
) {
    let Some(pending) = state.pending_load.take_if(|p| p.token == token) else {
        trace!(
            player_id = state.player_id,
            token = token.value(),
            "stale prepare completion discarded"
        );
        return;
    };

    match result {
        Ok(()) => {
            restore_preferred_languages(state, adapter);
            if let Some(resp_tx) = pending.resp_tx {
                let _ = resp_tx.send(Ok(CommandResponse::Ack));
            }
            push_state_update(state, adapter);
        }
        Err(reason) => {
            warn!(
                player_id = state.player_id,
                token = token.value(),
                reason,
                "media item failed to prepare"
            );
            if let Some(resp_tx) = pending.resp_tx {
                let _ = resp_tx.send(Err(PlayerError::LoadFailed { reason }));
            }
        }
    }
}

/// Re-applies the configured language preferences after a successful load;
/// track ids do not survive an item change, languages do.
fn restore_preferred_languages(state: &CoordinatorState, adapter: &mut dyn NativePlayerAdapter) {
    let preferences = [
        (TrackType::Audio, state.config.audio_language.as_deref()),
        (TrackType::Text, state.config.subtitle_language.as_deref()),
    ];
    for (track_type, language) in preferences {
        let Some(language) = language else { continue };
        if !super::tracks::set_selected_track_by_language(adapter, track_type, language) {
            debug!(
                player_id = state.player_id,
                ?track_type,
                language,
                "preferred language unavailable in loaded item"
            );
        }
    }
}
