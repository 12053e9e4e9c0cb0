use tracing::debug;

use mediabridge_core::Command;

use crate::error::PlayerError;
use crate::media_item;

use super::{CommandCtx, CommandMessage, CommandResponse, PendingLoad, push_state_update};

/// Handles one command on the control thread. Returns `true` when the loop
/// should shut down.
pub(super) fn handle_command(msg: CommandMessage, ctx: &mut CommandCtx<'_>) -> bool {
    let CommandMessage { command, resp_tx } = msg;
    match command {
        Command::Play => {
            ctx.adapter.play();
            respond(resp_tx, Ok(CommandResponse::Ack));
        }
        Command::Pause => {
            ctx.adapter.pause();
            respond(resp_tx, Ok(CommandResponse::Ack));
        }
        Command::SeekTo { position_ms } => {
            ctx.adapter.seek_to(position_ms.max(0.0));
            respond(resp_tx, Ok(CommandResponse::Ack));
            push_state_update(ctx.state, ctx.adapter);
        }
        Command::SetVolume { volume } => {
            ctx.adapter.set_volume(volume.clamp(0.0, 1.0));
            respond(resp_tx, Ok(CommandResponse::Ack));
            // Volume changes are not reliably notified by every engine.
            push_state_update(ctx.state, ctx.adapter);
        }
        Command::SetPlaybackSpeed { speed } => {
            ctx.adapter.set_playback_speed(speed);
            respond(resp_tx, Ok(CommandResponse::Ack));
            push_state_update(ctx.state, ctx.adapter);
        }
        Command::ReplaceCurrentMediaItem { item, autoplay } => {
            on_replace_current_media_item(ctx, item, autoplay, resp_tx);
        }
        Command::QueueMediaItem { item } => {
            on_queue_media_item(ctx, item, resp_tx);
        }
        Command::Stop { reset } => {
            if reset {
                ctx.adapter.remove_all_items();
            } else {
                ctx.adapter.pause();
            }
            respond(resp_tx, Ok(CommandResponse::Ack));
            push_state_update(ctx.state, ctx.adapter);
        }
        Command::SetSelectedTrack {
            track_type,
            track_id,
        } => {
            super::tracks::set_selected_track(ctx.adapter, track_type, track_id.as_deref());
            respond(resp_tx, Ok(CommandResponse::Ack));
        }
        Command::SetSelectedTrackByLanguage {
            track_type,
            language,
        } => {
            let found =
                super::tracks::set_selected_track_by_language(ctx.adapter, track_type, &language);
            respond(resp_tx, Ok(CommandResponse::Matched { found }));
        }
        Command::SetFullscreen { is_fullscreen } => {
            ctx.state.is_fullscreen = is_fullscreen;
            respond(resp_tx, Ok(CommandResponse::Ack));
            push_state_update(ctx.state, ctx.adapter);
        }
        Command::Shutdown => {
            respond(resp_tx, Ok(CommandResponse::Ack));
            return true;
        }
    }
    false
}

fn respond(
    resp_tx: Option<tokio::sync::oneshot::Sender<Result<CommandResponse, PlayerError>>>,
    result: Result<CommandResponse, PlayerError>,
) {
    if let Some(resp_tx) = resp_tx {
        let _ = resp_tx.send(result);
    }
}

fn on_replace_current_media_item(
    ctx: &mut CommandCtx<'_>,
    item: mediabridge_core::MediaItem,
    autoplay: bool,
    resp_tx: Option<tokio::sync::oneshot::Sender<Result<CommandResponse, PlayerError>>>,
) {
    // Live streams reject absolute start offsets; joining at the live edge
    // is the engine default.
    let start_position_ms = if item.is_live {
        None
    } else {
        item.playback_start_position_ms
    };

    let token = ctx.state.next_load_token();
    supersede_pending_load(ctx, token);
    ctx.state.pending_load = Some(PendingLoad { token, resp_tx });

    let native = media_item::to_native(&item);
    debug!(
        player_id = ctx.state.player_id,
        url = native.url,
        token = token.value(),
        autoplay,
        "replace current media item"
    );
    ctx.adapter.set_media_item(native, start_position_ms, token);
    ctx.adapter.set_play_when_ready(autoplay);
}

fn on_queue_media_item(
    ctx: &mut CommandCtx<'_>,
    item: mediabridge_core::MediaItem,
    resp_tx: Option<tokio::sync::oneshot::Sender<Result<CommandResponse, PlayerError>>>,
) {
    let token = ctx.state.next_load_token();
    supersede_pending_load(ctx, token);
    ctx.state.pending_load = Some(PendingLoad { token, resp_tx });

    let native = media_item::to_native(&item);
    debug!(
        player_id = ctx.state.player_id,
        url = native.url,
        token = token.value(),
        "queue media item"
    );
    ctx.adapter.add_media_item(native, token);
}

fn supersede_pending_load(ctx: &mut CommandCtx<'_>, new_token: super::LoadToken) {
    let Some(pending) = ctx.state.pending_load.take() else {
        return;
    };
    debug!(
        player_id = ctx.state.player_id,
        superseded = pending.token.value(),
        by = new_token.value(),
        "pending load superseded"
    );
    if let Some(resp_tx) = pending.resp_tx {
        let _ = resp_tx.send(Err(PlayerError::LoadSuperseded));
    }
}
