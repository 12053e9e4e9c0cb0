//! Control-plane requests: snapshot queries and listener lifecycle.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::NativeEventKind;
use crate::listener::PlaybackListener;

use super::{
    CommandCtx, CoordinatorCtrl, CoordinatorState, build_state_snapshot, push_state_update,
};

/// Notification kinds forwarded to an attached listener. Prepare results are
/// coordinator-internal and subscribed separately for the coordinator's whole
/// lifetime.
const LISTENER_EVENT_KINDS: [NativeEventKind; 7] = [
    NativeEventKind::ItemTransition,
    NativeEventKind::PositionDiscontinuity,
    NativeEventKind::RateChange,
    NativeEventKind::TrackSelectionChange,
    NativeEventKind::Lifecycle,
    NativeEventKind::PlaybackEnded,
    NativeEventKind::PictureInPicture,
];

pub(super) fn handle_ctrl(msg: CoordinatorCtrl, ctx: &mut CommandCtx<'_>) {
    match msg {
        CoordinatorCtrl::GetStateSnapshot { resp_tx } => {
            let _ = resp_tx.send(build_state_snapshot(ctx.state, ctx.adapter));
        }
        CoordinatorCtrl::GetTracksSnapshot { resp_tx } => {
            let _ = resp_tx.send(super::tracks::build_tracks_snapshot(
                &ctx.state.player_id,
                ctx.adapter,
            ));
        }
        CoordinatorCtrl::AttachListener { listener } => attach_listener(ctx, listener),
        CoordinatorCtrl::DetachListener => detach_listener(ctx.state),
    }
}

/// Attaching always detaches first, so repeated attaches never stack native
/// subscriptions.
fn attach_listener(ctx: &mut CommandCtx<'_>, listener: Arc<dyn PlaybackListener>) {
    detach_listener(ctx.state);
    for kind in LISTENER_EVENT_KINDS {
        let subscription = ctx.adapter.subscribe(kind, ctx.sink.clone());
        ctx.state.listener_subscriptions.push(subscription);
    }
    ctx.state.listener = Some(listener);
    debug!(player_id = ctx.state.player_id, "listener attached");
    // Bring the fresh listener up to date immediately.
    push_state_update(ctx.state, ctx.adapter);
}

/// Idempotent; detaching with nothing attached is a no-op.
pub(super) fn detach_listener(state: &mut CoordinatorState) {
    if state.listener.take().is_none() && state.listener_subscriptions.is_empty() {
        return;
    }
    for subscription in state.listener_subscriptions.drain(..) {
        subscription.cancel();
    }
    debug!(player_id = state.player_id, "listener detached");
}
