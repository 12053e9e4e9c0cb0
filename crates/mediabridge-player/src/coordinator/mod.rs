//! Per-player control thread.
//!
//! One coordinator owns one native player adapter and serializes everything
//! that touches it: application commands, snapshot queries, listener
//! lifecycle and native engine notifications all pass through a single
//! `crossbeam_channel::select!` loop, so no adapter access ever races.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use mediabridge_core::{Command, MediaItem, PlayerStateSnapshot, PlayerTracksSnapshot, TrackType};

use crate::adapter::{
    LoadToken, NativeEventKind, NativeNotification, NativePlayerAdapter, NativeSubscription,
    NotificationSink,
};
use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::listener::PlaybackListener;

mod commands;
mod ctrl;
mod notifications;
mod snapshot;
mod tracks;

use commands::handle_command;
use ctrl::{detach_listener, handle_ctrl};
use notifications::handle_notification;
use snapshot::build_state_snapshot;

#[cfg(test)]
#[path = "../tests/coordinator/mod.rs"]
mod tests;

/// Successful command payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    Ack,
    /// Outcome of a by-language selection: whether any group matched.
    Matched { found: bool },
}

struct CommandMessage {
    command: Command,
    resp_tx: Option<tokio::sync::oneshot::Sender<Result<CommandResponse, PlayerError>>>,
}

/// Control-plane requests that are not part of the command schema.
enum CoordinatorCtrl {
    GetStateSnapshot {
        resp_tx: tokio::sync::oneshot::Sender<PlayerStateSnapshot>,
    },
    GetTracksSnapshot {
        resp_tx: tokio::sync::oneshot::Sender<PlayerTracksSnapshot>,
    },
    AttachListener {
        listener: Arc<dyn PlaybackListener>,
    },
    DetachListener,
}

/// Handle used by higher layers (e.g. the platform channel) to drive one
/// player.
#[derive(Clone)]
pub struct PlayerHandle {
    player_id: String,
    cmd_tx: Sender<CommandMessage>,
    ctrl_tx: Sender<CoordinatorCtrl>,
}

impl PlayerHandle {
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    async fn send_command_async(
        &self,
        operation: &'static str,
        cmd: Command,
    ) -> Result<CommandResponse, PlayerError> {
        let (resp_tx, resp_rx) = tokio::sync::oneshot::channel();
        self.cmd_tx
            .send(CommandMessage {
                command: cmd,
                resp_tx: Some(resp_tx),
            })
            .map_err(|_| PlayerError::ControlThreadExited { operation })?;
        resp_rx
            .await
            .map_err(|_| PlayerError::ResponseDropped { operation })?
    }

    /// Generic entry point for serialized commands. Most commands answer
    /// [`CommandResponse::Ack`]; by-language track selection answers
    /// [`CommandResponse::Matched`].
    pub async fn dispatch_command(&self, cmd: Command) -> Result<CommandResponse, PlayerError> {
        self.send_command_async("dispatch_command", cmd).await
    }

    fn expect_ack(resp: CommandResponse) -> Result<(), PlayerError> {
        match resp {
            CommandResponse::Ack => Ok(()),
            CommandResponse::Matched { .. } => Err(PlayerError::UnexpectedResponse),
        }
    }

    pub async fn play(&self) -> Result<(), PlayerError> {
        Self::expect_ack(self.send_command_async("play", Command::Play).await?)
    }

    pub async fn pause(&self) -> Result<(), PlayerError> {
        Self::expect_ack(self.send_command_async("pause", Command::Pause).await?)
    }

    pub async fn seek_to(&self, position_ms: f64) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async("seek_to", Command::SeekTo { position_ms })
                .await?,
        )
    }

    pub async fn set_volume(&self, volume: f64) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async("set_volume", Command::SetVolume { volume })
                .await?,
        )
    }

    pub async fn set_playback_speed(&self, speed: f64) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async("set_playback_speed", Command::SetPlaybackSpeed { speed })
                .await?,
        )
    }

    /// Resolves once the native engine finishes preparing the item, or with
    /// [`PlayerError::LoadSuperseded`] when a newer load replaces this one
    /// first.
    pub async fn replace_current_media_item(
        &self,
        item: MediaItem,
        autoplay: bool,
    ) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async(
                "replace_current_media_item",
                Command::ReplaceCurrentMediaItem { item, autoplay },
            )
            .await?,
        )
    }

    pub async fn queue_media_item(&self, item: MediaItem) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async("queue_media_item", Command::QueueMediaItem { item })
                .await?,
        )
    }

    pub async fn stop(&self, reset: bool) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async("stop", Command::Stop { reset })
                .await?,
        )
    }

    pub async fn set_selected_track(
        &self,
        track_type: TrackType,
        track_id: Option<String>,
    ) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async(
                "set_selected_track",
                Command::SetSelectedTrack {
                    track_type,
                    track_id,
                },
            )
            .await?,
        )
    }

    /// Returns whether any track group of `track_type` matched `language`.
    pub async fn set_selected_track_by_language(
        &self,
        track_type: TrackType,
        language: String,
    ) -> Result<bool, PlayerError> {
        match self
            .send_command_async(
                "set_selected_track_by_language",
                Command::SetSelectedTrackByLanguage {
                    track_type,
                    language,
                },
            )
            .await?
        {
            CommandResponse::Matched { found } => Ok(found),
            CommandResponse::Ack => Err(PlayerError::UnexpectedResponse),
        }
    }

    pub async fn set_fullscreen(&self, is_fullscreen: bool) -> Result<(), PlayerError> {
        Self::expect_ack(
            self.send_command_async("set_fullscreen", Command::SetFullscreen { is_fullscreen })
                .await?,
        )
    }

    pub async fn shutdown(&self) -> Result<(), PlayerError> {
        Self::expect_ack(self.send_command_async("shutdown", Command::Shutdown).await?)
    }

    pub async fn state_snapshot(&self) -> Result<PlayerStateSnapshot, PlayerError> {
        let (resp_tx, resp_rx) = tokio::sync::oneshot::channel();
        self.ctrl_tx
            .send(CoordinatorCtrl::GetStateSnapshot { resp_tx })
            .map_err(|_| PlayerError::ControlThreadExited {
                operation: "state_snapshot",
            })?;
        resp_rx.await.map_err(|_| PlayerError::ResponseDropped {
            operation: "state_snapshot",
        })
    }

    pub async fn tracks_snapshot(&self) -> Result<PlayerTracksSnapshot, PlayerError> {
        let (resp_tx, resp_rx) = tokio::sync::oneshot::channel();
        self.ctrl_tx
            .send(CoordinatorCtrl::GetTracksSnapshot { resp_tx })
            .map_err(|_| PlayerError::ControlThreadExited {
                operation: "tracks_snapshot",
            })?;
        resp_rx.await.map_err(|_| PlayerError::ResponseDropped {
            operation: "tracks_snapshot",
        })
    }

    /// Replaces any previously attached listener. Attaching the same logical
    /// listener twice never duplicates native subscriptions.
    pub fn attach_listener(&self, listener: Arc<dyn PlaybackListener>) {
        let _ = self
            .ctrl_tx
            .send(CoordinatorCtrl::AttachListener { listener });
    }

    pub fn detach_listener(&self) {
        let _ = self.ctrl_tx.send(CoordinatorCtrl::DetachListener);
    }
}

/// Spawns the control thread for one player instance and returns its handle.
pub fn start_player(
    player_id: impl Into<String>,
    adapter: Box<dyn NativePlayerAdapter>,
    config: PlayerConfig,
) -> PlayerHandle {
    let player_id = player_id.into();
    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let (ctrl_tx, ctrl_rx) = crossbeam_channel::unbounded();
    let (native_tx, native_rx) = crossbeam_channel::unbounded();

    let thread_player_id = player_id.clone();
    let _join: JoinHandle<()> = thread::Builder::new()
        .name(format!("mediabridge-control-{player_id}"))
        .spawn(move || {
            run_control_loop(
                thread_player_id,
                adapter,
                config,
                ControlLoopChannels {
                    cmd_rx,
                    ctrl_rx,
                    native_rx,
                    native_tx,
                },
            )
        })
        .expect("failed to spawn mediabridge-control thread");

    PlayerHandle {
        player_id,
        cmd_tx,
        ctrl_tx,
    }
}

struct ControlLoopChannels {
    cmd_rx: Receiver<CommandMessage>,
    ctrl_rx: Receiver<CoordinatorCtrl>,
    native_rx: Receiver<NativeNotification>,
    native_tx: Sender<NativeNotification>,
}

/// A load request whose native preparation has not completed yet.
struct PendingLoad {
    token: LoadToken,
    resp_tx: Option<tokio::sync::oneshot::Sender<Result<CommandResponse, PlayerError>>>,
}

struct CoordinatorState {
    player_id: String,
    config: PlayerConfig,
    is_fullscreen: bool,
    load_seq: u64,
    pending_load: Option<PendingLoad>,
    listener: Option<Arc<dyn PlaybackListener>>,
    listener_subscriptions: Vec<NativeSubscription>,
    prepare_subscription: Option<NativeSubscription>,
}

impl CoordinatorState {
    fn new(player_id: String, config: PlayerConfig) -> Self {
        Self {
            player_id,
            config,
            is_fullscreen: false,
            load_seq: 0,
            pending_load: None,
            listener: None,
            listener_subscriptions: Vec::new(),
            prepare_subscription: None,
        }
    }

    fn next_load_token(&mut self) -> LoadToken {
        self.load_seq = self.load_seq.wrapping_add(1);
        LoadToken::new(self.load_seq)
    }
}

struct CommandCtx<'a> {
    state: &'a mut CoordinatorState,
    adapter: &'a mut dyn NativePlayerAdapter,
    sink: &'a NotificationSink,
}

fn run_control_loop(
    player_id: String,
    mut adapter: Box<dyn NativePlayerAdapter>,
    config: PlayerConfig,
    channels: ControlLoopChannels,
) {
    let ControlLoopChannels {
        cmd_rx,
        ctrl_rx,
        native_rx,
        native_tx,
    } = channels;

    info!(player_id, "control thread started");
    let refresh_interval = config.refresh_interval;
    let mut state = CoordinatorState::new(player_id, config);
    let sink = NotificationSink::new(native_tx);

    // Prepare completions gate command responses, so this subscription lives
    // for the whole coordinator rather than with the listener set.
    state.prepare_subscription =
        Some(adapter.subscribe(NativeEventKind::PrepareResult, sink.clone()));

    let tick = crossbeam_channel::tick(refresh_interval);

    loop {
        crossbeam_channel::select! {
            recv(cmd_rx) -> msg => {
                let Ok(msg) = msg else { break };
                let mut ctx = CommandCtx {
                    state: &mut state,
                    adapter: adapter.as_mut(),
                    sink: &sink,
                };
                if handle_command(msg, &mut ctx) {
                    break;
                }
            }
            recv(ctrl_rx) -> msg => {
                let Ok(msg) = msg else { break };
                let mut ctx = CommandCtx {
                    state: &mut state,
                    adapter: adapter.as_mut(),
                    sink: &sink,
                };
                handle_ctrl(msg, &mut ctx);
            }
            recv(native_rx) -> msg => {
                let Ok(msg) = msg else { break };
                handle_notification(msg, &mut state, adapter.as_mut());
            }
            recv(tick) -> _ => {
                push_state_update(&state, adapter.as_ref());
            }
        }
    }

    if let Some(pending) = state.pending_load.take() {
        warn!(
            player_id = state.player_id,
            token = pending.token.value(),
            "load still pending at shutdown"
        );
        if let Some(resp_tx) = pending.resp_tx {
            let _ = resp_tx.send(Err(PlayerError::ControlThreadExited {
                operation: "replace_current_media_item",
            }));
        }
    }
    detach_listener(&mut state);
    if let Some(subscription) = state.prepare_subscription.take() {
        subscription.cancel();
    }
    info!(player_id = state.player_id, "control thread exited");
}

/// Pushes a fresh snapshot to the attached listener, if any.
fn push_state_update(state: &CoordinatorState, adapter: &dyn NativePlayerAdapter) {
    if let Some(listener) = state.listener.as_ref() {
        listener.on_player_state_update(build_state_snapshot(state, adapter));
    }
}
