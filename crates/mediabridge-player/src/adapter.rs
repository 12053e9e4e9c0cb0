//! Contract consumed from the per-OS native player engine.
//!
//! The coordinator never owns native resources; it drives the engine through
//! [`NativePlayerAdapter`] and receives its asynchronous callbacks as
//! [`NativeNotification`]s pushed into a [`NotificationSink`]. Platform
//! adapters map their engine's lifecycle into
//! [`mediabridge_core::PlaybackLifecycle`] and their track-group state into
//! [`TrackGroup`]; everything semantic happens on the coordinator side.

use std::collections::HashMap;

use crossbeam_channel::Sender;

use mediabridge_core::{PlaybackLifecycle, TrackType, VideoSize};

/// Identifies one asynchronous item-preparation request.
///
/// Monotonic per coordinator. A completion whose token no longer matches the
/// still-current request has been superseded and must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The native metadata container attached to a [`NativeMediaItem`].
///
/// `entries` is the flat string bag the namespaced extras and side-channel
/// markers are embedded in (the Bundle / external-metadata analog).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artwork_uri: Option<String>,
    pub entries: HashMap<String, String>,
}

/// A media item as the native engine models it.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMediaItem {
    pub url: String,
    /// Mime type as sniffed by the engine, if any. The reverse mapping
    /// prefers the embedded marker over this.
    pub mime_type: Option<String>,
    pub metadata: NativeMetadata,
}

/// Per-track format reported by the native engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFormat {
    pub id: Option<String>,
    pub language: Option<String>,
    pub label: Option<String>,
    pub bitrate: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
    /// Whether the engine can actually decode this rendition.
    pub supported: bool,
}

/// A set of alternative renditions for one media characteristic.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackGroup {
    pub track_type: TrackType,
    /// Whether the engine's own selection currently plays from this group.
    pub is_active: bool,
    pub formats: Vec<TrackFormat>,
}

/// Explicit pinning of one rendition, superseding native automatic selection
/// until cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOverride {
    pub group_index: usize,
    pub track_index: usize,
}

/// Notification categories a coordinator can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    ItemTransition,
    PositionDiscontinuity,
    RateChange,
    TrackSelectionChange,
    Lifecycle,
    PlaybackEnded,
    PictureInPicture,
    PrepareResult,
}

/// Asynchronous state-change callbacks from the native engine.
///
/// Delivered off the control thread with no ordering guarantee relative to
/// command completion; the coordinator re-reads the adapter's query surface
/// rather than trusting stale payloads.
#[derive(Debug, Clone)]
pub enum NativeNotification {
    ItemTransition,
    PositionDiscontinuity { position_ms: f64 },
    RateChange,
    TrackSelectionChange,
    Lifecycle,
    PlaybackEnded,
    PictureInPicture { active: bool },
    PrepareCompleted {
        token: LoadToken,
        result: Result<(), String>,
    },
}

/// Where an adapter delivers its notifications.
///
/// Sending marshals the callback onto the owning coordinator's control
/// thread; a send after the coordinator has shut down is silently dropped.
#[derive(Clone)]
pub struct NotificationSink {
    tx: Sender<NativeNotification>,
}

impl NotificationSink {
    pub(crate) fn new(tx: Sender<NativeNotification>) -> Self {
        Self { tx }
    }

    pub fn send(&self, notification: NativeNotification) {
        let _ = self.tx.send(notification);
    }
}

/// Cancellable handle for one notification subscription.
///
/// The coordinator owns these and releases the whole set on listener detach
/// and teardown; dropping a handle cancels it.
pub struct NativeSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl NativeSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for NativeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for NativeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The per-OS native engine, as the coordinator consumes it.
///
/// Commands are synchronous dispatches; item preparation triggered by
/// `set_media_item`/`add_media_item` is asynchronous and reports back through
/// a [`NativeNotification::PrepareCompleted`] carrying the request's
/// [`LoadToken`].
pub trait NativePlayerAdapter: Send + 'static {
    // Command sink.
    fn set_media_item(
        &mut self,
        item: NativeMediaItem,
        start_position_ms: Option<f64>,
        token: LoadToken,
    );
    fn add_media_item(&mut self, item: NativeMediaItem, token: LoadToken);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position_ms: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_playback_speed(&mut self, speed: f64);
    fn set_play_when_ready(&mut self, play_when_ready: bool);
    /// Clears the entire native queue, current item included.
    fn remove_all_items(&mut self);
    fn set_track_override(&mut self, track_type: TrackType, group_index: usize, track_index: usize);
    fn clear_track_overrides(&mut self, track_type: TrackType);
    fn set_track_type_disabled(&mut self, track_type: TrackType, disabled: bool);

    // Query surface.
    fn current_item(&self) -> Option<NativeMediaItem>;
    fn position_ms(&self) -> f64;
    /// Duration of the current item, when known.
    fn duration_ms(&self) -> Option<f64>;
    fn lifecycle(&self) -> PlaybackLifecycle;
    fn is_playing(&self) -> bool;
    fn play_when_ready(&self) -> bool;
    fn playback_speed(&self) -> f64;
    fn video_size(&self) -> Option<VideoSize>;
    fn track_groups(&self) -> Vec<TrackGroup>;
    fn track_override(&self, track_type: TrackType) -> Option<TrackOverride>;

    // Notification source.
    fn subscribe(&mut self, kind: NativeEventKind, sink: NotificationSink) -> NativeSubscription;
}
