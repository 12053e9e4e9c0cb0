use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use mediabridge_core::{
    MediaItem, PlaybackLifecycle, PlaybackState, PlayerStateSnapshot, TrackType, VideoSize,
};

use crate::adapter::{
    LoadToken, NativeEventKind, NativeMediaItem, NativeNotification, NativePlayerAdapter,
    NativeSubscription, NotificationSink, TrackFormat, TrackGroup, TrackOverride,
};
use crate::listener::PlaybackListener;

pub(crate) const TEST_TIMEOUT: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(2);

pub(crate) struct MockPlayerInner {
    pub lifecycle: PlaybackLifecycle,
    pub is_playing: bool,
    pub play_when_ready: bool,
    pub position_ms: f64,
    pub duration_ms: Option<f64>,
    pub playback_speed: f64,
    pub video_size: Option<VideoSize>,
    pub current_item: Option<NativeMediaItem>,
    pub track_groups: Vec<TrackGroup>,
    pub overrides: HashMap<TrackType, TrackOverride>,
    pub disabled_types: HashSet<TrackType>,
    pub sinks: HashMap<NativeEventKind, NotificationSink>,
    pub volumes: Vec<f64>,
    pub seeks: Vec<f64>,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub play_when_ready_calls: Vec<bool>,
    pub removed_all_items: bool,
    pub set_items: Vec<(NativeMediaItem, Option<f64>, LoadToken)>,
    pub added_items: Vec<(NativeMediaItem, LoadToken)>,
}

impl Default for MockPlayerInner {
    fn default() -> Self {
        Self {
            lifecycle: PlaybackLifecycle::Idle,
            is_playing: false,
            play_when_ready: false,
            position_ms: 0.0,
            duration_ms: None,
            playback_speed: 1.0,
            video_size: None,
            current_item: None,
            track_groups: Vec::new(),
            overrides: HashMap::new(),
            disabled_types: HashSet::new(),
            sinks: HashMap::new(),
            volumes: Vec::new(),
            seeks: Vec::new(),
            play_calls: 0,
            pause_calls: 0,
            play_when_ready_calls: Vec::new(),
            removed_all_items: false,
            set_items: Vec::new(),
            added_items: Vec::new(),
        }
    }
}

/// Scripted in-memory engine standing in for a real platform adapter.
///
/// The coordinator owns the [`MockPlayer`]; tests keep a [`MockHandle`] to
/// script state and inject notifications through the registered sinks.
pub(crate) struct MockPlayer {
    inner: Arc<Mutex<MockPlayerInner>>,
}

#[derive(Clone)]
pub(crate) struct MockHandle {
    inner: Arc<Mutex<MockPlayerInner>>,
}

pub(crate) fn mock_player() -> (MockPlayer, MockHandle) {
    let inner = Arc::new(Mutex::new(MockPlayerInner::default()));
    (
        MockPlayer {
            inner: Arc::clone(&inner),
        },
        MockHandle { inner },
    )
}

impl MockHandle {
    pub fn with_inner<T>(&self, f: impl FnOnce(&mut MockPlayerInner) -> T) -> T {
        f(&mut self.inner.lock().expect("mock poisoned"))
    }

    /// Delivers a notification the way a platform callback would, through
    /// the sink registered for `kind`. Returns whether anything was
    /// subscribed.
    pub fn emit(&self, kind: NativeEventKind, notification: NativeNotification) -> bool {
        let sink = self
            .inner
            .lock()
            .expect("mock poisoned")
            .sinks
            .get(&kind)
            .cloned();
        match sink {
            Some(sink) => {
                sink.send(notification);
                true
            }
            None => false,
        }
    }

    pub fn complete_load(&self, token: LoadToken, result: Result<(), String>) {
        assert!(
            self.emit(
                NativeEventKind::PrepareResult,
                NativeNotification::PrepareCompleted { token, result },
            ),
            "no prepare-result subscription registered"
        );
    }

    /// Blocks until the most recent `set_media_item` call is visible and
    /// returns its token.
    pub fn wait_for_set_item(&self, expected_count: usize) -> LoadToken {
        wait_until(TEST_TIMEOUT, || {
            self.with_inner(|inner| {
                (inner.set_items.len() >= expected_count)
                    .then(|| inner.set_items[expected_count - 1].2)
            })
        })
        .expect("timed out waiting for set_media_item")
    }

    pub fn wait_for_added_item(&self, expected_count: usize) -> LoadToken {
        wait_until(TEST_TIMEOUT, || {
            self.with_inner(|inner| {
                (inner.added_items.len() >= expected_count)
                    .then(|| inner.added_items[expected_count - 1].1)
            })
        })
        .expect("timed out waiting for add_media_item")
    }

    /// Blocks until the coordinator has registered a sink for `kind`.
    pub fn wait_subscribed(&self, kind: NativeEventKind) {
        wait_until(TEST_TIMEOUT, || {
            self.with_inner(|inner| inner.sinks.contains_key(&kind).then_some(()))
        })
        .expect("timed out waiting for subscription");
    }

    pub fn wait_unsubscribed(&self, kind: NativeEventKind) {
        wait_until(TEST_TIMEOUT, || {
            self.with_inner(|inner| (!inner.sinks.contains_key(&kind)).then_some(()))
        })
        .expect("timed out waiting for unsubscription");
    }
}

impl NativePlayerAdapter for MockPlayer {
    fn set_media_item(
        &mut self,
        item: NativeMediaItem,
        start_position_ms: Option<f64>,
        token: LoadToken,
    ) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        inner.current_item = Some(item.clone());
        inner.set_items.push((item, start_position_ms, token));
    }

    fn add_media_item(&mut self, item: NativeMediaItem, token: LoadToken) {
        self.inner
            .lock()
            .expect("mock poisoned")
            .added_items
            .push((item, token));
    }

    fn play(&mut self) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        inner.play_calls += 1;
        inner.is_playing = true;
    }

    fn pause(&mut self) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        inner.pause_calls += 1;
        inner.is_playing = false;
    }

    fn seek_to(&mut self, position_ms: f64) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        inner.position_ms = position_ms;
        inner.seeks.push(position_ms);
    }

    fn set_volume(&mut self, volume: f64) {
        self.inner.lock().expect("mock poisoned").volumes.push(volume);
    }

    fn set_playback_speed(&mut self, speed: f64) {
        self.inner.lock().expect("mock poisoned").playback_speed = speed;
    }

    fn set_play_when_ready(&mut self, play_when_ready: bool) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        inner.play_when_ready = play_when_ready;
        inner.play_when_ready_calls.push(play_when_ready);
    }

    fn remove_all_items(&mut self) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        inner.removed_all_items = true;
        inner.current_item = None;
        inner.is_playing = false;
        inner.play_when_ready = false;
        inner.lifecycle = PlaybackLifecycle::Idle;
    }

    fn set_track_override(&mut self, track_type: TrackType, group_index: usize, track_index: usize) {
        self.inner.lock().expect("mock poisoned").overrides.insert(
            track_type,
            TrackOverride {
                group_index,
                track_index,
            },
        );
    }

    fn clear_track_overrides(&mut self, track_type: TrackType) {
        self.inner
            .lock()
            .expect("mock poisoned")
            .overrides
            .remove(&track_type);
    }

    fn set_track_type_disabled(&mut self, track_type: TrackType, disabled: bool) {
        let mut inner = self.inner.lock().expect("mock poisoned");
        if disabled {
            inner.disabled_types.insert(track_type);
        } else {
            inner.disabled_types.remove(&track_type);
        }
    }

    fn current_item(&self) -> Option<NativeMediaItem> {
        self.inner.lock().expect("mock poisoned").current_item.clone()
    }

    fn position_ms(&self) -> f64 {
        self.inner.lock().expect("mock poisoned").position_ms
    }

    fn duration_ms(&self) -> Option<f64> {
        self.inner.lock().expect("mock poisoned").duration_ms
    }

    fn lifecycle(&self) -> PlaybackLifecycle {
        self.inner.lock().expect("mock poisoned").lifecycle
    }

    fn is_playing(&self) -> bool {
        self.inner.lock().expect("mock poisoned").is_playing
    }

    fn play_when_ready(&self) -> bool {
        self.inner.lock().expect("mock poisoned").play_when_ready
    }

    fn playback_speed(&self) -> f64 {
        self.inner.lock().expect("mock poisoned").playback_speed
    }

    fn video_size(&self) -> Option<VideoSize> {
        self.inner.lock().expect("mock poisoned").video_size
    }

    fn track_groups(&self) -> Vec<TrackGroup> {
        let inner = self.inner.lock().expect("mock poisoned");
        inner
            .track_groups
            .iter()
            .cloned()
            .map(|mut group| {
                if inner.disabled_types.contains(&group.track_type) {
                    group.is_active = false;
                }
                group
            })
            .collect()
    }

    fn track_override(&self, track_type: TrackType) -> Option<TrackOverride> {
        self.inner
            .lock()
            .expect("mock poisoned")
            .overrides
            .get(&track_type)
            .copied()
    }

    fn subscribe(&mut self, kind: NativeEventKind, sink: NotificationSink) -> NativeSubscription {
        self.inner
            .lock()
            .expect("mock poisoned")
            .sinks
            .insert(kind, sink);
        let inner = Arc::clone(&self.inner);
        NativeSubscription::new(move || {
            inner.lock().expect("mock poisoned").sinks.remove(&kind);
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ListenerEvent {
    StateUpdate(PlayerStateSnapshot),
    ItemTransition(Option<MediaItem>),
    PlaybackStateChanged(PlaybackState, bool),
    PositionDiscontinuity(f64),
    PlaybackEnded(Option<MediaItem>),
    PictureInPicture(bool),
}

#[derive(Default)]
pub(crate) struct RecordingListener {
    events: Mutex<Vec<ListenerEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<ListenerEvent> {
        self.events.lock().expect("listener poisoned").clone()
    }

    fn record(&self, event: ListenerEvent) {
        self.events.lock().expect("listener poisoned").push(event);
    }

    /// Blocks until some recorded event satisfies `pred` and returns it.
    pub fn wait_for_event(
        &self,
        pred: impl Fn(&ListenerEvent) -> bool,
    ) -> ListenerEvent {
        wait_until(TEST_TIMEOUT, || {
            self.events().into_iter().find(|event| pred(event))
        })
        .expect("timed out waiting for listener event")
    }
}

impl PlaybackListener for RecordingListener {
    fn on_player_state_update(&self, snapshot: PlayerStateSnapshot) {
        self.record(ListenerEvent::StateUpdate(snapshot));
    }

    fn on_media_item_transition(&self, item: Option<MediaItem>) {
        self.record(ListenerEvent::ItemTransition(item));
    }

    fn on_playback_state_changed(&self, state: PlaybackState, is_buffering: bool) {
        self.record(ListenerEvent::PlaybackStateChanged(state, is_buffering));
    }

    fn on_position_discontinuity(&self, position_ms: f64) {
        self.record(ListenerEvent::PositionDiscontinuity(position_ms));
    }

    fn on_playback_ended(&self, item: Option<MediaItem>) {
        self.record(ListenerEvent::PlaybackEnded(item));
    }

    fn on_picture_in_picture_mode_changed(&self, active: bool) {
        self.record(ListenerEvent::PictureInPicture(active));
    }
}

pub(crate) fn wait_until<T>(timeout: Duration, mut probe: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe() {
            return Some(value);
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

pub(crate) fn audio_group(language: &str, id: Option<&str>) -> TrackGroup {
    TrackGroup {
        track_type: TrackType::Audio,
        is_active: false,
        formats: vec![TrackFormat {
            id: id.map(str::to_string),
            language: Some(language.to_string()),
            supported: true,
            ..TrackFormat::default()
        }],
    }
}

pub(crate) fn text_group(language: &str, id: Option<&str>) -> TrackGroup {
    TrackGroup {
        track_type: TrackType::Text,
        is_active: false,
        formats: vec![TrackFormat {
            id: id.map(str::to_string),
            language: Some(language.to_string()),
            supported: true,
            ..TrackFormat::default()
        }],
    }
}

pub(crate) fn video_format(id: &str, width: u32, height: u32, supported: bool) -> TrackFormat {
    TrackFormat {
        id: Some(id.to_string()),
        width: Some(width),
        height: Some(height),
        supported,
        ..TrackFormat::default()
    }
}
