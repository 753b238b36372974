//! Shared test doubles for the engine test modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::driver::StateListener;
use super::mailbox::{EngineCommand, EngineHandle};
use super::session::{PlaybackSnapshot, PlayerStatus, Session, Volume};
use super::{spawn_engine, EngineDeps};
use crate::config::EngineConfig;
use crate::media::{MediaError, MediaResolver, MediaResult, TrackMetadata};
use crate::queue::{InMemoryQueue, QueueSnapshot, TrackQueue, TrackRef};
use crate::renderer::soap::{SoapError, SoapResult};
use crate::renderer::{DeviceTransport, PositionInfo, SlotMetadata};
use crate::runtime::TokioSpawner;
use crate::utils::time_string_to_seconds;

/// Audio URL the mock resolver hands out for a track id.
pub(crate) fn audio_url(track_id: &str) -> String {
    format!("http://media.test:8080/audio/{}.mp3", track_id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Device
// ─────────────────────────────────────────────────────────────────────────────

/// A renderer command, as recorded by [`MockDevice`].
///
/// Payload-carrying variants compare by discriminant for failure injection
/// and by value for call assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeviceCall {
    SetCurrent(String),
    SetNext(String),
    Play,
    Pause,
    Stop,
    Next,
    Seek(String),
    GetVolume,
    SetVolume(u8),
    GetPositionInfo,
    RemoveAll,
}

/// Scripted [`DeviceTransport`] that records calls and injects failures.
pub(crate) struct MockDevice {
    calls: Mutex<Vec<DeviceCall>>,
    failing: Mutex<Vec<DeviceCall>>,
    reported_position: Mutex<String>,
    reported_volume: Mutex<u8>,
}

impl MockDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
            reported_position: Mutex::new("0:00:00".to_string()),
            reported_volume: Mutex::new(50),
        })
    }

    /// Makes every subsequent call of this kind fail with a SOAP fault.
    pub fn fail(&self, call: DeviceCall) {
        self.failing.lock().push(call);
    }

    /// Sets the RelTime returned by position queries.
    pub fn set_reported_position(&self, timecode: &str) {
        *self.reported_position.lock() = timecode.to_string();
    }

    /// Sets the level returned by volume queries.
    pub fn set_reported_volume(&self, level: u8) {
        *self.reported_volume.lock() = level;
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls matching `call` by discriminant.
    pub fn count(&self, call: DeviceCall) -> usize {
        let wanted = std::mem::discriminant(&call);
        self.calls
            .lock()
            .iter()
            .filter(|c| std::mem::discriminant(*c) == wanted)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: DeviceCall) -> SoapResult<()> {
        let should_fail = {
            let discriminant = std::mem::discriminant(&call);
            self.failing
                .lock()
                .iter()
                .any(|f| std::mem::discriminant(f) == discriminant)
        };
        self.calls.lock().push(call);
        if should_fail {
            Err(SoapError::Fault("injected fault".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DeviceTransport for MockDevice {
    async fn set_current_track(&self, url: &str, _metadata: &SlotMetadata) -> SoapResult<()> {
        self.record(DeviceCall::SetCurrent(url.to_string()))
    }

    async fn set_next_track(&self, url: &str, _metadata: &SlotMetadata) -> SoapResult<()> {
        self.record(DeviceCall::SetNext(url.to_string()))
    }

    async fn play(&self) -> SoapResult<()> {
        self.record(DeviceCall::Play)
    }

    async fn pause(&self) -> SoapResult<()> {
        self.record(DeviceCall::Pause)
    }

    async fn stop(&self) -> SoapResult<()> {
        self.record(DeviceCall::Stop)
    }

    async fn next(&self) -> SoapResult<()> {
        self.record(DeviceCall::Next)
    }

    async fn seek(&self, timecode: &str) -> SoapResult<()> {
        self.record(DeviceCall::Seek(timecode.to_string()))
    }

    async fn volume(&self) -> SoapResult<u8> {
        self.record(DeviceCall::GetVolume)?;
        Ok(*self.reported_volume.lock())
    }

    async fn set_volume(&self, level: u8) -> SoapResult<()> {
        self.record(DeviceCall::SetVolume(level))
    }

    async fn position_info(&self) -> SoapResult<PositionInfo> {
        self.record(DeviceCall::GetPositionInfo)?;
        let rel_time = self.reported_position.lock().clone();
        let rel_time_secs = time_string_to_seconds(&rel_time);
        Ok(PositionInfo {
            track_uri: String::new(),
            track_duration: String::new(),
            rel_time,
            rel_time_secs,
        })
    }

    async fn remove_all_queued_tracks(&self) -> SoapResult<()> {
        self.record(DeviceCall::RemoveAll)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// [`MediaResolver`] that maps ids to deterministic URLs.
pub(crate) struct MockResolver {
    duration_secs: Mutex<u64>,
    failing_ids: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new(duration_secs: u64) -> Arc<Self> {
        Arc::new(Self {
            duration_secs: Mutex::new(duration_secs),
            failing_ids: Mutex::new(Vec::new()),
        })
    }

    /// Makes resolution of `track_id` fail.
    pub fn fail_resolve(&self, track_id: &str) {
        self.failing_ids.lock().push(track_id.to_string());
    }

    /// Changes the duration reported by metadata lookups.
    pub fn set_duration(&self, duration_secs: u64) {
        *self.duration_secs.lock() = duration_secs;
    }
}

#[async_trait]
impl MediaResolver for MockResolver {
    async fn resolve_audio_url(&self, track_id: &str, _no_wait: bool) -> MediaResult<String> {
        if self.failing_ids.lock().iter().any(|id| id == track_id) {
            return Err(MediaError::Unavailable(track_id.to_string()));
        }
        Ok(audio_url(track_id))
    }

    async fn metadata(&self, audio_url: &str) -> MediaResult<TrackMetadata> {
        Ok(TrackMetadata {
            duration_secs: *self.duration_secs.lock(),
            title: Some(format!("Title of {}", audio_url)),
            artwork_url: None,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Queue / Listener
// ─────────────────────────────────────────────────────────────────────────────

/// [`TrackQueue`] wrapper counting engine-triggered advances.
pub(crate) struct MockQueue {
    inner: InMemoryQueue,
    advances: AtomicUsize,
}

impl MockQueue {
    pub fn new(ids: &[&str]) -> Arc<Self> {
        let inner = InMemoryQueue::new();
        inner.set_tracks(ids.iter().map(|id| TrackRef::new(*id)).collect());
        Arc::new(Self {
            inner,
            advances: AtomicUsize::new(0),
        })
    }

    /// Positions the cursor without counting as an advance.
    pub fn jump_to(&self, index: usize) {
        self.inner.jump_to(index);
    }

    /// Positions the cursor onto the track with `id`.
    pub fn jump_to_id(&self, id: &str) {
        // Test queues are tiny; scan from the front.
        for index in 0..self.inner.len() {
            if self.inner.jump_to(index).map(|t| t.id).as_deref() == Some(id) {
                return;
            }
        }
        panic!("track {id} not in test queue");
    }

    pub fn advances(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }
}

impl TrackQueue for MockQueue {
    fn snapshot(&self) -> QueueSnapshot {
        self.inner.snapshot()
    }

    fn advance(&self) -> Option<TrackRef> {
        self.advances.fetch_add(1, Ordering::SeqCst);
        self.inner.advance()
    }
}

/// [`StateListener`] recording status transitions and refresh counts.
pub(crate) struct RecordingListener {
    statuses: Mutex<Vec<PlayerStatus>>,
    refreshes: AtomicUsize,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
        })
    }

    pub fn statuses(&self) -> Vec<PlayerStatus> {
        self.statuses.lock().clone()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.statuses.lock().clear();
        self.refreshes.store(0, Ordering::SeqCst);
    }
}

impl StateListener for RecordingListener {
    fn on_status_changed(&self, status: PlayerStatus) {
        self.statuses.lock().push(status);
    }

    fn on_state_refreshed(&self, _snapshot: PlaybackSnapshot) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Rig
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`EngineRig`].
pub(crate) struct EngineRigBuilder {
    track_ids: Vec<String>,
    duration_secs: u64,
}

impl EngineRigBuilder {
    pub fn tracks(mut self, ids: &[&str]) -> Self {
        self.track_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn duration(mut self, duration_secs: u64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn spawn(self) -> EngineRig {
        let device = MockDevice::new();
        let resolver = MockResolver::new(self.duration_secs);
        let ids: Vec<&str> = self.track_ids.iter().map(String::as_str).collect();
        let queue = MockQueue::new(&ids);
        let listener = RecordingListener::new();

        // Interval ticks are driven explicitly from tests; park the periodic
        // tasks far in the virtual future.
        let config = EngineConfig {
            drift_poll_interval_secs: 86_400,
            sweep_interval_secs: 86_400,
            ..Default::default()
        };

        let handle = spawn_engine(EngineDeps {
            device: device.clone(),
            resolver: resolver.clone(),
            queue: queue.clone(),
            listener: listener.clone(),
            config,
            spawner: TokioSpawner::current(),
        });

        EngineRig {
            handle,
            device,
            resolver,
            queue,
            listener,
        }
    }
}

/// A running engine wired to mocks, plus direct access to all of them.
pub(crate) struct EngineRig {
    pub handle: EngineHandle,
    pub device: Arc<MockDevice>,
    pub resolver: Arc<MockResolver>,
    pub queue: Arc<MockQueue>,
    pub listener: Arc<RecordingListener>,
}

impl EngineRig {
    pub fn builder() -> EngineRigBuilder {
        EngineRigBuilder {
            track_ids: Vec::new(),
            duration_secs: 100,
        }
    }

    /// Positions the queue cursor onto `track_id` and issues a play command,
    /// returning the worker's verdict without waiting for the renderer's
    /// Playing confirmation.
    pub async fn play(&self, track_id: &str, position_secs: u64) -> bool {
        self.queue.jump_to_id(track_id);

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle
            .send(EngineCommand::Play {
                track: TrackRef::new(track_id),
                position_secs,
                reply: tx,
            })
            .await;
        rx.await.map(|reply| reply.ok).unwrap_or(false)
    }

    pub async fn pause(&self) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle.send(EngineCommand::Pause { reply: tx }).await;
        rx.await.unwrap_or(false)
    }

    pub async fn resume(&self) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle.send(EngineCommand::Resume { reply: tx }).await;
        rx.await.unwrap_or(false)
    }

    pub async fn stop(&self) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle.send(EngineCommand::Stop { reply: tx }).await;
        rx.await.unwrap_or(false)
    }

    pub async fn seek(&self, position_secs: u64) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle
            .send(EngineCommand::Seek {
                position_secs,
                reply: tx,
            })
            .await;
        rx.await.unwrap_or(false)
    }

    pub async fn set_volume(&self, volume: Volume) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle
            .send(EngineCommand::SetVolume { volume, reply: tx })
            .await;
        rx.await.unwrap_or(false)
    }

    pub async fn query_volume(&self) -> Volume {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle
            .send(EngineCommand::QueryVolume { reply: tx })
            .await;
        rx.await.unwrap_or(Volume {
            level: 0,
            muted: false,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.handle.session
    }

    pub fn queue_advances(&self) -> usize {
        self.queue.advances()
    }

    /// Lets spawned background work (preloads, replies) run to completion.
    pub async fn settle(&self) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        self.handle.flush().await;
    }
}
