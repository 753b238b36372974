//! Shared playback session state.
//!
//! One session exists per engine; it is created with empty defaults and
//! lives for the process lifetime. All mutation happens on the engine worker
//! (single logical owner); the facade's position/duration/volume reads take
//! the lock briefly and never cross an await point.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::clock::PositionClock;

/// Engine-believed upstream playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Nothing loaded since startup or after the queue drained.
    Idle,
    /// A play command is resolving media.
    Loading,
    /// Playback believed active.
    Playing,
    /// Playback paused by upstream or the renderer.
    Paused,
    /// Playback explicitly stopped.
    Stopped,
}

/// Volume state mirrored from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// Volume level, 0-100.
    pub level: u8,
    /// Mute flag (tracked locally; not forwarded to the renderer).
    pub muted: bool,
}

/// Snapshot of the session for upstream propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Engine-believed status.
    pub status: PlayerStatus,
    /// Identity of the track believed active.
    pub track_id: Option<String>,
    /// Title of the track believed active.
    pub track_title: Option<String>,
    /// Reported playback position in seconds.
    pub position_secs: u64,
    /// Duration of the current track in seconds.
    pub duration_secs: u64,
    /// Cached volume state.
    pub volume: Volume,
}

/// Mutable session fields. See the module docs for the ownership rules.
pub(crate) struct SessionState {
    pub status: PlayerStatus,
    /// Identity of the track believed active.
    pub current_track_id: Option<String>,
    pub current_track_title: Option<String>,
    /// Resolved audio URL of the active track; keys drift-corrector lookups.
    pub current_audio_url: Option<String>,
    /// Authoritative duration, set when track metadata resolves.
    pub duration_secs: u64,
    pub clock: PositionClock,
    /// Correction such that reported position = offset + clock seconds.
    /// Recomputed only by the drift corrector and explicit seeks/plays.
    pub seek_offset_secs: i64,
    pub volume: Volume,
    /// Last-known renderer play state, inferred from transport events.
    pub device_is_playing: bool,
    /// Track identity the renderer itself last reported.
    pub device_track_id: Option<String>,
    /// Track the renderer reports as queued-next.
    pub next_track_hint: Option<String>,
    /// One-shot flag: the renderer already carried this transition itself,
    /// so the next fluid-mode skip (and the next stop) must not be sent.
    pub suppress_next_skip: bool,
}

impl SessionState {
    /// Reported playback position: `seek_offset + clock`, clamped at zero.
    pub fn position_secs(&self) -> u64 {
        let position = self.seek_offset_secs + self.clock.elapsed_secs() as i64;
        position.max(0) as u64
    }

    /// Whether the reported position is within `threshold_secs` of the end.
    ///
    /// Always false while the duration is unknown.
    pub fn near_track_end(&self, threshold_secs: u64) -> bool {
        self.duration_secs > 0
            && self.position_secs() as i64 > self.duration_secs as i64 - threshold_secs as i64
    }
}

/// Shared handle to the playback session.
pub struct Session {
    inner: Mutex<SessionState>,
}

impl Session {
    /// Creates a fresh session with empty/zero defaults.
    pub(crate) fn new(default_volume: u8) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SessionState {
                status: PlayerStatus::Idle,
                current_track_id: None,
                current_track_title: None,
                current_audio_url: None,
                duration_secs: 0,
                clock: PositionClock::new(),
                seek_offset_secs: 0,
                volume: Volume {
                    level: default_volume,
                    muted: false,
                },
                device_is_playing: false,
                device_track_id: None,
                next_track_hint: None,
                suppress_next_skip: false,
            }),
        })
    }

    /// Runs `f` with exclusive access to the session state.
    ///
    /// The lock must not be held across await points; callers copy what they
    /// need out and release.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Reported playback position in seconds.
    #[must_use]
    pub fn position_secs(&self) -> u64 {
        self.inner.lock().position_secs()
    }

    /// Duration of the current track in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        self.inner.lock().duration_secs
    }

    /// Cached volume state.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.inner.lock().volume
    }

    /// Engine-believed upstream status.
    #[must_use]
    pub fn status(&self) -> PlayerStatus {
        self.inner.lock().status
    }

    /// Snapshot for upstream propagation.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let inner = self.inner.lock();
        PlaybackSnapshot {
            status: inner.status,
            track_id: inner.current_track_id.clone(),
            track_title: inner.current_track_title.clone(),
            position_secs: inner.position_secs(),
            duration_secs: inner.duration_secs,
            volume: inner.volume,
        }
    }
}
