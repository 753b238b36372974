//! Upstream playback driver contract.
//!
//! The cast-protocol layer consumes [`PlaybackDriver`] synchronously and
//! receives engine-initiated updates through [`StateListener`]. Operations
//! return plain success/failure; every failure path has already been logged
//! and contained by the engine.

use async_trait::async_trait;

use super::mailbox::{EngineCommand, EngineHandle};
use super::session::{PlaybackSnapshot, PlayerStatus, Volume};
use crate::queue::TrackRef;

/// Command surface the upstream cast controller drives.
#[async_trait]
pub trait PlaybackDriver: Send + Sync {
    /// Starts playback of `track` at `position_secs`.
    ///
    /// Returns `true` once the transition has been issued and, for forced
    /// transitions, confirmed by the renderer's next `Playing` event.
    async fn play(&self, track: TrackRef, position_secs: u64) -> bool;

    /// Pauses playback.
    async fn pause(&self) -> bool;

    /// Resumes playback.
    async fn resume(&self) -> bool;

    /// Stops playback and resets the transport.
    async fn stop(&self) -> bool;

    /// Seeks within the current track.
    async fn seek(&self, position_secs: u64) -> bool;

    /// Reads the volume (renderer first, cache on failure).
    async fn volume(&self) -> Volume;

    /// Sets the volume.
    async fn set_volume(&self, volume: Volume) -> bool;

    /// Reported playback position in seconds. Never contacts the renderer.
    fn position_secs(&self) -> u64;

    /// Current track duration in seconds. Never contacts the renderer.
    fn duration_secs(&self) -> u64;
}

/// Sink for engine-initiated state updates, consumed by the upstream layer.
pub trait StateListener: Send + Sync {
    /// A play/pause/stop/resume transition changed the believed status.
    fn on_status_changed(&self, status: PlayerStatus);

    /// Periodic session snapshot (driven by the drift corrector).
    fn on_state_refreshed(&self, snapshot: PlaybackSnapshot);
}

/// No-op listener for embedders that poll instead of subscribing.
pub struct NoopStateListener;

impl StateListener for NoopStateListener {
    fn on_status_changed(&self, _status: PlayerStatus) {
        // No-op
    }

    fn on_state_refreshed(&self, _snapshot: PlaybackSnapshot) {
        // No-op
    }
}

/// Logging listener for debugging and headless deployments.
pub struct LoggingStateListener;

impl StateListener for LoggingStateListener {
    fn on_status_changed(&self, status: PlayerStatus) {
        log::info!("[Player] Status changed: {:?}", status);
    }

    fn on_state_refreshed(&self, snapshot: PlaybackSnapshot) {
        tracing::debug!(?snapshot, "state_refreshed");
    }
}

#[async_trait]
impl PlaybackDriver for EngineHandle {
    async fn play(&self, track: TrackRef, position_secs: u64) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let reply = self
            .request(
                EngineCommand::Play {
                    track,
                    position_secs,
                    reply: tx,
                },
                rx,
                super::mailbox::PlayReply::failed(),
            )
            .await;

        if !reply.ok {
            return false;
        }

        match reply.confirm {
            // Forced transition: success means the renderer actually started.
            // The sender is dropped if the end-of-track deadline gives up
            // first, turning a silent renderer into a clean failure.
            Some(confirm) => confirm.await.is_ok(),
            None => true,
        }
    }

    async fn pause(&self) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request(EngineCommand::Pause { reply: tx }, rx, false).await
    }

    async fn resume(&self) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request(EngineCommand::Resume { reply: tx }, rx, false).await
    }

    async fn stop(&self) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request(EngineCommand::Stop { reply: tx }, rx, false).await
    }

    async fn seek(&self, position_secs: u64) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request(
            EngineCommand::Seek {
                position_secs,
                reply: tx,
            },
            rx,
            false,
        )
        .await
    }

    async fn volume(&self) -> Volume {
        let fallback = self.session.volume();
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request(EngineCommand::QueryVolume { reply: tx }, rx, fallback)
            .await
    }

    async fn set_volume(&self, volume: Volume) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request(EngineCommand::SetVolume { volume, reply: tx }, rx, false)
            .await
    }

    fn position_secs(&self) -> u64 {
        self.session.position_secs()
    }

    fn duration_secs(&self) -> u64 {
        self.session.duration_secs()
    }
}
