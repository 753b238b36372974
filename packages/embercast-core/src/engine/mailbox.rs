//! Engine command mailbox.
//!
//! All session mutation paths - upstream commands, renderer notifications,
//! timer fires - are funneled through one mpsc channel consumed by a single
//! worker task. Handlers run to completion before the next command is
//! dequeued, so at most one transition is ever in flight and no locking
//! subtleties leak into the reconciliation logic.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::session::{PlaybackSnapshot, Session, Volume};
use crate::queue::TrackRef;
use crate::renderer::TransportNotification;

/// Result of a play command, as seen by the worker.
pub(crate) struct PlayReply {
    /// Whether the transition was issued successfully.
    pub ok: bool,
    /// In forced mode, a receiver that resolves on the next `Playing` event;
    /// the facade reports success only after it fires. Dropped (closing the
    /// channel) when the deadline watchdog gives up on the track.
    pub confirm: Option<oneshot::Receiver<()>>,
}

impl PlayReply {
    pub fn failed() -> Self {
        Self {
            ok: false,
            confirm: None,
        }
    }

    pub fn started() -> Self {
        Self {
            ok: true,
            confirm: None,
        }
    }
}

/// Commands processed by the engine worker, strictly in arrival order.
pub(crate) enum EngineCommand {
    Play {
        track: TrackRef,
        position_secs: u64,
        reply: oneshot::Sender<PlayReply>,
    },
    Pause {
        reply: oneshot::Sender<bool>,
    },
    Resume {
        reply: oneshot::Sender<bool>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    Seek {
        position_secs: u64,
        reply: oneshot::Sender<bool>,
    },
    SetVolume {
        volume: Volume,
        reply: oneshot::Sender<bool>,
    },
    QueryVolume {
        reply: oneshot::Sender<Volume>,
    },
    /// A transport notification from the renderer.
    Notification(TransportNotification),
    /// Drift corrector tick.
    DriftTick,
    /// Consistency sweep tick.
    SweepTick,
    /// End-of-track deadline fired. The generation guards against fires that
    /// were already queued when the deadline was re-armed.
    DeadlineElapsed(u64),
    /// Barrier: resolves once every previously queued command has run.
    Flush(oneshot::Sender<()>),
}

/// Handle to a running engine.
///
/// Cloneable; commands are serialized through the mailbox. Position,
/// duration, and volume reads go straight to the shared session state - they
/// are cheap and safe to poll at high frequency.
#[derive(Clone)]
pub struct EngineHandle {
    pub(crate) tx: mpsc::Sender<EngineCommand>,
    pub(crate) session: Arc<Session>,
    pub(crate) cancel: CancellationToken,
}

impl EngineHandle {
    /// Sends a command, logging if the worker is gone.
    pub(crate) async fn send(&self, command: EngineCommand) {
        if self.tx.send(command).await.is_err() {
            log::warn!("[Engine] Command dropped: engine worker has shut down");
        }
    }

    /// Sends a command and awaits its reply, with `fallback` when the worker
    /// is gone.
    pub(crate) async fn request<R>(
        &self,
        command: EngineCommand,
        reply: oneshot::Receiver<R>,
        fallback: R,
    ) -> R {
        self.send(command).await;
        reply.await.unwrap_or(fallback)
    }

    /// Delivers a renderer transport notification to the engine.
    pub async fn notify_device(&self, notification: TransportNotification) {
        self.send(EngineCommand::Notification(notification)).await;
    }

    /// Reported playback position in seconds (pure local read).
    #[must_use]
    pub fn position_secs(&self) -> u64 {
        self.session.position_secs()
    }

    /// Current track duration in seconds (pure local read).
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        self.session.duration_secs()
    }

    /// Session snapshot for upstream propagation.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.session.snapshot()
    }

    /// Waits until every previously queued command has been processed.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        self.send(EngineCommand::Flush(tx)).await;
        let _ = rx.await;
    }

    /// Drains the mailbox and stops the worker and its timer tasks.
    pub async fn shutdown(&self) {
        self.flush().await;
        self.cancel.cancel();
    }

    #[cfg(test)]
    pub(crate) async fn drift_tick_now(&self) {
        self.send(EngineCommand::DriftTick).await;
    }

    #[cfg(test)]
    pub(crate) async fn sweep_tick_now(&self) {
        self.send(EngineCommand::SweepTick).await;
    }
}
