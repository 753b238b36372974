//! Playback reconciliation engine.
//!
//! Bridges the synchronous-looking upstream playback API to a renderer whose
//! true state arrives late, out of order, or not at all:
//!
//! - [`clock`]: pausable position clock (local transport simulation)
//! - [`session`]: shared playback session state
//! - [`events`]: transport event classification
//! - [`mailbox`]: single-consumer command queue serializing all mutations
//! - `bridge`: renderer event handlers (advance detection, pause guard)
//! - `transition`: forced/fluid track transitions and preloading
//! - `drift`: periodic reconciliation of the clock against the renderer
//! - `watchdog`: end-of-track deadline and consistency sweep
//! - [`driver`]: upstream command facade ([`PlaybackDriver`])
//!
//! The worker task owns every mutation; renderer and media HTTP calls are
//! its only suspension points, during which further commands queue rather
//! than re-entering the reconciliation logic.

pub mod clock;
pub mod driver;
pub mod events;
pub mod mailbox;
pub mod session;

mod bridge;
mod drift;
mod facade;
mod transition;
mod watchdog;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::media::MediaResolver;
use crate::queue::TrackQueue;
use crate::renderer::DeviceTransport;
use crate::runtime::TokioSpawner;

use self::driver::StateListener;
use self::mailbox::{EngineCommand, EngineHandle};
use self::session::Session;
use self::watchdog::DeadlineTimer;

pub use self::driver::{LoggingStateListener, NoopStateListener, PlaybackDriver};
pub use self::events::TransportEvent;
pub use self::session::{PlaybackSnapshot, PlayerStatus, Volume};

/// Collaborators the engine is constructed from.
pub struct EngineDeps {
    /// Renderer command surface.
    pub device: Arc<dyn DeviceTransport>,
    /// Media resolution collaborator.
    pub resolver: Arc<dyn MediaResolver>,
    /// Upstream ordered-queue collaborator.
    pub queue: Arc<dyn TrackQueue>,
    /// Upstream status notification sink.
    pub listener: Arc<dyn StateListener>,
    /// Engine tunables.
    pub config: EngineConfig,
    /// Spawner for fire-and-forget background work.
    pub spawner: TokioSpawner,
}

/// Worker-side engine state. Owned by the mailbox consumer task.
pub(crate) struct EngineCore {
    pub(crate) session: Arc<Session>,
    pub(crate) device: Arc<dyn DeviceTransport>,
    pub(crate) resolver: Arc<dyn MediaResolver>,
    pub(crate) queue: Arc<dyn TrackQueue>,
    pub(crate) listener: Arc<dyn StateListener>,
    pub(crate) config: EngineConfig,
    pub(crate) spawner: TokioSpawner,
    /// Sender half of the own mailbox, for deadline postbacks.
    pub(crate) tx: mpsc::Sender<EngineCommand>,
    /// Armed end-of-track deadline, present iff the clock is running.
    pub(crate) deadline: Option<DeadlineTimer>,
    /// Bumped on every arm/cancel so stale fires queued in the mailbox
    /// are discarded.
    pub(crate) deadline_generation: u64,
    /// Pending forced-mode play confirmation, resolved by the next
    /// `Playing` event.
    pub(crate) pending_confirm: Option<oneshot::Sender<()>>,
}

/// Spawns the engine worker and its timer tasks, returning the handle.
pub fn spawn_engine(deps: EngineDeps) -> EngineHandle {
    let EngineDeps {
        device,
        resolver,
        queue,
        listener,
        config,
        spawner,
    } = deps;

    let session = Session::new(config.default_volume);
    let (tx, mut rx) = mpsc::channel(config.mailbox_capacity);
    let cancel = CancellationToken::new();

    let handle = EngineHandle {
        tx: tx.clone(),
        session: Arc::clone(&session),
        cancel: cancel.clone(),
    };

    let drift_interval = Duration::from_secs(config.drift_poll_interval_secs);
    let sweep_interval = Duration::from_secs(config.sweep_interval_secs);

    let mut core = EngineCore {
        session,
        device,
        resolver,
        queue,
        listener,
        config,
        spawner,
        tx,
        deadline: None,
        deadline_generation: 0,
        pending_confirm: None,
    };

    let worker_cancel = cancel.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = worker_cancel.cancelled() => break,
                command = rx.recv() => match command {
                    Some(command) => core.handle(command).await,
                    None => break,
                },
            }
        }
        core.cancel_deadline();
        log::debug!("[Engine] Worker stopped");
    });

    spawn_ticker(&handle, drift_interval, || EngineCommand::DriftTick);
    spawn_ticker(&handle, sweep_interval, || EngineCommand::SweepTick);

    handle
}

/// Spawns an interval task that enqueues a command every `period`.
fn spawn_ticker(
    handle: &EngineHandle,
    period: Duration,
    make_command: impl Fn() -> EngineCommand + Send + 'static,
) {
    let tx = handle.tx.clone();
    let cancel = handle.cancel.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick of tokio intervals fires immediately; skip it so the
        // first real tick lands one full period after startup.
        interval.tick().await;
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if tx.send(make_command()).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
}

impl EngineCore {
    /// Dispatches one mailbox command. Runs to completion before the worker
    /// dequeues the next command.
    async fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Play {
                track,
                position_secs,
                reply,
            } => {
                let result = self.on_play(track, position_secs).await;
                let _ = reply.send(result);
            }
            EngineCommand::Pause { reply } => {
                let _ = reply.send(self.do_pause().await);
            }
            EngineCommand::Resume { reply } => {
                let _ = reply.send(self.do_resume().await);
            }
            EngineCommand::Stop { reply } => {
                let _ = reply.send(self.do_stop().await);
            }
            EngineCommand::Seek {
                position_secs,
                reply,
            } => {
                let _ = reply.send(self.do_seek(position_secs).await);
            }
            EngineCommand::SetVolume { volume, reply } => {
                let _ = reply.send(self.do_set_volume(volume).await);
            }
            EngineCommand::QueryVolume { reply } => {
                let _ = reply.send(self.do_query_volume().await);
            }
            EngineCommand::Notification(notification) => {
                self.on_notification(notification).await;
            }
            EngineCommand::DriftTick => self.drift_tick().await,
            EngineCommand::SweepTick => self.sweep_tick().await,
            EngineCommand::DeadlineElapsed(generation) => self.on_deadline(generation),
            EngineCommand::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }

    /// Updates the believed status, notifying upstream only on change.
    pub(crate) fn set_status(&self, status: session::PlayerStatus) {
        let changed = self.session.with(|s| {
            if s.status == status {
                false
            } else {
                s.status = status;
                true
            }
        });
        if changed {
            self.listener.on_status_changed(status);
        }
    }
}
