//! Watchdog: end-of-track deadline and consistency sweep.
//!
//! Two independent defenses against a renderer that never confirms a track
//! ended: a per-track deadline that stops the local clock at the expected
//! end, and a periodic sweep that detects stuck or mismatched state and
//! forces an advance.

use std::time::Duration;

use tokio::task::JoinHandle;

use super::mailbox::EngineCommand;
use super::session::PlayerStatus;
use super::EngineCore;

/// Armed end-of-track deadline.
///
/// The one-shot task sends `DeadlineElapsed` back into the mailbox; aborting
/// the handle cancels a pending fire, and the generation counter discards
/// fires that were already queued when the deadline was replaced.
pub(crate) struct DeadlineTimer {
    handle: JoinHandle<()>,
    pub(crate) generation: u64,
}

impl EngineCore {
    /// Arms the end-of-track deadline for the current track, replacing any
    /// previous one. Called whenever the clock starts or resumes.
    pub(crate) fn arm_deadline(&mut self) {
        self.cancel_deadline();

        self.deadline_generation += 1;
        let generation = self.deadline_generation;

        let delay_secs = self.session.with(|s| {
            (s.duration_secs as i64 - s.seek_offset_secs).max(0) as u64
                + self.config.deadline_grace_secs
        });

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            let _ = tx.send(EngineCommand::DeadlineElapsed(generation)).await;
        });

        log::debug!("[Watchdog] Deadline armed for {}s", delay_secs);
        self.deadline = Some(DeadlineTimer { handle, generation });
    }

    /// Cancels any armed deadline. Called whenever the clock pauses or stops.
    pub(crate) fn cancel_deadline(&mut self) {
        if let Some(timer) = self.deadline.take() {
            timer.handle.abort();
        }
        self.deadline_generation += 1;
    }

    /// Handles a deadline fire.
    ///
    /// Defensive stop: no renderer event confirmed the track ended, so the
    /// clock is halted at the expected end instead of counting past it. The
    /// transition itself is left to the event bridge and the sweep.
    pub(crate) fn on_deadline(&mut self, generation: u64) {
        let armed = self.deadline.as_ref().map(|t| t.generation);
        if armed != Some(generation) {
            log::trace!("[Watchdog] Stale deadline fire discarded");
            return;
        }
        self.deadline = None;

        log::info!("[Watchdog] Track deadline reached; stopping local clock");
        self.session.with(|s| s.clock.reset());

        // A play still waiting for its confirmation will never get one.
        self.pending_confirm = None;
    }

    /// Consistency sweep: the last line of defense against a track that
    /// silently failed to transition.
    pub(crate) async fn sweep_tick(&mut self) {
        let (mismatch, overrun) = self.session.with(|s| {
            let mismatch = s.device_is_playing
                && s.status == PlayerStatus::Playing
                && s.device_track_id != s.current_track_id;

            let position = s.position_secs() as i64;
            let overrun = s.status != PlayerStatus::Idle
                && position - self.config.overrun_slack_secs as i64 > s.duration_secs as i64;

            (mismatch, overrun)
        });

        if mismatch {
            log::warn!(
                "[Watchdog] Track mismatch (renderer={:?}, session={:?}); forcing advance",
                self.session.with(|s| s.device_track_id.clone()),
                self.session.with(|s| s.current_track_id.clone()),
            );
            self.session.with(|s| s.suppress_next_skip = true);
            self.advance().await;
            return;
        }

        if overrun {
            log::warn!("[Watchdog] Position overran duration; forcing advance");
            self.advance().await;
        }
    }
}
