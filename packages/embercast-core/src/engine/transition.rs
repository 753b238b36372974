//! Transition controller.
//!
//! Decides, on every new-track command, whether to force-reprogram the
//! renderer's queue slots or let its own gapless-next behavior carry the
//! transition, and manages preloading of the following track.
//!
//! Forcing a full reprogram on every track causes an audible gap; it is only
//! done when the renderer's lookahead disagrees with what is about to play,
//! i.e. an out-of-band change (user skip, external control) must be
//! corrected.

use std::sync::Arc;

use tokio::sync::oneshot;

use super::mailbox::PlayReply;
use super::session::PlayerStatus;
use super::EngineCore;
use crate::media::MediaResolver;
use crate::queue::TrackRef;
use crate::renderer::soap::SoapResult;
use crate::renderer::{DeviceTransport, SlotMetadata};
use crate::runtime::TaskSpawner;

impl EngineCore {
    /// Computes and issues the play target for a new track.
    pub(crate) async fn on_play(&mut self, track: TrackRef, position_secs: u64) -> PlayReply {
        log::info!("[Transition] Play {} at position {}s", track.id, position_secs);

        self.cancel_deadline();
        self.session.with(|s| {
            s.seek_offset_secs = position_secs as i64;
            s.clock.reset();
        });
        self.set_status(PlayerStatus::Loading);

        let audio_url = match self.resolver.resolve_audio_url(&track.id, false).await {
            Ok(url) => url,
            Err(e) => {
                log::error!("[Transition] Audio resolution for {} failed: {}", track.id, e);
                return PlayReply::failed();
            }
        };

        let metadata = match self.resolver.metadata(&audio_url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::error!("[Transition] Metadata lookup for {} failed: {}", track.id, e);
                return PlayReply::failed();
            }
        };

        self.session.with(|s| {
            s.current_track_id = Some(track.id.clone());
            s.current_track_title = metadata.title.clone();
            s.current_audio_url = Some(audio_url.clone());
            s.duration_secs = metadata.duration_secs;
            s.clock.start();
        });
        self.arm_deadline();

        let queue_state = self.queue.snapshot();
        let next_id = queue_state.next.clone();
        let next_hint = self.session.with(|s| s.next_track_hint.clone());

        // Forced when the renderer was not already primed with this track as
        // its upcoming one; fluid otherwise.
        let forced = queue_state.previous.as_deref() != Some(track.id.as_str())
            && next_hint.as_deref() != Some(track.id.as_str());

        let slot_metadata = SlotMetadata {
            title: metadata.title.clone(),
            duration_secs: metadata.duration_secs,
            album_art_uri: metadata.artwork_url.clone(),
        };

        if forced {
            log::info!("[Transition] Loading {} in forced mode", track.id);
            match self
                .forced_start(&audio_url, &slot_metadata, next_id.as_deref())
                .await
            {
                Ok(()) => {
                    self.set_status(PlayerStatus::Playing);

                    // Success is reported upward only once the renderer
                    // confirms with a Playing event; the end-of-track
                    // deadline is the backstop if it never does.
                    let (confirm_tx, confirm_rx) = oneshot::channel();
                    self.pending_confirm = Some(confirm_tx);
                    PlayReply {
                        ok: true,
                        confirm: Some(confirm_rx),
                    }
                }
                Err(e) => {
                    log::error!("[Transition] Forced start of {} failed: {}", track.id, e);
                    PlayReply::failed()
                }
            }
        } else {
            log::info!("[Transition] Loading {} in fluid mode", track.id);
            if let Some(next_id) = next_id {
                self.spawn_preload(next_id);
            }

            let suppress = self.session.with(|s| std::mem::take(&mut s.suppress_next_skip));
            if suppress {
                // The renderer already carried this transition on its own;
                // a skip now would jump one track too far.
                log::debug!("[Transition] Skip suppressed after renderer-driven transition");
            } else if let Err(e) = self.fluid_skip().await {
                log::error!("[Transition] Fluid skip to {} failed: {}", track.id, e);
                return PlayReply::failed();
            }

            self.set_status(PlayerStatus::Playing);
            PlayReply::started()
        }
    }

    /// Forced mode: wipe the renderer queue and program both slots.
    async fn forced_start(
        &mut self,
        audio_url: &str,
        slot_metadata: &SlotMetadata,
        next_id: Option<&str>,
    ) -> SoapResult<()> {
        self.device.remove_all_queued_tracks().await?;
        self.device.set_current_track(audio_url, slot_metadata).await?;

        if let Some(next_id) = next_id {
            log::info!("[Transition] Preloading next track {}", next_id);
            match self.resolver.resolve_audio_url(next_id, true).await {
                Ok(next_url) => {
                    let next_metadata = SlotMetadata::default();
                    self.device.set_next_track(&next_url, &next_metadata).await?;
                }
                Err(e) => {
                    // Lookahead only; the current track can still start.
                    log::warn!("[Transition] Preload of {} failed: {}", next_id, e);
                }
            }
        }

        self.device.play().await
    }

    /// Fluid mode: ride the renderer's own lookahead onto the next entry.
    async fn fluid_skip(&mut self) -> SoapResult<()> {
        self.device.next().await?;
        self.device.play().await
    }

    /// Preloads the next-track slot without blocking the transition.
    fn spawn_preload(&self, next_id: String) {
        let resolver: Arc<dyn MediaResolver> = Arc::clone(&self.resolver);
        let device: Arc<dyn DeviceTransport> = Arc::clone(&self.device);

        self.spawner.spawn(async move {
            match resolver.resolve_audio_url(&next_id, true).await {
                Ok(next_url) => {
                    let metadata = SlotMetadata::default();
                    match device.set_next_track(&next_url, &metadata).await {
                        Ok(()) => log::info!("[Transition] Preloaded next track {}", next_id),
                        Err(e) => {
                            log::warn!("[Transition] Next-slot programming failed: {}", e);
                        }
                    }
                }
                Err(e) => log::warn!("[Transition] Preload of {} failed: {}", next_id, e),
            }
        });
    }

    /// Advances to the next queued track, or stops when the queue is drained.
    pub(crate) async fn advance(&mut self) {
        match self.queue.advance() {
            Some(track) => {
                let reply = self.on_play(track, 0).await;
                if !reply.ok {
                    log::error!("[Transition] Advance failed to start the next track");
                }
            }
            None => {
                log::info!("[Transition] Queue exhausted; stopping");
                self.do_stop().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::engine::session::PlayerStatus;
    use crate::renderer::TransportNotification;
    use std::time::Duration;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn forced_play_programs_both_slots_and_arms_deadline() {
        let rig = EngineRig::builder().tracks(&["a", "b"]).duration(100).spawn();

        assert!(rig.play("a", 0).await);

        let calls = rig.device.calls();
        assert_eq!(
            calls,
            vec![
                DeviceCall::RemoveAll,
                DeviceCall::SetCurrent(audio_url("a")),
                DeviceCall::SetNext(audio_url("b")),
                DeviceCall::Play,
            ]
        );
        assert_eq!(rig.session().duration_secs(), 100);
        assert_eq!(rig.session().status(), PlayerStatus::Playing);

        // Deadline armed for duration - position + 1 = 101 s: still counting
        // at 100 s, reset right after.
        advance(Duration::from_secs(100)).await;
        rig.handle.flush().await;
        assert_eq!(rig.session().position_secs(), 100);

        advance(Duration::from_secs(2)).await;
        rig.handle.flush().await;
        assert_eq!(rig.session().position_secs(), 0);
        assert!(!rig.session().with(|s| s.clock.is_running()));
    }

    #[tokio::test(start_paused = true)]
    async fn forced_play_without_next_skips_next_slot() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(60).spawn();

        assert!(rig.play("a", 0).await);

        let calls = rig.device.calls();
        assert_eq!(
            calls,
            vec![
                DeviceCall::RemoveAll,
                DeviceCall::SetCurrent(audio_url("a")),
                DeviceCall::Play,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn play_matching_renderer_hint_uses_fluid_mode() {
        let rig = EngineRig::builder().tracks(&["a", "b"]).duration(100).spawn();
        rig.play("a", 0).await;

        // The renderer advertises "b" as its queued-next track.
        rig.handle
            .notify_device(TransportNotification {
                transport_state: Some("PLAYING".to_string()),
                current_track_uri: Some(audio_url("a")),
                next_track_uri: Some(audio_url("b")),
                error_description: None,
            })
            .await;
        rig.handle.flush().await;
        rig.device.clear_calls();

        rig.queue.jump_to(1); // upstream moves onto "b"
        assert!(rig.play("b", 0).await);
        rig.settle().await;

        // Fluid: no queue wipe, no current-slot programming; the renderer is
        // skipped onto its own lookahead and the following preload runs
        // asynchronously (queue has no track after "b", so none here).
        let calls = rig.device.calls();
        assert_eq!(calls, vec![DeviceCall::Next, DeviceCall::Play]);
    }

    #[tokio::test(start_paused = true)]
    async fn fluid_mode_with_suppression_clears_flag_and_sends_nothing() {
        let rig = EngineRig::builder().tracks(&["a", "b"]).duration(100).spawn();
        rig.play("a", 0).await;

        rig.handle
            .notify_device(TransportNotification {
                transport_state: Some("PLAYING".to_string()),
                current_track_uri: Some(audio_url("a")),
                next_track_uri: Some(audio_url("b")),
                error_description: None,
            })
            .await;
        rig.handle.flush().await;

        rig.session().with(|s| s.suppress_next_skip = true);
        rig.queue.jump_to(1);
        rig.device.clear_calls();

        assert!(rig.play("b", 0).await);
        rig.settle().await;

        assert!(rig.device.calls().is_empty());
        assert!(!rig.session().with(|s| s.suppress_next_skip));
    }

    #[tokio::test(start_paused = true)]
    async fn fluid_mode_preloads_following_track() {
        let rig = EngineRig::builder()
            .tracks(&["a", "b", "c"])
            .duration(100)
            .spawn();
        rig.play("a", 0).await;

        rig.handle
            .notify_device(TransportNotification {
                transport_state: Some("PLAYING".to_string()),
                current_track_uri: Some(audio_url("a")),
                next_track_uri: Some(audio_url("b")),
                error_description: None,
            })
            .await;
        rig.handle.flush().await;

        rig.queue.jump_to(1);
        rig.device.clear_calls();

        assert!(rig.play("b", 0).await);
        rig.settle().await;

        let calls = rig.device.calls();
        assert!(calls.contains(&DeviceCall::Next));
        assert!(calls.contains(&DeviceCall::Play));
        // "c" preloaded into the next slot from the background task.
        assert!(calls.contains(&DeviceCall::SetNext(audio_url("c"))));
    }

    #[tokio::test(start_paused = true)]
    async fn media_resolution_failure_fails_play_without_corrupting_state() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(100).spawn();
        rig.resolver.fail_resolve("a");

        assert!(!rig.play("a", 0).await);

        assert!(rig.device.calls().is_empty());
        assert_eq!(rig.session().with(|s| s.current_track_id.clone()), None);
        assert_eq!(rig.session().status(), PlayerStatus::Loading);
    }

    #[tokio::test(start_paused = true)]
    async fn renderer_failure_in_forced_mode_reports_failure() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(100).spawn();
        rig.device.fail(DeviceCall::Play);

        assert!(!rig.play("a", 0).await);
        // Local transport state still established (availability over strict
        // consistency): the clock runs and duration is known.
        assert_eq!(rig.session().duration_secs(), 100);
        assert!(rig.session().with(|s| s.clock.is_running()));
    }

    #[tokio::test(start_paused = true)]
    async fn forced_preload_failure_still_starts_current_track() {
        let rig = EngineRig::builder().tracks(&["a", "b"]).duration(100).spawn();
        rig.resolver.fail_resolve("b");

        assert!(rig.play("a", 0).await);

        let calls = rig.device.calls();
        assert!(calls.contains(&DeviceCall::SetCurrent(audio_url("a"))));
        assert!(calls.contains(&DeviceCall::Play));
        assert!(!calls.iter().any(|c| matches!(c, DeviceCall::SetNext(_))));
    }
}
