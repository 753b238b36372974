//! Drift corrector.
//!
//! The local clock only simulates playback; the renderer's decoder is the
//! ground truth. Every poll interval the corrector reads the renderer's real
//! position and folds the difference into the seek offset, so reported
//! positions converge without the facade ever blocking on the device.

use super::EngineCore;

impl EngineCore {
    /// One drift-correction pass.
    ///
    /// Refreshes the duration from the media collaborator and recomputes
    /// `seek_offset = real_position - clock`. Fetch failures leave the
    /// previous offset untouched - a stale offset beats a corrupted one.
    pub(crate) async fn drift_tick(&mut self) {
        let audio_url = self.session.with(|s| s.current_audio_url.clone());

        if let Some(audio_url) = audio_url {
            let metadata = match self.resolver.metadata(&audio_url).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!("[DriftCorrector] Metadata refresh failed: {}", e);
                    return;
                }
            };

            let position = match self.device.position_info().await {
                Ok(info) => info,
                Err(e) => {
                    log::warn!("[DriftCorrector] Position query failed: {}", e);
                    return;
                }
            };

            self.session.with(|s| {
                s.duration_secs = metadata.duration_secs;
                s.seek_offset_secs = position.rel_time_secs as i64 - s.clock.elapsed_secs() as i64;
            });
            log::debug!(
                "[DriftCorrector] Synced to renderer position {} ({}s)",
                position.rel_time,
                position.rel_time_secs
            );
        }

        // Keep upstream consumers current even while idle.
        self.listener.on_state_refreshed(self.session.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use std::time::Duration;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn drift_tick_converges_position_to_renderer() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(180).spawn();
        rig.play("a", 0).await;

        // Local clock ran 10 s, but the renderer reports 50 s.
        advance(Duration::from_secs(10)).await;
        rig.device.set_reported_position("0:00:50");

        rig.handle.drift_tick_now().await;
        rig.handle.flush().await;

        assert_eq!(rig.session().with(|s| s.seek_offset_secs), 40);
        assert_eq!(rig.session().position_secs(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn drift_tick_handles_clock_ahead_of_renderer() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(180).spawn();
        rig.play("a", 0).await;

        advance(Duration::from_secs(30)).await;
        rig.device.set_reported_position("0:00:10");

        rig.handle.drift_tick_now().await;
        rig.handle.flush().await;

        assert_eq!(rig.session().with(|s| s.seek_offset_secs), -20);
        assert_eq!(rig.session().position_secs(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn drift_tick_refreshes_duration() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(100).spawn();
        rig.play("a", 0).await;

        rig.resolver.set_duration(240);
        rig.handle.drift_tick_now().await;
        rig.handle.flush().await;

        assert_eq!(rig.session().duration_secs(), 240);
    }

    #[tokio::test(start_paused = true)]
    async fn drift_fetch_failure_leaves_offset_untouched() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(100).spawn();
        rig.play("a", 42).await;
        rig.device.fail(DeviceCall::GetPositionInfo);

        rig.handle.drift_tick_now().await;
        rig.handle.flush().await;

        assert_eq!(rig.session().with(|s| s.seek_offset_secs), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn drift_tick_without_track_only_refreshes_upstream() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(100).spawn();
        rig.listener.clear();

        rig.handle.drift_tick_now().await;
        rig.handle.flush().await;

        assert!(rig.device.calls().is_empty());
        assert_eq!(rig.listener.refreshes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_position_parses_to_zero() {
        let rig = EngineRig::builder().tracks(&["a"]).duration(100).spawn();
        rig.play("a", 42).await;
        rig.device.set_reported_position("NOT_IMPLEMENTED");

        rig.handle.drift_tick_now().await;
        rig.handle.flush().await;

        // Placeholder parses to 0 seconds, so the offset snaps to -elapsed.
        assert_eq!(rig.session().position_secs(), 0);
    }
}
