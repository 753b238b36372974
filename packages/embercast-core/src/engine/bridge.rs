//! Device event bridge.
//!
//! Normalizes renderer transport notifications into the four canonical
//! events and reconciles the session against them. This is where
//! renderer-driven transitions are detected and mirrored upward.

use super::events::TransportEvent;
use super::session::PlayerStatus;
use super::EngineCore;
use crate::renderer::TransportNotification;
use crate::utils::track_id_from_uri;

impl EngineCore {
    /// Handles one transport notification from the renderer.
    ///
    /// Events are processed strictly in arrival order (mailbox guarantee);
    /// each handler runs to completion before the next event is admitted.
    pub(crate) async fn on_notification(&mut self, notification: TransportNotification) {
        if let Some(error) = &notification.error_description {
            log::warn!("[EventBridge] Transport error reported: {}", error);
        }

        let Some(event) = notification
            .transport_state
            .as_deref()
            .and_then(TransportEvent::classify)
        else {
            log::trace!(
                "[EventBridge] Ignoring transport state {:?}",
                notification.transport_state
            );
            return;
        };

        // Track identity the renderer reports, before dispatching.
        self.session.with(|s| {
            if let Some(uri) = &notification.current_track_uri {
                s.device_track_id = Some(track_id_from_uri(uri));
            }
            if let Some(uri) = &notification.next_track_uri {
                s.next_track_hint = Some(track_id_from_uri(uri));
            }
        });

        match event {
            TransportEvent::Stopped => self.on_device_stopped().await,
            TransportEvent::Playing => self.on_device_playing().await,
            TransportEvent::Transitioning => self.on_device_transitioning().await,
            TransportEvent::PausedPlayback => self.on_device_paused().await,
        }
    }

    async fn on_device_stopped(&mut self) {
        let near_end = self.session.with(|s| {
            s.device_is_playing = false;
            s.near_track_end(self.config.near_end_threshold_secs)
        });

        if near_end {
            log::info!("[EventBridge] Advance triggered by STOPPED event");
            self.advance().await;
        }
    }

    async fn on_device_transitioning(&mut self) {
        let near_end = self.session.with(|s| {
            s.device_is_playing = false;
            s.near_track_end(self.config.near_end_threshold_secs)
        });

        if near_end {
            log::info!("[EventBridge] Advance triggered by TRANSITIONING event");
            self.advance().await;
        }
    }

    async fn on_device_playing(&mut self) {
        // A confirmed start resolves any pending forced-mode play.
        if let Some(confirm) = self.pending_confirm.take() {
            let _ = confirm.send(());
        }

        let was_playing = self.session.with(|s| {
            let was = s.device_is_playing;
            s.device_is_playing = true;
            was
        });

        if !was_playing {
            // The renderer started on its own (or confirmed our start):
            // bring the local transport back in step and tell upstream.
            self.do_resume().await;
        }

        let (mismatch, near_end) = self.session.with(|s| {
            let mismatch = s.device_track_id != s.current_track_id;
            (mismatch, s.near_track_end(self.config.near_end_threshold_secs))
        });

        if mismatch && near_end {
            log::info!("[EventBridge] Advance triggered by PLAYING event (renderer moved on)");
            self.session.with(|s| s.suppress_next_skip = true);
            self.advance().await;
        }
    }

    async fn on_device_paused(&mut self) {
        // Renderers emit spurious PAUSED_PLAYBACK during track-change
        // handshakes; only honor it while we believe playback is active.
        let believed_playing = self
            .session
            .with(|s| s.device_is_playing && s.status == PlayerStatus::Playing);
        if !believed_playing {
            log::debug!("[EventBridge] Ignoring PAUSED_PLAYBACK while not playing");
            return;
        }

        self.session.with(|s| {
            s.clock.pause();
            s.device_is_playing = false;
        });
        self.cancel_deadline();
        self.set_status(PlayerStatus::Paused);
        log::info!("[EventBridge] Renderer paused; local transport paused");
    }
}
