//! Worker-side implementations of the upstream command set.
//!
//! Renderer failures are contained here: they are logged and the local
//! session state is updated anyway, so the engine stays usable while the
//! device is unreachable. Availability wins over strict consistency with
//! the physical renderer.

use super::session::{PlayerStatus, Volume};
use super::EngineCore;
use crate::utils::seconds_to_time_string;

impl EngineCore {
    /// Pauses the renderer and the local transport.
    pub(crate) async fn do_pause(&mut self) -> bool {
        if let Err(e) = self.device.pause().await {
            // Rejected pauses are routine during track handovers.
            log::warn!("[Player] Pause rejected by renderer: {}", e);
        }

        self.session.with(|s| s.clock.pause());
        self.cancel_deadline();
        self.set_status(PlayerStatus::Paused);
        true
    }

    /// Resumes the renderer and the local transport, re-arming the deadline.
    pub(crate) async fn do_resume(&mut self) -> bool {
        if let Err(e) = self.device.play().await {
            log::warn!("[Player] Resume rejected by renderer: {}", e);
        }

        self.session.with(|s| s.clock.start());
        self.arm_deadline();
        self.set_status(PlayerStatus::Playing);
        true
    }

    /// Stops the renderer and resets the local transport to zero.
    ///
    /// The renderer Stop is skipped while a renderer-driven transition is in
    /// flight; stopping then would cut off the track the renderer already
    /// moved onto.
    pub(crate) async fn do_stop(&mut self) -> bool {
        let suppress = self.session.with(|s| s.suppress_next_skip);
        if !suppress {
            if let Err(e) = self.device.stop().await {
                log::warn!("[Player] Stop rejected by renderer: {}", e);
            }
        }

        self.session.with(|s| {
            s.seek_offset_secs = 0;
            s.clock.reset();
        });
        self.cancel_deadline();
        self.pending_confirm = None;
        self.set_status(PlayerStatus::Stopped);
        true
    }

    /// Seeks the renderer and resets the local transport to the new offset.
    ///
    /// The offset and clock are updated even when the renderer rejects the
    /// seek, keeping local state usable; the drift corrector reconciles any
    /// disagreement on its next tick.
    pub(crate) async fn do_seek(&mut self, position_secs: u64) -> bool {
        let timecode = seconds_to_time_string(position_secs);
        if let Err(e) = self.device.seek(&timecode).await {
            log::warn!("[Player] Seek to {} rejected by renderer: {}", timecode, e);
        }

        let was_playing = self.session.with(|s| {
            s.clock.reset();
            s.seek_offset_secs = position_secs as i64;
            s.status == PlayerStatus::Playing
        });
        self.cancel_deadline();

        if was_playing {
            self.do_resume().await;
        }
        true
    }

    /// Writes the renderer volume, updating the local cache optimistically.
    pub(crate) async fn do_set_volume(&mut self, volume: Volume) -> bool {
        if let Err(e) = self.device.set_volume(volume.level).await {
            log::warn!("[Player] SetVolume rejected by renderer: {}", e);
        }

        self.session.with(|s| s.volume = volume);
        true
    }

    /// Reads the renderer volume, falling back to the cached value.
    pub(crate) async fn do_query_volume(&mut self) -> Volume {
        match self.device.volume().await {
            Ok(level) => self.session.with(|s| {
                s.volume.level = level;
                s.volume
            }),
            Err(e) => {
                log::warn!("[Player] GetVolume failed; returning cached value: {}", e);
                self.session.with(|s| s.volume)
            }
        }
    }
}
