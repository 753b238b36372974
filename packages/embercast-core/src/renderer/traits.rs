//! Trait abstraction for renderer control.
//!
//! The reconciliation engine depends on [`DeviceTransport`] rather than the
//! concrete SOAP client so tests can substitute a scripted device.

use async_trait::async_trait;

use super::avtransport::PositionInfo;
use super::didl::SlotMetadata;
use super::soap::SoapResult;

/// Command surface of the physical playback device.
///
/// All operations are fire-and-observe: the renderer acknowledges commands
/// synchronously but reports its real state asynchronously through GENA
/// notifications, which is why callers never treat success here as proof of
/// playback.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Programs the current-track slot with a URL and display metadata.
    async fn set_current_track(&self, url: &str, metadata: &SlotMetadata) -> SoapResult<()>;

    /// Programs the next-track slot for the renderer's gapless lookahead.
    async fn set_next_track(&self, url: &str, metadata: &SlotMetadata) -> SoapResult<()>;

    /// Starts or resumes playback of the configured transport.
    async fn play(&self) -> SoapResult<()>;

    /// Pauses playback.
    async fn pause(&self) -> SoapResult<()>;

    /// Stops playback.
    async fn stop(&self) -> SoapResult<()>;

    /// Skips to the queued next track.
    async fn next(&self) -> SoapResult<()>;

    /// Seeks within the current track to an "H:MM:SS" target.
    async fn seek(&self, timecode: &str) -> SoapResult<()>;

    /// Reads the current master volume (0-100).
    async fn volume(&self) -> SoapResult<u8>;

    /// Sets the master volume (0-100).
    async fn set_volume(&self, level: u8) -> SoapResult<()>;

    /// Queries the renderer's true playback position.
    async fn position_info(&self) -> SoapResult<PositionInfo>;

    /// Clears every queued track on the renderer.
    async fn remove_all_queued_tracks(&self) -> SoapResult<()>;
}
