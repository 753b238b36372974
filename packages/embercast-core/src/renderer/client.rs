//! Concrete renderer client speaking SOAP over HTTP.

use async_trait::async_trait;
use reqwest::Client;

use super::avtransport::{self, PositionInfo};
use super::didl::SlotMetadata;
use super::rendering;
use super::soap::SoapResult;
use super::traits::DeviceTransport;

/// SOAP-backed [`DeviceTransport`] implementation for a single renderer.
pub struct RendererClient {
    client: Client,
    ip: String,
}

impl RendererClient {
    /// Creates a client for the renderer at `ip`.
    pub fn new(client: Client, ip: String) -> Self {
        Self { client, ip }
    }

    /// The renderer's IP address.
    #[must_use]
    pub fn ip(&self) -> &str {
        &self.ip
    }
}

#[async_trait]
impl DeviceTransport for RendererClient {
    async fn set_current_track(&self, url: &str, metadata: &SlotMetadata) -> SoapResult<()> {
        avtransport::set_transport_uri(&self.client, &self.ip, url, metadata).await
    }

    async fn set_next_track(&self, url: &str, metadata: &SlotMetadata) -> SoapResult<()> {
        avtransport::set_next_transport_uri(&self.client, &self.ip, url, metadata).await
    }

    async fn play(&self) -> SoapResult<()> {
        avtransport::play(&self.client, &self.ip).await
    }

    async fn pause(&self) -> SoapResult<()> {
        avtransport::pause(&self.client, &self.ip).await
    }

    async fn stop(&self) -> SoapResult<()> {
        avtransport::stop(&self.client, &self.ip).await
    }

    async fn next(&self) -> SoapResult<()> {
        avtransport::next(&self.client, &self.ip).await
    }

    async fn seek(&self, timecode: &str) -> SoapResult<()> {
        avtransport::seek(&self.client, &self.ip, timecode).await
    }

    async fn volume(&self) -> SoapResult<u8> {
        rendering::get_volume(&self.client, &self.ip).await
    }

    async fn set_volume(&self, level: u8) -> SoapResult<()> {
        rendering::set_volume(&self.client, &self.ip, level).await
    }

    async fn position_info(&self) -> SoapResult<PositionInfo> {
        avtransport::get_position_info(&self.client, &self.ip).await
    }

    async fn remove_all_queued_tracks(&self) -> SoapResult<()> {
        avtransport::remove_all_tracks(&self.client, &self.ip).await
    }
}
