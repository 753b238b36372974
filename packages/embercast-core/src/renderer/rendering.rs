//! Volume control for the renderer (RenderingControl service).

use reqwest::Client;

use super::services::RendererService;
use super::soap::{SoapAction, SoapError, SoapResult};
use super::xml::extract_xml_text;

/// Gets the renderer's current master volume (0-100).
pub async fn get_volume(client: &Client, ip: &str) -> SoapResult<u8> {
    let response = SoapAction::new(RendererService::RenderingControl, "GetVolume")
        .instance()
        .arg("Channel", "Master")
        .invoke(client, ip)
        .await?;

    let volume = extract_xml_text(&response, "CurrentVolume").ok_or(SoapError::Parse)?;
    volume.parse().map_err(|_| SoapError::Parse)
}

/// Sets the renderer's master volume (0-100, values above 100 are clamped).
pub async fn set_volume(client: &Client, ip: &str, level: u8) -> SoapResult<()> {
    let clamped = level.min(100);

    SoapAction::new(RendererService::RenderingControl, "SetVolume")
        .instance()
        .arg("Channel", "Master")
        .arg("DesiredVolume", clamped.to_string())
        .invoke(client, ip)
        .await?;
    Ok(())
}
