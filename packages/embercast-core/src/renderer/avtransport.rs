//! AVTransport commands for the renderer.
//!
//! Queue-slot programming, transport control, and position queries over SOAP,
//! with retry logic for transient faults on the commands that race the
//! renderer's own state transitions.

use std::time::Duration;

use reqwest::Client;

use super::didl::{format_slot_didl, SlotMetadata};
use super::services::RendererService;
use super::soap::{SoapAction, SoapError, SoapResult};
use super::xml::extract_xml_text;
use crate::utils::time_string_to_seconds;

/// Retry delays for transient SOAP faults (exponential backoff).
const RETRY_DELAYS_MS: [u64; 3] = [200, 500, 1000];

/// Executes a SOAP operation with retries for transient faults.
async fn with_retry<F, Fut>(action: &str, mut operation: F) -> SoapResult<String>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = SoapResult<String>>,
{
    let mut last_error = None;
    for (attempt, &delay_ms) in std::iter::once(&0).chain(RETRY_DELAYS_MS.iter()).enumerate() {
        if attempt > 0 {
            log::info!(
                "[AVTransport] Retrying {} (attempt {}/{}) after {}ms",
                action,
                attempt + 1,
                RETRY_DELAYS_MS.len() + 1,
                delay_ms
            );
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        match operation().await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_transient() => {
                log::warn!("[AVTransport] {} transient error: {}", action, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.expect("retry loop should have set last_error"))
}

/// Programs the renderer's current-track slot.
pub async fn set_transport_uri(
    client: &Client,
    ip: &str,
    uri: &str,
    metadata: &SlotMetadata,
) -> SoapResult<()> {
    let didl = format_slot_didl(uri, metadata);
    log::info!("[AVTransport] SetAVTransportURI: ip={}, uri={}", ip, uri);

    with_retry("SetAVTransportURI", || {
        SoapAction::new(RendererService::AVTransport, "SetAVTransportURI")
            .instance()
            .arg("CurrentURI", uri)
            .arg("CurrentURIMetaData", &didl)
            .invoke(client, ip)
    })
    .await?;
    Ok(())
}

/// Programs the renderer's next-track slot for gapless lookahead.
pub async fn set_next_transport_uri(
    client: &Client,
    ip: &str,
    uri: &str,
    metadata: &SlotMetadata,
) -> SoapResult<()> {
    let didl = format_slot_didl(uri, metadata);
    log::info!("[AVTransport] SetNextAVTransportURI: ip={}, uri={}", ip, uri);

    with_retry("SetNextAVTransportURI", || {
        SoapAction::new(RendererService::AVTransport, "SetNextAVTransportURI")
            .instance()
            .arg("NextURI", uri)
            .arg("NextURIMetaData", &didl)
            .invoke(client, ip)
    })
    .await?;
    Ok(())
}

/// Starts or resumes playback of whatever the transport is configured with.
pub async fn play(client: &Client, ip: &str) -> SoapResult<()> {
    with_retry("Play", || {
        SoapAction::new(RendererService::AVTransport, "Play")
            .instance()
            .arg("Speed", "1")
            .invoke(client, ip)
    })
    .await?;
    Ok(())
}

/// Pauses playback.
pub async fn pause(client: &Client, ip: &str) -> SoapResult<()> {
    SoapAction::new(RendererService::AVTransport, "Pause")
        .instance()
        .invoke(client, ip)
        .await?;
    Ok(())
}

/// Stops playback.
///
/// Fault 701 ("transition not available") means the renderer is already
/// stopped and is treated as success.
pub async fn stop(client: &Client, ip: &str) -> SoapResult<()> {
    let result = SoapAction::new(RendererService::AVTransport, "Stop")
        .instance()
        .invoke(client, ip)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(SoapError::Fault(msg)) if msg.contains("701") => {
            log::debug!("[AVTransport] Stop: renderer {} already stopped (701)", ip);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Skips the renderer to its queued next track.
pub async fn next(client: &Client, ip: &str) -> SoapResult<()> {
    SoapAction::new(RendererService::AVTransport, "Next")
        .instance()
        .invoke(client, ip)
        .await?;
    Ok(())
}

/// Seeks within the current track to an "H:MM:SS" target.
pub async fn seek(client: &Client, ip: &str, timecode: &str) -> SoapResult<()> {
    log::info!("[AVTransport] Seek: ip={}, target={}", ip, timecode);
    SoapAction::new(RendererService::AVTransport, "Seek")
        .instance()
        .arg("Unit", "REL_TIME")
        .arg("Target", timecode)
        .invoke(client, ip)
        .await?;
    Ok(())
}

/// Clears every track queued on the renderer.
pub async fn remove_all_tracks(client: &Client, ip: &str) -> SoapResult<()> {
    SoapAction::new(RendererService::AVTransport, "RemoveAllTracksFromQueue")
        .instance()
        .invoke(client, ip)
        .await?;
    Ok(())
}

/// Position information reported by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionInfo {
    /// URI of the track the renderer is currently on.
    pub track_uri: String,
    /// Track duration as reported ("H:MM:SS", may be a placeholder).
    pub track_duration: String,
    /// Elapsed position as reported ("H:MM:SS").
    pub rel_time: String,
    /// Elapsed position in whole seconds (0 for placeholder values).
    pub rel_time_secs: u64,
}

/// Queries the renderer's true playback position.
///
/// The drift corrector reconciles the local clock against `rel_time_secs`.
pub async fn get_position_info(client: &Client, ip: &str) -> SoapResult<PositionInfo> {
    let response = SoapAction::new(RendererService::AVTransport, "GetPositionInfo")
        .instance()
        .invoke(client, ip)
        .await?;

    let track_uri = extract_xml_text(&response, "TrackURI").unwrap_or_default();
    let track_duration = extract_xml_text(&response, "TrackDuration").unwrap_or_default();
    let rel_time = extract_xml_text(&response, "RelTime").unwrap_or_else(|| "0:00:00".to_string());
    let rel_time_secs = time_string_to_seconds(&rel_time);

    Ok(PositionInfo {
        track_uri,
        track_duration,
        rel_time,
        rel_time_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_info_defaults_are_empty() {
        let info = PositionInfo::default();
        assert_eq!(info.rel_time_secs, 0);
        assert!(info.track_uri.is_empty());
    }
}
