//! Media resolution against the external conversion service.
//!
//! The conversion service turns an opaque track identifier into a playable
//! audio URL (`/convert`) and serves duration/title metadata for a converted
//! file (`/audio/{file}/info`). The engine never talks to the media source
//! directly.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors from media resolution.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP request to the conversion service failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Conversion service returned an error status.
    #[error("media service returned HTTP {0}")]
    Status(u16),

    /// Conversion service has no playable URL for the track.
    #[error("no playable audio for track {0}")]
    Unavailable(String),
}

/// Convenient Result alias for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Metadata for a resolved audio URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    /// Track duration in whole seconds.
    pub duration_secs: u64,
    /// Track title for display.
    pub title: Option<String>,
    /// Album art URL for display.
    pub artwork_url: Option<String>,
}

/// External collaborator that resolves track identifiers to playable audio.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolves a track identifier to a playable audio URL.
    ///
    /// With `no_wait`, the service is asked to start conversion without
    /// blocking for completion - used for next-track preloads where the URL
    /// only needs to be valid by the time the renderer reaches it.
    async fn resolve_audio_url(&self, track_id: &str, no_wait: bool) -> MediaResult<String>;

    /// Fetches duration/title metadata for a resolved audio URL.
    async fn metadata(&self, audio_url: &str) -> MediaResult<TrackMetadata>;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Implementation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    url: String,
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AudioInfoResponse {
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artwork: Option<String>,
}

/// [`MediaResolver`] backed by the HTTP conversion service.
pub struct HttpMediaResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMediaResolver {
    /// Creates a resolver for the conversion service at `base_url`
    /// (e.g. `http://192.168.1.23:8080`).
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a resolver with a default HTTP client.
    pub fn from_base_url(base_url: String) -> MediaResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::new(client, base_url))
    }
}

#[async_trait]
impl MediaResolver for HttpMediaResolver {
    async fn resolve_audio_url(&self, track_id: &str, no_wait: bool) -> MediaResult<String> {
        let url = format!(
            "{}/convert?trackId={}&noWait={}",
            self.base_url, track_id, no_wait
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MediaError::Status(response.status().as_u16()));
        }

        let converted: ConvertResponse = response.json().await?;
        if converted.url.is_empty() {
            return Err(MediaError::Unavailable(track_id.to_string()));
        }
        Ok(converted.url)
    }

    async fn metadata(&self, audio_url: &str) -> MediaResult<TrackMetadata> {
        // The info endpoint is keyed by the converted file name.
        let file = audio_url.rsplit('/').next().unwrap_or(audio_url);
        let url = format!("{}/audio/{}/info", self.base_url, file);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MediaError::Status(response.status().as_u16()));
        }

        let info: AudioInfoResponse = response.json().await?;
        Ok(TrackMetadata {
            duration_secs: info.duration.max(0.0).round() as u64,
            title: info.title,
            artwork_url: info.artwork,
        })
    }
}
