//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::net::IpAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind the callback HTTP server to.
    /// Override: `EMBERCAST_BIND_PORT`
    pub bind_port: u16,

    /// IP address to advertise to the renderer for GENA callbacks.
    /// This should be an IP the renderer can reach. If not specified,
    /// auto-detection is attempted.
    /// Override: `EMBERCAST_ADVERTISE_IP`
    pub advertise_ip: Option<IpAddr>,

    /// IP address of the renderer to control.
    /// Override: `EMBERCAST_RENDERER_IP`
    pub renderer_ip: Option<String>,

    /// Base URL of the media conversion service.
    /// Override: `EMBERCAST_MEDIA_SERVICE_URL`
    pub media_service_url: Option<String>,

    /// Engine tunables (thresholds and intervals).
    pub engine: embercast_core::EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_port: 49600,
            advertise_ip: None,
            renderer_ip: None,
            media_service_url: None,
            engine: embercast_core::EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("EMBERCAST_BIND_PORT") {
            if let Ok(port) = val.parse() {
                self.bind_port = port;
            }
        }

        if let Ok(val) = std::env::var("EMBERCAST_ADVERTISE_IP") {
            if let Ok(ip) = val.parse() {
                self.advertise_ip = Some(ip);
            }
        }

        if let Ok(val) = std::env::var("EMBERCAST_RENDERER_IP") {
            if !val.is_empty() {
                self.renderer_ip = Some(val);
            }
        }

        if let Ok(val) = std::env::var("EMBERCAST_MEDIA_SERVICE_URL") {
            if !val.is_empty() {
                self.media_service_url = Some(val);
            }
        }
    }
}
