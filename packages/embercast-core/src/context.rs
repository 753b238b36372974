//! Network context for the GENA callback endpoint.
//!
//! The renderer pushes transport events to us over HTTP, so it needs a URL
//! it can reach: the advertise IP + bind port of the callback server.

use std::net::IpAddr;

use thiserror::Error;

/// Errors from network context resolution.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Local IP auto-detection failed.
    #[error("failed to detect a local IP address: {0}")]
    IpDetection(String),
}

/// Advertise address for the GENA callback endpoint.
#[derive(Debug, Clone, Copy)]
pub struct CallbackContext {
    /// IP address the renderer can reach this process on.
    pub advertise_ip: IpAddr,
    /// Port the callback HTTP server listens on.
    pub port: u16,
}

impl CallbackContext {
    /// Creates a context with an explicitly configured advertise IP.
    #[must_use]
    pub fn explicit(advertise_ip: IpAddr, port: u16) -> Self {
        Self { advertise_ip, port }
    }

    /// Creates a context by auto-detecting the local IP address.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::IpDetection`] when no usable interface is
    /// found (e.g. VPN-only routing); callers should fall back to asking the
    /// operator for an explicit address.
    pub fn auto_detect(port: u16) -> Result<Self, NetworkError> {
        let ip = local_ip_address::local_ip().map_err(|e| NetworkError::IpDetection(e.to_string()))?;
        Ok(Self {
            advertise_ip: ip,
            port,
        })
    }

    /// The URL the renderer should deliver GENA NOTIFY requests to.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("http://{}:{}/gena/callback", self.advertise_ip, self.port)
    }
}
