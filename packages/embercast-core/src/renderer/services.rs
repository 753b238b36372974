//! UPnP service definitions for the media renderer.
//!
//! Single source of truth for service URNs, control paths, and event paths
//! used by both SOAP commands and GENA subscriptions.

/// UPnP services used for renderer control and event subscriptions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum RendererService {
    /// Transport control (play, pause, stop, seek, queue slots).
    AVTransport,
    /// Volume and mute control.
    RenderingControl,
}

impl RendererService {
    /// Returns the UPnP service URN for SOAP requests.
    #[must_use]
    pub fn urn(&self) -> &'static str {
        match self {
            Self::AVTransport => "urn:schemas-upnp-org:service:AVTransport:1",
            Self::RenderingControl => "urn:schemas-upnp-org:service:RenderingControl:1",
        }
    }

    /// Returns the control endpoint path for SOAP requests.
    #[must_use]
    pub fn control_path(&self) -> &'static str {
        match self {
            Self::AVTransport => "/MediaRenderer/AVTransport/Control",
            Self::RenderingControl => "/MediaRenderer/RenderingControl/Control",
        }
    }

    /// Returns the event endpoint path for GENA subscriptions.
    #[must_use]
    pub fn event_path(&self) -> &'static str {
        match self {
            Self::AVTransport => "/MediaRenderer/AVTransport/Event",
            Self::RenderingControl => "/MediaRenderer/RenderingControl/Event",
        }
    }

    /// Returns a human-readable name for this service.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AVTransport => "AVTransport",
            Self::RenderingControl => "RenderingControl",
        }
    }
}

/// Builds the full URL for a renderer endpoint path.
#[must_use]
pub(crate) fn renderer_url(ip: &str, path: &str) -> String {
    format!("http://{}:{}{}", ip, crate::protocol::RENDERER_CONTROL_PORT, path)
}
