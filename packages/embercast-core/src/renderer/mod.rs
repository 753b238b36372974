//! Renderer control and eventing (UPnP/SOAP/GENA).
//!
//! # Module Structure
//!
//! - `services` - UPnP service definitions (URNs, paths)
//! - `soap` - Low-level SOAP protocol implementation
//! - `xml` - Targeted XML extraction helpers
//! - `didl` - DIDL-Lite metadata for queue slots
//! - `avtransport` - Transport commands (slots, play/pause/stop/seek, position)
//! - `rendering` - Volume control
//! - `gena` - Event subscription lifecycle and NOTIFY parsing
//! - `traits` - [`DeviceTransport`] seam for the engine
//! - `client` - Concrete SOAP-backed client

pub mod avtransport;
pub mod client;
pub(crate) mod didl;
pub mod gena;
pub(crate) mod rendering;
pub mod services;
pub mod soap;
pub mod traits;
pub(crate) mod xml;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export the types the rest of the crate works with
pub use avtransport::PositionInfo;
pub use client::RendererClient;
pub use didl::SlotMetadata;
pub use gena::{EventSubscriber, TransportNotification};
pub use services::RendererService;
pub use traits::DeviceTransport;
