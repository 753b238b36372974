//! Embercast Core - shared library for Embercast.
//!
//! Embercast bridges an abstract cast playback controller to a UPnP media
//! renderer that is controlled asynchronously over SOAP commands and GENA
//! push events. The heart of the crate is the playback reconciliation
//! engine, which keeps a locally simulated transport (clock, duration,
//! track identity) consistent with a renderer whose true state arrives
//! late, out of order, or not at all.
//!
//! # Architecture
//!
//! - [`engine`]: the reconciliation engine (clock, event bridge, drift
//!   corrector, transition controller, watchdog, command facade)
//! - [`renderer`]: renderer control and eventing (SOAP/GENA)
//! - [`media`]: media resolution against the external conversion service
//! - [`queue`]: track queue abstraction
//! - [`api`]: HTTP surface (GENA callback, health)
//! - [`bootstrap`]: service wiring
//! - [`config`] / [`protocol`]: tunables and fixed protocol constants
//! - [`context`] / [`runtime`] / [`error`] / [`utils`]: ambient plumbing
//!
//! # Upstream seams
//!
//! The upstream cast layer consumes [`PlaybackDriver`] and implements
//! [`StateListener`] and [`TrackQueue`]; everything renderer-facing stays
//! behind [`DeviceTransport`].

#![warn(clippy::all)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod media;
pub mod protocol;
pub mod queue;
pub mod renderer;
pub mod runtime;
pub mod utils;

// Re-export commonly used types at the crate root
pub use api::{create_router, start_server, AppState};
pub use bootstrap::{bootstrap_bridge, BridgeDeps, BridgeServices};
pub use config::EngineConfig;
pub use context::{CallbackContext, NetworkError};
pub use engine::driver::{
    LoggingStateListener, NoopStateListener, PlaybackDriver, StateListener,
};
pub use engine::mailbox::EngineHandle;
pub use engine::{spawn_engine, EngineDeps, PlaybackSnapshot, PlayerStatus, TransportEvent, Volume};
pub use error::{EmbercastError, EmbercastResult, ErrorCode};
pub use media::{HttpMediaResolver, MediaError, MediaResolver, TrackMetadata};
pub use queue::{InMemoryQueue, QueueSnapshot, TrackQueue, TrackRef};
pub use renderer::{
    DeviceTransport, EventSubscriber, PositionInfo, RendererClient, SlotMetadata,
    TransportNotification,
};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use utils::{seconds_to_time_string, time_string_to_seconds, track_id_from_uri};
