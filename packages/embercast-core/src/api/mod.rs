//! HTTP surface: the GENA callback endpoint and a health probe.

mod http;

pub use http::{create_router, start_server, AppState};
