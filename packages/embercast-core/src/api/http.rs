//! HTTP route handlers.
//!
//! All handlers are thin - the NOTIFY handler validates GENA headers and
//! forwards the parsed notification into the engine mailbox.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::engine::mailbox::EngineHandle;
use crate::error::{EmbercastError, EmbercastResult};
use crate::protocol::{MAX_GENA_BODY_SIZE, SERVICE_ID};
use crate::renderer::EventSubscriber;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine the callback feeds transport notifications into.
    pub engine: EngineHandle,
    /// Subscription store used to reject stray NOTIFYs.
    pub subscriber: Arc<EventSubscriber>,
}

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/gena/callback", any(handle_gena_notify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves the router until the process exits.
pub async fn start_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("[HTTP] Listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await
}

/// Liveness probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVICE_ID,
        "playback": state.engine.snapshot(),
    }))
}

/// Validates required GENA headers and extracts the SID.
fn validate_gena_headers(headers: &HeaderMap) -> EmbercastResult<String> {
    let nt = headers.get("NT").and_then(|v| v.to_str().ok());
    if nt != Some("upnp:event") {
        log::warn!("[GENA] NOTIFY missing or invalid NT header: {:?}", nt);
        return Err(EmbercastError::InvalidRequest(
            "Missing or invalid NT header".into(),
        ));
    }

    let nts = headers.get("NTS").and_then(|v| v.to_str().ok());
    if nts != Some("upnp:propchange") {
        log::warn!("[GENA] NOTIFY missing or invalid NTS header: {:?}", nts);
        return Err(EmbercastError::InvalidRequest(
            "Missing or invalid NTS header".into(),
        ));
    }

    match headers.get("SID").and_then(|v| v.to_str().ok()) {
        Some(sid) if !sid.is_empty() => Ok(sid.to_string()),
        _ => {
            log::warn!("[GENA] NOTIFY missing SID header");
            Err(EmbercastError::InvalidRequest("Missing SID header".into()))
        }
    }
}

/// Handles a GENA NOTIFY from the renderer.
///
/// Registered with `any()` because NOTIFY is not a standard HTTP method.
async fn handle_gena_notify(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, EmbercastError> {
    if method.as_str() != "NOTIFY" {
        return Err(EmbercastError::InvalidRequest(format!(
            "Unsupported method {method}"
        )));
    }
    if body.len() > MAX_GENA_BODY_SIZE {
        return Err(EmbercastError::InvalidRequest("Body too large".into()));
    }

    let sid = validate_gena_headers(&headers)?;
    let seq = headers
        .get("SEQ")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("?");
    log::debug!("[GENA] NOTIFY sid={} seq={} ({} bytes)", sid, seq, body.len());

    match state.subscriber.handle_notify(&sid, &body) {
        Some(notification) => {
            state.engine.notify_device(notification).await;
            Ok(StatusCode::OK)
        }
        None => {
            // A renderer can keep notifying an SID from a previous run for a
            // short while; answer 412 so it drops the stale subscription.
            log::warn!("[GENA] NOTIFY for unknown sid {}", sid);
            Ok(StatusCode::PRECONDITION_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gena_headers(sid: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("NT", "upnp:event".parse().unwrap());
        headers.insert("NTS", "upnp:propchange".parse().unwrap());
        headers.insert("SID", sid.parse().unwrap());
        headers
    }

    #[test]
    fn valid_headers_extract_sid() {
        let headers = gena_headers("uuid:sub-1");
        assert_eq!(validate_gena_headers(&headers).unwrap(), "uuid:sub-1");
    }

    #[test]
    fn missing_nt_is_rejected() {
        let mut headers = gena_headers("uuid:sub-1");
        headers.remove("NT");
        assert!(validate_gena_headers(&headers).is_err());
    }

    #[test]
    fn wrong_nts_is_rejected() {
        let mut headers = gena_headers("uuid:sub-1");
        headers.insert("NTS", "upnp:other".parse().unwrap());
        assert!(validate_gena_headers(&headers).is_err());
    }

    #[test]
    fn empty_sid_is_rejected() {
        let mut headers = gena_headers("uuid:sub-1");
        headers.insert("SID", "".parse().unwrap());
        assert!(validate_gena_headers(&headers).is_err());
    }
}
