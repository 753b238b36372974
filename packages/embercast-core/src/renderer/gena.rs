//! GENA (UPnP eventing) subscription lifecycle and NOTIFY parsing.
//!
//! Responsibilities:
//! - SUBSCRIBE / renew / UNSUBSCRIBE against the renderer's AVTransport
//!   event endpoint
//! - Tracking active subscription IDs so stray NOTIFYs can be rejected
//! - Parsing NOTIFY bodies into [`TransportNotification`]s for the engine

use dashmap::DashMap;
use reqwest::{Client, Method};
use thiserror::Error;

use super::services::{renderer_url, RendererService};
use super::xml::{extract_val_attrs, extract_xml_text};
use crate::protocol::GENA_SUBSCRIPTION_TIMEOUT_SECS;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during GENA subscription operations.
#[derive(Debug, Error)]
pub enum GenaError {
    /// HTTP request to the renderer failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Renderer rejected the SUBSCRIBE request.
    #[error("subscription failed with HTTP {0}")]
    SubscriptionFailed(u16),

    /// Renderer rejected the renewal request.
    #[error("subscription renewal failed with HTTP {0}")]
    RenewalFailed(u16),

    /// Renderer accepted the subscription but returned no SID header.
    #[error("subscription response missing SID header")]
    MissingSid,
}

/// Convenient Result alias for GENA operations.
pub type GenaResult<T> = Result<T, GenaError>;

// ─────────────────────────────────────────────────────────────────────────────
// Notification Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// A normalized AVTransport notification from the renderer.
///
/// Raw payloads are opaque key/value property sets; only the fields the
/// reconciliation engine consumes are extracted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportNotification {
    /// The renderer's reported transport state (e.g. "PLAYING", "STOPPED").
    pub transport_state: Option<String>,
    /// URI of the track the renderer reports as current.
    pub current_track_uri: Option<String>,
    /// URI of the track the renderer reports as queued-next.
    pub next_track_uri: Option<String>,
    /// Error description reported by the transport, if any.
    pub error_description: Option<String>,
}

/// Parses an AVTransport NOTIFY body into a [`TransportNotification`].
///
/// The interesting fields live inside the entity-encoded `LastChange`
/// element as `val` attributes. A body without `LastChange` parses to an
/// empty notification, which the engine ignores.
#[must_use]
pub fn parse_transport_notify(body: &str) -> TransportNotification {
    let mut notification = TransportNotification::default();

    let Some(last_change) = extract_xml_text(body, "LastChange") else {
        return notification;
    };
    let decoded = html_escape::decode_html_entities(&last_change);

    let attrs = extract_val_attrs(
        &decoded,
        &[
            "TransportState",
            "CurrentTrackURI",
            "NextAVTransportURI",
            "TransportErrorDescription",
        ],
    );

    notification.transport_state = attrs.get("TransportState").cloned();

    // URI values are entity-encoded a second time inside the attribute.
    let decode_uri = |value: &String| html_escape::decode_html_entities(value).into_owned();
    notification.current_track_uri = attrs
        .get("CurrentTrackURI")
        .map(decode_uri)
        .filter(|uri| !uri.is_empty());
    notification.next_track_uri = attrs
        .get("NextAVTransportURI")
        .map(decode_uri)
        .filter(|uri| !uri.is_empty());
    notification.error_description = attrs.get("TransportErrorDescription").cloned();

    notification
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscription Management
// ─────────────────────────────────────────────────────────────────────────────

struct SubscriptionRecord {
    service: RendererService,
}

/// Manages GENA event subscriptions against a single renderer.
///
/// The renderer expires subscriptions on its own schedule, so the bootstrap
/// layer drives [`ensure_subscribed`](Self::ensure_subscribed) periodically;
/// renewal failures fall back to a fresh SUBSCRIBE on the same tick.
pub struct EventSubscriber {
    client: Client,
    renderer_ip: String,
    /// Active subscriptions keyed by SID.
    subscriptions: DashMap<String, SubscriptionRecord>,
}

impl EventSubscriber {
    /// Creates a subscriber for the renderer at `renderer_ip`.
    pub fn new(client: Client, renderer_ip: String) -> Self {
        Self {
            client,
            renderer_ip,
            subscriptions: DashMap::new(),
        }
    }

    fn subscribe_method() -> Method {
        Method::from_bytes(b"SUBSCRIBE").expect("SUBSCRIBE is a valid method")
    }

    fn unsubscribe_method() -> Method {
        Method::from_bytes(b"UNSUBSCRIBE").expect("UNSUBSCRIBE is a valid method")
    }

    /// Returns whether `sid` belongs to an active subscription.
    #[must_use]
    pub fn is_known_sid(&self, sid: &str) -> bool {
        self.subscriptions.contains_key(sid)
    }

    /// Returns whether any subscription is currently active.
    #[must_use]
    pub fn has_subscriptions(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Subscribes to AVTransport events, delivering NOTIFYs to `callback_url`.
    ///
    /// Returns the subscription ID assigned by the renderer.
    pub async fn subscribe(&self, callback_url: &str) -> GenaResult<String> {
        let service = RendererService::AVTransport;
        let url = renderer_url(&self.renderer_ip, service.event_path());

        let response = self
            .client
            .request(Self::subscribe_method(), &url)
            .header("CALLBACK", format!("<{}>", callback_url))
            .header("NT", "upnp:event")
            .header("TIMEOUT", format!("Second-{}", GENA_SUBSCRIPTION_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenaError::SubscriptionFailed(response.status().as_u16()));
        }

        let sid = response
            .headers()
            .get("SID")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(GenaError::MissingSid)?;

        log::info!(
            "[GENA] Subscribed to {} on {} (sid {})",
            service.name(),
            self.renderer_ip,
            sid
        );

        self.subscriptions
            .insert(sid.clone(), SubscriptionRecord { service });
        Ok(sid)
    }

    /// Renews one subscription by SID.
    async fn renew(&self, sid: &str, service: RendererService) -> GenaResult<()> {
        let url = renderer_url(&self.renderer_ip, service.event_path());

        let response = self
            .client
            .request(Self::subscribe_method(), &url)
            .header("SID", sid)
            .header("TIMEOUT", format!("Second-{}", GENA_SUBSCRIPTION_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenaError::RenewalFailed(response.status().as_u16()));
        }
        Ok(())
    }

    /// Ensures an AVTransport subscription is active, subscribing or renewing
    /// as needed.
    ///
    /// A renewal rejected by the renderer (typically 412 after the SID
    /// expired) drops the stale record and immediately resubscribes.
    pub async fn ensure_subscribed(&self, callback_url: &str) -> GenaResult<()> {
        if self.subscriptions.is_empty() {
            self.subscribe(callback_url).await?;
            return Ok(());
        }

        let records: Vec<(String, RendererService)> = self
            .subscriptions
            .iter()
            .map(|r| (r.key().clone(), r.value().service))
            .collect();

        for (sid, service) in records {
            match self.renew(&sid, service).await {
                Ok(()) => {
                    log::debug!("[GENA] Renewed subscription {}", sid);
                }
                Err(e) => {
                    log::warn!("[GENA] Renewal of {} failed ({}); resubscribing", sid, e);
                    self.subscriptions.remove(&sid);
                    self.subscribe(callback_url).await?;
                }
            }
        }
        Ok(())
    }

    /// Cancels all active subscriptions.
    ///
    /// Failures are ignored beyond logging; the renderer expires orphaned
    /// subscriptions on its own.
    pub async fn unsubscribe_all(&self) {
        let records: Vec<(String, RendererService)> = self
            .subscriptions
            .iter()
            .map(|r| (r.key().clone(), r.value().service))
            .collect();

        let futures: Vec<_> = records
            .iter()
            .map(|(sid, service)| {
                let url = renderer_url(&self.renderer_ip, service.event_path());
                let client = self.client.clone();
                let sid = sid.clone();
                async move {
                    let result = client
                        .request(Self::unsubscribe_method(), &url)
                        .header("SID", &sid)
                        .send()
                        .await;
                    match result {
                        Ok(response) if response.status().is_success() => {
                            log::info!("[GENA] Unsubscribed {}", sid);
                        }
                        Ok(response) => {
                            log::warn!(
                                "[GENA] Unsubscribe {} returned HTTP {}",
                                sid,
                                response.status()
                            );
                        }
                        Err(e) => log::warn!("[GENA] Unsubscribe {} failed: {}", sid, e),
                    }
                }
            })
            .collect();

        futures::future::join_all(futures).await;
        self.subscriptions.clear();
    }

    /// Handles a NOTIFY request received on the callback endpoint.
    ///
    /// Returns the parsed notification, or `None` when the SID does not
    /// belong to an active subscription (stale renewals from a previous run).
    #[must_use]
    pub fn handle_notify(&self, sid: &str, body: &str) -> Option<TransportNotification> {
        if !self.subscriptions.contains_key(sid) {
            return None;
        }
        Some(parse_transport_notify(body))
    }
}
