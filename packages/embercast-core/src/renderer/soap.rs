//! Low-level SOAP protocol implementation for UPnP renderer control.
//!
//! Handles envelope building, HTTP transport, and SOAP fault detection.
//! High-level transport commands live in `avtransport.rs` and `rendering.rs`.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::services::{renderer_url, RendererService};
use super::xml::{escape_xml, extract_xml_text};
use crate::protocol::SOAP_TIMEOUT_SECS;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during SOAP operations with the renderer.
#[derive(Debug, Error)]
pub enum SoapError {
    /// HTTP request to the renderer failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Renderer returned a non-success HTTP status without a SOAP fault.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// Renderer returned a SOAP fault response.
    #[error("SOAP fault: {0}")]
    Fault(String),

    /// Failed to parse the SOAP response.
    #[error("Failed to parse SOAP response")]
    Parse,
}

/// Convenient Result alias for SOAP operations.
pub type SoapResult<T> = Result<T, SoapError>;

impl SoapError {
    /// Returns true if this error is transient and the operation may be retried.
    ///
    /// Transient UPnP fault codes:
    /// - 701: Transition not available (device changing states)
    /// - 714: Illegal seek target (previous source still loading)
    /// - 716: Resource not found (device busy initializing)
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SoapError::Fault(msg) => {
                msg.contains("701")
                    || msg.contains("714")
                    || msg.contains("716")
                    || msg.to_lowercase().contains("transition")
            }
            SoapError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SOAP Action
// ─────────────────────────────────────────────────────────────────────────────

/// A single SOAP action invocation against a renderer service.
///
/// Collects arguments in insertion order, then [`invoke`](Self::invoke)s the
/// request and surfaces SOAP faults as [`SoapError::Fault`].
pub(crate) struct SoapAction<'a> {
    service: RendererService,
    action: &'a str,
    args: Vec<(&'a str, String)>,
}

impl<'a> SoapAction<'a> {
    /// Creates a new action for the given service.
    #[must_use]
    pub fn new(service: RendererService, action: &'a str) -> Self {
        Self {
            service,
            action,
            args: Vec::new(),
        }
    }

    /// Adds an argument. Arguments appear in the SOAP body in insertion order.
    #[must_use]
    pub fn arg(mut self, name: &'a str, value: impl Into<String>) -> Self {
        self.args.push((name, value.into()));
        self
    }

    /// Adds the standard `InstanceID=0` argument used by transport actions.
    #[must_use]
    pub fn instance(self) -> Self {
        self.arg("InstanceID", "0")
    }

    /// Renders the SOAP envelope for this action.
    ///
    /// The envelope must be a single line with no leading whitespace: some
    /// renderer SOAP parsers reject documents with content before the root
    /// element.
    fn envelope(&self) -> String {
        let mut body = format!(
            r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{urn}">"#,
            action = self.action,
            urn = self.service.urn()
        );
        for (name, value) in &self.args {
            body.push_str(&format!("<{name}>{}</{name}>", escape_xml(value)));
        }
        body.push_str(&format!("</u:{}></s:Body></s:Envelope>", self.action));
        body
    }

    /// Sends the action to the renderer at `ip` and returns the response body.
    pub async fn invoke(self, client: &Client, ip: &str) -> SoapResult<String> {
        let url = renderer_url(ip, self.service.control_path());
        let soap_action = format!("\"{}#{}\"", self.service.urn(), self.action);
        let body = self.envelope();

        log::debug!("[SOAP] {} -> {} ({} bytes)", self.action, url, body.len());

        let response = client
            .post(&url)
            .header("Content-Type", "text/xml; charset=\"utf-8\"")
            .header("SOAPAction", soap_action)
            .body(body)
            .timeout(Duration::from_secs(SOAP_TIMEOUT_SECS))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // A SOAP fault can arrive with a 500 status; check the body first.
        if text.contains("<s:Fault>") || text.contains("<soap:Fault>") {
            let fault = extract_fault(&text).unwrap_or_else(|| "Unknown SOAP fault".to_string());
            return Err(SoapError::Fault(fault));
        }

        if !status.is_success() {
            return Err(SoapError::HttpStatus(status.as_u16(), text));
        }

        Ok(text)
    }
}

/// Extracts a human-readable fault description from a SOAP fault response.
///
/// UPnP faults carry the error code in `<errorCode>` inside the detail
/// element; plain SOAP faults only have `<faultstring>`.
fn extract_fault(xml: &str) -> Option<String> {
    match (
        extract_xml_text(xml, "errorCode"),
        extract_xml_text(xml, "faultstring"),
    ) {
        (Some(code), Some(fault)) => Some(format!("{} ({})", fault, code)),
        (Some(code), None) => Some(code),
        (None, Some(fault)) => Some(fault),
        (None, None) => None,
    }
}
