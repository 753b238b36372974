//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by external specifications (UPnP, GENA) and
//! changing them would break protocol compliance.

// ─────────────────────────────────────────────────────────────────────────────
// UPnP / SOAP
// ─────────────────────────────────────────────────────────────────────────────

/// TCP port UPnP media renderers expose their control and event endpoints on.
pub const RENDERER_CONTROL_PORT: u16 = 1400;

/// Timeout for SOAP HTTP requests (seconds).
///
/// 10 seconds is reasonable for LAN operations.
pub const SOAP_TIMEOUT_SECS: u64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// GENA (UPnP General Event Notification Architecture)
// ─────────────────────────────────────────────────────────────────────────────

/// GENA subscription timeout requested from the renderer (seconds).
///
/// 1 hour is a reasonable default per UPnP spec recommendations.
pub const GENA_SUBSCRIPTION_TIMEOUT_SECS: u64 = 3600;

/// Maximum size of a GENA notification body (bytes).
pub const MAX_GENA_BODY_SIZE: usize = 64 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Application Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used in protocol data (DIDL-Lite metadata).
pub const APP_NAME: &str = "Embercast";

/// Service identifier reported by the health endpoint.
pub const SERVICE_ID: &str = "embercast";
