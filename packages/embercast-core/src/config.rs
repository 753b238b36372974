//! Engine configuration.
//!
//! The reconciliation thresholds started life as empirical values tuned
//! against real renderers; they are kept configurable rather than re-derived.

use serde::{Deserialize, Serialize};

/// Tunables for the playback reconciliation engine.
///
/// All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A track is considered "near its end" when the reported position is
    /// within this many seconds of the duration. Gates the advance-on-event
    /// checks in the device event bridge.
    pub near_end_threshold_secs: u64,

    /// The consistency sweep forces an advance when the reported position
    /// exceeds the duration by more than this many seconds.
    pub overrun_slack_secs: u64,

    /// Interval between drift-corrector position syncs (seconds).
    pub drift_poll_interval_secs: u64,

    /// Interval between consistency sweeps (seconds).
    pub sweep_interval_secs: u64,

    /// Extra slack added to the end-of-track deadline timer (seconds).
    pub deadline_grace_secs: u64,

    /// Interval between GENA subscription refreshes (seconds).
    pub subscription_refresh_secs: u64,

    /// Capacity of the engine command mailbox.
    pub mailbox_capacity: usize,

    /// Volume level reported before the renderer has been queried (0-100).
    pub default_volume: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            near_end_threshold_secs: 2,
            overrun_slack_secs: 5,
            drift_poll_interval_secs: 3,
            sweep_interval_secs: 5,
            deadline_grace_secs: 1,
            subscription_refresh_secs: 15,
            mailbox_capacity: 64,
            default_volume: 50,
        }
    }
}

impl EngineConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.drift_poll_interval_secs == 0 {
            return Err("drift_poll_interval_secs must be >= 1".to_string());
        }
        if self.sweep_interval_secs == 0 {
            return Err("sweep_interval_secs must be >= 1".to_string());
        }
        if self.subscription_refresh_secs == 0 {
            return Err("subscription_refresh_secs must be >= 1".to_string());
        }
        if self.mailbox_capacity == 0 {
            return Err("mailbox_capacity must be >= 1 (mpsc::channel panics on 0)".to_string());
        }
        if self.default_volume > 100 {
            return Err("default_volume must be <= 100".to_string());
        }
        Ok(())
    }
}
