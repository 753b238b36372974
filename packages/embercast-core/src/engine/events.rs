//! Transport event classification.
//!
//! The renderer reports many transport states; the reconciliation engine
//! reacts to exactly four. Everything else is ignored by design.

/// Canonical transport events the engine handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// Playback stopped (end of track or explicit stop).
    Stopped,
    /// Playback running.
    Playing,
    /// The renderer is switching tracks or buffering.
    Transitioning,
    /// Playback paused on the renderer.
    PausedPlayback,
}

impl TransportEvent {
    /// Classifies a raw transport-state string.
    ///
    /// Returns `None` for states the engine does not react to
    /// (e.g. `NO_MEDIA_PRESENT`, `RECORDING`).
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        match raw {
            "STOPPED" => Some(Self::Stopped),
            "PLAYING" => Some(Self::Playing),
            "TRANSITIONING" => Some(Self::Transitioning),
            "PAUSED_PLAYBACK" => Some(Self::PausedPlayback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_four_handled_states() {
        assert_eq!(TransportEvent::classify("STOPPED"), Some(TransportEvent::Stopped));
        assert_eq!(TransportEvent::classify("PLAYING"), Some(TransportEvent::Playing));
        assert_eq!(
            TransportEvent::classify("TRANSITIONING"),
            Some(TransportEvent::Transitioning)
        );
        assert_eq!(
            TransportEvent::classify("PAUSED_PLAYBACK"),
            Some(TransportEvent::PausedPlayback)
        );
    }

    #[test]
    fn other_states_are_ignored() {
        assert_eq!(TransportEvent::classify("NO_MEDIA_PRESENT"), None);
        assert_eq!(TransportEvent::classify("RECORDING"), None);
        assert_eq!(TransportEvent::classify("playing"), None);
        assert_eq!(TransportEvent::classify(""), None);
    }
}
