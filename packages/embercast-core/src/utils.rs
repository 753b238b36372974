//! General utilities shared across the application.

// ─────────────────────────────────────────────────────────────────────────────
// Timecode Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Formats a number of seconds as an "H:MM:SS" timecode.
///
/// This is the format UPnP AVTransport uses for `RelTime`, `Seek` targets,
/// and DIDL-Lite `duration` attributes. Hours are not zero-padded.
#[must_use]
pub fn seconds_to_time_string(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

/// Parses an "H:MM:SS" timecode into seconds.
///
/// Invalid input (wrong shape, minutes or seconds >= 60, non-numeric parts)
/// yields 0 rather than an error: renderers report placeholder values like
/// "NOT_IMPLEMENTED" for streams without position information.
#[must_use]
pub fn time_string_to_seconds(timecode: &str) -> u64 {
    let mut parts = timecode.split(':');
    let (Some(h), Some(m), Some(s), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return 0;
    };

    if h.is_empty() || m.len() != 2 || s.len() != 2 {
        return 0;
    }

    let (Ok(hours), Ok(minutes), Ok(secs)) =
        (h.parse::<u64>(), m.parse::<u64>(), s.parse::<u64>())
    else {
        return 0;
    };

    if minutes >= 60 || secs >= 60 {
        return 0;
    }

    hours * 3600 + minutes * 60 + secs
}

// ─────────────────────────────────────────────────────────────────────────────
// Track Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Derives a track identity from an audio URI.
///
/// Track URIs are opaque strings; identity is the final path segment with a
/// trailing `.mp3` extension stripped. Returns an empty string for URIs
/// without a usable segment.
#[must_use]
pub fn track_id_from_uri(uri: &str) -> String {
    let segment = uri.rsplit('/').next().unwrap_or("");
    segment.strip_suffix(".mp3").unwrap_or(segment).to_string()
}
