//! DIDL-Lite metadata formatting for renderer queue slots.
//!
//! Renderers display this metadata and use the `res` element's duration and
//! protocol info to configure gapless lookahead for the next-track slot.

use super::xml::escape_xml;
use crate::protocol::APP_NAME;
use crate::utils::seconds_to_time_string;

/// Metadata attached to a current- or next-track queue slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotMetadata {
    /// Track title for display; falls back to the application name.
    pub title: Option<String>,
    /// Track duration in seconds (0 when unknown, e.g. preloads).
    pub duration_secs: u64,
    /// Album art URL for display.
    pub album_art_uri: Option<String>,
}

/// Formats DIDL-Lite metadata for a queue slot.
pub(crate) fn format_slot_didl(track_url: &str, metadata: &SlotMetadata) -> String {
    let title = metadata.title.as_deref().unwrap_or(APP_NAME);

    let mut didl = String::from(
        r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/">"#,
    );
    didl.push_str(r#"<item id="-1" parentID="-1" restricted="true">"#);
    didl.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    didl.push_str("<upnp:class>object.item.audioItem.musicTrack</upnp:class>");

    if let Some(art) = &metadata.album_art_uri {
        didl.push_str(&format!(
            "<upnp:albumArtURI>{}</upnp:albumArtURI>",
            escape_xml(art)
        ));
    }

    didl.push_str(&format!(
        r#"<res duration="{}" protocolInfo="http-get:*:audio/mpeg:*">{}</res>"#,
        seconds_to_time_string(metadata.duration_secs),
        escape_xml(track_url)
    ));
    didl.push_str("</item></DIDL-Lite>");

    didl
}
