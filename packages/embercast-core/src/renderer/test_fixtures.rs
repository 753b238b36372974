//! Shared test fixtures for GENA notification payloads.
//!
//! These constants are used by multiple test modules to avoid duplication.

/// AVTransport NOTIFY: playing, with current and queued-next track URIs.
pub const AV_TRANSPORT_NOTIFY_PLAYING: &str = r#"<?xml version="1.0"?>
<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0">
  <e:property>
    <LastChange>&lt;Event xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/AVT/&quot;&gt;
      &lt;InstanceID val=&quot;0&quot;&gt;
        &lt;TransportState val=&quot;PLAYING&quot;/&gt;
        &lt;CurrentTrackURI val=&quot;http://192.168.1.23:8080/audio/abc123.mp3&quot;/&gt;
        &lt;NextAVTransportURI val=&quot;http://192.168.1.23:8080/audio/def456.mp3&quot;/&gt;
      &lt;/InstanceID&gt;
    &lt;/Event&gt;</LastChange>
  </e:property>
</e:propertyset>"#;

/// AVTransport NOTIFY: stopped, current track only.
pub const AV_TRANSPORT_NOTIFY_STOPPED: &str = r#"<?xml version="1.0"?>
<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0">
  <e:property>
    <LastChange>&lt;Event xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/AVT/&quot;&gt;
      &lt;InstanceID val=&quot;0&quot;&gt;
        &lt;TransportState val=&quot;STOPPED&quot;/&gt;
        &lt;CurrentTrackURI val=&quot;http://192.168.1.23:8080/audio/abc123.mp3&quot;/&gt;
      &lt;/InstanceID&gt;
    &lt;/Event&gt;</LastChange>
  </e:property>
</e:propertyset>"#;

/// AVTransport NOTIFY with a transport state the engine does not handle.
pub const AV_TRANSPORT_NOTIFY_UNKNOWN: &str = r#"<?xml version="1.0"?>
<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0">
  <e:property>
    <LastChange>&lt;Event xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/AVT/&quot;&gt;
      &lt;InstanceID val=&quot;0&quot;&gt;
        &lt;TransportState val=&quot;NO_MEDIA_PRESENT&quot;/&gt;
      &lt;/InstanceID&gt;
    &lt;/Event&gt;</LastChange>
  </e:property>
</e:propertyset>"#;
