//! Minimal XML helpers for UPnP payloads.
//!
//! UPnP responses and GENA notifications are shallow, well-known documents;
//! targeted string extraction keeps the dependency surface small and copes
//! with the namespace soup renderers actually emit.

use std::collections::HashMap;

/// Escapes the five XML special characters in a value.
#[must_use]
pub(crate) fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Extracts the text content of the first `<tag>...</tag>` element.
///
/// Matches both plain (`<RelTime>`) and attributed (`<RelTime foo="1">`)
/// opening tags. Returns `None` when the element is absent or malformed.
#[must_use]
pub(crate) fn extract_xml_text(xml: &str, tag: &str) -> Option<String> {
    let open_plain = format!("<{}>", tag);
    let open_attr = format!("<{} ", tag);

    let content_start = if let Some(idx) = xml.find(&open_plain) {
        idx + open_plain.len()
    } else {
        let idx = xml.find(&open_attr)?;
        xml[idx..].find('>').map(|gt| idx + gt + 1)?
    };

    let close = format!("</{}>", tag);
    let content_end = xml[content_start..].find(&close)? + content_start;
    Some(xml[content_start..content_end].to_string())
}

/// Extracts `val` attributes from empty elements like `<TransportState val="PLAYING"/>`.
///
/// Returns a map from element name to its `val` attribute for each requested
/// name that is present. Used on the entity-decoded `LastChange` payload of
/// AVTransport notifications.
#[must_use]
pub(crate) fn extract_val_attrs<'a>(xml: &str, names: &[&'a str]) -> HashMap<&'a str, String> {
    let mut attrs = HashMap::new();
    for &name in names {
        let open = format!("<{} ", name);
        let Some(elem_start) = xml.find(&open) else {
            continue;
        };
        let elem = &xml[elem_start..];
        let Some(elem_end) = elem.find('>') else {
            continue;
        };
        let elem = &elem[..elem_end];

        if let Some(val_start) = elem.find("val=\"") {
            let rest = &elem[val_start + 5..];
            if let Some(val_end) = rest.find('"') {
                attrs.insert(name, rest[..val_end].to_string());
            }
        }
    }
    attrs
}
