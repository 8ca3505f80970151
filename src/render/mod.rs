//! XML rendering — the annotation document and the nuspec descriptor.

pub mod annotations;
pub mod nuspec;

/// Escape text for use in XML attribute values and element content.
pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
