//! Attribute helpers for quick-xml start tags.
use super::escape::unescape_xml;
use crate::common::Result;
use quick_xml::events::BytesStart;

/// Look up an attribute by its qualified name and return its unescaped value.
pub fn attribute(start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            let raw = std::str::from_utf8(&attr.value)?;
            return Ok(Some(unescape_xml(raw)));
        }
    }
    Ok(None)
}
