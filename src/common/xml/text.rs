//! Character data extraction from quick-xml events.
use super::escape::{resolve_reference, unescape_xml};
use crate::common::Result;
use quick_xml::events::Event;

/// Append the character data carried by `event` to `out`.
///
/// Handles plain text, CDATA sections and entity or character references.
/// Returns `true` when the event carried character data.
pub fn append_text(out: &mut String, event: &Event<'_>) -> Result<bool> {
    match event {
        Event::Text(e) => {
            out.push_str(&unescape_xml(std::str::from_utf8(e)?));
            Ok(true)
        },
        Event::CData(e) => {
            out.push_str(std::str::from_utf8(e)?);
            Ok(true)
        },
        Event::GeneralRef(e) => {
            let name = std::str::from_utf8(e)?;
            match resolve_reference(name) {
                Some(resolved) => out.push_str(&resolved),
                None => {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                },
            }
            Ok(true)
        },
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    fn collect(xml: &str) -> String {
        let mut reader = Reader::from_str(xml);
        let mut out = String::new();
        loop {
            let event = reader.read_event().unwrap();
            if matches!(event, Event::Eof) {
                break;
            }
            append_text(&mut out, &event).unwrap();
        }
        out
    }

    #[test]
    fn test_entities_and_cdata() {
        assert_eq!(collect("<t>Gol &amp; Uno&#10;<![CDATA[<raw>]]></t>"), "Gol & Uno\n<raw>");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(collect("<t>Placa ABC1234</t>"), "Placa ABC1234");
    }
}
