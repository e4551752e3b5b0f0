//! Shared strings table for Excel files.
//!
//! Excel stores cell text once in `xl/sharedStrings.xml` and refers to it by
//! index. Rich-text entries (`<r>` runs) are flattened to their plain text;
//! phonetic hints (`<rPh>`) are not part of the cell text and are skipped.

use crate::common::Result;
use crate::common::xml::append_text;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Shared strings table parsed from a workbook.
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse shared strings from `xl/sharedStrings.xml` content.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::with_capacity(1024);
        let mut strings = Vec::new();

        let mut current: Option<String> = None;
        let mut in_text = false;
        let mut phonetic_depth = 0usize;

        loop {
            buf.clear();
            let event = reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => phonetic_depth += 1,
                    b"t" if phonetic_depth == 0 => in_text = true,
                    _ => {},
                },
                Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"si" => strings.push(current.take().unwrap_or_default()),
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_text = false,
                    _ => {},
                },
                Event::Eof => break,
                other if in_text => {
                    if let Some(text) = current.as_mut() {
                        append_text(text, other)?;
                    }
                },
                _ => {},
            }
        }

        Ok(Self { strings })
    }

    /// Get a string by its index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the number of strings in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
