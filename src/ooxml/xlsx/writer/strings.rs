//! Shared strings table for XLSX workbooks being written.
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Mutable shared strings table.
///
/// Excel stores cell text in a shared table to reduce file size. This
/// structure manages the collection of unique strings and their indices.
#[derive(Debug, Default)]
pub struct MutableSharedStrings {
    /// List of unique strings
    strings: Vec<String>,
    /// Map from string to index for fast lookup
    string_to_index: HashMap<String, usize>,
    /// Number of cells referring to the table
    references: usize,
}

impl MutableSharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string to the table and return its index.
    ///
    /// If the string already exists, returns the existing index.
    pub fn add_string(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&index) = self.string_to_index.get(s) {
            index
        } else {
            let index = self.strings.len();
            self.strings.push(s.to_string());
            self.string_to_index.insert(s.to_string(), index);
            index
        }
    }

    /// Get the number of unique strings.
    pub fn count(&self) -> usize {
        self.strings.len()
    }

    /// Serialize the shared strings table to XML.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.strings.iter().map(|s| s.len() + 16).sum::<usize>());

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(
            xml,
            r#"<sst xmlns="{}" count="{}" uniqueCount="{}">"#,
            namespace::SML_MAIN,
            self.references,
            self.strings.len()
        );

        for s in &self.strings {
            if needs_preserve(s) {
                let _ = write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape_xml(s));
            } else {
                let _ = write!(xml, "<si><t>{}</t></si>", escape_xml(s));
            }
        }

        xml.push_str("</sst>");
        xml
    }
}

/// Whitespace that XML parsers would otherwise be free to normalize.
fn needs_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || memchr::memchr2(b'\n', b'\t', s.as_bytes()).is_some()
}
