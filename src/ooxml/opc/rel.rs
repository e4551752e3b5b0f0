//! Package and part relationships (`_rels/*.rels`).
use crate::common::xml::{attribute, escape_xml};
use crate::common::Result;
use crate::ooxml::opc::constants::namespace;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Write as FmtWrite;

/// A single `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `true` when `TargetMode="External"`.
    pub external: bool,
}

/// The relationships of one source (the package itself or a part).
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::with_capacity(512);
        let mut rels = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attribute(e, b"Id")?.unwrap_or_default();
                    let rel_type = attribute(e, b"Type")?.unwrap_or_default();
                    let target = attribute(e, b"Target")?.unwrap_or_default();
                    let external = attribute(e, b"TargetMode")?.as_deref() == Some("External");
                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok(Self { rels })
    }

    /// Add a relationship and return its generated `rIdN` identifier.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: false,
        });
        id
    }

    /// First relationship of the given type.
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.rel_type == rel_type)
    }

    /// Relationship with the given id.
    pub fn by_id(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS);
        for rel in &self.rels {
            let _ = write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target),
                if rel.external { r#" TargetMode="External""# } else { "" }
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Member name of the relationships part belonging to `source`.
///
/// An empty source means the package itself.
///
/// ```
/// use ordem::ooxml::opc::rel::rels_part_for;
/// assert_eq!(rels_part_for(""), "_rels/.rels");
/// assert_eq!(rels_part_for("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
/// ```
pub fn rels_part_for(source: &str) -> String {
    match source.rfind('/') {
        Some(slash) => format!("{}/_rels/{}.rels", &source[..slash], &source[slash + 1..]),
        None if source.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", source),
    }
}

/// Resolve a relationship target against the member name of its source.
///
/// ```
/// use ordem::ooxml::opc::rel::resolve_target;
/// assert_eq!(resolve_target("xl/workbook.xml", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
/// assert_eq!(resolve_target("xl/workbook.xml", "/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
/// assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
/// ```
pub fn resolve_target(source: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source.rfind('/') {
        Some(slash) => source[..slash].split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }

    segments.join("/")
}
