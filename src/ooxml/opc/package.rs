//! In-memory OPC package.
//!
//! An `OpcPackage` keeps every member of the ZIP container as raw bytes, in
//! the order they were read or added. Callers replace the parts they edit and
//! write the whole package back; untouched parts round-trip byte for byte.

use crate::common::{Error, Result};
use crate::ooxml::opc::constants::{PACKAGE_RELS_PART, relationship_type};
use crate::ooxml::opc::phys_pkg::{PhysPkgReader, PhysPkgWriter};
use crate::ooxml::opc::rel::{Relationships, rels_part_for, resolve_target};
use std::path::Path;

/// Main type for working with OPC packages.
#[derive(Debug, Clone, Default)]
pub struct OpcPackage {
    /// Member name and content, in archive order
    parts: Vec<(String, Vec<u8>)>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an OPC package from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the file does not exist, and a ZIP
    /// error when it is not an archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load an OPC package from the bytes of a ZIP archive.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = PhysPkgReader::new(data)?;
        let parts = reader.read_members()?;
        Ok(Self { parts })
    }

    /// Content of a part, looked up by member name (a leading `/` is ignored).
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        let name = name.trim_start_matches('/');
        self.parts
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, blob)| blob.as_slice())
    }

    /// Content of a part that must exist.
    pub fn require_part(&self, name: &str) -> Result<&[u8]> {
        self.part(name)
            .ok_or_else(|| Error::InvalidFormat(format!("package has no part '{}'", name)))
    }

    /// Whether a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// All member names in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Replace the content of a part, or append it when it does not exist yet.
    pub fn set_part(&mut self, name: &str, blob: Vec<u8>) {
        let name = name.trim_start_matches('/');
        match self.parts.iter_mut().find(|(member, _)| member == name) {
            Some((_, existing)) => *existing = blob,
            None => self.parts.push((name.to_string(), blob)),
        }
    }

    /// Relationships of a source part; empty when it has none.
    pub fn relationships(&self, source: &str) -> Result<Relationships> {
        match self.part(&rels_part_for(source)) {
            Some(xml) => Relationships::parse(xml),
            None => Ok(Relationships::new()),
        }
    }

    /// Member name of the main document part (`officeDocument` relationship).
    pub fn main_part_name(&self) -> Result<String> {
        let xml = self.require_part(PACKAGE_RELS_PART)?;
        let rels = Relationships::parse(xml)?;
        rels.by_type(relationship_type::OFFICE_DOCUMENT)
            .map(|rel| resolve_target("", &rel.target))
            .ok_or_else(|| {
                Error::InvalidFormat("package has no officeDocument relationship".to_string())
            })
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new();
        for (name, blob) in &self.parts {
            writer.write(name, blob)?;
        }
        writer.finish()
    }

    /// Write the package to `path`, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        pkg.set_part(
            "_rels/.rels",
            br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/document.xml"/></Relationships>"#.to_vec(),
        );
        pkg.set_part("/word/document.xml", b"<w:document/>".to_vec());
        pkg
    }

    #[test]
    fn test_set_part_replaces_in_place() {
        let mut pkg = sample();
        pkg.set_part("word/document.xml", b"<w:document>changed</w:document>".to_vec());

        let names: Vec<&str> = pkg.part_names().collect();
        assert_eq!(names, ["_rels/.rels", "word/document.xml"]);
        assert_eq!(pkg.part("/word/document.xml").unwrap(), b"<w:document>changed</w:document>");
    }

    #[test]
    fn test_main_part_name() {
        assert_eq!(sample().main_part_name().unwrap(), "word/document.xml");
        assert!(OpcPackage::new().main_part_name().is_err());
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pkg.docx");

        sample().save(&path).unwrap();
        let reopened = OpcPackage::open(&path).unwrap();
        assert_eq!(reopened.part("word/document.xml").unwrap(), b"<w:document/>");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.docx");
        assert!(matches!(OpcPackage::open(&missing), Err(Error::NotFound(p)) if p == missing));
    }
}
