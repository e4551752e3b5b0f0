//! Word (.docx) package used as an order template.
use super::paragraph::paragraph_texts;
use super::placeholder::{Placeholders, substitute_part};
use crate::common::{Error, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::rel::resolve_target;
use std::path::Path;

/// A Word (.docx) package.
///
/// Wraps an OPC package and knows which parts carry document text: the main
/// document part plus every header and footer it references.
///
/// # Examples
///
/// ```rust,no_run
/// use ordem::ooxml::docx::{Package, Placeholders};
///
/// let mut pkg = Package::open("Ordem de Serviço.docx")?;
/// let placeholders = Placeholders::new([("PLACA", "ABC1234")])?;
/// pkg.substitute(&placeholders)?;
/// pkg.save("OS_Geradas/OS_001-2024_ABC1234.docx")?;
/// # Ok::<(), ordem::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    opc: OpcPackage,
    /// Member name of the main document part
    main_part: String,
}

impl Package {
    /// Open a .docx package from a file path.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the file does not exist and
    /// [`Error::InvalidFormat`] when it has no main document part.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Load a .docx package from its bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    fn from_opc(opc: OpcPackage) -> Result<Self> {
        let main_part = opc.main_part_name()?;
        if !opc.contains(&main_part) {
            return Err(Error::InvalidFormat(format!(
                "main document part '{}' is missing",
                main_part
            )));
        }

        Ok(Self { opc, main_part })
    }

    /// Member name of the main document part.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Parts that carry document text: the main part first, then its
    /// headers and footers in relationship order.
    pub fn text_parts(&self) -> Result<Vec<String>> {
        let mut parts = vec![self.main_part.clone()];
        let rels = self.opc.relationships(&self.main_part)?;

        for rel in rels.iter() {
            if rel.external
                || (rel.rel_type != relationship_type::HEADER
                    && rel.rel_type != relationship_type::FOOTER)
            {
                continue;
            }
            let name = resolve_target(&self.main_part, &rel.target);
            if self.opc.contains(&name) && !parts.contains(&name) {
                parts.push(name);
            }
        }

        Ok(parts)
    }

    /// Replace placeholder markers in every text part.
    ///
    /// Returns the number of paragraphs rewritten. Parts where nothing
    /// changed are left as they were.
    pub fn substitute(&mut self, placeholders: &Placeholders) -> Result<usize> {
        let mut total = 0;

        for name in self.text_parts()? {
            let xml = self.opc.require_part(&name)?;
            let (rewritten, count) = substitute_part(xml, placeholders)?;
            if count > 0 {
                tracing::debug!(part = %name, paragraphs = count, "placeholders substituted");
                self.opc.set_part(&name, rewritten);
                total += count;
            }
        }

        Ok(total)
    }

    /// Text of every paragraph of the main document part.
    pub fn paragraph_texts(&self) -> Result<Vec<String>> {
        paragraph_texts(self.opc.require_part(&self.main_part)?)
    }

    /// Write the package to `path`, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.opc.save(path)
    }

    /// The underlying OPC package.
    pub fn opc(&self) -> &OpcPackage {
        &self.opc
    }
}
