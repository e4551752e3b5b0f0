//! Workbook assembly for XLSX output.
use super::sheet::MutableWorksheet;
use super::strings::MutableSharedStrings;
use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{
    CONTENT_TYPES_PART, PACKAGE_RELS_PART, content_type as ct, namespace, relationship_type as rt,
};
use crate::ooxml::opc::rel::{Relationships, rels_part_for};
use crate::ooxml::xlsx::cell::CellValue;
use std::fmt::Write as FmtWrite;
use std::path::Path;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKSHEET_PART: &str = "xl/worksheets/sheet1.xml";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const STYLES_PART: &str = "xl/styles.xml";

/// Smallest stylesheet Excel accepts: one font, the two mandatory fills,
/// one border and the `Normal` cell style.
const DEFAULT_STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#,
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    r#"</styleSheet>"#
);

/// A single-sheet workbook being written.
///
/// # Examples
///
/// ```rust,no_run
/// use ordem::ooxml::xlsx::{CellValue, WorkbookWriter};
///
/// let mut writer = WorkbookWriter::new("Sheet");
/// writer.append_row(vec![CellValue::from("numero_os"), CellValue::from("data")]);
/// writer.append_row(vec![CellValue::Int(1), CellValue::from("05/03/2024")]);
/// writer.save("ordens_servico.xlsx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct WorkbookWriter {
    worksheet: MutableWorksheet,
}

impl WorkbookWriter {
    /// Create a workbook with one empty worksheet.
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            worksheet: MutableWorksheet::new(sheet_name),
        }
    }

    /// Append a row to the worksheet.
    pub fn append_row(&mut self, row: Vec<CellValue>) {
        self.worksheet.append_row(row);
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.worksheet.row_count()
    }

    fn content_types_xml() -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES);
        let _ = write!(
            xml,
            r#"<Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/>"#,
            ct::OPC_RELATIONSHIPS,
            ct::XML
        );
        for (part, content_type) in [
            (WORKBOOK_PART, ct::SML_SHEET_MAIN),
            (WORKSHEET_PART, ct::SML_WORKSHEET),
            (SHARED_STRINGS_PART, ct::SML_SHARED_STRINGS),
            (STYLES_PART, ct::SML_STYLES),
        ] {
            let _ = write!(
                xml,
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                part, content_type
            );
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self, sheet_rel_id: &str) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(
            xml,
            r#"<workbook xmlns="{}" xmlns:r="{}">"#,
            namespace::SML_MAIN,
            namespace::OFC_RELATIONSHIPS
        );
        let _ = write!(
            xml,
            r#"<sheets><sheet name="{}" sheetId="1" r:id="{}"/></sheets>"#,
            escape_xml(self.worksheet.name()),
            sheet_rel_id
        );
        xml.push_str("</workbook>");
        xml
    }

    /// Build the OPC package holding the workbook.
    pub fn to_package(&self) -> OpcPackage {
        let mut package = OpcPackage::new();
        package.set_part(CONTENT_TYPES_PART, Self::content_types_xml().into_bytes());

        let mut package_rels = Relationships::new();
        package_rels.add(rt::OFFICE_DOCUMENT, WORKBOOK_PART);
        package.set_part(PACKAGE_RELS_PART, package_rels.to_xml().into_bytes());

        let mut workbook_rels = Relationships::new();
        let sheet_rel_id = workbook_rels.add(rt::WORKSHEET, "worksheets/sheet1.xml");
        workbook_rels.add(rt::STYLES, "styles.xml");
        workbook_rels.add(rt::SHARED_STRINGS, "sharedStrings.xml");

        package.set_part(WORKBOOK_PART, self.workbook_xml(&sheet_rel_id).into_bytes());
        package.set_part(&rels_part_for(WORKBOOK_PART), workbook_rels.to_xml().into_bytes());

        // The worksheet fills the shared strings table, so it is serialized first
        let mut strings = MutableSharedStrings::new();
        let sheet_xml = self.worksheet.to_xml(&mut strings);
        package.set_part(WORKSHEET_PART, sheet_xml.into_bytes());
        package.set_part(SHARED_STRINGS_PART, strings.to_xml().into_bytes());
        package.set_part(STYLES_PART, DEFAULT_STYLES_XML.as_bytes().to_vec());

        package
    }

    /// Write the workbook to `path`, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_package().save(path)
    }
}
