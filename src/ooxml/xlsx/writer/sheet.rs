//! Worksheet data being written.
use super::strings::MutableSharedStrings;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::xlsx::cell::{CellValue, coords_to_reference};
use std::fmt::Write as FmtWrite;

/// A worksheet under construction: a name and its rows of values.
#[derive(Debug, Clone)]
pub struct MutableWorksheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl MutableWorksheet {
    /// Create an empty worksheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Worksheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a row below the last one.
    pub fn append_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of rows written so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row, in columns.
    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Serialize to a worksheet part, adding text to the shared strings table.
    pub fn to_xml(&self, strings: &mut MutableSharedStrings) -> String {
        let mut xml = String::with_capacity(512 + self.rows.len() * 256);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(xml, r#"<worksheet xmlns="{}">"#, namespace::SML_MAIN);

        let _ = write!(
            xml,
            r#"<dimension ref="{}"/>"#,
            dimension_ref(self.column_count(), self.rows.len())
        );

        xml.push_str("<sheetData>");
        let mut cells = StringCells::Shared(strings);
        for (row_index, row) in self.rows.iter().enumerate() {
            write_row(&mut xml, row_index as u32 + 1, row, &mut cells);
        }
        xml.push_str("</sheetData>");

        xml.push_str("</worksheet>");
        xml
    }
}

/// Used range of a sheet whose data starts at `A1`.
pub(crate) fn dimension_ref(columns: usize, rows: usize) -> String {
    if columns == 0 || rows == 0 {
        "A1".to_string()
    } else {
        format!("A1:{}", coords_to_reference(columns as u32, rows as u32))
    }
}

/// How text cells are stored.
pub(crate) enum StringCells<'a> {
    /// Index into the shared strings table (`t="s"`)
    Shared(&'a mut MutableSharedStrings),
    /// Text inside the cell itself (`t="inlineStr"`)
    Inline,
}

/// Serialize one `<row>`; empty values produce no cell.
pub(crate) fn write_row(xml: &mut String, row_number: u32, row: &[CellValue], strings: &mut StringCells<'_>) {
    let _ = write!(xml, r#"<row r="{}">"#, row_number);

    for (col_index, value) in row.iter().enumerate() {
        let reference = coords_to_reference(col_index as u32 + 1, row_number);
        match value {
            CellValue::Empty => {},
            CellValue::Int(v) => {
                let _ = write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, v);
            },
            CellValue::Float(v) => {
                let _ = write!(
                    xml,
                    r#"<c r="{}"><v>{}</v></c>"#,
                    reference,
                    ryu::Buffer::new().format(*v)
                );
            },
            CellValue::Bool(v) => {
                let _ = write!(xml, r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*v));
            },
            CellValue::String(s) => match strings {
                StringCells::Shared(table) => {
                    let index = table.add_string(s);
                    let _ = write!(xml, r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, index);
                },
                StringCells::Inline => {
                    let _ = write!(
                        xml,
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference,
                        escape_xml(s)
                    );
                },
            },
        }
    }

    xml.push_str("</row>");
}
