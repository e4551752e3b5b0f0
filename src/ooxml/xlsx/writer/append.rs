//! Appending rows to an existing worksheet part.
//!
//! Everything outside `<sheetData>` (column widths, merged cells, page setup)
//! and every existing row is copied through unchanged. New rows go after the
//! last one and store their text inline, so the shared strings table that
//! other sheets index into is left alone.

use super::sheet::{StringCells, dimension_ref, write_row};
use crate::common::{Error, Result};
use crate::ooxml::xlsx::{CellValue, Worksheet};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

const SHEET_DATA: &[u8] = b"sheetData";
const DIMENSION: &[u8] = b"dimension";

/// Rows waiting to be added below the data of a worksheet.
///
/// # Examples
///
/// ```rust,no_run
/// use ordem::ooxml::xlsx::{CellValue, Workbook};
/// use ordem::ooxml::xlsx::writer::RowAppender;
///
/// let workbook = Workbook::open("ordens_servico.xlsx")?;
/// let part = workbook.worksheet_part(0)?;
/// let mut appender = RowAppender::new(&workbook.worksheet(0)?);
/// appender.append_row(vec![CellValue::Int(8), CellValue::from("05/03/2024")]);
///
/// let mut package = workbook.into_package();
/// let updated = appender.apply(package.require_part(&part)?)?;
/// package.set_part(&part, updated);
/// package.save("ordens_servico.xlsx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RowAppender {
    /// Spreadsheet row number of the first new row
    first_row: u32,
    /// Widest existing row, in columns
    existing_columns: usize,
    rows: Vec<Vec<CellValue>>,
}

impl RowAppender {
    /// Prepare to append below the last row of `existing`.
    pub fn new(existing: &Worksheet) -> Self {
        Self {
            first_row: existing.max_row() as u32 + 1,
            existing_columns: existing.rows().iter().map(Vec::len).max().unwrap_or(0),
            rows: Vec::new(),
        }
    }

    pub fn append_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of rows waiting to be appended.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of the last row once the new rows are in.
    pub fn last_row(&self) -> usize {
        self.first_row as usize - 1 + self.rows.len()
    }

    fn rows_xml(&self) -> String {
        let mut xml = String::with_capacity(self.rows.len() * 512);
        let mut cells = StringCells::Inline;
        for (offset, row) in self.rows.iter().enumerate() {
            write_row(&mut xml, self.first_row + offset as u32, row, &mut cells);
        }
        xml
    }

    fn dimension(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.existing_columns);
        dimension_ref(columns, self.last_row())
    }

    /// Rewrite a worksheet part with the new rows added and its `<dimension>`
    /// widened to cover them.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] when the part has no `<sheetData>`.
    pub fn apply(&self, xml: &[u8]) -> Result<Vec<u8>> {
        let mut reader = Reader::from_reader(xml);
        let mut writer = Writer::new(Vec::with_capacity(xml.len() + self.rows.len() * 512));
        let mut buf = Vec::with_capacity(1024);
        let mut appended = false;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                Event::Empty(e) if e.local_name().as_ref() == DIMENSION => {
                    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                    let dimension = self.dimension();
                    let updated = BytesStart::new(name).with_attributes([("ref", dimension.as_str())]);
                    writer.write_event(Event::Empty(updated))?;
                },
                Event::End(e) if e.local_name().as_ref() == SHEET_DATA && !appended => {
                    writer.get_mut().extend_from_slice(self.rows_xml().as_bytes());
                    writer.write_event(Event::End(e))?;
                    appended = true;
                },
                // <sheetData/> of a sheet without rows
                Event::Empty(e) if e.local_name().as_ref() == SHEET_DATA && !appended => {
                    writer.write_event(Event::Start(e.borrow()))?;
                    writer.get_mut().extend_from_slice(self.rows_xml().as_bytes());
                    writer.write_event(Event::End(e.to_end()))?;
                    appended = true;
                },
                event => writer.write_event(event)?,
            }
        }

        if !appended {
            return Err(Error::InvalidFormat("worksheet has no sheetData".to_string()));
        }
        Ok(writer.into_inner())
    }
}
