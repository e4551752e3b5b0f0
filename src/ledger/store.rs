//! The `.xlsx` order ledger.
//!
//! The ledger is a workbook with one header row followed by one row per
//! order, kept on its active sheet. It is read again on every call; nothing
//! is cached between calls, so the file on disk is always the source of
//! truth. Appending rewrites only the ledger sheet, so other sheets, styles
//! and column widths of a workbook edited by hand survive.
//!
//! Two processes appending at the same time can both read the same last
//! number and lose one of the rows. Only one instance should write a ledger.

use super::record::{HEADER, OrderRecord};
use crate::common::Result;
use crate::ooxml::xlsx::{CellValue, RowAppender, Workbook, WorkbookWriter, Worksheet};
use std::path::{Path, PathBuf};

/// Sheet name used when the ledger file is created.
pub const DEFAULT_SHEET_NAME: &str = "Sheet";

/// Handle to a ledger file, which may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the ledger file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the ledger sheet, `None` when the file does not exist.
    fn load(&self) -> Result<Option<Worksheet>> {
        if !self.exists() {
            return Ok(None);
        }
        let workbook = Workbook::open(&self.path)?;
        workbook.active_worksheet().map(Some)
    }

    /// Append one row, creating the ledger with `header` as its first row
    /// when the file does not exist (or holds an empty sheet).
    ///
    /// An existing workbook keeps every part except the ledger sheet, which
    /// gets the new row after its last one.
    pub fn append_row(&self, row: &[CellValue], header: &[&str]) -> Result<()> {
        let header_row = || -> Vec<CellValue> { header.iter().map(|&name| CellValue::from(name)).collect() };

        if !self.exists() {
            tracing::info!(path = %self.path.display(), "creating ledger");
            let mut writer = WorkbookWriter::new(DEFAULT_SHEET_NAME);
            writer.append_row(header_row());
            writer.append_row(row.to_vec());
            return writer.save(&self.path);
        }

        let workbook = Workbook::open(&self.path)?;
        let index = workbook.active_index();
        let part = workbook.worksheet_part(index)?;
        let mut appender = RowAppender::new(&workbook.worksheet(index)?);
        if appender.last_row() == 0 {
            tracing::info!(path = %self.path.display(), "writing ledger header");
            appender.append_row(header_row());
        }
        appender.append_row(row.to_vec());

        let mut package = workbook.into_package();
        let updated = appender.apply(package.require_part(&part)?)?;
        package.set_part(&part, updated);
        package.save(&self.path)?;

        tracing::debug!(path = %self.path.display(), rows = appender.last_row(), "ledger saved");
        Ok(())
    }

    /// Append an order with the fixed ledger header.
    pub fn append(&self, record: &OrderRecord) -> Result<()> {
        self.append_row(&record.to_row(), &HEADER)
    }

    /// All data rows as stored, header and fully empty rows excluded.
    ///
    /// The file is read when this is called. An absent ledger yields
    /// nothing.
    pub fn rows(&self) -> Result<Rows> {
        let rows = match self.load()? {
            Some(sheet) => sheet.into_rows(),
            None => Vec::new(),
        };

        let mut rows = rows.into_iter();
        // Header row
        rows.next();

        Ok(Rows { rows, row_number: 1 })
    }

    /// All orders in file order, header excluded.
    ///
    /// The file is read when this is called; the records are built as the
    /// iterator advances. Rows that are not valid orders are skipped with a
    /// warning, fully empty rows silently. An absent ledger yields nothing.
    pub fn read_all(&self) -> Result<Records> {
        Ok(Records { rows: self.rows()? })
    }

    /// Number for the next order.
    ///
    /// 1 when the ledger is absent or has no data rows. Otherwise the first
    /// column of the last row, read as text: when it is made only of ASCII
    /// digits the result is that value plus one, and anything else restarts
    /// the numbering at 1.
    pub fn next_number(&self) -> Result<u32> {
        let Some(sheet) = self.load()? else {
            return Ok(1);
        };
        if sheet.max_row() <= 1 {
            return Ok(1);
        }

        let last = sheet
            .rows()
            .last()
            .and_then(|row| row.first())
            .map(CellValue::to_string)
            .unwrap_or_default();

        if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
            match last.parse::<u32>() {
                Ok(n) => return Ok(n.saturating_add(1)),
                Err(_) => tracing::warn!(value = %last, "last order number out of range"),
            }
        } else {
            tracing::warn!(value = %last, "last order number is not numeric, restarting at 1");
        }

        Ok(1)
    }

    /// Number of data rows (rows after the header), 0 when absent.
    pub fn count(&self) -> Result<usize> {
        Ok(self
            .load()?
            .map(|sheet| sheet.max_row().saturating_sub(1))
            .unwrap_or(0))
    }
}

/// Iterator over the raw data rows of a ledger, see [`LedgerStore::rows`].
#[derive(Debug)]
pub struct Rows {
    rows: std::vec::IntoIter<Vec<CellValue>>,
    /// Spreadsheet row number of the last row taken
    row_number: usize,
}

impl Rows {
    /// Spreadsheet row number of the row returned last.
    pub fn row_number(&self) -> usize {
        self.row_number
    }
}

impl Iterator for Rows {
    type Item = Vec<CellValue>;

    fn next(&mut self) -> Option<Self::Item> {
        for row in self.rows.by_ref() {
            self.row_number += 1;
            if !row.iter().all(CellValue::is_blank) {
                return Some(row);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.rows.len()))
    }
}

/// Iterator over the orders of a ledger, see [`LedgerStore::read_all`].
#[derive(Debug)]
pub struct Records {
    rows: Rows,
}

impl Iterator for Records {
    type Item = OrderRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(row) = self.rows.next() {
            match OrderRecord::from_row(&row) {
                Ok(record) => return Some(record),
                Err(e) => {
                    tracing::warn!(row = self.rows.row_number(), error = %e, "skipping ledger row")
                },
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.rows.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::OpcPackage;
    use crate::ooxml::opc::constants::{
        CONTENT_TYPES_PART, PACKAGE_RELS_PART, namespace, relationship_type as rt,
    };
    use crate::ooxml::opc::rel::Relationships;
    use proptest::prelude::*;

    const STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/></numFmts></styleSheet>"#;
    const SUMMARY_SHEET: &str = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>2</v></c><c r="B1"><v>42</v></c></row></sheetData></worksheet>"#;
    const LEDGER_SHEET: &str = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:C2"/><cols><col min="3" max="3" width="30" customWidth="1"/></cols><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>0</v></c><c r="C1" t="s"><v>1</v></c></row><row r="2"><c r="A2"><v>1</v></c><c r="B2" t="inlineStr"><is><t>05/03/2024</t></is></c><c r="C2" t="inlineStr"><is><t>Gol</t></is></c></row></sheetData></worksheet>"#;

    /// A workbook edited by hand: a summary tab first, the ledger second and
    /// active, custom styles and column widths.
    fn two_sheet_workbook(path: &Path) {
        let mut package = OpcPackage::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());

        let mut package_rels = Relationships::new();
        package_rels.add(rt::OFFICE_DOCUMENT, "xl/workbook.xml");
        package.set_part(PACKAGE_RELS_PART, package_rels.to_xml().into_bytes());

        package.set_part(
            "xl/workbook.xml",
            format!(
                r#"<workbook xmlns="{}" xmlns:r="{}"><bookViews><workbookView activeTab="1"/></bookViews><sheets><sheet name="Resumo" sheetId="1" r:id="rId1"/><sheet name="Ordens" sheetId="2" r:id="rId2"/></sheets></workbook>"#,
                namespace::SML_MAIN,
                namespace::OFC_RELATIONSHIPS
            )
            .into_bytes(),
        );
        let mut workbook_rels = Relationships::new();
        workbook_rels.add(rt::WORKSHEET, "worksheets/sheet1.xml");
        workbook_rels.add(rt::WORKSHEET, "worksheets/sheet2.xml");
        workbook_rels.add(rt::SHARED_STRINGS, "sharedStrings.xml");
        workbook_rels.add(rt::STYLES, "styles.xml");
        package.set_part("xl/_rels/workbook.xml.rels", workbook_rels.to_xml().into_bytes());

        package.set_part(
            "xl/sharedStrings.xml",
            b"<sst><si><t>numero_os</t></si><si><t>veiculo</t></si><si><t>Total</t></si></sst>".to_vec(),
        );
        package.set_part("xl/styles.xml", STYLES.as_bytes().to_vec());
        package.set_part("xl/worksheets/sheet1.xml", SUMMARY_SHEET.as_bytes().to_vec());
        package.set_part("xl/worksheets/sheet2.xml", LEDGER_SHEET.as_bytes().to_vec());
        package.save(path).unwrap();
    }

    fn record(number: u32, vehicle: &str) -> OrderRecord {
        OrderRecord {
            number,
            date: "05/03/2024".to_string(),
            vehicle: vehicle.to_string(),
            plate: "ABC1234".to_string(),
            document_path: format!("OS_Geradas/OS_{:03}-2024_ABC1234.docx", number),
            ..Default::default()
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> LedgerStore {
        LedgerStore::new(dir.path().join("ordens_servico.xlsx"))
    }

    #[test]
    fn test_absent_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
        assert_eq!(store.next_number().unwrap(), 1);
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.read_all().unwrap().count(), 0);
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record(1, "Gol")).unwrap();

        let sheet = Workbook::open(store.path()).unwrap().first_worksheet().unwrap();
        assert_eq!(sheet.name(), DEFAULT_SHEET_NAME);
        assert_eq!(sheet.max_row(), 2);
        let header: Vec<String> = sheet.rows()[0].iter().map(CellValue::to_string).collect();
        assert_eq!(header, HEADER);
        assert_eq!(sheet.rows()[1][0], CellValue::Int(1));

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.next_number().unwrap(), 2);
    }

    #[test]
    fn test_read_all_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record(1, "Gol")).unwrap();
        store.append(&record(2, "Uno")).unwrap();

        let first: Vec<OrderRecord> = store.read_all().unwrap().collect();
        assert_eq!(first, [record(1, "Gol"), record(2, "Uno")]);

        // Rereads the file
        store.append(&record(3, "Gol")).unwrap();
        assert_eq!(store.read_all().unwrap().count(), 3);
    }

    #[test]
    fn test_header_only_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut writer = WorkbookWriter::new("Ordens");
        writer.append_row(HEADER.iter().map(|&h| CellValue::from(h)).collect());
        writer.save(store.path()).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.next_number().unwrap(), 1);
        assert_eq!(store.read_all().unwrap().count(), 0);

        // The existing sheet name is kept
        store.append(&record(1, "Gol")).unwrap();
        let sheet = Workbook::open(store.path()).unwrap().first_worksheet().unwrap();
        assert_eq!(sheet.name(), "Ordens");
        assert_eq!(sheet.max_row(), 2);
    }

    #[test]
    fn test_non_numeric_last_number_restarts_at_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record(1, "Gol")).unwrap();
        store
            .append_row(&[CellValue::from("abc"), CellValue::from("05/03/2024")], &HEADER)
            .unwrap();
        assert_eq!(store.next_number().unwrap(), 1);

        let mut writer = WorkbookWriter::new("Sheet");
        writer.append_row(vec![CellValue::from("numero_os")]);
        writer.append_row(vec![CellValue::Float(7.0)]);
        writer.save(store.path()).unwrap();
        assert_eq!(store.next_number().unwrap(), 1);
    }

    #[test]
    fn test_invalid_and_empty_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record(1, "Gol")).unwrap();
        store
            .append_row(&[CellValue::from("sem numero"), CellValue::from("x")], &HEADER)
            .unwrap();
        store.append_row(&[CellValue::Empty, CellValue::from("")], &HEADER).unwrap();
        store.append(&record(2, "Uno")).unwrap();

        let numbers: Vec<u32> = store.read_all().unwrap().map(|r| r.number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_append_keeps_other_sheets_and_styles() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        two_sheet_workbook(store.path());

        assert_eq!(store.next_number().unwrap(), 2);
        store.append(&record(2, "Uno")).unwrap();

        let workbook = Workbook::open(store.path()).unwrap();
        let names: Vec<&str> = workbook.worksheets().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["Resumo", "Ordens"]);

        let summary = workbook.worksheet(0).unwrap();
        assert_eq!(summary.rows(), [vec![CellValue::from("Total"), CellValue::Int(42)]]);

        let ledger = workbook.active_worksheet().unwrap();
        assert_eq!(ledger.name(), "Ordens");
        assert_eq!(ledger.max_row(), 3);
        assert_eq!(ledger.rows()[2][0], CellValue::Int(2));
        assert_eq!(ledger.rows()[2][2], CellValue::from("Uno"));

        let package = workbook.into_package();
        assert_eq!(package.part("xl/styles.xml"), Some(STYLES.as_bytes()));
        assert_eq!(package.part("xl/worksheets/sheet1.xml"), Some(SUMMARY_SHEET.as_bytes()));
        let sheet = String::from_utf8(package.part("xl/worksheets/sheet2.xml").unwrap().to_vec()).unwrap();
        assert!(sheet.contains(r#"<cols><col min="3" max="3" width="30" customWidth="1"/></cols>"#));
        assert!(sheet.contains(r#"<dimension ref="A1:M3"/>"#));

        let numbers: Vec<u32> = store.read_all().unwrap().map(|r| r.number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(store.next_number().unwrap(), 3);
    }

    #[test]
    fn test_rows_keep_invalid_orders() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .append_row(&[CellValue::from("x"), CellValue::from("d"), CellValue::from("Gol")], &HEADER)
            .unwrap();
        store.append_row(&[CellValue::Empty], &HEADER).unwrap();
        store.append(&record(2, "Uno")).unwrap();

        let mut rows = store.rows().unwrap();
        assert_eq!(rows.next().unwrap()[2], CellValue::from("Gol"));
        assert_eq!(rows.row_number(), 2);
        assert_eq!(rows.next().unwrap()[0], CellValue::Int(2));
        assert_eq!(rows.row_number(), 4);
        assert!(rows.next().is_none());

        assert_eq!(store.read_all().unwrap().count(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_numbers_follow_append_count(n in 1u32..12) {
            let dir = tempfile::tempdir().unwrap();
            let store = store_in(&dir);
            for _ in 0..n {
                let number = store.next_number().unwrap();
                store.append(&record(number, "Gol")).unwrap();
            }
            prop_assert_eq!(store.count().unwrap(), n as usize);
            prop_assert_eq!(store.next_number().unwrap(), n + 1);
            let numbers: Vec<u32> = store.read_all().unwrap().map(|r| r.number).collect();
            prop_assert_eq!(numbers, (1..=n).collect::<Vec<_>>());
        }
    }
}
