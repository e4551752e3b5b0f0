//! Reading Excel (.xlsx) workbooks.

use super::shared_strings::SharedStrings;
use super::worksheet::Worksheet;
use crate::common::xml::attribute;
use crate::common::{Error, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::rel::resolve_target;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// Information about a worksheet listed in `xl/workbook.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetInfo {
    /// Worksheet name
    pub name: String,
    /// Relationship ID for the worksheet
    pub relationship_id: String,
}

/// An opened workbook.
///
/// # Examples
///
/// ```rust,no_run
/// use ordem::ooxml::xlsx::Workbook;
///
/// let workbook = Workbook::open("ordens_servico.xlsx")?;
/// let sheet = workbook.first_worksheet()?;
/// println!("{} has {} rows", sheet.name(), sheet.max_row());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Workbook {
    package: OpcPackage,
    /// Member name of the workbook part, usually `xl/workbook.xml`
    workbook_part: String,
    worksheets: Vec<WorksheetInfo>,
    /// Tab selected when the workbook was last saved (`activeTab`)
    active_tab: usize,
}

impl Workbook {
    /// Open a workbook file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(OpcPackage::open(path)?)
    }

    /// Wrap an already loaded package.
    pub fn from_package(package: OpcPackage) -> Result<Self> {
        let workbook_part = package.main_part_name()?;
        let xml = package.require_part(&workbook_part)?;
        let (worksheets, active_tab) = Self::parse_sheet_list(xml)?;

        Ok(Self {
            package,
            workbook_part,
            worksheets,
            active_tab,
        })
    }

    fn parse_sheet_list(xml: &[u8]) -> Result<(Vec<WorksheetInfo>, usize)> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::with_capacity(512);
        let mut sheets = Vec::new();
        let mut active_tab = 0;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sheet" => {
                    let name = attribute(e, b"name")?.unwrap_or_default();
                    let relationship_id = attribute(e, b"r:id")?.unwrap_or_default();
                    sheets.push(WorksheetInfo {
                        name,
                        relationship_id,
                    });
                },
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"workbookView" =>
                {
                    if let Some(tab) = attribute(e, b"activeTab")? {
                        active_tab = tab.trim().parse().unwrap_or(0);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok((sheets, active_tab))
    }

    /// Worksheets in tab order.
    pub fn worksheets(&self) -> &[WorksheetInfo] {
        &self.worksheets
    }

    /// Load the shared strings table, empty when the workbook has none.
    fn shared_strings(&self) -> Result<SharedStrings> {
        let rels = self.package.relationships(&self.workbook_part)?;
        let member = match rels.by_type(rt::SHARED_STRINGS) {
            Some(rel) => resolve_target(&self.workbook_part, &rel.target),
            None => return Ok(SharedStrings::new()),
        };

        match self.package.part(&member) {
            Some(xml) => SharedStrings::parse(xml),
            None => Ok(SharedStrings::new()),
        }
    }

    fn info(&self, index: usize) -> Result<&WorksheetInfo> {
        self.worksheets
            .get(index)
            .ok_or_else(|| Error::InvalidFormat(format!("workbook has no worksheet {}", index)))
    }

    /// Member name of the worksheet part at `index` in the tab order.
    pub fn worksheet_part(&self, index: usize) -> Result<String> {
        let info = self.info(index)?;
        let rels = self.package.relationships(&self.workbook_part)?;
        let rel = rels.by_id(&info.relationship_id).ok_or_else(|| {
            Error::InvalidFormat(format!(
                "worksheet '{}' has no relationship {}",
                info.name, info.relationship_id
            ))
        })?;
        Ok(resolve_target(&self.workbook_part, &rel.target))
    }

    /// Load a worksheet by its position in the tab order.
    pub fn worksheet(&self, index: usize) -> Result<Worksheet> {
        let info = self.info(index)?;
        let member = self.worksheet_part(index)?;
        let xml = self.package.require_part(&member)?;

        Worksheet::parse(&info.name, xml, &self.shared_strings()?)
    }

    /// Load the first worksheet in tab order.
    pub fn first_worksheet(&self) -> Result<Worksheet> {
        self.worksheet(0)
    }

    /// Tab index of the worksheet that was active when the workbook was
    /// saved, 0 when `activeTab` points nowhere.
    pub fn active_index(&self) -> usize {
        if self.active_tab < self.worksheets.len() {
            self.active_tab
        } else {
            0
        }
    }

    /// Load the worksheet that was active when the workbook was saved.
    ///
    /// Falls back to the first worksheet when `activeTab` points nowhere.
    pub fn active_worksheet(&self) -> Result<Worksheet> {
        self.worksheet(self.active_index())
    }

    /// The underlying package, every part as it was read.
    pub fn into_package(self) -> OpcPackage {
        self.package
    }
}
