//! Orders per vehicle.
//!
//! [`ChartService`] aggregates the ledger into [`VehicleCounts`] and renders
//! them as an SVG bar chart with [`svg::BarChart`].
pub mod svg;

use crate::common::{Error, Result};
use crate::ledger::{LedgerStore, OrderRecord, VEHICLE_COLUMN};
use crate::ooxml::xlsx::CellValue;
use std::collections::HashMap;
use std::path::Path;

/// Number of orders per vehicle name, in the order vehicles first appear.
///
/// Names are compared exactly: `Gol` and `gol` are two vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleCounts {
    entries: Vec<(String, usize)>,
    /// Position of each name in `entries`
    index: HashMap<String, usize>,
}

impl VehicleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the vehicle column of raw ledger rows, skipping rows without a
    /// vehicle. The rest of the row is not looked at.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<CellValue>>,
    {
        let mut counts = Self::new();
        for row in rows {
            if let Some(vehicle) = row.get(VEHICLE_COLUMN) {
                counts.add(&vehicle.to_string());
            }
        }
        counts
    }

    /// Count the vehicles of `records`, skipping records without one.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = OrderRecord>,
    {
        let mut counts = Self::new();
        for record in records {
            counts.add(&record.vehicle);
        }
        counts
    }

    /// Count one more order for `vehicle`; empty names are ignored.
    pub fn add(&mut self, vehicle: &str) {
        if vehicle.is_empty() {
            return;
        }
        match self.index.get(vehicle) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(vehicle.to_string(), self.entries.len());
                self.entries.push((vehicle.to_string(), 1));
            },
        }
    }

    pub fn get(&self, vehicle: &str) -> Option<usize> {
        self.index.get(vehicle).map(|&position| self.entries[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Number of distinct vehicles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of orders counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Chart generation over the ledger.
#[derive(Debug, Clone)]
pub struct ChartService {
    ledger: LedgerStore,
}

impl ChartService {
    pub fn new(ledger: LedgerStore) -> Self {
        Self { ledger }
    }

    /// Orders per vehicle over every data row of the ledger, including rows
    /// whose order number is not valid.
    ///
    /// # Errors
    ///
    /// [`Error::NoData`] when the ledger is absent or no order has a vehicle.
    pub fn vehicle_counts(&self) -> Result<VehicleCounts> {
        if !self.ledger.exists() {
            return Err(Error::NoData);
        }

        let counts = VehicleCounts::from_rows(self.ledger.rows()?);
        if counts.is_empty() {
            return Err(Error::NoData);
        }
        Ok(counts)
    }

    /// Render the chart to an SVG file at `path`, creating parent
    /// directories as needed. Returns the counts that were drawn.
    pub fn write_chart<P: AsRef<Path>>(&self, path: P) -> Result<VehicleCounts> {
        let path = path.as_ref();
        let counts = self.vehicle_counts()?;
        let svg = svg::BarChart::from_counts(&counts).to_svg();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, svg)?;

        tracing::info!(path = %path.display(), vehicles = counts.len(), "chart written");
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::HEADER;

    fn record(number: u32, vehicle: &str) -> OrderRecord {
        OrderRecord {
            number,
            vehicle: vehicle.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_skip_empty_vehicles() {
        let counts = VehicleCounts::from_records([
            record(1, "A"),
            record(2, "B"),
            record(3, "A"),
            record(4, ""),
        ]);
        assert_eq!(counts.iter().collect::<Vec<_>>(), [("A", 2), ("B", 1)]);
        assert_eq!(counts.get("A"), Some(2));
        assert_eq!(counts.get("C"), None);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let counts = VehicleCounts::from_records([record(1, "Gol"), record(2, "gol")]);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::new(dir.path().join("ordens_servico.xlsx"));
        let charts = ChartService::new(ledger.clone());
        assert!(matches!(charts.vehicle_counts(), Err(Error::NoData)));

        ledger.append(&record(1, "")).unwrap();
        assert!(matches!(charts.vehicle_counts(), Err(Error::NoData)));
        assert!(matches!(
            charts.write_chart(dir.path().join("grafico.svg")),
            Err(Error::NoData)
        ));
    }

    #[test]
    fn test_rows_without_valid_number_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::new(dir.path().join("ordens_servico.xlsx"));
        ledger
            .append_row(&[CellValue::from("x"), CellValue::from("d"), CellValue::from("Gol")], &HEADER)
            .unwrap();
        ledger.append_row(&[CellValue::Float(2.5), CellValue::Empty], &HEADER).unwrap();
        ledger.append(&record(3, "Gol")).unwrap();

        let counts = ChartService::new(ledger).vehicle_counts().unwrap();
        assert_eq!(counts.iter().collect::<Vec<_>>(), [("Gol", 2)]);
    }

    #[test]
    fn test_write_chart() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::new(dir.path().join("ordens_servico.xlsx"));
        for (number, vehicle) in [(1, "Gol"), (2, "Uno"), (3, "Gol")] {
            ledger.append(&record(number, vehicle)).unwrap();
        }

        let path = dir.path().join("OS_Geradas").join("grafico_os.svg");
        let counts = ChartService::new(ledger).write_chart(&path).unwrap();
        assert_eq!(counts.get("Gol"), Some(2));

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">Uno</text>"));
    }
}
