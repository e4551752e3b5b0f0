//! Looking up orders by number.
use crate::common::{Error, Result};
use crate::ledger::{LedgerStore, NUMBER_COLUMN, OrderRecord};
use crate::ooxml::xlsx::CellValue;

/// A validated order number to search for.
///
/// Built from user text (`"  7 "`) or from a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery(String);

impl OrderQuery {
    /// Parse a query typed by the user.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] unless the trimmed text is made only of ASCII
    /// digits.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidInput(
                "enter a valid order number (digits only)".to_string(),
            ));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for OrderQuery {
    fn from(number: u32) -> Self {
        Self(number.to_string())
    }
}

impl TryFrom<&str> for OrderQuery {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

/// Read-only searches over the ledger.
#[derive(Debug, Clone)]
pub struct QueryService {
    ledger: LedgerStore,
}

impl QueryService {
    pub fn new(ledger: LedgerStore) -> Self {
        Self { ledger }
    }

    /// First order whose number cell, written out as stored, equals the
    /// query.
    ///
    /// The comparison is textual: a number cell holding 7 is found by `"7"`
    /// but not by `"007"`, and a text cell holding `007` only by `"007"`.
    /// Matching rows that do not form a valid order are skipped. Returns
    /// `Ok(None)` when the ledger is absent or nothing matches.
    ///
    /// ```rust,no_run
    /// use ordem::ledger::LedgerStore;
    /// use ordem::query::QueryService;
    ///
    /// let queries = QueryService::new(LedgerStore::new("ordens_servico.xlsx"));
    /// if let Some(order) = queries.find_by_number("12")? {
    ///     println!("{} {}", order.vehicle, order.plate);
    /// }
    /// # Ok::<(), ordem::Error>(())
    /// ```
    pub fn find_by_number<Q>(&self, query: Q) -> Result<Option<OrderRecord>>
    where
        Q: TryInto<OrderQuery>,
        Error: From<Q::Error>,
    {
        let query: OrderQuery = query.try_into()?;
        let found = self
            .ledger
            .rows()?
            .filter(|row| {
                row.get(NUMBER_COLUMN).map(CellValue::to_string).as_deref() == Some(query.as_str())
            })
            .find_map(|row| match OrderRecord::from_row(&row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(query = query.as_str(), error = %e, "matching row is not an order");
                    None
                },
            });

        tracing::debug!(query = query.as_str(), found = found.is_some(), "order lookup");
        Ok(found)
    }
}
