//! Order creation.
use super::fields::{Clock, OrderFields, PlaceholderMap, SystemClock};
use crate::common::{Error, Result};
use crate::ledger::{DATE_FORMAT, LedgerStore, OrderRecord, format_number};
use crate::ooxml::docx::Package;
use chrono::Datelike;
use std::path::{Path, PathBuf};

/// Creates service orders: fills the template, saves the document and
/// records the order in the ledger.
///
/// # Examples
///
/// ```rust,no_run
/// use ordem::ledger::LedgerStore;
/// use ordem::order::{OrderFields, OrderService};
///
/// let service = OrderService::new(
///     "Ordem de Serviço.docx",
///     "OS_Geradas",
///     LedgerStore::new("ordens_servico.xlsx"),
/// );
/// let fields = OrderFields {
///     vehicle: "Gol".to_string(),
///     plate: "ABC1234".to_string(),
///     ..Default::default()
/// };
/// let record = service.create_order(&fields)?;
/// println!("{}", record.document_path);
/// # Ok::<(), ordem::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct OrderService<C = SystemClock> {
    template_path: PathBuf,
    output_dir: PathBuf,
    ledger: LedgerStore,
    clock: C,
}

impl OrderService<SystemClock> {
    pub fn new(
        template_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        ledger: LedgerStore,
    ) -> Self {
        Self {
            template_path: template_path.into(),
            output_dir: output_dir.into(),
            ledger,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> OrderService<C> {
    /// Use another date source.
    pub fn with_clock<D: Clock>(self, clock: D) -> OrderService<D> {
        OrderService {
            template_path: self.template_path,
            output_dir: self.output_dir,
            ledger: self.ledger,
            clock,
        }
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Where the document of an order is saved:
    /// `<output_dir>/OS_<NNN-YYYY>_<plate>.docx`.
    pub fn output_path(&self, formatted_number: &str, plate: &str) -> PathBuf {
        self.output_dir.join(format!(
            "OS_{}_{}.docx",
            formatted_number.replace('/', "-"),
            plate
        ))
    }

    /// Create one order.
    ///
    /// The number is taken from the ledger right before the row is appended;
    /// the two steps are not atomic.
    ///
    /// # Errors
    ///
    /// [`Error::TemplateMissing`] when the template does not exist; I/O and
    /// format errors of the template, the document or the ledger otherwise.
    /// Nothing is written to the ledger when the document could not be saved.
    pub fn create_order(&self, fields: &OrderFields) -> Result<OrderRecord> {
        if !self.template_path.is_file() {
            return Err(Error::TemplateMissing(self.template_path.clone()));
        }
        std::fs::create_dir_all(&self.output_dir)?;

        let number = self.ledger.next_number()?;
        let today = self.clock.today();
        let formatted_number = format_number(number, today.year());
        let date = today.format(DATE_FORMAT).to_string();

        let fields = fields.normalized();
        let mapping = PlaceholderMap::new(&formatted_number, &date, &fields);

        let mut document = Package::open(&self.template_path)?;
        let rewritten = document.substitute(&mapping.placeholders()?)?;
        tracing::debug!(number = %formatted_number, paragraphs = rewritten, "template filled");

        let document_path = self.output_path(&formatted_number, &fields.plate);
        document.save(&document_path)?;

        let record = OrderRecord {
            number,
            date,
            vehicle: fields.vehicle,
            plate: fields.plate,
            odometer_in: fields.odometer_in,
            odometer_out: fields.odometer_out,
            items_to_check: fields.items_to_check,
            notes: fields.notes,
            step: fields.step,
            wheel_key: fields.wheel_key,
            jack: fields.jack,
            triangle: fields.triangle,
            document_path: document_path.to_string_lossy().into_owned(),
        };
        self.ledger.append(&record)?;

        tracing::info!(number = %formatted_number, path = %record.document_path, "order created");
        Ok(record)
    }
}
