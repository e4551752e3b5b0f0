//! The interactive order form.
use super::prompt::Prompter;
use super::session::Session;
use crate::chart::ChartService;
use crate::common::{Error, Result};
use crate::config::Config;
use crate::ledger::{LedgerStore, OrderRecord};
use crate::opener::FileOpener;
use crate::order::{OrderFields, OrderService};
use crate::query::{OrderQuery, QueryService};
use std::path::{Path, PathBuf};

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Generate,
    Search,
    OpenLast,
    Chart,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Generate,
        MenuAction::Search,
        MenuAction::OpenLast,
        MenuAction::Chart,
        MenuAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Generate => "Gerar Ordem de Serviço",
            MenuAction::Search => "Buscar OS",
            MenuAction::OpenLast => "Abrir Último Documento",
            MenuAction::Chart => "Gerar Gráfico",
            MenuAction::Quit => "Sair",
        }
    }
}

/// The form: a menu over order creation, lookup and charting.
///
/// Every failure is reported through the prompter and the form keeps
/// running; only cancelling the menu itself (or choosing to quit) ends
/// [`FormApp::run`].
pub struct FormApp<P, O> {
    ledger: LedgerStore,
    orders: OrderService,
    queries: QueryService,
    charts: ChartService,
    chart_path: PathBuf,
    prompter: P,
    opener: O,
    session: Session,
}

impl<P: Prompter, O: FileOpener> FormApp<P, O> {
    pub fn new(config: &Config, prompter: P, opener: O) -> Self {
        Self {
            ledger: config.ledger(),
            orders: config.order_service(),
            queries: config.query_service(),
            charts: config.chart_service(),
            chart_path: config.chart_path.clone(),
            prompter,
            opener,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// `Total de OS: N`
    pub fn total_text(&self) -> Result<String> {
        Ok(format!("Total de OS: {}", self.ledger.count()?))
    }

    /// Show the menu until the user quits or cancels it.
    pub fn run(&mut self) -> Result<()> {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(|action| action.label()).collect();

        loop {
            self.show_total();

            let action = match self.prompter.select("O que deseja fazer?", &labels) {
                Ok(index) => MenuAction::ALL[index],
                Err(e) if e.is_cancelled() => return Ok(()),
                Err(e) => return Err(e),
            };
            if action == MenuAction::Quit {
                return Ok(());
            }

            if let Err(e) = self.perform(action) {
                if e.is_cancelled() {
                    self.prompter.message("Operação cancelada.");
                } else {
                    self.report(&e);
                }
            }
        }
    }

    /// Show the order count; a ledger that cannot be read is reported and
    /// the caller carries on.
    fn show_total(&mut self) {
        match self.total_text() {
            Ok(total) => self.prompter.message(&total),
            Err(e) => self.report(&e),
        }
    }

    /// Run one menu action.
    pub fn perform(&mut self, action: MenuAction) -> Result<()> {
        tracing::debug!(action = ?action, "menu action");
        match action {
            MenuAction::Generate => self.generate(),
            MenuAction::Search => self.search(),
            MenuAction::OpenLast => self.open_last(),
            MenuAction::Chart => self.chart(),
            MenuAction::Quit => Ok(()),
        }
    }

    fn read_fields(&mut self) -> Result<OrderFields> {
        let p = &mut self.prompter;
        Ok(OrderFields {
            vehicle: p.text("Veículo:")?,
            plate: p.text("Placa:")?,
            odometer_in: p.text("KM na Entrada:")?,
            odometer_out: p.text("KM na Saída:")?,
            items_to_check: p.multi_line("Itens a verificar:")?,
            notes: p.multi_line("Observações:")?,
            step: p.text("STEP (S/N):")?,
            wheel_key: p.text("Chave de Roda (S/N):")?,
            jack: p.text("Macaco (S/N):")?,
            triangle: p.text("Triângulo (S/N):")?,
        })
    }

    fn generate(&mut self) -> Result<()> {
        let fields = self.read_fields()?;
        let record = self.orders.create_order(&fields)?;
        self.session.set_last_document(&record.document_path);

        let number = record
            .formatted_number()
            .unwrap_or_else(|| record.number.to_string());
        self.prompter.message(&format!(
            "OS nº {} criada com sucesso!\n\nArquivo: {}",
            number, record.document_path
        ));
        self.show_total();

        if self.prompter.confirm("Deseja abrir o documento Word agora?", false)? {
            self.open_reporting(Path::new(&record.document_path));
        }
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let query = self.prompter.text("Buscar OS nº:")?;
        let query = query.trim();
        if !self.ledger.exists() {
            // Validate first so bad input is reported as such
            OrderQuery::parse(query)?;
            self.prompter.error("Nenhum registro encontrado.");
            return Ok(());
        }

        let Some(record) = self.queries.find_by_number(query)? else {
            self.prompter.message(&format!("Nenhuma OS nº {} encontrada.", query));
            return Ok(());
        };

        self.prompter.message(&describe_record(&record));
        if self.prompter.confirm("Deseja abrir o documento Word?", false)? {
            let path = Path::new(&record.document_path);
            if record.document_path.is_empty() || !path.exists() {
                self.prompter.error("O arquivo Word desta OS não foi localizado.");
            } else {
                self.open_reporting(path);
            }
        }
        Ok(())
    }

    fn open_last(&mut self) -> Result<()> {
        match self.session.last_document().map(Path::to_path_buf) {
            Some(path) if path.exists() => self.open_reporting(&path),
            _ => self.prompter.message("Nenhum documento recente encontrado."),
        }
        Ok(())
    }

    fn chart(&mut self) -> Result<()> {
        if !self.ledger.exists() {
            self.prompter.error("Nenhuma planilha encontrada.");
            return Ok(());
        }

        match self.charts.write_chart(&self.chart_path) {
            Ok(counts) => {
                self.prompter.message(&format!(
                    "Gráfico salvo em {} ({} veículos).",
                    self.chart_path.display(),
                    counts.len()
                ));
                let path = self.chart_path.clone();
                self.open_reporting(&path);
                Ok(())
            },
            Err(Error::NoData) => {
                self.prompter.message(&user_message(&Error::NoData));
                Ok(())
            },
            Err(e) => Err(e),
        }
    }

    /// Open a file; failures are shown, not returned.
    fn open_reporting(&mut self, path: &Path) {
        if let Err(e) = self.opener.open(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not open file");
            self.report(&e);
        }
    }

    fn report(&mut self, error: &Error) {
        self.prompter.error(&user_message(error));
    }
}

/// Text shown for a found order.
pub fn describe_record(record: &OrderRecord) -> String {
    format!(
        "Número: {}\nData: {}\nVeículo: {}\nPlaca: {}\nKM Entrada: {}\nKM Saída: {}\nItens: {}\nObservações: {}\nSTEP: {} | Chave de Roda: {} | Macaco: {} | Triângulo: {}",
        record.number,
        record.date,
        record.vehicle,
        record.plate,
        record.odometer_in,
        record.odometer_out,
        record.items_to_check,
        record.notes,
        record.step,
        record.wheel_key,
        record.jack,
        record.triangle,
    )
}

/// Message shown to the user for an error.
pub fn user_message(error: &Error) -> String {
    match error {
        Error::TemplateMissing(path) => {
            format!("Erro: o arquivo '{}' não foi encontrado.", path.display())
        },
        Error::InvalidInput(_) => "Erro: digite um número válido de OS (somente números).".to_string(),
        Error::NoData => "Aviso: nenhum dado disponível para o gráfico.".to_string(),
        Error::NotFound(path) => format!("Arquivo não encontrado: {}", path.display()),
        Error::Open { path, reason } => format!(
            "Não foi possível abrir o arquivo {}:\n{}",
            path.display(),
            reason
        ),
        other => format!("Erro: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::fixtures::{docx_bytes, paragraph};
    use crate::ui::prompt::scripted::{Answer, ScriptedPrompter};
    use std::cell::RefCell;

    /// Records what would have been opened.
    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<PathBuf>>,
    }

    impl FileOpener for RecordingOpener {
        fn open(&self, path: &Path) -> Result<()> {
            if !path.exists() {
                return Err(Error::NotFound(path.to_path_buf()));
            }
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    /// Answers for one complete order form.
    fn order_answers(vehicle: &str, plate: &str) -> Vec<Answer> {
        vec![
            text(vehicle),
            text(plate),
            text("1000"),
            text("1200"),
            text("pneus"),
            text("freios"),
            text(""),
            text(""),
            text("s"),
            text("s"),
            text("n"),
            text("s"),
        ]
    }

    fn config(dir: &tempfile::TempDir) -> Config {
        let template = dir.path().join("Ordem de Serviço.docx");
        let body = [paragraph("Veiculo: {{VEICULO}}"), paragraph("{{ITENS_VERIFICAR}}")].concat();
        std::fs::write(&template, docx_bytes(&body)).unwrap();

        Config {
            template_path: template,
            ledger_path: dir.path().join("ordens_servico.xlsx"),
            output_dir: dir.path().join("OS_Geradas"),
            chart_path: dir.path().join("OS_Geradas").join("grafico_os.svg"),
        }
    }

    fn app(config: &Config, answers: Vec<Answer>) -> FormApp<ScriptedPrompter, RecordingOpener> {
        FormApp::new(config, ScriptedPrompter::new(answers), RecordingOpener::default())
    }

    #[test]
    fn test_generate_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut answers = order_answers(" Gol ", "ABC1234");
        answers.push(Answer::Confirm(true));
        let mut app = app(&config, answers);

        app.perform(MenuAction::Generate).unwrap();
        assert!(app.prompter().finished());

        let last = app.session().last_document().unwrap().to_path_buf();
        assert!(last.to_string_lossy().contains("ABC1234"));
        assert_eq!(*app.opener().opened.borrow(), [last]);
        assert!(app.prompter().messages.iter().any(|m| m.starts_with("OS nº 001/")));
        assert_eq!(app.total_text().unwrap(), "Total de OS: 1");

        let record = config.ledger().read_all().unwrap().next().unwrap();
        assert_eq!(record.vehicle, "Gol");
        assert_eq!(record.items_to_check, "pneus\nfreios");
        assert_eq!(record.step, "S");
    }

    #[test]
    fn test_missing_template_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        std::fs::remove_file(&config.template_path).unwrap();

        let mut answers = vec![Answer::Select(0)];
        answers.extend(order_answers("Gol", "ABC1234"));
        answers.push(Answer::Cancel);
        let mut app = app(&config, answers);

        app.run().unwrap();
        assert_eq!(app.prompter().errors.len(), 1);
        assert!(app.prompter().errors[0].contains("não foi encontrado"));
        assert_eq!(app.prompter().messages[0], "Total de OS: 0");
        assert!(!config.ledger().exists());
    }

    #[test]
    fn test_search() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let mut answers = vec![text("1")];
        let mut first = order_answers("Gol", "ABC1234");
        first.push(Answer::Confirm(false));
        let mut app = app(&config, first);
        app.perform(MenuAction::Generate).unwrap();

        // Found, then opened
        answers.push(Answer::Confirm(true));
        // Unknown number
        answers.push(text("5"));
        // Not a number
        answers.push(text("um"));
        let mut app = FormApp::new(&config, ScriptedPrompter::new(answers), RecordingOpener::default());

        app.perform(MenuAction::Search).unwrap();
        assert!(app.prompter().messages[0].starts_with("Número: 1\n"));
        assert_eq!(app.opener().opened.borrow().len(), 1);

        app.perform(MenuAction::Search).unwrap();
        assert_eq!(app.prompter().messages.last().unwrap(), "Nenhuma OS nº 5 encontrada.");

        let err = app.perform(MenuAction::Search).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(user_message(&err).contains("somente números"));
    }

    #[test]
    fn test_search_without_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut app = app(&config, vec![text("3")]);
        app.perform(MenuAction::Search).unwrap();
        assert_eq!(app.prompter().errors, ["Nenhum registro encontrado."]);
    }

    #[test]
    fn test_open_last_without_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut app = app(&config, vec![]);
        app.perform(MenuAction::OpenLast).unwrap();
        assert_eq!(app.prompter().messages, ["Nenhum documento recente encontrado."]);
        assert!(app.opener().opened.borrow().is_empty());
    }

    #[test]
    fn test_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let mut app = app(&config, vec![]);
        app.perform(MenuAction::Chart).unwrap();
        assert_eq!(app.prompter().errors, ["Nenhuma planilha encontrada."]);

        let mut answers = order_answers("Gol", "ABC1234");
        answers.push(Answer::Confirm(false));
        let mut app = FormApp::new(&config, ScriptedPrompter::new(answers), RecordingOpener::default());
        app.perform(MenuAction::Generate).unwrap();
        app.perform(MenuAction::Chart).unwrap();

        assert!(config.chart_path.is_file());
        assert_eq!(*app.opener().opened.borrow(), [config.chart_path.clone()]);
    }

    #[test]
    fn test_cancelled_operation_keeps_menu_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let answers = vec![
            Answer::Select(1),
            Answer::Cancel,
            Answer::Select(MenuAction::ALL.len() - 1),
        ];
        let mut app = app(&config, answers);
        app.run().unwrap();
        assert!(app.prompter().finished());
        assert!(app.prompter().messages.contains(&"Operação cancelada.".to_string()));
    }

    #[test]
    fn test_unreadable_ledger_total_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        std::fs::write(&config.ledger_path, b"not a workbook").unwrap();

        let mut app = app(&config, vec![Answer::Select(MenuAction::ALL.len() - 1)]);
        app.show_total();
        assert_eq!(app.prompter().errors.len(), 1);
        assert!(app.prompter().messages.is_empty());

        // The menu still comes up afterwards
        app.run().unwrap();
        assert!(app.prompter().finished());
        assert_eq!(app.prompter().errors.len(), 2);
    }
}
