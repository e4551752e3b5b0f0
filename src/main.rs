use clap::Parser;
use ordem::config::Config;
use ordem::opener::SystemOpener;
use ordem::ui::{FormApp, InquirePrompter, user_message};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Generate service orders from a Word template and keep them in an Excel ledger.
#[derive(Parser)]
#[command(name = "ordem", version)]
struct Cli {
    /// YAML configuration file (defaults to ./ordem.yaml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", user_message(&e));
            return ExitCode::FAILURE;
        },
    };
    tracing::debug!(?config, "configuration loaded");

    let mut app = FormApp::new(&config, InquirePrompter, SystemOpener);
    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        },
    }
}
