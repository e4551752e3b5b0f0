//! Unified error type for the order tool.
//!
//! Every layer (OPC packages, the ledger, the template engine and the
//! interactive front end) reports failures through this one enum so the
//! form can turn any of them into a message for the user.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for order operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// The file is readable but not the kind of package or sheet we expected
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A file the operation needs does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The Word template used to generate orders does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// User input failed a presence or format check
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The ledger holds nothing that can be charted
    #[error("No data available for the chart")]
    NoData,

    /// The host could not open a file with its default application
    #[error("Could not open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal prompt failed or was cancelled
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the user interrupted a prompt (Esc or Ctrl-C).
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Prompt(msg) if msg == CANCELLED)
    }
}

pub(crate) const CANCELLED: &str = "cancelled";

/// Result type for order operations.
pub type Result<T> = std::result::Result<T, Error>;
