//! State kept for the duration of one run of the form.
use std::path::{Path, PathBuf};

/// What the form remembers between operations. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    last_document: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document generated most recently in this session.
    pub fn last_document(&self) -> Option<&Path> {
        self.last_document.as_deref()
    }

    pub fn set_last_document(&mut self, path: impl Into<PathBuf>) {
        self.last_document = Some(path.into());
    }
}
