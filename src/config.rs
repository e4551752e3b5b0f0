//! Configuration loading.
//!
//! Every setting has a default, so the tool runs without any configuration
//! file. Relative paths are resolved against the working directory.
//!
//! ```yaml
//! template_path: "Ordem de Serviço.docx"
//! ledger_path: ordens_servico.xlsx
//! output_dir: OS_Geradas
//! chart_path: OS_Geradas/grafico_os.svg
//! ```

use crate::chart::ChartService;
use crate::common::{Error, Result};
use crate::ledger::LedgerStore;
use crate::order::OrderService;
use crate::query::QueryService;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory when no
/// `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ordem.yaml";

/// File locations used by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Word template with `{{TOKEN}}` markers
    pub template_path: PathBuf,
    /// Order ledger workbook
    pub ledger_path: PathBuf,
    /// Directory receiving generated documents
    pub output_dir: PathBuf,
    /// Where the orders-per-vehicle chart is written
    pub chart_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("Ordem de Serviço.docx"),
            ledger_path: PathBuf::from("ordens_servico.xlsx"),
            output_dir: PathBuf::from("OS_Geradas"),
            chart_path: PathBuf::from("OS_Geradas/grafico_os.svg"),
        }
    }
}

impl Config {
    /// Parse a YAML document. An empty document gives the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the configuration for a run.
    ///
    /// An explicit file must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read when present and the defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve(explicit, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn resolve(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_yaml_file(path),
            None if fallback.is_file() => Self::from_yaml_file(fallback),
            None => {
                tracing::debug!("no configuration file, using defaults");
                Ok(Self::default())
            },
        }
    }

    pub fn ledger(&self) -> LedgerStore {
        LedgerStore::new(&self.ledger_path)
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(&self.template_path, &self.output_dir, self.ledger())
    }

    pub fn query_service(&self) -> QueryService {
        QueryService::new(self.ledger())
    }

    pub fn chart_service(&self) -> ChartService {
        ChartService::new(self.ledger())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.template_path, Path::new("Ordem de Serviço.docx"));
        assert_eq!(config.ledger_path, Path::new("ordens_servico.xlsx"));
        assert_eq!(config.output_dir, Path::new("OS_Geradas"));
        assert_eq!(config.chart_path, Path::new("OS_Geradas/grafico_os.svg"));
        assert_eq!(Config::from_yaml_str("  \n").unwrap(), config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_yaml_str("ledger_path: /srv/frota/ordens.xlsx\n").unwrap();
        assert_eq!(config.ledger_path, Path::new("/srv/frota/ordens.xlsx"));
        assert_eq!(config.output_dir, Path::new("OS_Geradas"));
        assert_eq!(config.order_service().ledger().path(), Path::new("/srv/frota/ordens.xlsx"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Config::from_yaml_str("ledger: x.xlsx\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join(DEFAULT_CONFIG_FILE);

        // Nothing on disk
        assert_eq!(Config::resolve(None, &fallback).unwrap(), Config::default());

        std::fs::write(&fallback, "output_dir: saida\n").unwrap();
        assert_eq!(Config::resolve(None, &fallback).unwrap().output_dir, Path::new("saida"));

        let explicit = dir.path().join("outro.yaml");
        assert!(matches!(
            Config::resolve(Some(&explicit), &fallback),
            Err(Error::NotFound(_))
        ));

        std::fs::write(&explicit, "chart_path: grafico.svg\n").unwrap();
        let config = Config::resolve(Some(&explicit), &fallback).unwrap();
        assert_eq!(config.chart_path, Path::new("grafico.svg"));
        assert_eq!(config.output_dir, Path::new("OS_Geradas"));
    }
}
