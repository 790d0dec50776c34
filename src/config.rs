use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cities::CityCorrector;
use crate::common::constants::{
    DEFAULT_DATA_PATH, DEFAULT_HOST, DEFAULT_LOG_DIR, DEFAULT_PORT, ENV_DATA_PATH, ENV_HOST, ENV_PORT,
};
use crate::common::error::{CatalogError, Result};
use crate::filter::QueryFilter;
use crate::formatter::RecordFormatter;
use crate::modality::{default_rules, ModalityClassifier, ModalityRule};
use crate::text::TextNormalizer;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub normalization: NormalizationConfig,
    pub cities: CitiesConfig,
    pub modality: ModalityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prometheus exporter listen address; metrics are not exported when unset
    pub metrics_addr: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            metrics_addr: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub strip_punctuation: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            strip_punctuation: TextNormalizer::default().strip_punctuation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitiesConfig {
    /// Raw scraped city -> canonical city
    pub corrections: HashMap<String, String>,
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            corrections: CityCorrector::default_table(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalityConfig {
    /// Evaluated in order; the first match wins
    pub rules: Vec<ModalityRule>,
}

impl Default for ModalityConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using built-in defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ETEC_API_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(host) = env::var(ENV_HOST) {
            self.server.host = host;
        }
        if let Ok(port) = env::var(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|e| CatalogError::Config(format!("Invalid {ENV_PORT} '{port}': {e}")))?;
        }
        if let Ok(path) = env::var(ENV_DATA_PATH) {
            self.data.path = PathBuf::from(path);
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(CatalogError::Config("server.host must not be empty".to_string()));
        }
        if let Some(rule) = self
            .modality
            .rules
            .iter()
            .find(|r| r.all_of.is_empty() && r.any_of.is_empty())
        {
            return Err(CatalogError::Config(format!(
                "modality rule for '{}' needs at least one keyword",
                rule.modality
            )));
        }
        Ok(())
    }

    pub fn normalizer(&self) -> TextNormalizer {
        TextNormalizer {
            strip_punctuation: self.normalization.strip_punctuation,
        }
    }

    pub fn formatter(&self) -> RecordFormatter {
        RecordFormatter::new(
            CityCorrector::new(&self.cities.corrections, self.normalizer()),
            ModalityClassifier::new(&self.modality.rules, self.normalizer()),
        )
    }

    pub fn query_filter(&self) -> QueryFilter {
        QueryFilter::new(self.normalizer())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modality::Modality;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8081
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.data.path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.modality.rules, default_rules());
        assert!(config.normalization.strip_punctuation);
        assert_eq!(config.bind_addr(), "0.0.0.0:8081");
    }

    #[test]
    fn test_tables_from_file() {
        let config = Config::from_toml(
            r#"
            [cities.corrections]
            "Barão Geraldo" = "Campinas"

            [[modality.rules]]
            modality = "tecnico-concomitante"
            all_of = ["novotec"]
            "#,
        )
        .unwrap();

        assert_eq!(config.cities.corrections.len(), 1);
        assert_eq!(config.modality.rules.len(), 1);

        let formatter = config.formatter();
        assert_eq!(formatter.corrector().correct("barao geraldo"), "Campinas");
        assert_eq!(
            formatter.classifier().classify("Novotec Integrado"),
            Modality::TecnicoConcomitante
        );
    }

    #[test]
    fn test_rejects_keywordless_rule() {
        let err = Config::from_toml(
            r#"
            [[modality.rules]]
            modality = "outros"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_modality() {
        let err = Config::from_toml(
            r#"
            [[modality.rules]]
            modality = "graduacao"
            all_of = ["bacharel"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Toml(_)));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = Config::from_toml(include_str!("../config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
