use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use latexmt_client::ClientSettings;
use latexmt_core::ValidationRules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

const CONFIG_ENV: &str = "LATEXMT_CLIENT_CONFIG";
const CONFIG_FILENAME: &str = "latexmt_client.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub poll_interval_ms: u64,
    pub log_level: String,
    pub log_destination: LogDestination,
    /// Field name → token the field must contain whenever it is non-empty.
    pub required_tokens: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            poll_interval_ms: 5_000,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
            required_tokens: BTreeMap::from([(
                "mask_placeholder".to_string(),
                "%INDEX%".to_string(),
            )]),
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(250))
    }

    pub fn validation_rules(&self) -> ValidationRules {
        self.required_tokens
            .iter()
            .fold(ValidationRules::new(), |rules, (field, token)| {
                rules.require_token(field.clone(), token.clone())
            })
    }
}

/// `$LATEXMT_CLIENT_CONFIG`, or `latexmt_client.ron` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Loads the configuration; a missing file means defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use latexmt_core::FormFields;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(
                client: (base_url: "https://mt.example.org/latexmt"),
                poll_interval_ms: 2000,
                log_destination: Both,
            )"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.client.base_url, "https://mt.example.org/latexmt");
        assert_eq!(
            config.client.connect_timeout_ms,
            ClientSettings::default().connect_timeout_ms
        );
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn malformed_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(poll_interval_ms: \"soon\")").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn required_tokens_become_validation_rules() {
        let rules = AppConfig::default().validation_rules();
        let mut fields = FormFields::new();
        fields.set("mask_placeholder", "foo");
        assert_eq!(rules.validate(&fields).invalid, vec!["mask_placeholder"]);

        fields.set("mask_placeholder", "foo %INDEX% bar");
        assert!(rules.validate(&fields).is_valid());
    }
}
