//! # sb-config
//!
//! Layered settings: built-in defaults, then an optional `suggestion-box.toml`,
//! then `SB__`-prefixed environment variables (e.g. `SB__SERVER__PORT=9000`).

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    #[serde(deserialize_with = "secret")]
    pub admin_password: SecretString,
    /// Simulated round-trip delay of the mock identity service.
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct ClassifierSettings {
    /// Without a key no classifier is built and submissions get the default analysis.
    #[serde(default, deserialize_with = "optional_secret")]
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub classifier: ClassifierSettings,
}

fn secret<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

fn optional_secret<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .filter(|s| !s.trim().is_empty())
        .map(SecretString::from))
}

impl Settings {
    /// Reads `.env` (if present) and builds the layered settings.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_sources(Some("suggestion-box"), Environment::with_prefix("SB").separator("__"))
    }

    fn from_sources(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("storage.data_dir", "./data")?
            .set_default("auth.admin_password", "vml001")?
            .set_default("auth.latency_ms", 1000)?
            .set_default("classifier.model", "gemini-2.5-flash")?
            .set_default(
                "classifier.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("classifier.timeout_secs", 20)?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "classifier.timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "server.host",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
