//! Runtime configuration.
//!
//! Layered the usual way: compiled defaults, overridden by environment
//! variables with the `DIALOG_SKILLS` prefix and `__` section separator,
//! e.g. `DIALOG_SKILLS__QA__URL` or `DIALOG_SKILLS__CONTENT__TIMEOUT_MS`.

use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One upstream HTTP service endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Passage question-answering service.
    pub qa: ServiceConfig,
    /// Page content service.
    pub content: ServiceConfig,
}

impl AppConfig {
    /// Loads configuration from defaults and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("qa.url", "http://localhost:8078/model")?
            .set_default("qa.timeout_ms", 1_000i64)?
            .set_default("content.url", "http://localhost:8079/get_page_content")?
            .set_default("content.timeout_ms", 2_000i64)?
            .add_source(Environment::with_prefix("DIALOG_SKILLS").separator("__"))
            .build()?;
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, service) in [("qa", &self.qa), ("content", &self.content)] {
            if service.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name}.url must not be empty")));
            }
            if service.timeout_ms == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}.timeout_ms must be positive"
                )));
            }
        }
        Ok(())
    }
}
