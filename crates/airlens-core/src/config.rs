//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Airlens Configuration Constants
// ============================================================================

/// Default dataset location for the fixed-dataset flow.
pub const DEFAULT_DATA_PATH: &str = "data/airline.csv";

/// Default directory chart PNGs are written into.
pub const DEFAULT_PLOTS_DIR: &str = "static/plots";

/// Default SQLite database file for user credentials.
pub const DEFAULT_USERS_DB: &str = "users.db";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub credentials: CredentialConfig,
}

/// Dataset analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// CSV consumed when no upload is supplied
    pub data_path: PathBuf,
    /// Directory the fifteen chart PNGs land in
    pub plots_dir: PathBuf,
}

/// Credential store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// SQLite file holding the users table
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig {
            analysis: AnalysisConfig {
                data_path: std::env::var("AIRLENS_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
                plots_dir: std::env::var("AIRLENS_PLOTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_PLOTS_DIR)),
            },
            credentials: CredentialConfig {
                db_path: std::env::var("AIRLENS_USERS_DB")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_USERS_DB)),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.analysis.data_path.as_os_str().is_empty() {
            anyhow::bail!("AIRLENS_DATA_PATH cannot be empty");
        }

        if self.analysis.plots_dir.as_os_str().is_empty() {
            anyhow::bail!("AIRLENS_PLOTS_DIR cannot be empty");
        }

        if self.credentials.db_path.as_os_str().is_empty() {
            anyhow::bail!("AIRLENS_USERS_DB cannot be empty");
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig {
                data_path: PathBuf::from(DEFAULT_DATA_PATH),
                plots_dir: PathBuf::from(DEFAULT_PLOTS_DIR),
            },
            credentials: CredentialConfig {
                db_path: PathBuf::from(DEFAULT_USERS_DB),
            },
        }
    }
}
