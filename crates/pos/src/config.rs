//! Point-of-sale configuration.

use std::path::PathBuf;

use clap::{Args, Parser};

use panier_client::BackendConfig;

/// AMAP point-of-sale terminal configuration.
#[derive(Debug, Parser)]
#[command(name = "panier-pos", about = "AMAP Togo point-of-sale terminal", long_about = None)]
pub struct PosConfig {
    /// Hosted backend settings.
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Session state and output paths.
    #[command(flatten)]
    pub session: SessionArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Hosted backend connection settings; both must be set to go online.
#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Backend base URL (REST root)
    #[arg(long, env = "PANIER_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend anonymous API key
    #[arg(long, env = "PANIER_BACKEND_KEY")]
    pub backend_key: Option<String>,
}

impl BackendArgs {
    /// The backend configuration, when both URL and key are present.
    #[must_use]
    pub fn backend_config(&self) -> Option<BackendConfig> {
        match (&self.backend_url, &self.backend_key) {
            (Some(url), Some(key)) => Some(BackendConfig::new(url, key)),
            _ => None,
        }
    }
}

/// Paths used by the interactive session.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Path of the persisted cart state
    #[arg(long, env = "PANIER_CART_FILE", default_value = "panier-cart.json")]
    pub cart_file: PathBuf,

    /// Catalog fixture file (YAML); the bundled demo catalog when omitted
    #[arg(long, env = "PANIER_CATALOG_FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Directory receiving generated receipts
    #[arg(long, env = "PANIER_RECEIPT_DIR", default_value = ".")]
    pub receipt_dir: PathBuf,
}

/// Logging output settings.
#[derive(Debug, Args)]
pub struct LoggingArgs {
    /// Log level when RUST_LOG is unset
    #[arg(long, env = "PANIER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl PosConfig {
    /// Load configuration from environment and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
