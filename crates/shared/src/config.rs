//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reconciliation engine behaviour.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Snapshot document location.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Engine configuration.
///
/// Passed by value into the engine; the engine never reads the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Reject commands that leave any touched product with negative stock.
    #[serde(default)]
    pub enforce_non_negative_stock: bool,
    /// Reject invoices whose amount paid exceeds the grand total.
    #[serde(default)]
    pub reject_overpayment: bool,
    /// Invoice number prefix for sales.
    #[serde(default = "default_sale_prefix")]
    pub invoice_prefix_sale: String,
    /// Invoice number prefix for purchases.
    #[serde(default = "default_purchase_prefix")]
    pub invoice_prefix_purchase: String,
}

fn default_sale_prefix() -> String {
    "SL".to_string()
}

fn default_purchase_prefix() -> String {
    "PR".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enforce_non_negative_stock: false,
            reject_overpayment: false,
            invoice_prefix_sale: default_sale_prefix(),
            invoice_prefix_purchase: default_purchase_prefix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "khata=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Storage configuration (used by the command line driver only).
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the snapshot JSON document.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_snapshot_path() -> String {
    "khata.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// then `KHATA__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KHATA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
