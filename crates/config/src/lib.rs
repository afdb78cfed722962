use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use validator::*;

/// Top-level configuration for a Tradehall deployment
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// Ledger provisioning configuration
///
/// New Balance and Inventory rows are created lazily on first mutation and
/// start from a fixed grant rather than zero. The grant is a provisioning
/// policy knob, not a business rule baked into the core.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Single settlement currency for all Balance rows
    #[serde(rename = "settlement_currency")]
    #[serde(default = "default_settlement_currency")]
    pub settlement_currency: String,
    /// Starting quantity for a lazily created Balance row
    #[serde(rename = "balance_seed")]
    #[serde(default = "default_ledger_seed")]
    pub balance_seed: i64,
    /// Starting quantity for a lazily created Inventory row
    #[serde(rename = "inventory_seed")]
    #[serde(default = "default_ledger_seed")]
    pub inventory_seed: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            settlement_currency: default_settlement_currency(),
            balance_seed: default_ledger_seed(),
            inventory_seed: default_ledger_seed(),
        }
    }
}

/// Periodic matcher worker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatcherConfig {
    /// Whether the worker is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Interval between matching passes in seconds
    #[serde(rename = "interval_seconds")]
    #[serde(default = "default_matcher_interval")]
    pub interval_seconds: u64,
    /// Whether to run a matching pass immediately on startup
    #[serde(rename = "run_on_startup")]
    #[serde(default)]
    pub run_on_startup: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_matcher_interval(),
            run_on_startup: false,
        }
    }
}
