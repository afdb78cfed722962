use crate::*;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Exchange name is required")]
    MissingExchangeName,

    #[error("Exchange description is required")]
    MissingExchangeDescription,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("Settlement currency is required")]
    MissingSettlementCurrency,

    #[error("{field} must not be negative, got: {value}")]
    NegativeLedgerSeed { field: String, value: i64 },

    #[error("matcher.interval_seconds must be a positive integer")]
    InvalidMatcherInterval,
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a loaded configuration.
///
/// Returns a report with hard errors (the config cannot be used) and
/// warnings (the config is usable but likely not what the operator meant).
pub fn validate_config(config: &AppConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.exchange.name.trim().is_empty() {
        report.errors.push(ValidationError::MissingExchangeName);
    }

    if config.exchange.description.trim().is_empty() {
        report.errors.push(ValidationError::MissingExchangeDescription);
    }

    let version_re = Regex::new(r"^\d+\.\d+\.\d+$").expect("static regex");
    if !version_re.is_match(&config.exchange.version) {
        report.errors.push(ValidationError::InvalidVersionFormat(
            config.exchange.version.clone(),
        ));
    }

    if config.ledger.settlement_currency.trim().is_empty() {
        report.errors.push(ValidationError::MissingSettlementCurrency);
    }

    for (field, value) in [
        ("ledger.balance_seed", config.ledger.balance_seed),
        ("ledger.inventory_seed", config.ledger.inventory_seed),
    ] {
        if value < 0 {
            report.errors.push(ValidationError::NegativeLedgerSeed {
                field: field.to_string(),
                value,
            });
        } else if value == 0 {
            report.warnings.push(ValidationWarning {
                field: field.to_string(),
                message: "seed is 0; new ledger rows will start with nothing to trade".to_string(),
            });
        }
    }

    if config.matcher.interval_seconds == 0 {
        report.errors.push(ValidationError::InvalidMatcherInterval);
    }

    report
}
