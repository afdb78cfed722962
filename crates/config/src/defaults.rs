pub fn default_enabled() -> bool {
    true
}

pub fn default_settlement_currency() -> String {
    "USD".to_string()
}

/// Starting grant for lazily created ledger rows.
pub fn default_ledger_seed() -> i64 {
    1000
}

pub fn default_matcher_interval() -> u64 {
    60
}
