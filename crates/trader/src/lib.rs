//! Trader - batch offer matching and ledger settlement
//!
//! The trader periodically scans active purchase offers and fills each
//! against the cheapest eligible sell offers, settling money and stock
//! between user ledgers and recording a Trade per execution. Offers are
//! soft-deleted once exhausted.
//!
//! # Architecture
//!
//! - [`domain`] - users, items, offers, trades and ledger rows
//! - [`store`] - storage abstraction with an in-memory implementation;
//!   all settlement runs inside a [`store::StoreTx`] transaction
//! - [`ledger`] - signed-delta accessors over balances and inventories
//! - [`lifecycle`] - soft-deletion of exhausted offers
//! - [`executor`] - settles a single sell/purchase pair
//! - [`trader`] - the matching pass driver
//! - [`worker`] - periodic background runner
//! - [`metrics`] - counters and latency tracking for passes

pub mod domain;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod lifecycle;
pub mod metrics;
pub mod store;
pub mod trader;
pub mod worker;

pub use error::{Result, TraderError};
pub use trader::{PassSummary, Trader};
pub use worker::MatcherWorker;
