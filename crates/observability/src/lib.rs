//! Observability infrastructure for Tradehall
//!
//! Provides logging initialization built on the `tracing` ecosystem.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};
