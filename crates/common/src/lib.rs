//! Common types and utilities for Tradehall
//!
//! This crate provides shared types, traits, and utilities used across
//! all Tradehall crates.
//!
//! # Modules
//!
//! - [`types`] - Shared domain types (OfferId, UserId, Side, etc.)

pub mod types;

pub use types::*;
