//! Trader error types

use common::{ItemId, OfferId, Side};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during offer matching and settlement
///
/// Missing offers, users and items surface through the `Store` variant.
#[derive(Error, Debug)]
pub enum TraderError {
    /// No tradable quantity between the given offers
    #[error("No liquidity")]
    NoLiquidity,

    /// Offer has the wrong side for this operation
    #[error("Offer {offer} is not a {expected} offer")]
    WrongSide { offer: OfferId, expected: Side },

    /// Offers reference different items
    #[error("Item mismatch: sell offer {sell} is for item {sell_item}, purchase offer {purchase} is for item {purchase_item}")]
    ItemMismatch {
        sell: OfferId,
        sell_item: ItemId,
        purchase: OfferId,
        purchase_item: ItemId,
    },

    /// A fill-progress invariant was violated by a prior mutation
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for trader operations
pub type Result<T> = std::result::Result<T, TraderError>;
