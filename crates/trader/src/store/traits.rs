//! Store traits for the Trader
//!
//! Defines the storage abstraction for offer matching. The `TradingStore`
//! trait covers the non-transactional surface (submission, queries), while
//! `StoreTx` is the transactional context every settlement operation runs
//! inside. A transaction that is dropped without `commit` leaves the store
//! untouched.

use async_trait::async_trait;
use common::{ItemId, OfferId, Side, UserId};
use thiserror::Error;

use crate::domain::{Balance, Inventory, Item, Offer, Trade, User};

/// Errors that can occur in the store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Offer not found
    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Duplicate item code
    #[error("Item code already exists: {0}")]
    DuplicateItemCode(String),

    /// Internal store error
    #[error("Store error: {0}")]
    Internal(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for users, items, offers, trades and ledgers
#[async_trait]
pub trait TradingStore: Send + Sync {
    /// Register a new user and provision their settlement balance
    async fn create_user(&self, username: &str) -> StoreResult<User>;

    /// Register a new tradable item
    async fn create_item(&self, code: &str, name: &str) -> StoreResult<Item>;

    /// Submit a new offer; the store assigns the next offer id
    async fn submit_offer(
        &self,
        owner: UserId,
        item: ItemId,
        side: Side,
        entry_quantity: i64,
        unit_price: i64,
    ) -> StoreResult<Offer>;

    /// Deactivate an offer regardless of fill progress
    ///
    /// Returns true if the offer was active, false if it already wasn't.
    async fn cancel_offer(&self, id: OfferId) -> StoreResult<bool>;

    /// Get an offer by id
    async fn get_offer(&self, id: OfferId) -> StoreResult<Option<Offer>>;

    /// Get a user by id
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Get an item by id
    async fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>>;

    /// Ids of all active purchase offers, ascending (submission order)
    async fn active_purchase_offers(&self) -> StoreResult<Vec<OfferId>>;

    /// All settled trades, in settlement order
    async fn list_trades(&self) -> StoreResult<Vec<Trade>>;

    /// Trades settled against a given purchase offer, in settlement order
    async fn trades_for_purchase_offer(&self, id: OfferId) -> StoreResult<Vec<Trade>>;

    /// Current balance row for a user, if one exists
    async fn get_balance(&self, owner: UserId) -> StoreResult<Option<Balance>>;

    /// Current inventory row for a user and item, if one exists
    async fn get_inventory(&self, owner: UserId, item: ItemId) -> StoreResult<Option<Inventory>>;

    /// Open a transaction over the store
    ///
    /// The returned context holds exclusive access to the store until it
    /// is committed, rolled back or dropped.
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;
}

/// Transactional context for settlement
///
/// All reads inside a transaction observe earlier writes from the same
/// transaction. Nothing is visible to other readers until `commit`.
#[async_trait]
pub trait StoreTx: Send {
    /// Load an offer, erroring if it does not exist
    async fn get_offer(&mut self, id: OfferId) -> StoreResult<Offer>;

    /// Persist an updated offer
    async fn update_offer(&mut self, offer: &Offer) -> StoreResult<()>;

    /// Load a user, erroring if it does not exist
    async fn get_user(&mut self, id: UserId) -> StoreResult<User>;

    /// Best eligible sell offer for an item: active, priced at or below
    /// `max_price`, cheapest first, earliest-submitted on ties
    async fn best_sell_offer(&mut self, item: ItemId, max_price: i64) -> StoreResult<Option<Offer>>;

    /// Append a settled trade
    async fn insert_trade(&mut self, trade: Trade) -> StoreResult<()>;

    /// Get the balance row for a user, creating it at the seed amount
    /// if the user has never held money
    async fn get_or_create_balance(&mut self, owner: UserId) -> StoreResult<Balance>;

    /// Persist an updated balance
    async fn update_balance(&mut self, balance: &Balance) -> StoreResult<()>;

    /// Get the inventory row for a user and item, creating it at the
    /// seed amount if the user has never held the item
    async fn get_or_create_inventory(
        &mut self,
        owner: UserId,
        item: ItemId,
    ) -> StoreResult<Inventory>;

    /// Persist an updated inventory
    async fn update_inventory(&mut self, inventory: &Inventory) -> StoreResult<()>;

    /// Make all writes in this transaction visible
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard all writes in this transaction
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
