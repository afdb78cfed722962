//! In-memory store implementation for the Trader
//!
//! This implementation keeps all state in memory behind a single mutex.
//! It's fast but non-persistent - data is lost on restart.
//!
//! Transactions stage their writes on a clone of the state while holding
//! the mutex, so a transaction is exclusive for its whole lifetime and a
//! drop without commit discards every staged write.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use common::{Currency, ItemId, OfferId, Side, UserId};
use config::LedgerConfig;

use crate::domain::{Balance, Inventory, Item, Offer, Trade, User};
use crate::store::traits::{StoreError, StoreResult, StoreTx, TradingStore};

/// Seed amounts and currency for fresh ledger rows
#[derive(Debug, Clone)]
struct LedgerSeeds {
    currency: Currency,
    balance_seed: i64,
    inventory_seed: i64,
}

/// Complete store state
///
/// BTreeMaps keep iteration in ascending-id order, which the matcher
/// relies on for its scan and tie-break ordering.
#[derive(Debug, Clone, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    items: BTreeMap<ItemId, Item>,
    offers: BTreeMap<OfferId, Offer>,
    trades: Vec<Trade>,
    balances: BTreeMap<UserId, Balance>,
    inventories: BTreeMap<(UserId, ItemId), Inventory>,
    next_user_id: u64,
    next_item_id: u64,
    next_offer_id: u64,
}

/// In-memory store for offer matching and settlement
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    seeds: LedgerSeeds,
}

impl InMemoryStore {
    /// Create a store with default seeds (1000 units, USD)
    pub fn new() -> Self {
        Self::with_ledger(&LedgerConfig::default())
    }

    /// Create a store seeded from the ledger configuration
    pub fn with_ledger(config: &LedgerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            seeds: LedgerSeeds {
                currency: Currency::new(&config.settlement_currency),
                balance_seed: config.balance_seed,
                inventory_seed: config.inventory_seed,
            },
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_balance(seeds: &LedgerSeeds, owner: UserId) -> Balance {
    Balance {
        owner,
        currency: seeds.currency.clone(),
        quantity: seeds.balance_seed,
    }
}

fn seed_inventory(seeds: &LedgerSeeds, owner: UserId, item: ItemId) -> Inventory {
    Inventory {
        owner,
        item,
        quantity: seeds.inventory_seed,
    }
}

#[async_trait]
impl TradingStore for InMemoryStore {
    async fn create_user(&self, username: &str) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        state.next_user_id += 1;
        let user = User::new(UserId(state.next_user_id), username);

        // Money is provisioned at registration; inventories stay lazy
        // until the user first touches an item.
        let balance = seed_balance(&self.seeds, user.id);
        state.balances.insert(user.id, balance);
        state.users.insert(user.id, user.clone());

        debug!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    async fn create_item(&self, code: &str, name: &str) -> StoreResult<Item> {
        let mut state = self.state.lock().await;
        if state.items.values().any(|i| i.code == code) {
            return Err(StoreError::DuplicateItemCode(code.to_string()));
        }
        state.next_item_id += 1;
        let item = Item::new(ItemId(state.next_item_id), code, name);
        state.items.insert(item.id, item.clone());

        debug!(item_id = %item.id, code = %item.code, "Item created");
        Ok(item)
    }

    async fn submit_offer(
        &self,
        owner: UserId,
        item: ItemId,
        side: Side,
        entry_quantity: i64,
        unit_price: i64,
    ) -> StoreResult<Offer> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&owner) {
            return Err(StoreError::UserNotFound(owner));
        }
        if !state.items.contains_key(&item) {
            return Err(StoreError::ItemNotFound(item));
        }

        state.next_offer_id += 1;
        let offer = Offer::new(
            OfferId(state.next_offer_id),
            owner,
            item,
            side,
            entry_quantity,
            unit_price,
        );
        state.offers.insert(offer.id, offer.clone());

        debug!(
            offer_id = %offer.id,
            owner = %owner,
            side = %side,
            quantity = entry_quantity,
            price = unit_price,
            "Offer submitted"
        );
        Ok(offer)
    }

    async fn cancel_offer(&self, id: OfferId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let offer = state
            .offers
            .get_mut(&id)
            .ok_or(StoreError::OfferNotFound(id))?;
        let was_active = offer.active;
        offer.active = false;

        if was_active {
            debug!(offer_id = %id, "Offer cancelled");
        }
        Ok(was_active)
    }

    async fn get_offer(&self, id: OfferId) -> StoreResult<Option<Offer>> {
        let state = self.state.lock().await;
        Ok(state.offers.get(&id).cloned())
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let state = self.state.lock().await;
        Ok(state.items.get(&id).cloned())
    }

    async fn active_purchase_offers(&self) -> StoreResult<Vec<OfferId>> {
        let state = self.state.lock().await;
        Ok(state
            .offers
            .values()
            .filter(|o| o.active && o.side.is_purchase())
            .map(|o| o.id)
            .collect())
    }

    async fn list_trades(&self) -> StoreResult<Vec<Trade>> {
        let state = self.state.lock().await;
        Ok(state.trades.clone())
    }

    async fn trades_for_purchase_offer(&self, id: OfferId) -> StoreResult<Vec<Trade>> {
        let state = self.state.lock().await;
        Ok(state
            .trades
            .iter()
            .filter(|t| t.purchase_offer == id)
            .cloned()
            .collect())
    }

    async fn get_balance(&self, owner: UserId) -> StoreResult<Option<Balance>> {
        let state = self.state.lock().await;
        Ok(state.balances.get(&owner).cloned())
    }

    async fn get_inventory(&self, owner: UserId, item: ItemId) -> StoreResult<Option<Inventory>> {
        let state = self.state.lock().await;
        Ok(state.inventories.get(&(owner, item)).cloned())
    }

    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            staged,
            seeds: self.seeds.clone(),
        }))
    }
}

/// Transaction over the in-memory store
///
/// Holds the store mutex for its whole lifetime. Writes go to `staged`;
/// `commit` swaps the staged state in, anything else discards it.
struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    staged: State,
    seeds: LedgerSeeds,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get_offer(&mut self, id: OfferId) -> StoreResult<Offer> {
        self.staged
            .offers
            .get(&id)
            .cloned()
            .ok_or(StoreError::OfferNotFound(id))
    }

    async fn update_offer(&mut self, offer: &Offer) -> StoreResult<()> {
        if !self.staged.offers.contains_key(&offer.id) {
            return Err(StoreError::OfferNotFound(offer.id));
        }
        self.staged.offers.insert(offer.id, offer.clone());
        Ok(())
    }

    async fn get_user(&mut self, id: UserId) -> StoreResult<User> {
        self.staged
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::UserNotFound(id))
    }

    async fn best_sell_offer(&mut self, item: ItemId, max_price: i64) -> StoreResult<Option<Offer>> {
        // BTreeMap iterates in ascending id order, so min_by_key keeps
        // the earliest-submitted offer among equal prices.
        Ok(self
            .staged
            .offers
            .values()
            .filter(|o| {
                o.active && o.side.is_sell() && o.item == item && o.unit_price <= max_price
            })
            .min_by_key(|o| (o.unit_price, o.id))
            .cloned())
    }

    async fn insert_trade(&mut self, trade: Trade) -> StoreResult<()> {
        self.staged.trades.push(trade);
        Ok(())
    }

    async fn get_or_create_balance(&mut self, owner: UserId) -> StoreResult<Balance> {
        if !self.staged.users.contains_key(&owner) {
            return Err(StoreError::UserNotFound(owner));
        }
        let seeds = &self.seeds;
        Ok(self
            .staged
            .balances
            .entry(owner)
            .or_insert_with(|| seed_balance(seeds, owner))
            .clone())
    }

    async fn update_balance(&mut self, balance: &Balance) -> StoreResult<()> {
        self.staged.balances.insert(balance.owner, balance.clone());
        Ok(())
    }

    async fn get_or_create_inventory(
        &mut self,
        owner: UserId,
        item: ItemId,
    ) -> StoreResult<Inventory> {
        if !self.staged.users.contains_key(&owner) {
            return Err(StoreError::UserNotFound(owner));
        }
        if !self.staged.items.contains_key(&item) {
            return Err(StoreError::ItemNotFound(item));
        }
        let seeds = &self.seeds;
        Ok(self
            .staged
            .inventories
            .entry((owner, item))
            .or_insert_with(|| seed_inventory(seeds, owner, item))
            .clone())
    }

    async fn update_inventory(&mut self, inventory: &Inventory) -> StoreResult<()> {
        self.staged
            .inventories
            .insert((inventory.owner, inventory.item), inventory.clone());
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> StoreResult<()> {
        let staged = std::mem::take(&mut self.staged);
        *self.guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        // Dropping the guard releases the lock; staged writes vanish.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_create_user_seeds_balance() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();

        let balance = store.get_balance(user.id).await.unwrap().unwrap();
        assert_eq!(balance.quantity, 1000);
        assert_eq!(balance.currency.as_str(), "USD");
    }

    #[tokio::test]
    async fn test_custom_seeds() {
        let config = LedgerConfig {
            settlement_currency: "eur".to_string(),
            balance_seed: 50,
            inventory_seed: 7,
        };
        let store = InMemoryStore::with_ledger(&config);
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();

        let balance = store.get_balance(user.id).await.unwrap().unwrap();
        assert_eq!(balance.quantity, 50);
        assert_eq!(balance.currency.as_str(), "EUR");

        let mut tx = store.begin().await.unwrap();
        let inv = tx.get_or_create_inventory(user.id, item.id).await.unwrap();
        assert_eq!(inv.quantity, 7);
        tx.commit().await.unwrap();

        let inv = store.get_inventory(user.id, item.id).await.unwrap().unwrap();
        assert_eq!(inv.quantity, 7);
    }

    #[tokio::test]
    async fn test_offer_ids_are_monotonic() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();

        let o1 = store
            .submit_offer(user.id, item.id, Side::Sell, 10, 5)
            .await
            .unwrap();
        let o2 = store
            .submit_offer(user.id, item.id, Side::Sell, 10, 5)
            .await
            .unwrap();
        assert!(o1.id < o2.id);
    }

    #[tokio::test]
    async fn test_duplicate_item_code_rejected() {
        let store = InMemoryStore::new();
        store.create_item("AAPL", "Apple").await.unwrap();
        let err = store.create_item("AAPL", "Apple again").await.unwrap_err();
        assert_matches!(err, StoreError::DuplicateItemCode(_));
    }

    #[tokio::test]
    async fn test_best_sell_offer_price_then_id() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();

        store
            .submit_offer(user.id, item.id, Side::Sell, 10, 30)
            .await
            .unwrap();
        let cheap_first = store
            .submit_offer(user.id, item.id, Side::Sell, 10, 20)
            .await
            .unwrap();
        store
            .submit_offer(user.id, item.id, Side::Sell, 10, 20)
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let best = tx.best_sell_offer(item.id, 100).await.unwrap().unwrap();
        assert_eq!(best.id, cheap_first.id);

        // Too-expensive ceiling filters everything out
        let none = tx.best_sell_offer(item.id, 10).await.unwrap();
        assert!(none.is_none());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_tx_rollback_discards_writes() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let mut balance = tx.get_or_create_balance(user.id).await.unwrap();
        balance.quantity -= 400;
        tx.update_balance(&balance).await.unwrap();
        tx.rollback().await.unwrap();

        let balance = store.get_balance(user.id).await.unwrap().unwrap();
        assert_eq!(balance.quantity, 1000);
    }

    #[tokio::test]
    async fn test_tx_commit_publishes_writes() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let mut balance = tx.get_or_create_balance(user.id).await.unwrap();
        balance.quantity -= 400;
        tx.update_balance(&balance).await.unwrap();

        // Reads inside the transaction observe the staged write
        let reread = tx.get_or_create_balance(user.id).await.unwrap();
        assert_eq!(reread.quantity, 600);
        tx.commit().await.unwrap();

        let balance = store.get_balance(user.id).await.unwrap().unwrap();
        assert_eq!(balance.quantity, 600);
    }

    #[tokio::test]
    async fn test_cancel_offer() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();
        let offer = store
            .submit_offer(user.id, item.id, Side::Purchase, 10, 5)
            .await
            .unwrap();

        assert!(store.cancel_offer(offer.id).await.unwrap());
        assert!(!store.cancel_offer(offer.id).await.unwrap());
        assert!(store.active_purchase_offers().await.unwrap().is_empty());
    }
}
