//! Domain types for the Trader
//!
//! This module defines the core domain types used during offer matching
//! and settlement. These types are shared across all store implementations.

use chrono::{DateTime, Utc};
use common::{Currency, ItemId, OfferId, Side, TradeId, UserId};
use serde::{Deserialize, Serialize};

// ============================================================================
// User
// ============================================================================

/// A participant who can own offers, balances and inventories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Display name, used in trade descriptions
    pub username: String,
    /// When the user was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Item
// ============================================================================

/// A tradable item (the "stock" side of the ledger)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Item ID
    pub id: ItemId,
    /// Short unique code, e.g. "AAPL"
    pub code: String,
    /// Human-readable name
    pub name: String,
}

impl Item {
    pub fn new(id: ItemId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
        }
    }
}

// ============================================================================
// Offer
// ============================================================================

/// An offer to purchase or sell a quantity of an item at a unit price
///
/// Offers are never hard-deleted. Once the remaining quantity reaches
/// zero the offer is deactivated and kept for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Offer ID (monotonic; lower ID means submitted earlier)
    pub id: OfferId,
    /// User who owns this offer
    pub owner: UserId,
    /// Item being traded
    pub item: ItemId,
    /// Purchase or Sell
    pub side: Side,
    /// Quantity requested when the offer was submitted
    pub entry_quantity: i64,
    /// Quantity filled so far
    pub filled_quantity: i64,
    /// Price per unit
    pub unit_price: i64,
    /// Whether the offer is still eligible for matching
    pub active: bool,
    /// When the offer was submitted
    pub created_at: DateTime<Utc>,
}

impl Offer {
    /// Create a new, active, unfilled offer
    pub fn new(
        id: OfferId,
        owner: UserId,
        item: ItemId,
        side: Side,
        entry_quantity: i64,
        unit_price: i64,
    ) -> Self {
        Self {
            id,
            owner,
            item,
            side,
            entry_quantity,
            filled_quantity: 0,
            unit_price,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Quantity still available to trade
    pub fn remaining(&self) -> i64 {
        self.entry_quantity - self.filled_quantity
    }

    /// True when nothing is left to trade
    pub fn is_exhausted(&self) -> bool {
        self.remaining() <= 0
    }

    /// Record a fill against this offer
    pub fn apply_fill(&mut self, quantity: i64) {
        self.filled_quantity += quantity;
    }
}

// ============================================================================
// Trade
// ============================================================================

/// A settled execution between one sell offer and one purchase offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier
    pub id: TradeId,
    /// Item that changed hands
    pub item: ItemId,
    /// Offer that provided the stock
    pub sell_offer: OfferId,
    /// Offer that took the stock
    pub purchase_offer: OfferId,
    /// Users involved
    pub seller: UserId,
    pub buyer: UserId,
    /// Number of units traded
    pub quantity: i64,
    /// Execution price per unit (always the sell offer's price)
    pub unit_price: i64,
    /// Human-readable record of the trade
    pub description: String,
    /// When the trade settled
    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// Create a new trade record
    pub fn new(
        item: ItemId,
        sell: &Offer,
        purchase: &Offer,
        seller: &User,
        buyer: &User,
        quantity: i64,
        unit_price: i64,
    ) -> Self {
        Self {
            id: TradeId::new(),
            item,
            sell_offer: sell.id,
            purchase_offer: purchase.id,
            seller: seller.id,
            buyer: buyer.id,
            quantity,
            unit_price,
            description: format!("Trade between {} and {}", seller.username, buyer.username),
            created_at: Utc::now(),
        }
    }

    /// Total money moved by this trade
    pub fn notional(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

// ============================================================================
// Ledger rows
// ============================================================================

/// Money held by a user in a single currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// Owning user
    pub owner: UserId,
    /// Currency of this balance
    pub currency: Currency,
    /// Current amount (may go negative; settlement never rejects)
    pub quantity: i64,
}

/// Stock of a single item held by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Owning user
    pub owner: UserId,
    /// Item being held
    pub item: ItemId,
    /// Current amount (may go negative; settlement never rejects)
    pub quantity: i64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(entry: i64, filled: i64) -> Offer {
        let mut o = Offer::new(OfferId(1), UserId(1), ItemId(1), Side::Sell, entry, 10);
        o.filled_quantity = filled;
        o
    }

    #[test]
    fn test_offer_remaining() {
        assert_eq!(offer(10, 0).remaining(), 10);
        assert_eq!(offer(10, 4).remaining(), 6);
        assert_eq!(offer(10, 10).remaining(), 0);
    }

    #[test]
    fn test_offer_is_exhausted() {
        assert!(!offer(10, 9).is_exhausted());
        assert!(offer(10, 10).is_exhausted());
        // Overfilled offers count as exhausted
        assert!(offer(10, 12).is_exhausted());
    }

    #[test]
    fn test_offer_apply_fill() {
        let mut o = offer(10, 0);
        o.apply_fill(3);
        assert_eq!(o.filled_quantity, 3);
        assert_eq!(o.remaining(), 7);
        o.apply_fill(7);
        assert!(o.is_exhausted());
    }

    #[test]
    fn test_trade_description() {
        let seller = User::new(UserId(1), "alice");
        let buyer = User::new(UserId(2), "bob");
        let sell = Offer::new(OfferId(1), seller.id, ItemId(1), Side::Sell, 5, 20);
        let purchase = Offer::new(OfferId(2), buyer.id, ItemId(1), Side::Purchase, 5, 25);

        let trade = Trade::new(ItemId(1), &sell, &purchase, &seller, &buyer, 5, 20);
        assert_eq!(trade.description, "Trade between alice and bob");
        assert_eq!(trade.notional(), 100);
        assert_eq!(trade.unit_price, 20);
    }
}
