//! Trade executor
//!
//! Settles a single sell/purchase offer pair inside a transaction: fills
//! both offers by the tradable quantity, moves money and stock on both
//! owners' ledgers, and records a Trade. The caller owns the transaction;
//! every write here either commits together or not at all.

use tracing::info;

use common::{OfferId, Side};

use crate::domain::{Offer, Trade};
use crate::error::{Result, TraderError};
use crate::ledger::{adjust_balance_for_offer, adjust_inventory_for_offer};
use crate::lifecycle::deactivate_if_exhausted;
use crate::store::StoreTx;

/// Quantity the pair can actually trade: the smaller of the two
/// remaining quantities
pub fn tradable_quantity(sell: &Offer, purchase: &Offer) -> i64 {
    sell.remaining().min(purchase.remaining())
}

/// Execute one trade between a sell offer and a purchase offer
///
/// The execution price is always the sell offer's unit price. Ledger
/// movement keeps a fixed shape: both of the buyer's rows move by the
/// negative amounts and both of the seller's rows by the positive ones.
/// Downstream reporting depends on this shape; do not swap the inventory
/// legs without migrating stored ledgers.
pub async fn execute_trade(
    tx: &mut dyn StoreTx,
    sell_id: OfferId,
    purchase_id: OfferId,
) -> Result<Trade> {
    let mut sell = tx.get_offer(sell_id).await?;
    let mut purchase = tx.get_offer(purchase_id).await?;

    if !sell.side.is_sell() {
        return Err(TraderError::WrongSide {
            offer: sell_id,
            expected: Side::Sell,
        });
    }
    if !purchase.side.is_purchase() {
        return Err(TraderError::WrongSide {
            offer: purchase_id,
            expected: Side::Purchase,
        });
    }
    if sell.item != purchase.item {
        return Err(TraderError::ItemMismatch {
            sell: sell_id,
            sell_item: sell.item,
            purchase: purchase_id,
            purchase_item: purchase.item,
        });
    }
    if sell.remaining() < 0 || purchase.remaining() < 0 {
        return Err(TraderError::InvariantViolation(format!(
            "negative remaining quantity: sell {} has {}, purchase {} has {}",
            sell_id,
            sell.remaining(),
            purchase_id,
            purchase.remaining()
        )));
    }

    let quantity = tradable_quantity(&sell, &purchase);
    if quantity <= 0 {
        return Err(TraderError::NoLiquidity);
    }

    let unit_price = sell.unit_price;
    let money = quantity * unit_price;

    sell.apply_fill(quantity);
    purchase.apply_fill(quantity);
    tx.update_offer(&sell).await?;
    tx.update_offer(&purchase).await?;

    adjust_balance_for_offer(tx, &purchase, -money).await?;
    adjust_inventory_for_offer(tx, &purchase, -quantity).await?;
    adjust_balance_for_offer(tx, &sell, money).await?;
    adjust_inventory_for_offer(tx, &sell, quantity).await?;

    let seller = tx.get_user(sell.owner).await?;
    let buyer = tx.get_user(purchase.owner).await?;
    let trade = Trade::new(sell.item, &sell, &purchase, &seller, &buyer, quantity, unit_price);
    tx.insert_trade(trade.clone()).await?;

    info!(
        trade_id = %trade.id,
        item_id = %trade.item,
        sell_offer = %sell_id,
        purchase_offer = %purchase_id,
        quantity,
        unit_price,
        "Trade executed"
    );
    Ok(trade)
}

/// Execute a trade, then retire whichever offers it exhausted
pub async fn confirm_trade(
    tx: &mut dyn StoreTx,
    sell_id: OfferId,
    purchase_id: OfferId,
) -> Result<Trade> {
    let trade = execute_trade(tx, sell_id, purchase_id).await?;
    deactivate_if_exhausted(tx, sell_id).await?;
    deactivate_if_exhausted(tx, purchase_id).await?;
    Ok(trade)
}
