//! Ledger accessors
//!
//! Signed-delta mutations of a user's money and stock, keyed by the offer
//! whose fill caused the movement. Rows are created on first touch at the
//! configured seed amount, so a user's first movement lands on the seed,
//! not on zero. Deltas are applied unconditionally; the ledger never
//! rejects a movement for insufficient funds.

use tracing::debug;

use crate::domain::Offer;
use crate::error::Result;
use crate::store::StoreTx;

/// Apply a signed money delta to the offer owner's balance
pub async fn adjust_balance_for_offer(
    tx: &mut dyn StoreTx,
    offer: &Offer,
    delta: i64,
) -> Result<()> {
    let mut balance = tx.get_or_create_balance(offer.owner).await?;
    balance.quantity += delta;
    tx.update_balance(&balance).await?;

    debug!(
        user_id = %offer.owner,
        offer_id = %offer.id,
        delta,
        quantity = balance.quantity,
        "Balance adjusted"
    );
    Ok(())
}

/// Apply a signed stock delta to the offer owner's inventory of the
/// offer's item
pub async fn adjust_inventory_for_offer(
    tx: &mut dyn StoreTx,
    offer: &Offer,
    delta: i64,
) -> Result<()> {
    let mut inventory = tx.get_or_create_inventory(offer.owner, offer.item).await?;
    inventory.quantity += delta;
    tx.update_inventory(&inventory).await?;

    debug!(
        user_id = %offer.owner,
        item_id = %offer.item,
        offer_id = %offer.id,
        delta,
        quantity = inventory.quantity,
        "Inventory adjusted"
    );
    Ok(())
}
