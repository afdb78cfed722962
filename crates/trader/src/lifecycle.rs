//! Offer lifecycle
//!
//! Offers are soft-deleted: once nothing is left to trade they are
//! deactivated and kept for audit and reporting.

use tracing::debug;

use common::OfferId;

use crate::error::Result;
use crate::store::StoreTx;

/// Deactivate an offer if its remaining quantity has reached zero
///
/// Returns true when the offer is exhausted (whether or not this call
/// performed the deactivation), false when it still has quantity left.
/// Safe to call repeatedly.
pub async fn deactivate_if_exhausted(tx: &mut dyn StoreTx, id: OfferId) -> Result<bool> {
    let mut offer = tx.get_offer(id).await?;
    if !offer.is_exhausted() {
        return Ok(false);
    }

    if offer.active {
        offer.active = false;
        tx.update_offer(&offer).await?;
        debug!(offer_id = %id, side = %offer.side, "Offer exhausted, deactivated");
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, TradingStore};
    use common::Side;

    #[tokio::test]
    async fn test_unfilled_offer_stays_active() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();
        let offer = store
            .submit_offer(user.id, item.id, Side::Sell, 10, 5)
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        assert!(!deactivate_if_exhausted(tx.as_mut(), offer.id).await.unwrap());
        tx.commit().await.unwrap();

        let offer = store.get_offer(offer.id).await.unwrap().unwrap();
        assert!(offer.active);
    }

    #[tokio::test]
    async fn test_exhausted_offer_deactivated_idempotently() {
        let store = InMemoryStore::new();
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();
        let offer = store
            .submit_offer(user.id, item.id, Side::Sell, 10, 5)
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let mut staged = tx.get_offer(offer.id).await.unwrap();
        staged.apply_fill(10);
        tx.update_offer(&staged).await.unwrap();

        assert!(deactivate_if_exhausted(tx.as_mut(), offer.id).await.unwrap());
        // Second call is a no-op but still reports exhaustion
        assert!(deactivate_if_exhausted(tx.as_mut(), offer.id).await.unwrap());
        tx.commit().await.unwrap();

        let offer = store.get_offer(offer.id).await.unwrap().unwrap();
        assert!(!offer.active);
        assert_eq!(offer.filled_quantity, 10);
    }
}
