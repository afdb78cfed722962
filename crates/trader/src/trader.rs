//! Matching pass driver
//!
//! The `Trader` walks active purchase offers in submission order and
//! fills each against the best eligible sell offers until the purchase
//! offer is exhausted or liquidity runs out. Every trade settles in its
//! own transaction, so a pass interrupted mid-way leaves only whole
//! trades behind.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

use common::OfferId;

use crate::error::{Result, TraderError};
use crate::executor::confirm_trade;
use crate::metrics::{MetricsSnapshot, TraderMetrics};
use crate::store::{StoreError, TradingStore};

/// Outcome of a single matching pass
#[derive(Debug, Clone, Copy, Default)]
pub struct PassSummary {
    /// Active purchase offers considered
    pub offers_scanned: usize,
    /// Trades settled during the pass
    pub trades_executed: usize,
}

/// Batch matcher over a trading store
pub struct Trader {
    store: Arc<dyn TradingStore>,
    metrics: Arc<TraderMetrics>,
}

impl Trader {
    /// Create a new trader over the given store
    pub fn new(store: Arc<dyn TradingStore>) -> Self {
        Self {
            store,
            metrics: Arc::new(TraderMetrics::new()),
        }
    }

    /// Current metrics snapshot
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Fill one purchase offer as far as current liquidity allows
    ///
    /// Loops picking the best eligible sell offer (active, same item,
    /// priced at or below the purchase price, cheapest first, earliest
    /// on ties) and settling a trade against it, each in its own
    /// transaction. Stops when the purchase offer is exhausted, goes
    /// inactive, or no eligible sell offer remains.
    ///
    /// Returns the number of trades settled.
    pub async fn fill_purchase_offer(&self, id: OfferId) -> Result<usize> {
        let mut executed = 0;

        loop {
            let mut tx = self.store.begin().await?;

            // Reload live state each iteration; earlier trades in this
            // loop may have filled or retired the offer.
            let purchase = match tx.get_offer(id).await {
                Ok(offer) => offer,
                Err(StoreError::OfferNotFound(_)) => {
                    tx.rollback().await?;
                    break;
                }
                Err(e) => {
                    tx.rollback().await?;
                    return Err(e.into());
                }
            };

            if !purchase.side.is_purchase() {
                tx.rollback().await?;
                return Err(TraderError::WrongSide {
                    offer: id,
                    expected: common::Side::Purchase,
                });
            }
            if !purchase.active || purchase.is_exhausted() {
                tx.rollback().await?;
                break;
            }

            let best = tx.best_sell_offer(purchase.item, purchase.unit_price).await?;
            let Some(sell) = best else {
                tx.rollback().await?;
                self.metrics.record_liquidity_stop();
                debug!(
                    purchase_offer = %id,
                    remaining = purchase.remaining(),
                    "No eligible sell offer, leaving purchase offer open"
                );
                break;
            };

            match confirm_trade(tx.as_mut(), sell.id, id).await {
                Ok(trade) => {
                    tx.commit().await?;
                    executed += 1;
                    self.metrics.record_trade(trade.quantity);
                }
                Err(TraderError::NoLiquidity) => {
                    tx.rollback().await?;
                    self.metrics.record_liquidity_stop();
                    break;
                }
                Err(e) => {
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }

        Ok(executed)
    }

    /// Run one matching pass over all active purchase offers
    ///
    /// Offers are visited in ascending id order (submission order), so
    /// earlier purchase offers get first claim on cheap sell liquidity.
    #[instrument(skip(self))]
    pub async fn run_matching_pass(&self) -> Result<PassSummary> {
        let started = Instant::now();
        let ids = self.store.active_purchase_offers().await?;
        self.metrics.open_purchase_offers.set(ids.len() as u64);

        let mut summary = PassSummary {
            offers_scanned: ids.len(),
            trades_executed: 0,
        };

        for id in ids {
            summary.trades_executed += self.fill_purchase_offer(id).await?;
        }

        self.metrics
            .record_pass(summary.offers_scanned, started.elapsed());
        info!(
            offers_scanned = summary.offers_scanned,
            trades_executed = summary.trades_executed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Matching pass complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use common::Side;

    #[tokio::test]
    async fn test_empty_store_pass_is_a_noop() {
        let trader = Trader::new(Arc::new(InMemoryStore::new()));
        let summary = trader.run_matching_pass().await.unwrap();
        assert_eq!(summary.offers_scanned, 0);
        assert_eq!(summary.trades_executed, 0);
    }

    #[tokio::test]
    async fn test_fill_skips_missing_offer() {
        let trader = Trader::new(Arc::new(InMemoryStore::new()));
        let executed = trader.fill_purchase_offer(OfferId(42)).await.unwrap();
        assert_eq!(executed, 0);
    }

    #[tokio::test]
    async fn test_fill_rejects_sell_offer() {
        let store = Arc::new(InMemoryStore::new());
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();
        let sell = store
            .submit_offer(user.id, item.id, Side::Sell, 10, 5)
            .await
            .unwrap();

        let trader = Trader::new(store);
        let err = trader.fill_purchase_offer(sell.id).await.unwrap_err();
        assert!(matches!(err, TraderError::WrongSide { .. }));
    }

    #[tokio::test]
    async fn test_metrics_track_liquidity_stops() {
        let store = Arc::new(InMemoryStore::new());
        let user = store.create_user("alice").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();
        store
            .submit_offer(user.id, item.id, Side::Purchase, 10, 5)
            .await
            .unwrap();

        let trader = Trader::new(Arc::clone(&store) as Arc<dyn TradingStore>);
        let summary = trader.run_matching_pass().await.unwrap();
        assert_eq!(summary.offers_scanned, 1);
        assert_eq!(summary.trades_executed, 0);

        let snap = trader.metrics();
        assert_eq!(snap.passes_run, 1);
        assert_eq!(snap.liquidity_stops, 1);
        assert_eq!(snap.open_purchase_offers, 1);
    }
}
