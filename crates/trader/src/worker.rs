//! Background worker running periodic matching passes.
//!
//! The `MatcherWorker` drives the `Trader` on a fixed interval until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use config::MatcherConfig;

use crate::trader::Trader;

/// Background worker that runs matching passes on an interval.
pub struct MatcherWorker {
    trader: Arc<Trader>,
    config: MatcherConfig,
}

impl MatcherWorker {
    /// Create a new MatcherWorker.
    pub fn new(trader: Arc<Trader>, config: MatcherConfig) -> Self {
        Self { trader, config }
    }

    /// Run the worker. This blocks and runs forever (or until shutdown signal).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            info!("Matcher worker disabled, not starting");
            return;
        }

        info!(
            interval_seconds = self.config.interval_seconds,
            run_on_startup = self.config.run_on_startup,
            "Starting matcher worker"
        );

        if self.config.run_on_startup {
            info!("Running initial matching pass...");
            if let Err(e) = self.trader.run_matching_pass().await {
                error!("Initial matching pass failed: {}", e);
            }
        }

        let interval = Duration::from_secs(self.config.interval_seconds);
        let mut timer = tokio::time::interval(interval);
        timer.tick().await; // First tick fires immediately

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if let Err(e) = self.trader.run_matching_pass().await {
                        error!("Matching pass failed: {}", e);
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Matcher worker shutting down.");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, TradingStore};
    use common::Side;

    #[tokio::test]
    async fn test_disabled_worker_returns_immediately() {
        let trader = Arc::new(Trader::new(Arc::new(InMemoryStore::new())));
        let config = MatcherConfig {
            enabled: false,
            ..MatcherConfig::default()
        };
        let worker = MatcherWorker::new(trader, config);
        let (_tx, rx) = watch::channel(false);

        // Would hang forever if the disabled check didn't short-circuit
        worker.run(rx).await;
    }

    #[tokio::test]
    async fn test_startup_pass_settles_waiting_offers() {
        let store = Arc::new(InMemoryStore::new());
        let seller = store.create_user("seller").await.unwrap();
        let buyer = store.create_user("buyer").await.unwrap();
        let item = store.create_item("AAPL", "Apple").await.unwrap();
        store
            .submit_offer(seller.id, item.id, Side::Sell, 5, 10)
            .await
            .unwrap();
        store
            .submit_offer(buyer.id, item.id, Side::Purchase, 5, 10)
            .await
            .unwrap();

        let trader = Arc::new(Trader::new(
            Arc::clone(&store) as Arc<dyn TradingStore>
        ));
        let config = MatcherConfig {
            enabled: true,
            interval_seconds: 3600,
            run_on_startup: true,
        };
        let worker = MatcherWorker::new(Arc::clone(&trader), config);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

        // Give the startup pass a moment, then stop the worker
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(store.list_trades().await.unwrap().len(), 1);
    }
}
