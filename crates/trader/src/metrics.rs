//! Metrics for the Trader
//!
//! This module provides metrics collection for monitoring matching passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Simple atomic counter
#[derive(Debug)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple gauge for current values
#[derive(Debug)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

/// Histogram for tracking latencies (simple implementation)
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }

    pub fn record(&self, value_us: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_us, Ordering::Relaxed);

        let current_min = self.min.load(Ordering::Relaxed);
        if value_us < current_min {
            self.min.store(value_us, Ordering::Relaxed);
        }

        let current_max = self.max.load(Ordering::Relaxed);
        if value_us > current_max {
            self.max.store(value_us, Ordering::Relaxed);
        }
    }

    pub fn get_stats(&self) -> HistogramStats {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);

        HistogramStats {
            count,
            sum_us: sum,
            avg_us: if count > 0 { sum / count } else { 0 },
            min_us: self.min.load(Ordering::Relaxed),
            max_us: self.max.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
        self.sum.store(0, Ordering::Relaxed);
        self.min.store(u64::MAX, Ordering::Relaxed);
        self.max.store(0, Ordering::Relaxed);
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub sum_us: u64,
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
}

/// Metrics for the matching pass driver
#[derive(Debug)]
pub struct TraderMetrics {
    pub passes_run: Counter,
    pub offers_scanned: Counter,
    pub trades_executed: Counter,
    pub units_traded: Counter,
    pub liquidity_stops: Counter,
    pub pass_latency: Histogram,
    pub open_purchase_offers: Gauge,
}

impl TraderMetrics {
    pub fn new() -> Self {
        Self {
            passes_run: Counter::new(),
            offers_scanned: Counter::new(),
            trades_executed: Counter::new(),
            units_traded: Counter::new(),
            liquidity_stops: Counter::new(),
            pass_latency: Histogram::new(),
            open_purchase_offers: Gauge::new(),
        }
    }

    pub fn record_trade(&self, quantity: i64) {
        self.trades_executed.increment();
        self.units_traded.add(quantity.max(0) as u64);
    }

    pub fn record_liquidity_stop(&self) {
        self.liquidity_stops.increment();
    }

    pub fn record_pass(&self, offers_scanned: usize, duration: Duration) {
        self.passes_run.increment();
        self.offers_scanned.add(offers_scanned as u64);
        self.pass_latency.record(duration.as_micros() as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency_stats = self.pass_latency.get_stats();

        MetricsSnapshot {
            passes_run: self.passes_run.get(),
            offers_scanned: self.offers_scanned.get(),
            trades_executed: self.trades_executed.get(),
            units_traded: self.units_traded.get(),
            liquidity_stops: self.liquidity_stops.get(),
            pass_latency_avg_us: latency_stats.avg_us,
            pass_latency_min_us: latency_stats.min_us,
            pass_latency_max_us: latency_stats.max_us,
            open_purchase_offers: self.open_purchase_offers.get(),
        }
    }

    pub fn reset(&self) {
        self.passes_run.reset();
        self.offers_scanned.reset();
        self.trades_executed.reset();
        self.units_traded.reset();
        self.liquidity_stops.reset();
        self.pass_latency.reset();
    }
}

impl Default for TraderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub passes_run: u64,
    pub offers_scanned: u64,
    pub trades_executed: u64,
    pub units_traded: u64,
    pub liquidity_stops: u64,
    pub pass_latency_avg_us: u64,
    pub pass_latency_min_us: u64,
    pub pass_latency_max_us: u64,
    pub open_purchase_offers: u64,
}
