//! Runtime counters and logging setup for the cat driver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// How often a tick summary is logged.
pub const LOG_EVERY_TICKS: u64 = 1000;

pub struct Metrics {
    tick_count: AtomicU64,
    active_cats: AtomicU64,
    total_cats: AtomicU64,
    counters: Mutex<HashMap<String, u64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            active_cats: AtomicU64::new(0),
            total_cats: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records one driver tick over every cat.
    pub fn record_tick(&self, duration: Duration, active: usize, total: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.active_cats.store(active as u64, Ordering::Relaxed);
        self.total_cats.store(total as u64, Ordering::Relaxed);

        if tick % LOG_EVERY_TICKS == 0 {
            tracing::info!(
                tick,
                active,
                total,
                duration_us = duration.as_micros() as u64,
                "Driver tick"
            );
        }
    }

    pub fn increment_counter(&self, name: &str) {
        self.add_to_counter(name, 1);
    }

    pub fn add_to_counter(&self, name: &str, amount: u64) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += amount;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn active_cats(&self) -> u64 {
        self.active_cats.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_cats(&self) -> u64 {
        self.total_cats.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_event(&self, event_type: &str, details: &str) {
        tracing::info!(event_type, details, "Cat event");
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
/// Calling it again is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
