use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::ContentStore;

/// Background task that periodically purges expired entries from a store.
///
/// Reads already refuse expired content, so the reclaimer only bounds how
/// long expired payloads stay in memory when nobody asks for them again.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the task at its next wake-up, but nothing waits for it.
///
/// # Example
///
/// ```rust
/// use dropcode_core::{ContentStore, Reclaimer};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = ContentStore::new();
/// let reclaimer = Reclaimer::start(store.clone());
/// assert!(reclaimer.is_running());
///
/// reclaimer.shutdown().await;
/// # }
/// ```
pub struct Reclaimer {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Reclaimer {
    /// Starts sweeping `store` at its configured reclaim interval
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn start(store: ContentStore) -> Self {
        let interval = store.reclaim_interval();
        Self::start_with_interval(store, interval)
    }

    /// Starts sweeping `store` every `interval`
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero, or if called outside of a Tokio runtime
    /// context.
    pub fn start_with_interval(store: ContentStore, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(Self::run(store, interval, shutdown_rx));
        Self {
            shutdown_tx,
            handle,
        }
    }

    async fn run(store: ContentStore, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Consume the immediate first tick so sweeps start one interval from now
        ticker.tick().await;
        tracing::info!(interval = ?interval, "reclaimer started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.purge_expired();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = store.len(), "reclaimed expired entries");
                    }
                }
                changed = shutdown_rx.changed() => {
                    // Err means every sender is gone
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("reclaimer stopped");
    }

    /// Returns `true` until the task has exited
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Signals the task to stop and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "reclaimer task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::content::Content;
    use crate::error::StoreError;
    use crate::store::StoreStats;

    fn scenario_store() -> ContentStore {
        ContentStore::with_config(
            StoreConfig::default()
                .with_ttl(Duration::from_secs(5))
                .with_reclaim_interval(Duration::from_secs(1)),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_reclaimer_purges_unread_entries() {
        let store = scenario_store();
        let reclaimer = Reclaimer::start(store.clone());

        store.put(Content::text("forgotten")).await;
        assert_eq!(store.len(), 1);

        tokio::time::sleep(Duration::from_millis(6500)).await;

        assert_eq!(store.stats(), StoreStats::default());
        reclaimer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reclaimer_keeps_live_entries() {
        let store = scenario_store();
        let reclaimer = Reclaimer::start(store.clone());

        let receipt = store.put(Content::text("fresh")).await;
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(store.get(&receipt.code).unwrap().as_text(), Some("fresh"));
        assert_eq!(store.len(), 1);
        reclaimer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_scenario() {
        let store = scenario_store();
        let reclaimer = Reclaimer::start(store.clone());

        let first = store.put(Content::text("hello")).await;
        assert_eq!(store.get(&first.code).unwrap().as_text(), Some("hello"));

        let again = store.put(Content::text("hello")).await;
        assert_eq!(again.code, first.code);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(store.get(&first.code), Err(StoreError::NotFound));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.stats().fingerprints, 0);
        assert!(store.is_empty());

        reclaimer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_task() {
        let store = scenario_store();
        let reclaimer = Reclaimer::start(store.clone());
        assert!(reclaimer.is_running());

        reclaimer.shutdown().await;

        // With the reclaimer gone, expired entries wait for lazy eviction
        let receipt = store.put(Content::text("stale")).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&receipt.code), Err(StoreError::NotFound));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_stops_task() {
        let store = scenario_store();
        let reclaimer = Reclaimer::start(store.clone());
        drop(reclaimer);

        tokio::time::sleep(Duration::from_secs(2)).await;

        store.put(Content::text("stale")).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_reclaimers() {
        let fast = scenario_store();
        let slow = scenario_store();
        let fast_reclaimer = Reclaimer::start(fast.clone());
        let slow_reclaimer =
            Reclaimer::start_with_interval(slow.clone(), Duration::from_secs(3600));

        fast.put(Content::text("a")).await;
        slow.put(Content::text("a")).await;
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(fast.len(), 0);
        assert_eq!(slow.len(), 1);

        fast_reclaimer.shutdown().await;
        slow_reclaimer.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sweeps_alongside_concurrent_puts() {
        let store = ContentStore::with_config(
            StoreConfig::default()
                .with_ttl(Duration::from_millis(20))
                .with_reclaim_interval(Duration::from_millis(5)),
        )
        .unwrap();
        let reclaimer = Reclaimer::start(store.clone());

        let mut handles = vec![];
        for task_id in 0..4 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200 {
                    let receipt = store.put(Content::text(format!("{}:{}", task_id, i % 20))).await;
                    let _ = store.get(&receipt.code);
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task panicked");
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.stats(), StoreStats::default());
        reclaimer.shutdown().await;
    }
}
