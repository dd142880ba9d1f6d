//! Periodic background refresh of the full sheet batch.
//!
//! The refresher is an explicit spawned task with a cancellation handle. A
//! cancellation stops the loop and also suppresses a refresh that was already
//! in flight, so stale data is never applied after teardown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info};

use crate::config::Config;
use crate::feed::FeedClient;
use crate::models::Table;
use crate::state::PortalState;
use crate::storage::CacheStore;

pub struct RefreshHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Cancel and wait for the loop to wind down.
    pub async fn stopped(self) {
        self.cancel();
        let _ = self.task.await;
    }
}

pub fn spawn(
    feed: Arc<FeedClient>,
    cache: Arc<dyn CacheStore>,
    state: Arc<PortalState>,
    config: Arc<Config>,
) -> RefreshHandle {
    let (cancel, mut cancelled) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.refresh_interval_seconds));
        // The first tick fires immediately; the initial load already happened
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancelled.changed() => break,
            }

            match feed.fetch_snapshot(&config).await {
                Ok(snapshot) => {
                    if *cancelled.borrow() {
                        break;
                    }

                    let previous = state.snapshot();
                    let changed = snapshot
                        .tables
                        .iter()
                        .filter(|(key, table)| {
                            previous.tables.get(*key).map(Table::content_hash)
                                != Some(table.content_hash())
                        })
                        .count();

                    state.replace(snapshot.clone());
                    if changed == 0 {
                        info!("Refresh completed, no sheet changed");
                    } else {
                        info!("Refresh completed, {} sheet(s) changed", changed);
                        if let Err(err) = cache.save(&snapshot).await {
                            error!("Failed to cache snapshot: {}", err);
                        }
                    }
                }
                Err(err) => error!("Refresh failed: {}", err),
            }
        }
    });

    RefreshHandle { cancel, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteCache;

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let config = Arc::new({
            let mut cfg = Config::defaults();
            // Point at a closed port so an accidental tick cannot hit the network
            cfg.feed_base_url = "http://127.0.0.1:1".to_string();
            cfg.refresh_interval_seconds = 3600;
            cfg
        });
        let client = reqwest::Client::new();
        let feed = Arc::new(FeedClient::new(client, &config.feed_base_url).unwrap());
        let cache: Arc<dyn CacheStore> = Arc::new(SqliteCache::in_memory(10).unwrap());
        let state = Arc::new(PortalState::default());

        let handle = spawn(feed, cache, state, config);
        // Must return promptly instead of waiting out the interval
        tokio::time::timeout(Duration::from_secs(5), handle.stopped())
            .await
            .expect("refresher did not stop after cancellation");
    }
}
