//! Scheduled idle-session eviction.

use chrono::Utc;
use simchat_core::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically calls [`SessionStore::sweep`].
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// Spawn the sweep loop. The first sweep runs one full interval after
    /// this call.
    pub fn start(self) -> SweeperHandle {
        let (shutdown, mut stopped) = oneshot::channel::<()>();
        let Self { store, interval } = self;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let evicted = store.sweep(Utc::now()).await;
                        if evicted > 0 {
                            let remaining = store.len().await;
                            info!(evicted, remaining, "Swept idle sessions");
                        } else {
                            debug!("Session sweep found nothing idle");
                        }
                    }
                }
            }
            debug!("Session sweeper stopped");
        });

        SweeperHandle { shutdown, task }
    }
}

/// Owner of a running sweeper. Dropping it also ends the loop.
pub struct SweeperHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop to exit and wait for it.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}
