//! Background roster refresh and cache housekeeping
//!
//! Periodically re-fetches the legislator roster so ZIP lookups rarely pay
//! upstream latency, and purges expired cache entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::server::AppState;

/// Configuration for refresh intervals
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between roster refreshes
    pub roster_interval: Duration,
    /// Interval between cache purge sweeps
    pub purge_interval: Duration,
    /// How long past expiry an entry survives the sweep
    ///
    /// Expired entries inside this window are what the handlers serve when
    /// an upstream fetch fails, so the grace must comfortably exceed the
    /// roster refresh interval.
    pub purge_grace: Duration,
    /// Whether background refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            roster_interval: Duration::from_secs(21_600), // 6 hours
            purge_interval: Duration::from_secs(900),     // 15 minutes
            purge_grace: Duration::from_secs(86_400),     // 24 hours
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh tasks
pub struct RefreshHandle {
    /// Channel used to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the background refresh tasks over shared state
    ///
    /// The roster task runs an immediate warm-up fetch, then refreshes on
    /// the configured interval. A second task sweeps expired cache entries.
    pub fn spawn(state: Arc<AppState>, config: RefreshConfig) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let roster_state = state.clone();
            let roster_interval = config.roster_interval;
            let purge_interval = config.purge_interval;
            let purge_grace_secs = config.purge_grace.as_secs();

            tokio::spawn(async move {
                let mut roster_tick = tokio::time::interval(roster_interval);
                let mut purge_tick = tokio::time::interval(purge_interval);
                // Skip the purge tick's immediate first fire; the roster
                // tick's immediate fire doubles as the warm-up fetch.
                purge_tick.tick().await;

                loop {
                    tokio::select! {
                        _ = roster_tick.tick() => {
                            match roster_state.roster().await {
                                Some((roster, _)) => {
                                    info!("Roster refreshed: {} members", roster.len());
                                }
                                None => {
                                    warn!("Roster refresh failed; no cached roster available");
                                }
                            }
                        }
                        _ = purge_tick.tick() => {
                            let dropped = roster_state.cache.purge_expired(purge_grace_secs).await;
                            if dropped > 0 {
                                debug!("Purged {} expired cache entries", dropped);
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self { shutdown_tx }
    }

    /// Shuts down the background refresh tasks
    #[allow(dead_code)]
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
