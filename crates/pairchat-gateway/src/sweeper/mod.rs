//! Periodic stale-state sweeper
//!
//! Drops connections whose socket task died without cleaning up, then purges
//! queue entries and sessions that still refer to dead connections.

use crate::connection::ConnectionManager;
use crate::lobby::Lobby;
use pairchat_core::SweepReport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};

/// Background task that reconciles the lobby with the live connection set
pub struct Sweeper {
    lobby: Arc<Lobby>,
    connections: Arc<ConnectionManager>,
    interval: Duration,
    /// Whether the sweep loop is running
    running: AtomicBool,
    shutdown: Notify,
}

impl Sweeper {
    /// Create a sweeper; call [`Sweeper::start`] to begin sweeping
    pub fn new(lobby: Arc<Lobby>, connections: Arc<ConnectionManager>, interval: Duration) -> Self {
        Self {
            lobby,
            connections,
            interval,
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
        }
    }

    /// Start the sweep loop
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Sweeper is already running");
            return;
        }

        let sweeper = self.clone();
        tokio::spawn(async move {
            sweeper.run().await;
        });

        tracing::info!(interval_secs = self.interval.as_secs(), "Sweeper started");
    }

    /// Stop the sweep loop
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.shutdown.notify_one();
            tracing::info!("Sweeper stopped");
        }
    }

    /// Check if the sweep loop is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        while self.is_running() {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                () = self.shutdown.notified() => break,
            }
        }

        tracing::debug!("Sweeper loop ended");
    }

    /// Run a single sweep pass
    pub fn sweep_once(&self) -> SweepReport {
        let evicted = self.connections.cleanup_closed_connections();
        let report = self.lobby.sweep();

        if report.is_clean() && evicted == 0 {
            tracing::trace!("Sweep found nothing stale");
        } else {
            tracing::info!(
                evicted_connections = evicted,
                stale_waiting = report.stale_waiting,
                stale_sessions = report.stale_sessions,
                "Sweep removed stale state"
            );
        }

        report
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}
