//! Timer loop driving the cleanup cycle

use std::future::Future;
use std::time::Duration;

use hostreaper_client::HostApi;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::cycle::{CycleReport, run_cycle};
use crate::error::CoreError;

/// Runs the cleanup cycle against one API handle on a fixed period
#[derive(Debug)]
pub struct Reaper<A> {
    api: A,
    interval: Duration,
}

impl<A: HostApi> Reaper<A> {
    /// Create a reaper polling every `interval`
    pub fn new(api: A, interval: Duration) -> Self {
        Self { api, interval }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single cycle
    ///
    /// # Errors
    /// Returns an error if any stage fails to list its hosts.
    pub async fn run_once(&self) -> Result<CycleReport, CoreError> {
        run_cycle(&self.api).await
    }

    /// Run a cycle now and then once per interval until `shutdown` resolves
    ///
    /// A cycle that outlasts the interval delays the next tick instead of
    /// queueing extra runs. Returns the number of completed cycles.
    ///
    /// # Errors
    /// Returns the first fatal cycle error; no further cycles run.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<u64, CoreError>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut cycles = 0u64;
        loop {
            let next = async {
                ticker.tick().await;
                self.run_once().await
            };

            tokio::select! {
                () = &mut shutdown => {
                    info!(cycles, "shutdown requested, stopping");
                    return Ok(cycles);
                }
                report = next => {
                    report?;
                    cycles += 1;
                    debug!(cycles, next_in = ?self.interval, "waiting for next cycle");
                }
            }
        }
    }

    /// Run forever
    ///
    /// # Errors
    /// Returns the first fatal cycle error.
    pub async fn run(&self) -> Result<(), CoreError> {
        self.run_until(std::future::pending()).await.map(|_| ())
    }
}
