use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use super::runner::{CycleReport, CycleRunner, Delivery};

/// Monitoring scheduler - runs a cycle every period until shut down
///
/// Cycles never overlap: if a cycle outlasts the period, the next one starts
/// as soon as it finishes and the schedule shifts accordingly.
pub struct MonitoringScheduler {
    runner: CycleRunner,
    interval: Duration,
    run_immediately: bool,
}

impl MonitoringScheduler {
    pub fn new(runner: CycleRunner, interval: Duration) -> Self {
        Self { runner, interval, run_immediately: false }
    }

    /// Start the first cycle right away instead of one period after start
    pub fn with_run_immediately(mut self, enable: bool) -> Self {
        self.run_immediately = enable;
        self
    }

    /// Run cycles until `shutdown` resolves, returning the number of cycles run
    ///
    /// A cycle that is already in flight finishes before shutdown is observed.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let first = if self.run_immediately { Instant::now() } else { Instant::now() + self.interval };
        let mut timer = interval_at(first, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);
        let mut cycles = 0;

        info!("Monitoring {} targets every {:?}", self.runner.targets().len(), self.interval);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested after {} cycles", cycles);
                    break;
                }
                _ = timer.tick() => {
                    let report = self.runner.run_cycle().await;
                    cycles += 1;
                    self.log_report(&report);
                }
            }
        }

        cycles
    }

    fn log_report(&self, report: &CycleReport) {
        if report.elapsed > self.interval {
            warn!(
                "Cycle took {:?}, longer than the {:?} interval; next cycle is delayed",
                report.elapsed, self.interval
            );
        }

        match &report.delivery {
            Delivery::NotNeeded => info!("All {} targets healthy ({:?})", report.probed, report.elapsed),
            Delivery::Delivered => info!(
                "{} of {} targets unhealthy, notification sent ({:?})",
                report.failures.len(),
                report.probed,
                report.elapsed
            ),
            Delivery::Failed(_) => warn!(
                "{} of {} targets unhealthy, notification lost ({:?})",
                report.failures.len(),
                report.probed,
                report.elapsed
            ),
        }
    }
}
