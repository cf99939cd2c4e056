use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use super::failure::FailureRecord;
use crate::notify::{Notification, Notifier};
use crate::probe::Prober;
use crate::target::Target;

/// What happened to the failures of a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Every target was healthy, nothing was sent
    NotNeeded,
    Delivered,
    /// The notifier reported an error; the batch was dropped
    Failed(String),
}

/// Summary of one monitoring cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Number of targets probed
    pub probed: usize,

    /// Failures in target registration order
    pub failures: Vec<FailureRecord>,

    pub delivery: Delivery,

    pub elapsed: Duration,
}

impl CycleReport {
    pub fn is_healthy(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Probes all targets once per cycle and reports failures in one batch
pub struct CycleRunner {
    targets: Vec<Target>,
    prober: Arc<dyn Prober>,
    notifier: Arc<dyn Notifier>,
}

impl CycleRunner {
    pub fn new(prober: Arc<dyn Prober>, notifier: Arc<dyn Notifier>) -> Self {
        Self { targets: Vec::new(), prober, notifier }
    }

    /// Register a target; targets are probed in the order they were added
    pub fn add_target(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.targets.push(Target::new(name, url));
    }

    pub fn extend_targets(&mut self, targets: impl IntoIterator<Item = Target>) {
        self.targets.extend(targets);
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Run one full pass over all targets
    ///
    /// The failure list is built fresh for every call, so nothing from a
    /// previous cycle can leak into this one. A failed delivery is logged and
    /// the batch is dropped.
    pub async fn run_cycle(&self) -> CycleReport {
        info!("Running a cycle over {} targets", self.targets.len());
        let start = Instant::now();

        let mut failures = Vec::new();
        for target in &self.targets {
            let result = self.prober.probe(target).await;
            if let Some(failure) = FailureRecord::from_probe(target, result) {
                failures.push(failure);
            }
        }

        let delivery = if failures.is_empty() {
            Delivery::NotNeeded
        } else {
            self.dispatch(&failures).await
        };

        CycleReport { probed: self.targets.len(), failures, delivery, elapsed: start.elapsed() }
    }

    async fn dispatch(&self, failures: &[FailureRecord]) -> Delivery {
        info!("{} of {} targets unhealthy, sending notification", failures.len(), self.targets.len());

        let notification = Notification::new(failures.to_vec());
        match self.notifier.notify(&notification).await {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                error!("Failed to deliver notification, dropping {} failures: {}", failures.len(), e);
                Delivery::Failed(e.to_string())
            }
        }
    }
}
