/// Monitoring cycle module - runs periodic passes over all targets
///
/// This module is responsible for:
/// - Probing every registered target in order
/// - Collecting the failures of one pass
/// - Handing failures to the notifier once per pass
/// - Driving passes on a fixed period
pub mod failure;
pub mod runner;
pub mod scheduler;

pub use failure::{FailureRecord, FailureStatus};
pub use runner::{CycleReport, CycleRunner, Delivery};
pub use scheduler::MonitoringScheduler;
