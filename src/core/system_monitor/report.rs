use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::collector::MetricsCollector;
use super::logs::{LogRecord, LogSource};
use super::metrics::SystemMetrics;
use super::services::{ServiceProbe, ServiceStatus};

/// One fully-formed measurement of system state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Local>,
    pub metrics: SystemMetrics,
    pub services: Vec<ServiceStatus>,
    pub kernel_logs: Vec<LogRecord>,
    pub system_logs: Vec<LogRecord>,
    pub middleware_logs: BTreeMap<String, Vec<String>>,
}

impl Report {
    /// A report with every field at its sentinel value
    pub fn empty(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            metrics: SystemMetrics::default(),
            services: Vec::new(),
            kernel_logs: Vec::new(),
            system_logs: Vec::new(),
            middleware_logs: BTreeMap::new(),
        }
    }
}

/// Composes a timestamped [`Report`] from the three collaborators.
///
/// Every sub-collection degrades on its own: a failing collaborator leaves a
/// sentinel value in its field and an error in the log, never a missing
/// report.
pub struct ReportBuilder {
    collector: Box<dyn MetricsCollector>,
    probe: Box<dyn ServiceProbe>,
    logs: Box<dyn LogSource>,
    services: Vec<String>,
}

impl ReportBuilder {
    pub fn new(
        collector: Box<dyn MetricsCollector>,
        probe: Box<dyn ServiceProbe>,
        logs: Box<dyn LogSource>,
        services: Vec<String>,
    ) -> Self {
        Self {
            collector,
            probe,
            logs,
            services,
        }
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Run the startup validation of the configured service names
    pub fn validate_services(&self) {
        let probe = &self.probe;
        let services = &self.services;
        guarded("service validation", || probe.validate(services), || ());
    }

    pub fn build(&mut self, log_limit: usize) -> Report {
        let timestamp = Local::now();

        let collector = &mut self.collector;
        let metrics = guarded(
            "metrics collector",
            || match collector.sample() {
                Ok(metrics) => metrics,
                Err(e) => {
                    log::error!("Failed to collect system metrics: {}", e);
                    SystemMetrics::default()
                }
            },
            SystemMetrics::default,
        );

        let probe = &self.probe;
        let services = self
            .services
            .iter()
            .map(|name| {
                guarded(
                    &format!("service probe for {}", name),
                    || probe.status(name),
                    || ServiceStatus::unknown(name),
                )
            })
            .collect();

        let logs = &self.logs;
        let kernel_logs = guarded("kernel log source", || logs.kernel(log_limit), Vec::new);
        let middleware_logs = guarded(
            "middleware log source",
            || logs.middleware(log_limit),
            BTreeMap::new,
        );
        let system_logs = guarded("system log source", || logs.system(log_limit), Vec::new);

        Report {
            timestamp,
            metrics,
            services,
            kernel_logs,
            system_logs,
            middleware_logs,
        }
    }
}

/// Run a collaborator call, substituting `fallback` if it panics
pub(crate) fn guarded<T>(what: &str, call: impl FnOnce() -> T, fallback: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => value,
        Err(payload) => {
            log::error!("{} failed: {}", what, panic_message(payload.as_ref()));
            fallback()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
