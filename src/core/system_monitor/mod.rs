//! Report generation: metrics sampling, service probing and log retrieval.
//!
//! The collaborators are traits so hosts without systemd (and tests) can
//! plug in their own implementations.

mod collector;
pub mod command;
mod history;
pub mod logs;
mod metrics;
mod report;
mod services;

pub use collector::{MetricsCollector, SysinfoCollector};
pub use command::{CommandOutput, CommandRunner, DEFAULT_COMMAND_TIMEOUT};
pub use history::{MetricsHistory, HISTORY_CAPACITY};
pub use logs::{JournalLogSource, LogRecord, LogSource, UnsupportedLogSource};
pub use metrics::{percent_of, DiskMetrics, MemoryMetrics, NetworkMetrics, SystemMetrics};
pub(crate) use report::guarded;
pub use report::{Report, ReportBuilder};
pub use services::{ServiceProbe, ServiceState, ServiceStatus, SystemctlProbe, UnsupportedProbe};
