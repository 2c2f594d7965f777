//! Capability-checked collaborator selection.
//!
//! Decided once at startup: hosts with systemd tooling get the real probe
//! and journal reader, everything else gets the Unsupported variants.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::system_monitor::{
    CommandRunner, JournalLogSource, LogSource, ReportBuilder, ServiceProbe, SysinfoCollector,
    SystemctlProbe, UnsupportedLogSource, UnsupportedProbe,
};
use crate::core::Config;
use crate::error::Result;

/// What the host can do, probed once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub systemctl: bool,
    pub journalctl: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        if !cfg!(target_os = "linux") {
            return Self::none();
        }
        Self {
            systemctl: which::which("systemctl").is_ok(),
            journalctl: which::which("journalctl").is_ok(),
        }
    }

    pub fn none() -> Self {
        Self {
            systemctl: false,
            journalctl: false,
        }
    }
}

pub fn service_probe(caps: Capabilities, runner: &Arc<CommandRunner>) -> Box<dyn ServiceProbe> {
    if caps.systemctl {
        Box::new(SystemctlProbe::new(Arc::clone(runner)))
    } else {
        log::warn!("systemctl not available, service status will show as Unsupported");
        Box::new(UnsupportedProbe)
    }
}

pub fn log_source(
    caps: Capabilities,
    runner: &Arc<CommandRunner>,
    middleware_files: Vec<PathBuf>,
) -> Box<dyn LogSource> {
    if caps.journalctl {
        Box::new(JournalLogSource::new(Arc::clone(runner), middleware_files))
    } else {
        log::warn!("journalctl not available, kernel and system logs are disabled");
        Box::new(UnsupportedLogSource::new(middleware_files))
    }
}

/// Wire a [`ReportBuilder`] with the collaborators this host supports
pub fn report_builder(config: &Config) -> Result<ReportBuilder> {
    let runner = Arc::new(CommandRunner::new(config.command_timeout())?);
    let caps = Capabilities::detect();
    log::info!(
        "Capabilities: systemctl={} journalctl={}",
        caps.systemctl,
        caps.journalctl
    );

    Ok(ReportBuilder::new(
        Box::new(SysinfoCollector::new()),
        service_probe(caps, &runner),
        log_source(caps, &runner, config.middleware_logs.clone()),
        config.services.clone(),
    ))
}
