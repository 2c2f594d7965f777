use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::command::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    Running,
    NotRunning,
    Unsupported,
    Unknown,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceState::Running => "Running",
            ServiceState::NotRunning => "Not Running",
            ServiceState::Unsupported => "Unsupported",
            ServiceState::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Status of one monitored service, produced fresh every refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: ServiceState,
    pub enabled: String,
    pub active_state: String,
    pub sub_state: String,
}

impl ServiceStatus {
    pub fn unknown(name: &str) -> Self {
        Self::filled(name, ServiceState::Unknown)
    }

    pub fn unsupported(name: &str) -> Self {
        Self::filled(name, ServiceState::Unsupported)
    }

    fn filled(name: &str, status: ServiceState) -> Self {
        let text = status.to_string();
        Self {
            name: name.to_string(),
            status,
            enabled: text.clone(),
            active_state: text.clone(),
            sub_state: text,
        }
    }

    pub fn is_problem(&self) -> bool {
        self.status != ServiceState::Running
    }
}

/// Reports the status of configured service names
pub trait ServiceProbe: Send {
    /// Never fails: timeouts and errors degrade to [`ServiceStatus::unknown`].
    fn status(&self, name: &str) -> ServiceStatus;

    /// Startup sanity check of the configured names
    fn validate(&self, _names: &[String]) {}
}

/// Probe for hosts without service management
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProbe;

impl ServiceProbe for UnsupportedProbe {
    fn status(&self, name: &str) -> ServiceStatus {
        ServiceStatus::unsupported(name)
    }

    fn validate(&self, _names: &[String]) {
        log::warn!("Service monitoring is only supported on systemd hosts");
    }
}

const SHOW_PROPERTIES: &str = "--property=LoadState,ActiveState,SubState,UnitFileState";

/// Queries systemd through `systemctl show`
pub struct SystemctlProbe {
    runner: Arc<CommandRunner>,
    program: String,
}

impl SystemctlProbe {
    pub fn new(runner: Arc<CommandRunner>) -> Self {
        Self::with_program(runner, "systemctl")
    }

    /// Probe through a `systemctl`-compatible executable at `program`
    pub fn with_program(runner: Arc<CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    fn show(&self, name: &str) -> crate::error::Result<UnitProperties> {
        let output = self
            .runner
            .run(&self.program, &["show", SHOW_PROPERTIES, "--", name])?;
        Ok(UnitProperties::parse(&output.stdout))
    }
}

impl ServiceProbe for SystemctlProbe {
    fn status(&self, name: &str) -> ServiceStatus {
        match self.show(name) {
            Ok(props) => props.into_status(name),
            Err(e) => {
                log::error!("Error retrieving status for service {}: {}", name, e);
                ServiceStatus::unknown(name)
            }
        }
    }

    fn validate(&self, names: &[String]) {
        for name in names {
            match self.show(name) {
                Ok(props) if props.load_state == "not-found" => {
                    log::warn!("Service {} is not installed on this host", name);
                }
                Ok(_) => {}
                Err(e) => log::error!("Error validating service {}: {}", name, e),
            }
        }
    }
}

/// Parsed `key=value` output of `systemctl show`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct UnitProperties {
    load_state: String,
    active_state: String,
    sub_state: String,
    unit_file_state: String,
}

impl UnitProperties {
    fn parse(stdout: &str) -> Self {
        let mut props = Self::default();
        for line in stdout.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "LoadState" => props.load_state = value,
                "ActiveState" => props.active_state = value,
                "SubState" => props.sub_state = value,
                "UnitFileState" => props.unit_file_state = value,
                _ => {}
            }
        }
        props
    }

    fn into_status(self, name: &str) -> ServiceStatus {
        if self.active_state.is_empty() {
            return ServiceStatus::unknown(name);
        }

        let status = if self.active_state == "active" {
            ServiceState::Running
        } else {
            ServiceState::NotRunning
        };

        ServiceStatus {
            name: name.to_string(),
            status,
            enabled: capitalize_or_na(&self.unit_file_state),
            active_state: capitalize_or_na(&self.active_state),
            sub_state: capitalize_or_na(&self.sub_state),
        }
    }
}

fn capitalize_or_na(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_running_unit() {
        let props = UnitProperties::parse(
            "LoadState=loaded\nActiveState=active\nSubState=running\nUnitFileState=enabled\n",
        );
        let status = props.into_status("ssh.service");
        assert_eq!(status.status, ServiceState::Running);
        assert_eq!(status.enabled, "Enabled");
        assert_eq!(status.active_state, "Active");
        assert_eq!(status.sub_state, "Running");
        assert!(!status.is_problem());
    }

    #[test]
    fn test_parse_missing_unit() {
        let props = UnitProperties::parse(
            "LoadState=not-found\nActiveState=inactive\nSubState=dead\nUnitFileState=\n",
        );
        assert_eq!(props.load_state, "not-found");
        let status = props.into_status("nope.service");
        assert_eq!(status.status, ServiceState::NotRunning);
        assert_eq!(status.enabled, "N/A");
        assert!(status.is_problem());
    }

    #[test]
    fn test_empty_output_is_unknown() {
        let status = UnitProperties::parse("").into_status("cron.service");
        assert_eq!(status, ServiceStatus::unknown("cron.service"));
    }

    #[test]
    fn test_unsupported_fills_every_field() {
        let status = UnsupportedProbe.status("ssh.service");
        assert_eq!(status.status, ServiceState::Unsupported);
        assert_eq!(status.enabled, "Unsupported");
        assert_eq!(status.active_state, "Unsupported");
        assert_eq!(status.sub_state, "Unsupported");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ServiceState::NotRunning.to_string(), "Not Running");
    }
}
