use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use tempfile::TempDir;

use sysdash::core::system_monitor::{
    CommandRunner, JournalLogSource, LogRecord, LogSource, MetricsCollector, ReportBuilder,
    ServiceProbe, ServiceState, ServiceStatus, SystemMetrics, SystemctlProbe,
    UnsupportedLogSource, UnsupportedProbe,
};
use sysdash::DashError;

struct BrokenCollector;

impl MetricsCollector for BrokenCollector {
    fn sample(&mut self) -> sysdash::Result<SystemMetrics> {
        Err(DashError::metric_collection("no /proc"))
    }
}

struct PanickingCollector;

impl MetricsCollector for PanickingCollector {
    fn sample(&mut self) -> sysdash::Result<SystemMetrics> {
        panic!("collector crashed")
    }
}

struct EchoProbe;

impl ServiceProbe for EchoProbe {
    fn status(&self, name: &str) -> ServiceStatus {
        ServiceStatus {
            name: name.to_string(),
            status: ServiceState::Running,
            enabled: "Enabled".to_string(),
            active_state: "Active".to_string(),
            sub_state: "Running".to_string(),
        }
    }
}

struct PanickingLogs;

impl LogSource for PanickingLogs {
    fn kernel(&self, _limit: usize) -> Vec<LogRecord> {
        panic!("kernel ring unreadable")
    }

    fn system(&self, _limit: usize) -> Vec<LogRecord> {
        vec![LogRecord {
            timestamp: Local::now(),
            message: "disk full".to_string(),
        }]
    }

    fn middleware(&self, _limit: usize) -> BTreeMap<String, Vec<String>> {
        panic!("middleware unreadable")
    }
}

struct PanickingProbe;

impl ServiceProbe for PanickingProbe {
    fn status(&self, name: &str) -> ServiceStatus {
        panic!("cannot reach service manager for {}", name)
    }
}

struct DeadLogs;

impl LogSource for DeadLogs {
    fn kernel(&self, _limit: usize) -> Vec<LogRecord> {
        panic!("kernel ring unreadable")
    }

    fn system(&self, _limit: usize) -> Vec<LogRecord> {
        panic!("journal unreadable")
    }

    fn middleware(&self, _limit: usize) -> BTreeMap<String, Vec<String>> {
        panic!("middleware unreadable")
    }
}

fn services() -> Vec<String> {
    vec!["b.service".to_string(), "a.service".to_string()]
}

#[test]
fn test_failed_metrics_degrade_to_sentinels() {
    let mut builder = ReportBuilder::new(
        Box::new(BrokenCollector),
        Box::new(EchoProbe),
        Box::new(UnsupportedLogSource::default()),
        services(),
    );
    let report = builder.build(10);

    assert_eq!(report.metrics, SystemMetrics::default());
    let names: Vec<&str> = report.services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["b.service", "a.service"]);
}

#[test]
fn test_panics_are_contained_per_collaborator() {
    let mut builder = ReportBuilder::new(
        Box::new(PanickingCollector),
        Box::new(EchoProbe),
        Box::new(PanickingLogs),
        services(),
    );
    let report = builder.build(10);

    assert_eq!(report.metrics, SystemMetrics::default());
    assert!(report.kernel_logs.is_empty());
    assert!(report.middleware_logs.is_empty());
    assert_eq!(report.system_logs.len(), 1);
    assert!(report.services.iter().all(|s| !s.is_problem()));
}

#[test]
fn test_unsupported_host() {
    let mut builder = ReportBuilder::new(
        Box::new(BrokenCollector),
        Box::new(UnsupportedProbe),
        Box::new(UnsupportedLogSource::default()),
        services(),
    );
    let report = builder.build(10);

    assert!(report
        .services
        .iter()
        .all(|s| s.status == ServiceState::Unsupported));
    assert!(report.kernel_logs.is_empty());
    assert!(report.system_logs.is_empty());
}

#[test]
fn test_middleware_files_are_filtered_for_errors() {
    let temp_dir = TempDir::new().unwrap();
    let app_log = temp_dir.path().join("app.log");
    fs::write(
        &app_log,
        "INFO started\nERROR cannot bind port\nWARN slow query\nfatal Error: lost connection\n",
    )
    .unwrap();
    let missing = temp_dir.path().join("missing.log");

    let mut builder = ReportBuilder::new(
        Box::new(BrokenCollector),
        Box::new(UnsupportedProbe),
        Box::new(UnsupportedLogSource::new(vec![app_log.clone(), missing])),
        Vec::new(),
    );
    let report = builder.build(10);

    assert_eq!(report.middleware_logs.len(), 1);
    assert_eq!(
        report.middleware_logs[&app_log.display().to_string()],
        vec![
            "ERROR cannot bind port".to_string(),
            "fatal Error: lost connection".to_string()
        ]
    );
}

#[test]
fn test_report_produced_when_every_collaborator_fails() {
    let mut builder = ReportBuilder::new(
        Box::new(BrokenCollector),
        Box::new(PanickingProbe),
        Box::new(DeadLogs),
        services(),
    );
    let report = builder.build(10);

    assert_eq!(report.metrics, SystemMetrics::default());
    assert_eq!(
        report.services,
        vec![
            ServiceStatus::unknown("b.service"),
            ServiceStatus::unknown("a.service")
        ]
    );
    assert!(report.kernel_logs.is_empty());
    assert!(report.system_logs.is_empty());
    assert!(report.middleware_logs.is_empty());
}

/// Executable that never answers within the command timeout
#[cfg(unix)]
fn hanging_program(dir: &TempDir) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("hang.sh");
    fs::write(&path, "#!/bin/sh\nexec sleep 5\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

#[cfg(unix)]
#[test]
fn test_timed_out_commands_degrade_to_sentinels() {
    let temp_dir = TempDir::new().unwrap();
    let program = hanging_program(&temp_dir);
    let runner = Arc::new(CommandRunner::new(Duration::from_millis(100)).unwrap());

    let mut builder = ReportBuilder::new(
        Box::new(BrokenCollector),
        Box::new(SystemctlProbe::with_program(Arc::clone(&runner), program.clone())),
        Box::new(JournalLogSource::with_program(
            runner,
            program,
            vec![temp_dir.path().join("missing.log")],
        )),
        services(),
    );

    let started = Instant::now();
    let report = builder.build(10);
    assert!(started.elapsed() < Duration::from_secs(4));

    assert_eq!(report.metrics, SystemMetrics::default());
    assert!(report
        .services
        .iter()
        .all(|s| s.status == ServiceState::Unknown));
    assert_eq!(report.services.len(), 2);
    assert!(report.kernel_logs.is_empty());
    assert!(report.system_logs.is_empty());
    assert!(report.middleware_logs.is_empty());
}
