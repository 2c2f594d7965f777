use chrono::{Local, TimeZone};

use sysdash::core::system_monitor::{
    DiskMetrics, LogRecord, MemoryMetrics, NetworkMetrics, Report, ServiceState, ServiceStatus,
    SystemMetrics,
};
use sysdash::core::ThemeKind;
use sysdash::ui::monitor_tui::{
    render_dashboard, PanelBody, Region, RegionContent, StyleTag, Themes, MESSAGE_WRAP_WIDTH,
};

const GIB: u64 = 1024 * 1024 * 1024;

fn sample_report() -> Report {
    let at = Local.with_ymd_and_hms(2024, 11, 3, 8, 15, 0).unwrap();
    let mut report = Report::empty(at);
    report.metrics = SystemMetrics {
        cpu_percent: 91.5,
        memory: MemoryMetrics {
            total_bytes: 8 * GIB,
            available_bytes: 4 * GIB,
            percent: 50.0,
        },
        disk: DiskMetrics {
            total_bytes: 100 * GIB,
            used_bytes: 80 * GIB,
            percent: 80.0,
        },
        network: NetworkMetrics {
            bytes_sent: 5 * 1024 * 1024,
            bytes_recv: 1536 * 1024,
        },
    };
    report.services = vec![
        ServiceStatus {
            name: "ssh.service".to_string(),
            status: ServiceState::Running,
            enabled: "Enabled".to_string(),
            active_state: "Active".to_string(),
            sub_state: "Running".to_string(),
        },
        ServiceStatus {
            name: "cron.service".to_string(),
            status: ServiceState::NotRunning,
            enabled: "Disabled".to_string(),
            active_state: "Inactive".to_string(),
            sub_state: "Dead".to_string(),
        },
        ServiceStatus::unknown("networking.service"),
    ];
    report.kernel_logs = vec![LogRecord {
        timestamp: at,
        message: "EXT4-fs error (device sda1): ext4_find_entry:1455: inode #2: comm ls: reading directory lblock 0".to_string(),
    }];
    report
        .middleware_logs
        .insert("/var/log/app.log".to_string(), vec!["ERROR db timeout".to_string()]);
    report
}

#[test]
fn test_metrics_panel_text_and_warnings() {
    let layout = render_dashboard(&sample_report(), &Themes::default().resolve(ThemeKind::Dark));
    let rows = &layout.metrics.table().unwrap().rows;

    let values: Vec<String> = rows.iter().map(|r| r.cells[1].text()).collect();
    assert_eq!(
        values,
        vec![
            "91.5%".to_string(),
            "4.0 GB / 8.0 GB (50.0%)".to_string(),
            "80.0 GB / 100.0 GB (80.0%)".to_string(),
            "5.0 MB".to_string(),
            "1.5 MB".to_string(),
        ]
    );

    // cpu above threshold, disk exactly at it
    assert_eq!(rows[0].cells[1].tag, StyleTag::Error);
    assert_eq!(rows[1].cells[1].tag, StyleTag::Value);
    assert_eq!(rows[2].cells[1].tag, StyleTag::Value);
}

#[test]
fn test_services_keep_probe_order() {
    let layout = render_dashboard(&sample_report(), &Themes::default().resolve(ThemeKind::Dark));
    let rows = &layout.services.table().unwrap().rows;

    let summary: Vec<(String, String)> = rows
        .iter()
        .map(|r| (r.cells[0].text(), r.cells[5].text()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("ssh.service".to_string(), "No".to_string()),
            ("cron.service".to_string(), "Yes".to_string()),
            ("networking.service".to_string(), "Yes".to_string()),
        ]
    );
    assert_eq!(rows[1].cells[1].text(), "Not Running");
}

#[test]
fn test_log_panels() {
    let layout = render_dashboard(&sample_report(), &Themes::default().resolve(ThemeKind::Dark));

    let kernel = layout.kernel_logs.table().unwrap();
    assert_eq!(kernel.rows.len(), 1);
    assert_eq!(kernel.rows[0].cells[0].text(), "2024-11-03 08:15:00");
    assert!(kernel.rows[0].cells[1]
        .lines
        .iter()
        .all(|line| line.chars().count() <= MESSAGE_WRAP_WIDTH));
    assert!(kernel.rows[0].height() > 1);

    let middleware = layout.middleware_logs.table().unwrap();
    assert_eq!(middleware.rows[0].cells[0].text(), "/var/log/app.log");
    assert_eq!(middleware.rows[0].cells[1].text(), "ERROR db timeout");

    match &layout.system_logs.body {
        PanelBody::Notice(cell) => assert_eq!(cell.text(), "No system error logs found."),
        PanelBody::Table(_) => panic!("expected placeholder"),
    }
}

#[test]
fn test_every_region_is_addressable() {
    let layout = render_dashboard(&sample_report(), &Themes::default().resolve(ThemeKind::Light));
    assert!(layout.panel(Region::Header).is_none());
    assert_eq!(layout.panel(Region::Services), Some(&layout.services));
    for region in Region::ALL {
        let content = layout.region_by_path(region.path()).unwrap();
        match (region, content) {
            (Region::Header | Region::Footer, RegionContent::Banner(_)) => {}
            (_, RegionContent::Panel(panel)) => assert!(!panel.title.is_empty()),
            (region, content) => panic!("{:?} resolved to {:?}", region, content),
        }
    }
}

#[test]
fn test_render_is_deterministic() {
    let report = sample_report();
    let theme = Themes::default().resolve(ThemeKind::Dark);
    assert_eq!(render_dashboard(&report, &theme), render_dashboard(&report, &theme));
}
