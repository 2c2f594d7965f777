//! Report → layout transformation.
//!
//! Everything here is a pure function of the report and the theme: the same
//! inputs always give an identical [`DashboardLayout`].

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::system_monitor::{LogRecord, Report, ServiceStatus, SystemMetrics};

use super::layout::{Banner, Cell, Column, DashboardLayout, Panel, PanelBody, TableRow, TableView};
use super::palette::{StyleTag, Theme};

/// Values strictly above this percentage are emphasized
pub const WARNING_THRESHOLD_PERCENT: f64 = 80.0;

/// Display columns a log message may span before it wraps
pub const MESSAGE_WRAP_WIDTH: usize = 60;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const FOOTER_TEXT: &str = "Press 'd' to toggle dark/light mode | Press 'Ctrl+C' to exit";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Build the full dashboard layout for one report
pub fn render_dashboard(report: &Report, theme: &Theme) -> DashboardLayout {
    let header = Banner {
        text: format!(
            "System Monitor - Last Updated: {} | Theme: {}",
            report.timestamp.format(TIMESTAMP_FORMAT),
            theme.kind
        ),
        style: theme.style(StyleTag::Header),
    };

    let footer = Banner {
        text: FOOTER_TEXT.to_string(),
        style: theme.style(StyleTag::Footer),
    };

    DashboardLayout {
        theme: theme.kind,
        background: theme.style(StyleTag::Background),
        header,
        metrics: metrics_panel(&report.metrics, theme),
        services: services_panel(&report.services, theme),
        kernel_logs: records_panel("Kernel Error Logs", "kernel", &report.kernel_logs, theme),
        middleware_logs: middleware_panel(report, theme),
        system_logs: records_panel("System Error Logs", "system", &report.system_logs, theme),
        footer,
    }
}

/// True when a percentage must carry the warning emphasis
pub fn exceeds_threshold(percent: f64) -> bool {
    percent > WARNING_THRESHOLD_PERCENT
}

fn metrics_panel(metrics: &SystemMetrics, theme: &Theme) -> Panel {
    // compared as displayed, so "80.0%" never carries the warning
    let cpu = round_tenth(f64::from(metrics.cpu_percent));
    let mem_pct = round_tenth(f64::from(metrics.memory.percent));
    let disk_pct = round_tenth(f64::from(metrics.disk.percent));

    let memory_text = format!(
        "{} GB / {} GB ({:.1}%)",
        format_gb(metrics.memory.used_bytes()),
        format_gb(metrics.memory.total_bytes),
        mem_pct
    );
    let disk_text = format!(
        "{} GB / {} GB ({:.1}%)",
        format_gb(metrics.disk.used_bytes),
        format_gb(metrics.disk.total_bytes),
        disk_pct
    );

    let rows = vec![
        metric_row("CPU Usage", format!("{:.1}%", cpu), exceeds_threshold(cpu), theme),
        metric_row("Memory Used", memory_text, exceeds_threshold(mem_pct), theme),
        metric_row("Disk Used", disk_text, exceeds_threshold(disk_pct), theme),
        metric_row(
            "Network Sent",
            format!("{} MB", format_mb(metrics.network.bytes_sent)),
            false,
            theme,
        ),
        metric_row(
            "Network Received",
            format!("{} MB", format_mb(metrics.network.bytes_recv)),
            false,
            theme,
        ),
    ];

    Panel {
        title: "System Metrics".to_string(),
        border_style: theme.style(StyleTag::Info),
        body: PanelBody::Table(TableView {
            columns: vec![
                column("Metric", StyleTag::Label, Some(18), theme),
                column("Value", StyleTag::Value, None, theme),
            ],
            rows,
            row_separators: false,
        }),
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn metric_row(label: &str, value: String, warn: bool, theme: &Theme) -> TableRow {
    let value_tag = if warn { StyleTag::Error } else { StyleTag::Value };
    TableRow {
        cells: vec![cell(label, StyleTag::Label, theme), cell(value, value_tag, theme)],
    }
}

fn services_panel(services: &[ServiceStatus], theme: &Theme) -> Panel {
    let rows = if services.is_empty() {
        let mut cells = vec![cell("No services found.", StyleTag::Warning, theme)];
        cells.extend((0..5).map(|_| cell("", StyleTag::Value, theme)));
        vec![TableRow { cells }]
    } else {
        services
            .iter()
            .map(|service| {
                let (problem, problem_tag) = if service.is_problem() {
                    ("Yes", StyleTag::Error)
                } else {
                    ("No", StyleTag::Success)
                };
                TableRow {
                    cells: vec![
                        cell(service.name.as_str(), StyleTag::Label, theme),
                        cell(service.status.to_string(), StyleTag::Value, theme),
                        cell(service.enabled.as_str(), StyleTag::Value, theme),
                        cell(service.active_state.as_str(), StyleTag::Value, theme),
                        cell(service.sub_state.as_str(), StyleTag::Value, theme),
                        cell(problem, problem_tag, theme),
                    ],
                }
            })
            .collect()
    };

    Panel {
        title: "Services Status".to_string(),
        border_style: theme.style(StyleTag::Info),
        body: PanelBody::Table(TableView {
            columns: vec![
                column("Service", StyleTag::Label, None, theme),
                column("Status", StyleTag::Value, Some(12), theme),
                column("Enabled", StyleTag::Value, Some(12), theme),
                column("Active State", StyleTag::Value, Some(13), theme),
                column("Sub State", StyleTag::Value, Some(12), theme),
                column("Problem", StyleTag::Error, Some(8), theme),
            ],
            rows,
            row_separators: false,
        }),
    }
}

fn records_panel(title: &str, channel: &str, records: &[LogRecord], theme: &Theme) -> Panel {
    let body = if records.is_empty() {
        PanelBody::Notice(placeholder(channel, theme))
    } else {
        let rows = records
            .iter()
            .map(|record| TableRow {
                cells: vec![
                    cell(
                        record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                        StyleTag::Timestamp,
                        theme,
                    ),
                    wrapped_cell(&record.message, StyleTag::Message, theme),
                ],
            })
            .collect();

        PanelBody::Table(TableView {
            columns: vec![
                column("Timestamp", StyleTag::Timestamp, Some(20), theme),
                column("Message", StyleTag::Message, None, theme),
            ],
            rows,
            row_separators: true,
        })
    };

    Panel {
        title: title.to_string(),
        border_style: theme.style(StyleTag::Info),
        body,
    }
}

fn middleware_panel(report: &Report, theme: &Theme) -> Panel {
    let rows: Vec<TableRow> = report
        .middleware_logs
        .iter()
        .flat_map(|(channel, lines)| {
            lines.iter().map(move |line| TableRow {
                cells: vec![
                    cell(channel.as_str(), StyleTag::Dim, theme),
                    wrapped_cell(line, StyleTag::Message, theme),
                ],
            })
        })
        .collect();

    let body = if rows.is_empty() {
        PanelBody::Notice(placeholder("middleware", theme))
    } else {
        PanelBody::Table(TableView {
            columns: vec![
                column("Log File", StyleTag::Dim, None, theme),
                column("Message", StyleTag::Message, None, theme),
            ],
            rows,
            row_separators: true,
        })
    };

    Panel {
        title: "Middleware Error Logs".to_string(),
        border_style: theme.style(StyleTag::Info),
        body,
    }
}

fn placeholder(channel: &str, theme: &Theme) -> Cell {
    cell(
        format!("No {} error logs found.", channel),
        StyleTag::Warning,
        theme,
    )
}

fn cell(text: impl Into<String>, tag: StyleTag, theme: &Theme) -> Cell {
    Cell {
        lines: vec![text.into()],
        tag,
        style: theme.style(tag),
    }
}

fn wrapped_cell(text: &str, tag: StyleTag, theme: &Theme) -> Cell {
    Cell {
        lines: wrap_text(text, MESSAGE_WRAP_WIDTH),
        tag,
        style: theme.style(tag),
    }
}

fn column(title: &str, tag: StyleTag, width: Option<u16>, theme: &Theme) -> Column {
    Column {
        title: title.to_string(),
        style: theme.style(tag),
        width,
    }
}

/// Bytes as GiB, two-decimal rounded (`4.0`, `3.75`)
pub fn format_gb(bytes: u64) -> String {
    format_rounded(bytes as f64 / GIB)
}

/// Bytes as MiB, two-decimal rounded
pub fn format_mb(bytes: u64) -> String {
    format_rounded(bytes as f64 / MIB)
}

/// Round to two decimals and print the shortest form with at least one
/// decimal digit
pub fn format_rounded(value: f64) -> String {
    let mut rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        rounded = 0.0;
    }
    let text = rounded.to_string();
    if text.contains('.') || !rounded.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Soft-wrap `text` into lines of at most `width` display columns.
///
/// Words stay whole when they fit on a line; longer words are split.
/// Nothing is dropped.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        wrap_paragraph(paragraph, width, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in paragraph.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
}
