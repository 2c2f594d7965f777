//! Error-level log retrieval from the journal and middleware log files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::command::CommandRunner;

/// Upper bound on how much of a middleware file is read per refresh
const TAIL_BYTES: u64 = 256 * 1024;

static SYSLOG_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][a-z]{2})\s+(\d{1,2})\s+(\d{2}:\d{2}:\d{2})\s+(.*)$")
        .expect("syslog prefix regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

/// Returns the most recent error-level records of each channel.
///
/// Every method enforces its own timeout and returns an empty result on
/// failure instead of raising to the caller.
pub trait LogSource: Send {
    fn kernel(&self, limit: usize) -> Vec<LogRecord>;
    fn system(&self, limit: usize) -> Vec<LogRecord>;
    fn middleware(&self, limit: usize) -> BTreeMap<String, Vec<String>>;
}

/// Reads kernel and system errors through `journalctl`
pub struct JournalLogSource {
    runner: Arc<CommandRunner>,
    program: String,
    middleware_files: Vec<PathBuf>,
}

impl JournalLogSource {
    pub fn new(runner: Arc<CommandRunner>, middleware_files: Vec<PathBuf>) -> Self {
        Self::with_program(runner, "journalctl", middleware_files)
    }

    /// Query a `journalctl`-compatible executable at `program`
    pub fn with_program(
        runner: Arc<CommandRunner>,
        program: impl Into<String>,
        middleware_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            middleware_files,
        }
    }

    fn query(&self, channel: &str, kernel_only: bool, limit: usize) -> Vec<LogRecord> {
        let limit_arg = limit.to_string();
        let mut args = Vec::with_capacity(9);
        if kernel_only {
            args.push("-k");
        }
        args.extend(["-p", "err", "-n", limit_arg.as_str(), "--no-pager", "-o", "short-iso"]);

        match self.runner.run(&self.program, &args) {
            Ok(output) => {
                if !output.success && output.stdout.trim().is_empty() {
                    log::error!(
                        "{} failed for {} logs: {}",
                        self.program,
                        channel,
                        output.stderr.trim()
                    );
                }
                parse_journal_output(&output.stdout, Local::now(), limit)
            }
            Err(e) => {
                log::error!("Failed to retrieve {} logs: {}", channel, e);
                Vec::new()
            }
        }
    }
}

impl LogSource for JournalLogSource {
    fn kernel(&self, limit: usize) -> Vec<LogRecord> {
        self.query("kernel", true, limit)
    }

    fn system(&self, limit: usize) -> Vec<LogRecord> {
        self.query("system", false, limit)
    }

    fn middleware(&self, limit: usize) -> BTreeMap<String, Vec<String>> {
        read_middleware_logs(&self.middleware_files, limit)
    }
}

/// Used where no journal is available; middleware files are still read
#[derive(Debug, Default, Clone)]
pub struct UnsupportedLogSource {
    middleware_files: Vec<PathBuf>,
}

impl UnsupportedLogSource {
    pub fn new(middleware_files: Vec<PathBuf>) -> Self {
        Self { middleware_files }
    }
}

impl LogSource for UnsupportedLogSource {
    fn kernel(&self, _limit: usize) -> Vec<LogRecord> {
        Vec::new()
    }

    fn system(&self, _limit: usize) -> Vec<LogRecord> {
        Vec::new()
    }

    fn middleware(&self, limit: usize) -> BTreeMap<String, Vec<String>> {
        read_middleware_logs(&self.middleware_files, limit)
    }
}

/// Parse `journalctl` output, keeping at most the last `limit` records
pub fn parse_journal_output(stdout: &str, now: DateTime<Local>, limit: usize) -> Vec<LogRecord> {
    let mut records: Vec<LogRecord> = stdout
        .lines()
        .filter_map(|line| parse_journal_line(line, now))
        .collect();
    if records.len() > limit {
        records.drain(..records.len() - limit);
    }
    records
}

/// Parse one journal line.
///
/// Accepts `short-iso` and classic syslog prefixes. Lines with an
/// unparseable timestamp keep their full text and are stamped with `now`.
/// Blank lines and `-- ... --` markers yield `None`.
pub fn parse_journal_line(line: &str, now: DateTime<Local>) -> Option<LogRecord> {
    let line = line.trim_end();
    if line.trim().is_empty() || line.starts_with("-- ") {
        return None;
    }

    if let Some((stamp, rest)) = line.split_once(char::is_whitespace) {
        if let Some(timestamp) = parse_iso_timestamp(stamp) {
            return Some(LogRecord {
                timestamp,
                message: rest.trim_start().to_string(),
            });
        }
    }

    if let Some(caps) = SYSLOG_PREFIX.captures(line) {
        let stamp = format!("{} {} {} {}", now.year(), &caps[1], &caps[2], &caps[3]);
        let timestamp = NaiveDateTime::parse_from_str(&stamp, "%Y %b %d %H:%M:%S")
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .unwrap_or(now);
        return Some(LogRecord {
            timestamp,
            message: caps[4].to_string(),
        });
    }

    Some(LogRecord {
        timestamp: now,
        message: line.to_string(),
    })
}

fn parse_iso_timestamp(stamp: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(stamp)
        .or_else(|_| DateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}

/// Error lines among the last `limit` lines of every middleware file.
///
/// Missing or unreadable files are logged and left out of the map.
pub fn read_middleware_logs(files: &[PathBuf], limit: usize) -> BTreeMap<String, Vec<String>> {
    let mut logs = BTreeMap::new();
    for path in files {
        match tail_lines(path, limit) {
            Ok(lines) => {
                let errors = lines
                    .into_iter()
                    .filter(|line| line.to_lowercase().contains("error"))
                    .collect();
                logs.insert(path.display().to_string(), errors);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Middleware log file not found: {}", path.display());
            }
            Err(e) => {
                log::error!(
                    "Failed to read middleware log file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
    logs
}

/// Last `limit` non-empty lines of a file, trimmed
fn tail_lines(path: &Path, limit: usize) -> io::Result<Vec<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    // one extra byte tells whether the window starts on a line boundary
    let from = len.saturating_sub(TAIL_BYTES + 1);
    file.seek(SeekFrom::Start(from))?;

    let mut buf = Vec::with_capacity((len - from) as usize);
    file.read_to_end(&mut buf)?;

    let window = if from > 0 {
        match buf.iter().position(|&b| b == b'\n') {
            Some(newline) => &buf[newline + 1..],
            None => &buf[buf.len()..],
        }
    } else {
        &buf[..]
    };
    let text = String::from_utf8_lossy(window);
    let lines: Vec<&str> = text.lines().collect();

    let skip = lines.len().saturating_sub(limit);
    Ok(lines
        .into_iter()
        .skip(skip)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
