// sysdash library - public API

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

// Re-export error types
pub mod error;
pub use error::{DashError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;

/// Log files larger than this are rotated on startup
const LOG_ROTATE_BYTES: u64 = 512 * 1024;

/// Cleared while the dashboard owns the terminal
static ECHO_PANICS: AtomicBool = AtomicBool::new(true);

/// Initialize logging into `path`.
///
/// The dashboard owns the terminal, so records never go to stderr. The level
/// defaults to `info` and follows `RUST_LOG` when set. Panics are routed into
/// the same file and, unless [`echo_panics`] turned it off, to the previous
/// hook.
pub fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    rotate_log(path)?;

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();

    install_panic_hook();
    Ok(())
}

/// Toggle whether panics reach stderr in addition to the log file
pub fn echo_panics(enabled: bool) {
    ECHO_PANICS.store(enabled, Ordering::SeqCst);
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("panic: {}", info);
        if ECHO_PANICS.load(Ordering::SeqCst) {
            previous(info);
        }
    }));
}

/// Move an oversized log aside to `<name>.1`, replacing any older one
fn rotate_log(path: &Path) -> Result<()> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => return Ok(()),
    };
    if size > LOG_ROTATE_BYTES {
        fs::rename(path, rotated_path(path))?;
    }
    Ok(())
}

fn rotated_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".1");
    PathBuf::from(name)
}
