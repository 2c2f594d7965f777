//! Dashboard command handler.
//!
//! Runs the full-screen dashboard until the user interrupts it.

use anyhow::{Context, Result};

use crate::core::Config;
use crate::ui;
use crate::ui::monitor_tui::run_dashboard;

/// Execute the monitor command
pub fn execute(config: &Config) -> Result<()> {
    if !cfg!(target_os = "linux") {
        ui::warn("sysdash targets Linux; service status and journal logs will show as Unsupported");
    }

    run_dashboard(config).context("Failed to run dashboard")?;

    println!("Exiting dashboard.");
    Ok(())
}
