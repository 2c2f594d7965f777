// Colored one-line console messages, printed outside the dashboard

use colored::Colorize;

/// Display a warning on stderr
pub fn warn(message: &str) {
    eprintln!("{}", format!("Warning: {}", message).yellow().bold());
}
