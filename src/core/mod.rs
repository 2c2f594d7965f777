// Core business logic module

pub mod config;
pub mod system_monitor;
pub mod theme;

// Re-export commonly used items
pub use config::Config;
pub use theme::{ThemeKind, ThemePolicy};
