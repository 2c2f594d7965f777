// UI module: console messages and the terminal dashboard

pub mod messages;
pub mod monitor_tui;

pub use messages::warn;
