//! Terminal dashboard.
//!
//! [`render`] turns a report into a [`DashboardLayout`], [`draw`] paints it
//! with ratatui, and [`RefreshLoop`] drives both on a fixed interval while
//! [`InputWatcher`] listens for keys on its own thread.

mod app;
mod draw;
mod event_handler;
pub mod layout;
pub mod palette;
pub mod render;

pub use app::{run_dashboard, DisplaySurface, LoopSettings, RefreshLoop, TerminalSurface};
pub use draw::draw_dashboard;
pub use event_handler::{dispatch, map_key, DashboardEvent, InputWatcher, KeyAction, TOGGLE_KEY};
pub use layout::{DashboardLayout, Panel, PanelBody, Region, RegionContent};
pub use palette::{parse_style, StyleTag, Theme, Themes};
pub use render::{render_dashboard, MESSAGE_WRAP_WIDTH, WARNING_THRESHOLD_PERCENT};
