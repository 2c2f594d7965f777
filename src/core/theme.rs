//! Active color theme and its debounced toggle.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Minimum spacing between two accepted theme transitions
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
struct ThemeState {
    active: ThemeKind,
    last_transition: Option<Instant>,
}

/// Thread-safe holder of the active theme.
///
/// Every read and write goes through one lock, so a reader sees either the
/// value before a transition or the value after it.
#[derive(Debug)]
pub struct ThemePolicy {
    state: Mutex<ThemeState>,
    debounce: Duration,
}

impl ThemePolicy {
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE_WINDOW)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            state: Mutex::new(ThemeState {
                active: ThemeKind::Dark,
                last_transition: None,
            }),
            debounce,
        }
    }

    pub fn current(&self) -> ThemeKind {
        self.state.lock().active
    }

    /// Flip the theme unless the last transition happened less than the
    /// debounce window before `at`. Returns whether a transition happened.
    pub fn request_toggle(&self, at: Instant) -> bool {
        let mut state = self.state.lock();
        if let Some(last) = state.last_transition {
            if at.saturating_duration_since(last) < self.debounce {
                return false;
            }
        }
        state.active = state.active.toggled();
        state.last_transition = Some(at);
        log::info!("Switched to {} theme", state.active);
        true
    }

    pub fn toggle(&self) -> bool {
        self.request_toggle(Instant::now())
    }
}

impl Default for ThemePolicy {
    fn default() -> Self {
        Self::new()
    }
}
