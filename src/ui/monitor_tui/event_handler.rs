use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::ThemePolicy;

/// Key that flips between dark and light mode
pub const TOGGLE_KEY: char = 'd';

/// How often the watcher wakes up to check the shutdown flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Events delivered to the refresh loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// The theme policy accepted a toggle; redraw now
    ThemeChanged,
    /// Stop the dashboard
    Interrupt,
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleTheme,
    Interrupt,
}

/// Translate a key event; releases and repeats are ignored
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Interrupt)
        }
        KeyCode::Char(c)
            if c.eq_ignore_ascii_case(&TOGGLE_KEY)
                && !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(KeyAction::ToggleTheme)
        }
        _ => None,
    }
}

/// Apply an action and forward the resulting event.
///
/// Returns `false` once the receiving side is gone.
pub fn dispatch(
    action: KeyAction,
    policy: &ThemePolicy,
    events: &Sender<DashboardEvent>,
    at: Instant,
) -> bool {
    let event = match action {
        KeyAction::ToggleTheme => {
            if !policy.request_toggle(at) {
                log::debug!("Theme toggle ignored, inside debounce window");
                return true;
            }
            DashboardEvent::ThemeChanged
        }
        KeyAction::Interrupt => DashboardEvent::Interrupt,
    };
    events.send(event).is_ok()
}

/// Background keyboard listener.
///
/// Only ever touches the theme policy and the event channel.
pub struct InputWatcher {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputWatcher {
    pub fn spawn(
        policy: Arc<ThemePolicy>,
        events: Sender<DashboardEvent>,
        shutdown: Arc<AtomicBool>,
    ) -> std::io::Result<Self> {
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("input-watcher".to_string())
            .spawn(move || watch(&policy, &events, &flag))?;
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Input watcher thread panicked");
            }
        }
    }
}

impl Drop for InputWatcher {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn watch(policy: &ThemePolicy, events: &Sender<DashboardEvent>, shutdown: &AtomicBool) {
    log::debug!("Input watcher started");
    while !shutdown.load(Ordering::SeqCst) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                log::error!("Input polling failed: {}", e);
                break;
            }
        }

        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                log::error!("Failed to read input event: {}", e);
                break;
            }
        };

        let Some(action) = map_key(&key) else {
            continue;
        };
        if !dispatch(action, policy, events, Instant::now()) {
            break;
        }
    }
    log::debug!("Input watcher stopped");
}
