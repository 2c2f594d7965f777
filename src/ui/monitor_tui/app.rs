use std::io::{self, Stdout};
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::system_monitor::{guarded, MetricsHistory, ReportBuilder};
use crate::core::{Config, ThemePolicy};
use crate::platform;

use super::draw::draw_dashboard;
use super::event_handler::{DashboardEvent, InputWatcher};
use super::layout::DashboardLayout;
use super::palette::Themes;
use super::render::render_dashboard;

/// Where finished layouts go. The refresh loop is the only writer.
pub trait DisplaySurface {
    fn present(&mut self, layout: &DashboardLayout, history: &MetricsHistory) -> Result<()>;

    /// Blank the display before shutdown
    fn clear(&mut self) -> Result<()>;
}

/// Full-screen crossterm terminal in raw mode on the alternate screen
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl TerminalSurface {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        crate::echo_panics(false);
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Leave raw mode and the alternate screen. Safe to call twice.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        crate::echo_panics(true);
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl DisplaySurface for TerminalSurface {
    fn present(&mut self, layout: &DashboardLayout, history: &MetricsHistory) -> Result<()> {
        self.terminal
            .draw(|frame| draw_dashboard(frame, layout, history))
            .context("Failed to draw dashboard")?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.terminal.clear().context("Failed to clear terminal")
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("Failed to restore terminal: {:#}", e);
        }
    }
}

/// Timing knobs of the refresh loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSettings {
    pub interval: Duration,
    pub log_limit: usize,
}

impl LoopSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.refresh_interval(),
            log_limit: config.log_limit,
        }
    }
}

/// Outcome of waiting between cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Refresh,
    Stop,
}

/// Collect, render, present, wait. Repeats until interrupted.
pub struct RefreshLoop<S: DisplaySurface> {
    builder: ReportBuilder,
    themes: Themes,
    policy: Arc<ThemePolicy>,
    history: MetricsHistory,
    events: Receiver<DashboardEvent>,
    surface: S,
    settings: LoopSettings,
    cycles: u64,
    input_lost: bool,
}

impl<S: DisplaySurface> RefreshLoop<S> {
    pub fn new(
        builder: ReportBuilder,
        themes: Themes,
        policy: Arc<ThemePolicy>,
        events: Receiver<DashboardEvent>,
        surface: S,
        settings: LoopSettings,
    ) -> Self {
        Self {
            builder,
            themes,
            policy,
            history: MetricsHistory::new(),
            events,
            surface,
            settings,
            cycles: 0,
            input_lost: false,
        }
    }

    /// Run until an interrupt arrives, then clear the surface
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Dashboard started, refreshing every {:?}",
            self.settings.interval
        );
        loop {
            let started = Instant::now();
            let outcome = guarded(
                "refresh cycle",
                || self.cycle(),
                || Err(anyhow::anyhow!("refresh cycle panicked")),
            );
            if let Err(e) = outcome {
                log::error!("Refresh cycle failed: {:#}", e);
            }
            if self.wait(started) == Wake::Stop {
                break;
            }
        }
        log::info!("Dashboard stopped after {} cycles", self.cycles);
        self.surface.clear()
    }

    /// One refresh: build a report, record history, render with the theme
    /// active right now, present.
    pub fn cycle(&mut self) -> Result<()> {
        self.cycles += 1;
        let report = self.builder.build(self.settings.log_limit);
        self.history.record(&report.metrics);
        let theme = self.themes.resolve(self.policy.current());
        let layout = render_dashboard(&report, &theme);
        self.surface.present(&layout, &self.history)
    }

    fn wait(&mut self, started: Instant) -> Wake {
        let remaining = self.settings.interval.saturating_sub(started.elapsed());

        if self.input_lost {
            thread::sleep(remaining);
            return Wake::Refresh;
        }

        match self.events.recv_timeout(remaining) {
            Ok(DashboardEvent::Interrupt) => Wake::Stop,
            Ok(DashboardEvent::ThemeChanged) => Wake::Refresh,
            Err(RecvTimeoutError::Timeout) => Wake::Refresh,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Event channel closed, continuing without input");
                self.input_lost = true;
                thread::sleep(remaining);
                Wake::Refresh
            }
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Build the collaborators for this host and run the dashboard until
/// interrupted
pub fn run_dashboard(config: &Config) -> Result<()> {
    let themes = Themes::from_config(&config.themes).context("Invalid theme configuration")?;
    let builder =
        platform::report_builder(config).context("Failed to set up report collection")?;
    builder.validate_services();

    let policy = Arc::new(ThemePolicy::new());
    let (tx, rx) = mpsc::channel();

    let signal_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = signal_tx.send(DashboardEvent::Interrupt);
    }) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let surface = TerminalSurface::enter()?;
    let shutdown = Arc::new(AtomicBool::new(false));
    let watcher = InputWatcher::spawn(Arc::clone(&policy), tx, shutdown)
        .context("Failed to start input watcher")?;

    let mut refresh = RefreshLoop::new(
        builder,
        themes,
        policy,
        rx,
        surface,
        LoopSettings::from_config(config),
    );
    let result = refresh.run();

    watcher.stop();
    let mut surface = refresh.into_surface();
    surface.restore()?;
    result
}
