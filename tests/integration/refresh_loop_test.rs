use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sysdash::core::system_monitor::{
    MetricsCollector, MetricsHistory, ReportBuilder, SystemMetrics, UnsupportedLogSource,
    UnsupportedProbe, HISTORY_CAPACITY,
};
use sysdash::core::{ThemeKind, ThemePolicy};
use sysdash::ui::monitor_tui::{
    dispatch, DashboardEvent, DashboardLayout, DisplaySurface, KeyAction, LoopSettings,
    RefreshLoop, Themes,
};

#[derive(Default)]
struct Recorder {
    frames: Vec<(ThemeKind, String)>,
    cleared: bool,
}

impl DisplaySurface for Recorder {
    fn present(&mut self, layout: &DashboardLayout, _history: &MetricsHistory) -> anyhow::Result<()> {
        let cpu = layout.metrics.table().unwrap().rows[0].cells[1].text();
        self.frames.push((layout.theme, cpu));
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.cleared = true;
        Ok(())
    }
}

/// Reports an increasing CPU value each sample
struct Ramp(f32);

impl MetricsCollector for Ramp {
    fn sample(&mut self) -> sysdash::Result<SystemMetrics> {
        self.0 += 1.0;
        Ok(SystemMetrics {
            cpu_percent: self.0,
            ..Default::default()
        })
    }
}

fn new_loop(
    policy: Arc<ThemePolicy>,
    interval: Duration,
) -> (RefreshLoop<Recorder>, mpsc::Sender<DashboardEvent>) {
    let builder = ReportBuilder::new(
        Box::new(Ramp(0.0)),
        Box::new(UnsupportedProbe),
        Box::new(UnsupportedLogSource::default()),
        vec!["ssh.service".to_string()],
    );
    let (tx, rx) = mpsc::channel();
    let refresh = RefreshLoop::new(
        builder,
        Themes::default(),
        policy,
        rx,
        Recorder::default(),
        LoopSettings {
            interval,
            log_limit: 10,
        },
    );
    (refresh, tx)
}

#[test]
fn test_each_cycle_presents_a_fresh_report() {
    let policy = Arc::new(ThemePolicy::new());
    let (mut refresh, tx) = new_loop(Arc::clone(&policy), Duration::from_secs(60));

    for _ in 0..3 {
        tx.send(DashboardEvent::ThemeChanged).unwrap();
    }
    tx.send(DashboardEvent::Interrupt).unwrap();
    refresh.run().unwrap();

    let cpu: Vec<&str> = refresh
        .surface()
        .frames
        .iter()
        .map(|(_, cpu)| cpu.as_str())
        .collect();
    assert_eq!(cpu, vec!["1.0%", "2.0%", "3.0%", "4.0%"]);
    assert!(refresh.surface().cleared);
    assert_eq!(refresh.history().len(), 4);
}

#[test]
fn test_history_is_bounded() {
    let policy = Arc::new(ThemePolicy::new());
    let (mut refresh, tx) = new_loop(policy, Duration::from_secs(60));

    for _ in 0..HISTORY_CAPACITY + 10 {
        tx.send(DashboardEvent::ThemeChanged).unwrap();
    }
    tx.send(DashboardEvent::Interrupt).unwrap();
    refresh.run().unwrap();

    let history = refresh.history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    // oldest samples were evicted first
    assert_eq!(history.cpu_usage.front().copied(), Some(12.0));
    assert_eq!(
        history.cpu_usage.back().copied(),
        Some((HISTORY_CAPACITY + 11) as f32)
    );
}

#[test]
fn test_toggle_burst_from_threads_changes_theme_once() {
    let policy = Arc::new(ThemePolicy::new());
    let (mut refresh, tx) = new_loop(Arc::clone(&policy), Duration::from_secs(60));
    let at = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let policy = Arc::clone(&policy);
            let tx = tx.clone();
            thread::spawn(move || dispatch(KeyAction::ToggleTheme, &policy, &tx, at))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    tx.send(DashboardEvent::Interrupt).unwrap();
    refresh.run().unwrap();

    assert_eq!(policy.current(), ThemeKind::Light);
    let themes: Vec<ThemeKind> = refresh.surface().frames.iter().map(|(t, _)| *t).collect();
    assert_eq!(themes, vec![ThemeKind::Light, ThemeKind::Light]);
}

#[test]
fn test_interrupt_during_wait_exits_promptly() {
    let policy = Arc::new(ThemePolicy::new());
    let (mut refresh, tx) = new_loop(policy, Duration::from_secs(3600));

    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        tx.send(DashboardEvent::Interrupt).unwrap();
    });

    let started = Instant::now();
    refresh.run().unwrap();
    sender.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(refresh.cycles(), 1);
}
