use std::collections::VecDeque;

use super::metrics::SystemMetrics;

/// Number of samples kept per series
pub const HISTORY_CAPACITY: usize = 50;

/// Circular buffer of recent samples (for sparklines)
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    pub cpu_usage: VecDeque<f32>,
    pub memory_usage: VecDeque<f32>,
    pub disk_usage: VecDeque<f32>,
    pub network_sent: VecDeque<u64>,
    pub network_recv: VecDeque<u64>,
    last_network: Option<(u64, u64)>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            cpu_usage: VecDeque::with_capacity(capacity),
            memory_usage: VecDeque::with_capacity(capacity),
            disk_usage: VecDeque::with_capacity(capacity),
            network_sent: VecDeque::with_capacity(capacity),
            network_recv: VecDeque::with_capacity(capacity),
            last_network: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cpu_usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu_usage.is_empty()
    }

    /// Append one sample to every series, evicting the oldest when full.
    ///
    /// Network series hold the bytes transferred since the previous sample;
    /// the first sample and counter resets record zero.
    pub fn record(&mut self, metrics: &SystemMetrics) {
        let capacity = self.capacity;
        Self::push_value(&mut self.cpu_usage, metrics.cpu_percent, capacity);
        Self::push_value(&mut self.memory_usage, metrics.memory.percent, capacity);
        Self::push_value(&mut self.disk_usage, metrics.disk.percent, capacity);

        let current = (metrics.network.bytes_sent, metrics.network.bytes_recv);
        let (sent, recv) = match self.last_network {
            Some((prev_sent, prev_recv)) => (
                current.0.saturating_sub(prev_sent),
                current.1.saturating_sub(prev_recv),
            ),
            None => (0, 0),
        };
        self.last_network = Some(current);
        Self::push_value(&mut self.network_sent, sent, capacity);
        Self::push_value(&mut self.network_recv, recv, capacity);
    }

    fn push_value<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
        if queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(value);
    }

    /// Convert cpu_usage to u64 for the sparkline widget
    /// Scales values by 10 to preserve decimal precision (0-1000 range)
    pub fn cpu_as_u64(&self) -> Vec<u64> {
        Self::scaled(&self.cpu_usage)
    }

    pub fn memory_as_u64(&self) -> Vec<u64> {
        Self::scaled(&self.memory_usage)
    }

    pub fn disk_as_u64(&self) -> Vec<u64> {
        Self::scaled(&self.disk_usage)
    }

    /// Bytes sent and received per interval, oldest first
    pub fn network_as_u64(&self) -> (Vec<u64>, Vec<u64>) {
        (
            self.network_sent.iter().copied().collect(),
            self.network_recv.iter().copied().collect(),
        )
    }

    fn scaled(values: &VecDeque<f32>) -> Vec<u64> {
        values.iter().map(|&v| (v.max(0.0) * 10.0) as u64).collect()
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}
