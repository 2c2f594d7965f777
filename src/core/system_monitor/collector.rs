use std::path::Path;
use std::time::Instant;

use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use crate::error::{DashError, Result};

use super::metrics::*;

/// Samples instantaneous OS-level resource counters.
///
/// Implementations must return within one sampling interval.
pub trait MetricsCollector: Send {
    fn sample(&mut self) -> Result<SystemMetrics>;
}

/// Collects metrics through `sysinfo`
pub struct SysinfoCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    last_cpu_refresh: Instant,
}

impl SysinfoCollector {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        let system = System::new_with_specifics(refresh_kind);
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        Self {
            system,
            disks,
            networks,
            last_cpu_refresh: Instant::now(),
        }
    }

    fn collect_cpu(&mut self) -> f32 {
        // CPU usage is a delta between two refreshes
        let since_last = self.last_cpu_refresh.elapsed();
        if since_last < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL - since_last);
        }
        self.system.refresh_cpu_usage();
        self.last_cpu_refresh = Instant::now();
        self.system.global_cpu_usage().clamp(0.0, 100.0)
    }

    fn collect_memory(&mut self) -> Result<MemoryMetrics> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(DashError::metric_collection(
                "memory counters are unavailable",
            ));
        }
        let available = self.system.available_memory().min(total);

        Ok(MemoryMetrics {
            total_bytes: total,
            available_bytes: available,
            percent: percent_of(total - available, total),
        })
    }

    fn collect_disk(&mut self) -> DiskMetrics {
        self.disks.refresh(true);

        let root = self
            .disks
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"))
            .or_else(|| self.disks.iter().next());

        match root {
            Some(disk) => {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                DiskMetrics {
                    total_bytes: total,
                    used_bytes: used,
                    percent: percent_of(used, total),
                }
            }
            None => {
                log::warn!("No mounted filesystem found for disk metrics");
                DiskMetrics::default()
            }
        }
    }

    fn collect_network(&mut self) -> NetworkMetrics {
        self.networks.refresh(true);

        self.networks
            .iter()
            .fold(NetworkMetrics::default(), |acc, (_name, data)| NetworkMetrics {
                bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
                bytes_recv: acc.bytes_recv.saturating_add(data.total_received()),
            })
    }
}

impl MetricsCollector for SysinfoCollector {
    fn sample(&mut self) -> Result<SystemMetrics> {
        let cpu_percent = self.collect_cpu();
        let memory = self.collect_memory()?;
        let disk = self.collect_disk();
        let network = self.collect_network();

        Ok(SystemMetrics {
            cpu_percent,
            memory,
            disk,
            network,
        })
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}
