//! Raw OS metric sources

use super::gpu::GpuProbe;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, Networks, RefreshKind, System};

/// Polling interface over the host's counters. `None` means unavailable.
pub trait MetricSource {
    fn cpu_percent(&mut self) -> Option<f32>;
    fn memory_percent(&mut self) -> Option<f32>;
    /// Cumulative `(sent, received)` bytes across all interfaces
    fn network_counters(&mut self) -> Option<(u64, u64)>;
    fn gpu_percent(&mut self) -> Option<f32>;
}

/// `sysinfo`-backed source with a bounded GPU probe
pub struct SystemSource {
    system: System,
    networks: Option<Networks>,
    gpu: GpuProbe,
}

impl SystemSource {
    pub fn new() -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
                .with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        // First CPU reading needs a baseline sample
        system.refresh_cpu_usage();

        Self {
            system,
            networks: None,
            gpu: GpuProbe::detect(),
        }
    }
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemSource")
            .field("gpu", &self.gpu)
            .finish_non_exhaustive()
    }
}

impl MetricSource for SystemSource {
    fn cpu_percent(&mut self) -> Option<f32> {
        self.system.refresh_cpu_usage();
        if self.system.cpus().is_empty() {
            return None;
        }
        let usage = self.system.global_cpu_usage();
        usage.is_finite().then_some(usage.clamp(0.0, 100.0))
    }

    fn memory_percent(&mut self) -> Option<f32> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return None;
        }
        let used = self.system.used_memory();
        Some((used as f64 / total as f64 * 100.0) as f32)
    }

    fn network_counters(&mut self) -> Option<(u64, u64)> {
        match self.networks.as_mut() {
            Some(networks) => networks.refresh(true),
            None => self.networks = Some(Networks::new_with_refreshed_list()),
        }
        let networks = self.networks.as_ref()?;

        if networks.list().is_empty() {
            return None;
        }

        let (mut sent, mut received) = (0u64, 0u64);
        for (name, data) in networks.list() {
            if name == "lo" || name == "lo0" {
                continue;
            }
            sent = sent.saturating_add(data.total_transmitted());
            received = received.saturating_add(data.total_received());
        }
        Some((sent, received))
    }

    fn gpu_percent(&mut self) -> Option<f32> {
        self.gpu.sample()
    }
}
