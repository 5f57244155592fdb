//! System and network metrics sampled once per tick

pub mod gpu;
pub mod source;

pub use gpu::GpuProbe;
pub use source::{MetricSource, SystemSource};

use crate::config::Configuration;
use crate::constants::intervals;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Last cumulative counters and the most recent per-tick delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkSample {
    pub last_sent: u64,
    pub last_received: u64,
    pub up: u64,
    pub down: u64,
    /// Whether `last_*` holds a reading taken on the previous tick
    fresh: bool,
}

/// Latest readings; `None` fields render as omitted
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub cpu: Option<f32>,
    pub mem: Option<f32>,
    pub gpu: Option<f32>,
    pub network: Option<NetworkSample>,
}

pub struct MetricsSampler<S: MetricSource> {
    source: S,
    network: NetworkSample,
    has_network: bool,
    cpu: Option<f32>,
    mem: Option<f32>,
    gpu: Option<f32>,
    gpu_ticks: u64,
}

impl<S: MetricSource> MetricsSampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            network: NetworkSample::default(),
            has_network: false,
            cpu: None,
            mem: None,
            gpu: None,
            gpu_ticks: 0,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Sample every enabled family. Each family fails on its own.
    pub fn poll(&mut self, config: &Configuration) {
        if config.show_network_stats {
            self.poll_network();
        } else {
            // next enabled poll re-baselines instead of reporting the gap
            self.network.fresh = false;
        }

        self.cpu = if config.show_cpu {
            self.source.cpu_percent()
        } else {
            None
        };

        self.mem = if config.show_mem {
            self.source.memory_percent()
        } else {
            None
        };

        if config.show_gpu {
            if self.gpu_ticks % intervals::GPU_SAMPLE_EVERY == 0 {
                match self.source.gpu_percent() {
                    Some(value) => self.gpu = Some(value),
                    None => log::trace!("GPU reading unavailable, holding {:?}", self.gpu),
                }
            }
            self.gpu_ticks = self.gpu_ticks.wrapping_add(1);
        } else {
            self.gpu_ticks = 0;
        }
    }

    fn poll_network(&mut self) {
        let Some((sent, received)) = self.source.network_counters() else {
            log::trace!("Network counters unavailable");
            self.network.fresh = false;
            return;
        };

        if self.network.fresh {
            // Ticks are nominally one second apart, so the delta is the rate.
            self.network.up = sent.saturating_sub(self.network.last_sent);
            self.network.down = received.saturating_sub(self.network.last_received);
        } else {
            self.network.up = 0;
            self.network.down = 0;
        }
        self.network.last_sent = sent;
        self.network.last_received = received;
        self.network.fresh = true;
        self.has_network = true;
    }

    pub fn network(&self) -> &NetworkSample {
        &self.network
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cpu: self.cpu,
            mem: self.mem,
            gpu: self.gpu,
            network: self.has_network.then_some(self.network),
        }
    }

    /// `↑ 1.2 KB/s  ↓ 340 B/s`
    pub fn network_line(&self) -> String {
        format!(
            "↑ {}  ↓ {}",
            format_throughput(self.network.up),
            format_throughput(self.network.down)
        )
    }

    /// Enabled fields with a reading, e.g. `CPU 12%  MEM 48%`
    pub fn stats_line(&self, config: &Configuration) -> String {
        let fields = [
            (config.show_cpu, "CPU", self.cpu),
            (config.show_mem, "MEM", self.mem),
            (config.show_gpu, "GPU", self.gpu),
        ];
        fields
            .iter()
            .filter_map(|(enabled, label, value)| match (*enabled, *value) {
                (true, Some(v)) => Some(format!("{} {:.0}%", label, v)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

pub fn format_throughput(bytes_per_sec: u64) -> String {
    if bytes_per_sec < KIB {
        format!("{} B/s", bytes_per_sec)
    } else if bytes_per_sec < MIB {
        format!("{:.1} KB/s", bytes_per_sec as f64 / KIB as f64)
    } else if bytes_per_sec < GIB {
        format!("{:.1} MB/s", bytes_per_sec as f64 / MIB as f64)
    } else {
        format!("{:.2} GB/s", bytes_per_sec as f64 / GIB as f64)
    }
}
