//! GPU utilization probe
//!
//! Querying the GPU is slow and often unsupported, so detection happens once
//! and every probe is bounded by a deadline.

use crate::constants::intervals;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum GpuProbe {
    /// `gpu_busy_percent` exposed by the amdgpu / i915 drivers
    Sysfs(PathBuf),
    NvidiaSmi,
    Unsupported,
}

impl GpuProbe {
    pub fn detect() -> Self {
        if let Some(path) = find_sysfs_busy_file() {
            log::info!("GPU utilization from {:?}", path);
            return Self::Sysfs(path);
        }
        if nvidia_smi_query().is_some() {
            log::info!("GPU utilization from nvidia-smi");
            return Self::NvidiaSmi;
        }
        log::info!("No GPU utilization source found");
        Self::Unsupported
    }

    pub fn sample(&self) -> Option<f32> {
        match self {
            Self::Sysfs(path) => std::fs::read_to_string(path)
                .ok()
                .and_then(|s| parse_percent(&s)),
            Self::NvidiaSmi => nvidia_smi_query(),
            Self::Unsupported => None,
        }
    }
}

fn find_sysfs_busy_file() -> Option<PathBuf> {
    let entries = std::fs::read_dir("/sys/class/drm").ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with("card") && !name.contains('-')
        })
        .map(|e| e.path().join("device").join("gpu_busy_percent"))
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn nvidia_smi_query() -> Option<f32> {
    let mut child = Command::new("nvidia-smi")
        .args(["--query-gpu=utilization.gpu", "--format=csv,noheader,nounits"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + Duration::from_millis(intervals::GPU_PROBE_TIMEOUT_MS);
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => break,
            Ok(Some(_)) => return None,
            Ok(None) if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Ok(None) | Err(_) => {
                log::debug!("nvidia-smi did not answer in time");
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    }

    let output = child.wait_with_output().ok()?;
    let text = String::from_utf8(output.stdout).ok()?;
    // one line per GPU, report the first
    text.lines().next().and_then(parse_percent)
}

fn parse_percent(raw: &str) -> Option<f32> {
    let value: f32 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then_some(value.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("42\n"), Some(42.0));
        assert_eq!(parse_percent(" 7 %"), Some(7.0));
        assert_eq!(parse_percent("150"), Some(100.0));
        assert_eq!(parse_percent("[N/A]"), None);
        assert_eq!(parse_percent(""), None);
    }

    #[test]
    fn test_unsupported_probe_reports_nothing() {
        assert_eq!(GpuProbe::Unsupported.sample(), None);
    }

    #[test]
    fn test_sysfs_probe_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpu_busy_percent");
        std::fs::write(&path, "33\n").unwrap();
        assert_eq!(GpuProbe::Sysfs(path.clone()).sample(), Some(33.0));

        std::fs::remove_file(&path).unwrap();
        assert_eq!(GpuProbe::Sysfs(path).sample(), None);
    }
}
