//! Configuration management

pub mod color;

pub use color::{ColorPreset, Rgba, BACKGROUND_PRESETS, FOREGROUND_PRESETS};

use crate::constants::{app, scale};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User settings persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub version: u32,
    pub scale: f64,
    pub background_color: Rgba,
    pub foreground_color: Rgba,
    /// Top-left origin in screen space. `None` anchors to the top-right corner.
    pub position: Option<(f64, f64)>,
    pub show_seconds: bool,
    pub show_time_subtext: bool,
    pub show_network_stats: bool,
    pub show_cpu: bool,
    pub show_mem: bool,
    pub show_gpu: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: app::CONFIG_VERSION,
            scale: scale::DEFAULT_SCALE,
            background_color: color::DEFAULT_BACKGROUND,
            foreground_color: color::DEFAULT_FOREGROUND,
            position: None,
            show_seconds: true,
            show_time_subtext: true,
            show_network_stats: false,
            show_cpu: false,
            show_mem: false,
            show_gpu: false,
        }
    }
}

impl Configuration {
    pub fn shows_system_stats(&self) -> bool {
        self.show_cpu || self.show_mem || self.show_gpu
    }

    /// Snap `scale` to the step grid and clamp it to the allowed range.
    pub fn clamp_scale(value: f64) -> f64 {
        if !value.is_finite() {
            return scale::DEFAULT_SCALE;
        }
        let stepped = (value / scale::SCALE_STEP).round() * scale::SCALE_STEP;
        stepped.clamp(scale::MIN_SCALE, scale::MAX_SCALE)
    }

    pub fn can_grow(&self) -> bool {
        self.scale + scale::SCALE_STEP <= scale::MAX_SCALE + f64::EPSILON
    }

    pub fn can_shrink(&self) -> bool {
        self.scale - scale::SCALE_STEP >= scale::MIN_SCALE - f64::EPSILON
    }
}

/// Legacy widget sizes from before `scale` existed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LegacySize {
    Small,
    Medium,
    Large,
}

impl LegacySize {
    fn scale(self) -> f64 {
        match self {
            Self::Small => 0.5,
            Self::Medium => 1.0,
            Self::Large => 1.5,
        }
    }
}

/// On-disk shape: every key optional so partial documents merge over defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredDocument {
    version: Option<u32>,
    scale: Option<f64>,
    size: Option<LegacySize>,
    background_color: Option<Rgba>,
    foreground_color: Option<Rgba>,
    position: Option<(f64, f64)>,
    show_seconds: Option<bool>,
    show_time_subtext: Option<bool>,
    show_network_stats: Option<bool>,
    show_cpu: Option<bool>,
    show_mem: Option<bool>,
    show_gpu: Option<bool>,
}

impl StoredDocument {
    /// Version 0 documents may carry `size` instead of `scale`.
    fn migrate(mut self) -> Self {
        let version = self.version.unwrap_or(0);
        if version < 1 {
            if self.scale.is_none() {
                if let Some(size) = self.size {
                    log::info!("Migrating legacy size {:?} to scale {}", size, size.scale());
                    self.scale = Some(size.scale());
                }
            }
            self.version = Some(1);
        }
        self.size = None;
        self
    }

    fn into_configuration(self) -> Configuration {
        let defaults = Configuration::default();
        let scale = self
            .scale
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(defaults.scale);

        Configuration {
            version: app::CONFIG_VERSION,
            scale,
            background_color: self.background_color.unwrap_or(defaults.background_color),
            foreground_color: self.foreground_color.unwrap_or(defaults.foreground_color),
            position: self.position.filter(|(x, y)| x.is_finite() && y.is_finite()),
            show_seconds: self.show_seconds.unwrap_or(defaults.show_seconds),
            show_time_subtext: self.show_time_subtext.unwrap_or(defaults.show_time_subtext),
            show_network_stats: self.show_network_stats.unwrap_or(defaults.show_network_stats),
            show_cpu: self.show_cpu.unwrap_or(defaults.show_cpu),
            show_mem: self.show_mem.unwrap_or(defaults.show_mem),
            show_gpu: self.show_gpu.unwrap_or(defaults.show_gpu),
        }
    }
}

/// Parse a settings document, merging it over defaults.
pub fn parse_document(content: &str) -> Result<Configuration> {
    let stored: StoredDocument = serde_json::from_str(content)?;
    Ok(stored.migrate().into_configuration())
}

/// Reads and writes the settings document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/float-clock/config.json`
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::config("Cannot determine config directory"))?;

        Ok(Self::new(config_dir.join(app::APP_NAME).join(app::CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load configuration. Never fails: problems degrade to defaults.
    pub fn load(&self) -> Configuration {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No configuration at {:?}, using defaults", self.path);
                return Configuration::default();
            }
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", self.path, e);
                return Configuration::default();
            }
        };

        match parse_document(&content) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", self.path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed config {:?}: {}", self.path, e);
                Configuration::default()
            }
        }
    }

    /// Write the full document through a temp file and rename it into place.
    pub fn save(&self, config: &Configuration) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(config)?;

        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| app::CONFIG_FILE.into());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        std::fs::write(&tmp_path, content)
            .map_err(|e| AppError::config(format!("Failed to write config file: {}", e)))?;
        std::fs::rename(&tmp_path, &self.path)?;

        log::debug!("Saved configuration to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_legacy_size_only() {
        let config = parse_document(r#"{"size": "large"}"#).unwrap();
        let expected = Configuration {
            scale: 1.5,
            ..Configuration::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_explicit_scale_wins_over_size() {
        let config = parse_document(r#"{"size": "small", "scale": 2.0}"#).unwrap();
        assert_eq!(config.scale, 2.0);
    }

    #[test]
    fn test_versioned_document_ignores_size() {
        let config = parse_document(r#"{"version": 1, "size": "small"}"#).unwrap();
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn test_partial_and_unknown_keys() {
        let config = parse_document(
            r#"{"showCpu": true, "position": [10, 20.5], "theme": "ignored"}"#,
        )
        .unwrap();
        assert!(config.show_cpu);
        assert_eq!(config.position, Some((10.0, 20.5)));
        assert!(config.show_seconds);
        assert_eq!(config.background_color, color::DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_null_position() {
        let config = parse_document(r#"{"position": null}"#).unwrap();
        assert_eq!(config.position, None);
    }

    #[test]
    fn test_bad_scale_falls_back() {
        let config = parse_document(r#"{"scale": -1.0}"#).unwrap();
        assert_eq!(config.scale, scale::DEFAULT_SCALE);
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(Configuration::clamp_scale(0.1), scale::MIN_SCALE);
        assert_eq!(Configuration::clamp_scale(9.0), scale::MAX_SCALE);
        assert_eq!(Configuration::clamp_scale(1.1), 1.0);
        assert_eq!(Configuration::clamp_scale(1.2), 1.25);
        assert_eq!(Configuration::clamp_scale(f64::NAN), scale::DEFAULT_SCALE);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.json"));
        assert_eq!(store.load(), Configuration::default());

        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Configuration::default());

        std::fs::write(store.path(), r#"{"showCpu": "yes"}"#).unwrap();
        assert_eq!(store.load(), Configuration::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("float-clock").join("config.json"));

        let defaults = Configuration::default();
        store.save(&defaults).unwrap();
        assert_eq!(store.load(), defaults);

        let custom = Configuration {
            scale: 1.75,
            position: Some((120.0, 48.5)),
            background_color: Rgba::new(0.1, 0.2, 0.3, 0.4),
            show_network_stats: true,
            show_gpu: true,
            ..Configuration::default()
        };
        store.save(&custom).unwrap();
        assert_eq!(store.load(), custom);

        // no temp file left behind
        let leftovers: Vec<_> = std::fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_saved_keys_are_camel_case() {
        let json = serde_json::to_value(Configuration::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "version",
            "scale",
            "backgroundColor",
            "foregroundColor",
            "position",
            "showSeconds",
            "showTimeSubtext",
            "showNetworkStats",
            "showCpu",
            "showMem",
            "showGpu",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert!(obj["position"].is_null());
    }
}
