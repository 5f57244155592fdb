//! Application constants and configuration values

/// Base widget metrics at scale 1.0
pub mod ui {
    pub const BASE_WIDTH: f64 = 200.0;
    pub const BASE_HEIGHT: f64 = 44.0;
    pub const BASE_FONT_SIZE: f64 = 24.0;
    pub const BASE_CORNER_RADIUS: f64 = 10.0;

    /// Inset from the screen corner when no position is stored
    pub const PADDING: f64 = 20.0;

    pub const MIN_FONT_SIZE: f64 = 8.0;
    pub const MIN_SUB_FONT_SIZE: f64 = 6.0;
    pub const SUB_FONT_RATIO: f64 = 0.35;
    pub const MIN_CORNER_RADIUS: f64 = 4.0;

    /// Height added per extra line, as a fraction of the base height
    pub const EXTRA_LINE_RATIO: f64 = 0.42;
    pub const LINE_HEIGHT_FACTOR: f64 = 1.25;
    pub const LINE_GAP_RATIO: f64 = 0.08;
    pub const MIN_LINE_GAP: f64 = 2.0;

    pub const DIMMED_OPACITY: f32 = 0.0;
}

/// Scale bounds
pub mod scale {
    pub const MIN_SCALE: f64 = 0.5;
    pub const MAX_SCALE: f64 = 3.0;
    pub const SCALE_STEP: f64 = 0.25;
    pub const DEFAULT_SCALE: f64 = 1.0;
}

/// Update intervals
pub mod intervals {
    pub const TICK_MS: u64 = 1000;
    /// GPU utilization is sampled once every N ticks
    pub const GPU_SAMPLE_EVERY: u64 = 3;
    pub const GPU_PROBE_TIMEOUT_MS: u64 = 500;
}

/// Timer presets offered in the menu, in seconds
pub const TIMER_PRESETS: [u64; 7] = [60, 5 * 60, 10 * 60, 15 * 60, 25 * 60, 30 * 60, 60 * 60];

/// Application metadata
pub mod app {
    pub const APP_NAME: &str = "float-clock";
    pub const CONFIG_FILE: &str = "config.json";
    pub const CONFIG_VERSION: u32 = 1;
    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const LOG_FILE_MAX_SIZE: u64 = 10_000_000; // 10MB
    pub const LOG_FILE_MAX_COUNT: usize = 5;
}
