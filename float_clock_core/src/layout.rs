//! Window geometry and line stacking
//!
//! Everything here is a pure function of the configuration and timer state.
//! The result is a value that the controller hands to the window host; no
//! label or window object is ever mutated in place.

use crate::config::Configuration;
use crate::constants::ui;
use crate::geometry::Rect;
use crate::timer::TimerState;

/// Which text a label region carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Current time, or the countdown while a timer is active
    Primary,
    /// Current time shown under an active countdown
    Subtext,
    Network,
    SystemStats,
}

impl LineRole {
    pub fn is_primary(self) -> bool {
        self == LineRole::Primary
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    pub role: LineRole,
    pub font_size: f64,
    /// Relative to the window's top-left corner
    pub frame: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub font_size: f64,
    pub sub_font_size: f64,
    pub lines: Vec<LineLayout>,
}

impl LayoutResult {
    pub fn extra_line_count(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn roles(&self) -> Vec<LineRole> {
        self.lines.iter().map(|l| l.role).collect()
    }
}

pub fn font_size(scale: f64) -> f64 {
    (ui::BASE_FONT_SIZE * scale).max(ui::MIN_FONT_SIZE)
}

pub fn sub_font_size(font_size: f64) -> f64 {
    (font_size * ui::SUB_FONT_RATIO).max(ui::MIN_SUB_FONT_SIZE)
}

/// Visible lines, top to bottom. Primary always comes first.
pub fn visible_lines(config: &Configuration, timer: &TimerState) -> Vec<LineRole> {
    let mut roles = vec![LineRole::Primary];
    if timer.is_active && config.show_time_subtext {
        roles.push(LineRole::Subtext);
    }
    if config.show_network_stats {
        roles.push(LineRole::Network);
    }
    if config.shows_system_stats() {
        roles.push(LineRole::SystemStats);
    }
    roles
}

pub fn compute(config: &Configuration, timer: &TimerState) -> LayoutResult {
    let scale = config.scale;
    let font_size = font_size(scale);
    let sub_font_size = sub_font_size(font_size);
    let roles = visible_lines(config, timer);
    let extra = roles.len().saturating_sub(1) as f64;

    let width = ui::BASE_WIDTH * scale;
    let height = ui::BASE_HEIGHT * scale * (1.0 + ui::EXTRA_LINE_RATIO * extra);
    let corner_radius = (ui::BASE_CORNER_RADIUS * scale).max(ui::MIN_CORNER_RADIUS);
    let gap = (font_size * ui::LINE_GAP_RATIO).max(ui::MIN_LINE_GAP);

    let sizes: Vec<f64> = roles
        .iter()
        .map(|role| {
            if role.is_primary() {
                font_size
            } else {
                sub_font_size
            }
        })
        .collect();
    let block_height: f64 = sizes.iter().map(|s| s * ui::LINE_HEIGHT_FACTOR).sum::<f64>()
        + gap * extra;

    let mut y = (height - block_height) / 2.0;
    let mut lines = Vec::with_capacity(roles.len());
    for (role, size) in roles.into_iter().zip(sizes) {
        let line_height = size * ui::LINE_HEIGHT_FACTOR;
        lines.push(LineLayout {
            role,
            font_size: size,
            frame: Rect::new(0.0, y, width, line_height),
        });
        y += line_height + gap;
    }

    LayoutResult {
        width,
        height,
        corner_radius,
        font_size,
        sub_font_size,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::scale::{MAX_SCALE, MIN_SCALE, SCALE_STEP};

    fn active_timer() -> TimerState {
        TimerState {
            total_seconds: 60,
            remaining_seconds: 60,
            is_active: true,
            is_running: true,
            ..TimerState::default()
        }
    }

    #[test]
    fn test_default_geometry() {
        let layout = compute(&Configuration::default(), &TimerState::default());
        assert_eq!(layout.width, 200.0);
        assert_eq!(layout.height, 44.0);
        assert_eq!(layout.corner_radius, 10.0);
        assert_eq!(layout.font_size, 24.0);
        assert_eq!(layout.extra_line_count(), 0);
        assert_eq!(layout.roles(), vec![LineRole::Primary]);
    }

    #[test]
    fn test_minimum_sizes() {
        assert_eq!(font_size(0.1), 8.0);
        assert_eq!(sub_font_size(8.0), 6.0);
        let config = Configuration {
            scale: 0.2,
            ..Configuration::default()
        };
        assert_eq!(compute(&config, &TimerState::default()).corner_radius, 4.0);
    }

    #[test]
    fn test_dimensions_monotonic_in_scale() {
        let timer = active_timer();
        let mut previous: Option<LayoutResult> = None;
        let mut scale = MIN_SCALE;
        while scale <= MAX_SCALE + 1e-9 {
            let config = Configuration {
                scale,
                show_network_stats: true,
                show_cpu: true,
                ..Configuration::default()
            };
            let layout = compute(&config, &timer);
            if let Some(prev) = &previous {
                assert!(layout.width >= prev.width);
                assert!(layout.height >= prev.height);
                assert!(layout.corner_radius >= prev.corner_radius);
                assert!(layout.font_size >= prev.font_size);
            }
            previous = Some(layout);
            scale += SCALE_STEP;
        }
    }

    #[test]
    fn test_extra_lines_height_ratio() {
        let timer = active_timer();
        let with_all = Configuration {
            show_network_stats: true,
            show_cpu: true,
            ..Configuration::default()
        };
        let without = Configuration {
            show_time_subtext: false,
            ..Configuration::default()
        };

        let full = compute(&with_all, &timer);
        let bare = compute(&without, &TimerState::default());
        assert_eq!(full.extra_line_count(), 3);
        assert_eq!(bare.extra_line_count(), 0);
        assert!((full.height / bare.height - (1.0 + 0.42 * 3.0)).abs() < 1e-9);
        assert_eq!(full.width, bare.width);
        assert_eq!(
            full.roles(),
            vec![
                LineRole::Primary,
                LineRole::Subtext,
                LineRole::Network,
                LineRole::SystemStats
            ]
        );
    }

    #[test]
    fn test_subtext_needs_active_timer() {
        let config = Configuration::default();
        assert_eq!(
            visible_lines(&config, &TimerState::default()),
            vec![LineRole::Primary]
        );
        assert_eq!(
            visible_lines(&config, &active_timer()),
            vec![LineRole::Primary, LineRole::Subtext]
        );
    }

    #[test]
    fn test_lines_stacked_and_centered() {
        let config = Configuration {
            show_mem: true,
            show_network_stats: true,
            scale: 2.0,
            ..Configuration::default()
        };
        let layout = compute(&config, &active_timer());
        let first = layout.lines.first().unwrap();
        let last = layout.lines.last().unwrap();

        assert!(first.role.is_primary());
        assert_eq!(first.font_size, layout.font_size);
        for pair in layout.lines.windows(2) {
            assert!(pair[1].frame.y > pair[0].frame.y + pair[0].frame.h);
        }
        let top_margin = first.frame.y;
        let bottom_margin = layout.height - (last.frame.y + last.frame.h);
        assert!((top_margin - bottom_margin).abs() < 1e-9);
        assert!(top_margin >= 0.0);
        for line in &layout.lines {
            assert_eq!(line.frame.w, layout.width);
        }
    }
}
