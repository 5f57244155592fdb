//! The display controller: owns all mutable state and reconciles it with the
//! window and menu hosts.

use crate::config::{ConfigStore, Configuration, BACKGROUND_PRESETS, FOREGROUND_PRESETS};
use crate::constants::{scale, ui};
use crate::geometry::{Point, Rect};
use crate::host::{ControlFlow, HostEvent, Label, MenuHost, SurfaceStyle, WindowHost};
use crate::layout::{self, LayoutResult, LineRole};
use crate::login::LoginItemRegistrar;
use crate::menu::{self, MenuAction, MenuContext};
use crate::metrics::{MetricSource, MetricsSampler};
use crate::timer::{self, TimerEngine, TimerEvent, TimerPhase, TimerState};
use chrono::{Local, NaiveTime};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Which point of the window stays put when its size changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizeAnchor {
    Origin,
    Center,
}

pub struct DisplayController<W, M, S, L>
where
    W: WindowHost,
    M: MenuHost,
    S: MetricSource,
    L: LoginItemRegistrar,
{
    store: ConfigStore,
    config: Configuration,
    timer: TimerEngine,
    sampler: MetricsSampler<S>,
    window: W,
    menu: M,
    login: L,
    executable: PathBuf,

    layout: LayoutResult,
    /// Window frame in screen space
    frame: Rect,
    dragging: bool,
    /// Resize held back until the current drag ends
    pending_relayout: Option<ResizeAnchor>,
}

impl<W, M, S, L> DisplayController<W, M, S, L>
where
    W: WindowHost,
    M: MenuHost,
    S: MetricSource,
    L: LoginItemRegistrar,
{
    pub fn new(
        store: ConfigStore,
        window: W,
        menu: M,
        source: S,
        login: L,
        executable: PathBuf,
    ) -> Self {
        let config = store.load();
        let timer = TimerEngine::new();
        let layout = layout::compute(&config, timer.state());
        let frame = match config.position {
            Some((x, y)) => Rect::new(x, y, layout.width, layout.height),
            None => anchored_frame(&window, &layout),
        };

        Self {
            store,
            config,
            timer,
            sampler: MetricsSampler::new(source),
            window,
            menu,
            login,
            executable,
            layout,
            frame,
            dragging: false,
            pending_relayout: None,
        }
    }

    /// Create the surface and install the first menu.
    pub fn start(&mut self) {
        self.start_at(Local::now().time());
    }

    pub fn start_at(&mut self, now: NaiveTime) {
        info!(
            "Starting at {:?} (scale {}, anchored: {})",
            self.frame,
            self.config.scale,
            self.config.position.is_none()
        );
        self.push_geometry();
        self.push_labels(now);
        self.rebuild_menu();
    }

    pub fn handle_event(&mut self, event: HostEvent) -> ControlFlow {
        self.handle_event_at(event, Local::now().time())
    }

    /// Single entry point for every host event.
    pub fn handle_event_at(&mut self, event: HostEvent, now: NaiveTime) -> ControlFlow {
        match event {
            HostEvent::Tick => {
                self.tick(now);
                ControlFlow::Continue
            }
            HostEvent::Action(action) => self.handle_action(action, now),
            HostEvent::DragStarted => {
                self.dragging = true;
                ControlFlow::Continue
            }
            HostEvent::Dragged { dx, dy } => {
                if !dx.is_finite() || !dy.is_finite() {
                    debug!("Ignoring drag offset ({}, {})", dx, dy);
                    return ControlFlow::Continue;
                }
                self.dragging = true;
                self.frame = self.frame.with_origin(self.frame.origin().offset(dx, dy));
                self.window.move_to(self.frame.origin());
                ControlFlow::Continue
            }
            HostEvent::DragEnded => {
                self.end_drag(now);
                ControlFlow::Continue
            }
            HostEvent::ContextMenuRequested { x, y } => {
                self.menu.show_menu(Point::new(x, y));
                ControlFlow::Continue
            }
            HostEvent::Quit => {
                info!("Quit requested");
                ControlFlow::Exit
            }
        }
    }

    fn tick(&mut self, now: NaiveTime) {
        let event = self.timer.advance();
        if event == TimerEvent::Finished {
            info!("Timer finished after {}s", self.timer.state().total_seconds);
            self.rebuild_menu();
        }

        self.sampler.poll(&self.config);

        let roles = layout::visible_lines(&self.config, self.timer.state());
        if roles != self.layout.roles() {
            self.request_relayout(ResizeAnchor::Origin);
        }
        self.push_labels(now);
    }

    fn end_drag(&mut self, now: NaiveTime) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        if let Some(anchor) = self.pending_relayout.take() {
            self.relayout(anchor);
            self.push_labels(now);
        }
        self.config.position = Some((self.frame.x, self.frame.y));
        debug!("Drag ended at {:?}", self.frame.origin());
        self.persist();
        self.rebuild_menu();
    }

    fn handle_action(&mut self, action: MenuAction, now: NaiveTime) -> ControlFlow {
        debug!("Menu action: {}", action);
        let before = self.config.clone();
        let mut anchor = ResizeAnchor::Origin;

        match action {
            MenuAction::StartTimer(seconds) => self.start_timer(seconds),
            MenuAction::StartTimerInput(text) => match timer::parse_duration(&text) {
                Some(seconds) => self.start_timer(seconds),
                None => debug!("Ignoring timer input {:?}", text),
            },
            MenuAction::PauseTimer => {
                self.timer.pause();
            }
            MenuAction::ResumeTimer => {
                self.timer.resume();
            }
            MenuAction::ResetTimer => self.timer.reset(),
            MenuAction::ToggleSeconds => self.config.show_seconds = !self.config.show_seconds,
            MenuAction::ToggleTimeSubtext => {
                self.config.show_time_subtext = !self.config.show_time_subtext
            }
            MenuAction::ToggleNetwork => {
                self.config.show_network_stats = !self.config.show_network_stats
            }
            MenuAction::ToggleCpu => self.config.show_cpu = !self.config.show_cpu,
            MenuAction::ToggleMem => self.config.show_mem = !self.config.show_mem,
            MenuAction::ToggleGpu => self.config.show_gpu = !self.config.show_gpu,
            MenuAction::IncreaseScale => {
                anchor = ResizeAnchor::Center;
                self.set_scale(self.config.scale + scale::SCALE_STEP);
            }
            MenuAction::DecreaseScale => {
                anchor = ResizeAnchor::Center;
                self.set_scale(self.config.scale - scale::SCALE_STEP);
            }
            MenuAction::ResetScale => {
                anchor = ResizeAnchor::Center;
                self.set_scale(scale::DEFAULT_SCALE);
            }
            MenuAction::SetBackground(value) => match menu::resolve_color(&BACKGROUND_PRESETS, &value) {
                Some(color) => self.config.background_color = color,
                None => debug!("Ignoring background color {:?}", value),
            },
            MenuAction::SetForeground(value) => match menu::resolve_color(&FOREGROUND_PRESETS, &value) {
                Some(color) => self.config.foreground_color = color,
                None => debug!("Ignoring text color {:?}", value),
            },
            MenuAction::ResetPosition if self.dragging => {
                debug!("Ignoring position reset during a drag");
            }
            MenuAction::ResetPosition => {
                self.config.position = None;
                self.frame = anchored_frame(&self.window, &self.layout);
            }
            MenuAction::ToggleLoginItem => self.toggle_login_item(),
            MenuAction::Quit => {
                info!("Quit requested from menu");
                return ControlFlow::Exit;
            }
        }

        if anchor == ResizeAnchor::Center && self.config.scale != before.scale {
            // a resize around the center moves the origin, which becomes the stored position
            if self.request_relayout(ResizeAnchor::Center) {
                self.config.position = Some((self.frame.x, self.frame.y));
            }
        } else {
            self.request_relayout(ResizeAnchor::Origin);
        }

        if self.config != before {
            self.persist();
        }
        self.push_labels(now);
        self.rebuild_menu();
        ControlFlow::Continue
    }

    /// A chosen duration always replaces whatever timer is running.
    fn start_timer(&mut self, seconds: u64) {
        if seconds == 0 {
            debug!("Ignoring zero-length timer");
            return;
        }
        self.timer.reset();
        let duration = i64::try_from(seconds).unwrap_or(i64::MAX);
        if self.timer.start(duration) {
            info!("Timer started for {}s", seconds);
        }
    }

    fn set_scale(&mut self, value: f64) {
        let clamped = Configuration::clamp_scale(value);
        if clamped != self.config.scale {
            info!("Scale {} -> {}", self.config.scale, clamped);
            self.config.scale = clamped;
        }
    }

    fn toggle_login_item(&mut self) {
        let result = if self.login.is_registered() {
            self.login.remove()
        } else {
            self.login.install(&self.executable)
        };
        if let Err(e) = result {
            warn!("Failed to update login item: {}", e);
        }
    }

    /// Relayout now, or once the drag in progress ends. Returns whether it ran.
    fn request_relayout(&mut self, anchor: ResizeAnchor) -> bool {
        if self.dragging {
            // a center-anchored resize wins over an origin-anchored one
            if self.pending_relayout != Some(ResizeAnchor::Center) {
                self.pending_relayout = Some(anchor);
            }
            return false;
        }
        self.relayout(anchor);
        true
    }

    fn relayout(&mut self, anchor: ResizeAnchor) {
        let layout = layout::compute(&self.config, self.timer.state());
        let (w, h) = (layout.width, layout.height);
        self.frame = match anchor {
            ResizeAnchor::Origin => Rect::new(self.frame.x, self.frame.y, w, h),
            ResizeAnchor::Center => self.frame.resized_around_center(w, h),
        };
        self.layout = layout;
        self.push_geometry();
    }

    fn push_geometry(&mut self) {
        let style = SurfaceStyle {
            background: self.config.background_color,
            corner_radius: self.layout.corner_radius,
        };
        self.window.apply_geometry(self.frame, &style, &self.layout);
    }

    fn push_labels(&mut self, now: NaiveTime) {
        let labels = self.labels(now);
        self.window.apply_labels(&labels);
    }

    fn rebuild_menu(&mut self) {
        let ctx = MenuContext {
            timer_phase: self.timer.phase(),
            login_registered: self.login.is_registered(),
        };
        let entries = menu::build_menu(&self.config, ctx);
        self.menu.set_menu(&entries);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.config) {
            warn!("Failed to save configuration: {}", e);
        }
    }

    /// Text and style for every visible line
    pub fn labels(&self, now: NaiveTime) -> Vec<Label> {
        let state = self.timer.state();
        let clock = format_clock(now, self.config.show_seconds);

        self.layout
            .lines
            .iter()
            .map(|line| {
                let text = match line.role {
                    LineRole::Primary if state.is_active => {
                        timer::format_countdown(state.remaining_seconds, self.config.show_seconds)
                    }
                    LineRole::Primary | LineRole::Subtext => clock.clone(),
                    LineRole::Network => self.sampler.network_line(),
                    LineRole::SystemStats => self.sampler.stats_line(&self.config),
                };
                let opacity = if line.role.is_primary() && state.is_finished && !state.flash_on {
                    ui::DIMMED_OPACITY
                } else {
                    1.0
                };
                Label {
                    role: line.role,
                    text,
                    font_size: line.font_size,
                    frame: line.frame,
                    color: self.config.foreground_color,
                    opacity,
                }
            })
            .collect()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn timer_state(&self) -> &TimerState {
        self.timer.state()
    }

    pub fn timer_phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn menu(&self) -> &M {
        &self.menu
    }

    pub fn login(&self) -> &L {
        &self.login
    }
}

/// Top-right corner of the active screen, inset by the padding
fn anchored_frame<W: WindowHost>(window: &W, layout: &LayoutResult) -> Rect {
    let screen = window.screen_frame();
    Rect::new(
        screen.x + screen.w - layout.width - ui::PADDING,
        screen.y + ui::PADDING,
        layout.width,
        layout.height,
    )
}

pub fn format_clock(now: NaiveTime, show_seconds: bool) -> String {
    if show_seconds {
        now.format("%H:%M:%S").to_string()
    } else {
        now.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        let t = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(format_clock(t, true), "09:05:07");
        assert_eq!(format_clock(t, false), "09:05");
    }
}
