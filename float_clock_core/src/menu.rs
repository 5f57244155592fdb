//! Declarative menu description and the actions it can trigger

use crate::config::color::{find_preset, ColorPreset};
use crate::config::{Configuration, BACKGROUND_PRESETS, FOREGROUND_PRESETS};
use crate::constants::TIMER_PRESETS;
use crate::timer::{format_preset, TimerPhase};
use std::fmt;
use std::str::FromStr;

/// What a chosen menu item asks for. Each variant has a stable string id,
/// with an optional `:value` suffix, so hosts can pass them around as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    StartTimer(u64),
    /// Raw text from the inline duration field
    StartTimerInput(String),
    PauseTimer,
    ResumeTimer,
    ResetTimer,
    ToggleSeconds,
    ToggleTimeSubtext,
    ToggleNetwork,
    ToggleCpu,
    ToggleMem,
    ToggleGpu,
    IncreaseScale,
    DecreaseScale,
    ResetScale,
    /// Preset name or `#RRGGBB[AA]`
    SetBackground(String),
    SetForeground(String),
    ResetPosition,
    ToggleLoginItem,
    Quit,
}

impl MenuAction {
    pub fn id(&self) -> &'static str {
        match self {
            Self::StartTimer(_) => "timer.preset",
            Self::StartTimerInput(_) => "timer.start",
            Self::PauseTimer => "timer.pause",
            Self::ResumeTimer => "timer.resume",
            Self::ResetTimer => "timer.reset",
            Self::ToggleSeconds => "show.seconds",
            Self::ToggleTimeSubtext => "show.subtext",
            Self::ToggleNetwork => "show.network",
            Self::ToggleCpu => "show.cpu",
            Self::ToggleMem => "show.mem",
            Self::ToggleGpu => "show.gpu",
            Self::IncreaseScale => "scale.up",
            Self::DecreaseScale => "scale.down",
            Self::ResetScale => "scale.reset",
            Self::SetBackground(_) => "background",
            Self::SetForeground(_) => "foreground",
            Self::ResetPosition => "position.reset",
            Self::ToggleLoginItem => "login.toggle",
            Self::Quit => "quit",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTimer(seconds) => write!(f, "{}:{}", self.id(), seconds),
            Self::StartTimerInput(value)
            | Self::SetBackground(value)
            | Self::SetForeground(value) => write!(f, "{}:{}", self.id(), value),
            _ => write!(f, "{}", self.id()),
        }
    }
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (id, value) = match s.split_once(':') {
            Some((id, value)) => (id, Some(value.trim())),
            None => (s, None),
        };

        let action = match (id, value) {
            ("timer.preset", Some(v)) => Self::StartTimer(
                v.parse()
                    .map_err(|_| format!("Invalid preset seconds: {}", v))?,
            ),
            ("timer.start", Some(v)) => Self::StartTimerInput(v.to_string()),
            ("timer.pause", None) => Self::PauseTimer,
            ("timer.resume", None) => Self::ResumeTimer,
            ("timer.reset", None) => Self::ResetTimer,
            ("show.seconds", None) => Self::ToggleSeconds,
            ("show.subtext", None) => Self::ToggleTimeSubtext,
            ("show.network", None) => Self::ToggleNetwork,
            ("show.cpu", None) => Self::ToggleCpu,
            ("show.mem", None) => Self::ToggleMem,
            ("show.gpu", None) => Self::ToggleGpu,
            ("scale.up", None) => Self::IncreaseScale,
            ("scale.down", None) => Self::DecreaseScale,
            ("scale.reset", None) => Self::ResetScale,
            ("background", Some(v)) if !v.is_empty() => Self::SetBackground(v.to_string()),
            ("foreground", Some(v)) if !v.is_empty() => Self::SetForeground(v.to_string()),
            ("position.reset", None) => Self::ResetPosition,
            ("login.toggle", None) => Self::ToggleLoginItem,
            ("quit", None) => Self::Quit,
            _ => return Err(format!("Unknown menu action: {}", s)),
        };
        Ok(action)
    }
}

/// Inline text field embedded in a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    TimerDuration,
    BackgroundHex,
    ForegroundHex,
}

impl MenuInput {
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::TimerDuration => "H:MM:SS, MM:SS or seconds",
            Self::BackgroundHex | Self::ForegroundHex => "#RRGGBBAA",
        }
    }

    /// Action to dispatch once the user confirms the field.
    pub fn action(&self, text: &str) -> MenuAction {
        let text = text.trim().to_string();
        match self {
            Self::TimerDuration => MenuAction::StartTimerInput(text),
            Self::BackgroundHex => MenuAction::SetBackground(text),
            Self::ForegroundHex => MenuAction::SetForeground(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub action: Option<MenuAction>,
    pub enabled: bool,
    pub checked: bool,
    pub submenu: Vec<MenuEntry>,
    pub input: Option<MenuInput>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action: Some(action),
            enabled: true,
            checked: false,
            submenu: Vec::new(),
            input: None,
        }
    }

    pub fn submenu(label: impl Into<String>, entries: Vec<MenuEntry>) -> Self {
        Self {
            label: label.into(),
            action: None,
            enabled: true,
            checked: false,
            submenu: entries,
            input: None,
        }
    }

    pub fn input(label: impl Into<String>, input: MenuInput) -> Self {
        Self {
            label: label.into(),
            action: None,
            enabled: true,
            checked: false,
            submenu: Vec::new(),
            input: Some(input),
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        MenuEntry::Item(item)
    }
}

impl MenuEntry {
    /// Depth-first search by action id, for hosts and tests.
    pub fn find<'a>(entries: &'a [MenuEntry], id: &str) -> Option<&'a MenuItem> {
        entries.iter().find_map(|entry| match entry {
            MenuEntry::Item(item) => {
                if item.action.as_ref().map(|a| a.id()) == Some(id) {
                    Some(item)
                } else {
                    MenuEntry::find(&item.submenu, id)
                }
            }
            MenuEntry::Separator => None,
        })
    }
}

/// Inputs the menu reflects besides the configuration
#[derive(Debug, Clone, Copy)]
pub struct MenuContext {
    pub timer_phase: TimerPhase,
    pub login_registered: bool,
}

pub fn build_menu(config: &Configuration, ctx: MenuContext) -> Vec<MenuEntry> {
    vec![
        MenuItem::submenu("Timer", timer_entries(ctx.timer_phase)).into(),
        MenuEntry::Separator,
        MenuItem::new("Show Seconds", MenuAction::ToggleSeconds)
            .checked(config.show_seconds)
            .into(),
        MenuItem::new("Show Time Under Timer", MenuAction::ToggleTimeSubtext)
            .checked(config.show_time_subtext)
            .into(),
        MenuItem::submenu("Stats", stats_entries(config)).into(),
        MenuItem::submenu("Size", size_entries(config)).into(),
        MenuItem::submenu(
            "Background",
            color_entries(
                &BACKGROUND_PRESETS,
                config,
                true,
                MenuInput::BackgroundHex,
            ),
        )
        .into(),
        MenuItem::submenu(
            "Text Color",
            color_entries(
                &FOREGROUND_PRESETS,
                config,
                false,
                MenuInput::ForegroundHex,
            ),
        )
        .into(),
        MenuItem::new("Reset Position", MenuAction::ResetPosition)
            .enabled(config.position.is_some())
            .into(),
        MenuEntry::Separator,
        MenuItem::new("Start at Login", MenuAction::ToggleLoginItem)
            .checked(ctx.login_registered)
            .into(),
        MenuItem::new("Quit", MenuAction::Quit).into(),
    ]
}

fn timer_entries(phase: TimerPhase) -> Vec<MenuEntry> {
    let mut entries: Vec<MenuEntry> =
        vec![MenuItem::input("Start Timer", MenuInput::TimerDuration).into()];
    entries.extend(
        TIMER_PRESETS
            .iter()
            .map(|&secs| MenuItem::new(format_preset(secs), MenuAction::StartTimer(secs)).into()),
    );
    entries.push(MenuEntry::Separator);
    entries.push(
        MenuItem::new("Pause", MenuAction::PauseTimer)
            .enabled(phase == TimerPhase::Running)
            .into(),
    );
    entries.push(
        MenuItem::new("Resume", MenuAction::ResumeTimer)
            .enabled(phase == TimerPhase::Paused)
            .into(),
    );
    entries.push(
        MenuItem::new("Reset", MenuAction::ResetTimer)
            .enabled(phase != TimerPhase::Inactive)
            .into(),
    );
    entries
}

fn stats_entries(config: &Configuration) -> Vec<MenuEntry> {
    vec![
        MenuItem::new("Network", MenuAction::ToggleNetwork)
            .checked(config.show_network_stats)
            .into(),
        MenuItem::new("CPU", MenuAction::ToggleCpu)
            .checked(config.show_cpu)
            .into(),
        MenuItem::new("Memory", MenuAction::ToggleMem)
            .checked(config.show_mem)
            .into(),
        MenuItem::new("GPU", MenuAction::ToggleGpu)
            .checked(config.show_gpu)
            .into(),
    ]
}

fn size_entries(config: &Configuration) -> Vec<MenuEntry> {
    vec![
        MenuItem::new("Larger", MenuAction::IncreaseScale)
            .enabled(config.can_grow())
            .into(),
        MenuItem::new("Smaller", MenuAction::DecreaseScale)
            .enabled(config.can_shrink())
            .into(),
        MenuItem::new(format!("Reset ({:.0}%)", config.scale * 100.0), MenuAction::ResetScale)
            .into(),
    ]
}

fn color_entries(
    presets: &[ColorPreset],
    config: &Configuration,
    background: bool,
    input: MenuInput,
) -> Vec<MenuEntry> {
    let current = if background {
        config.background_color
    } else {
        config.foreground_color
    };
    let mut entries: Vec<MenuEntry> = presets
        .iter()
        .map(|preset| {
            let action = if background {
                MenuAction::SetBackground(preset.name.to_string())
            } else {
                MenuAction::SetForeground(preset.name.to_string())
            };
            MenuItem::new(preset.label, action)
                .checked(preset.color.approx_eq(&current))
                .into()
        })
        .collect();

    let is_custom = !presets.iter().any(|p| p.color.approx_eq(&current));
    entries.push(MenuEntry::Separator);
    entries.push(
        MenuItem::input(
            if is_custom {
                format!("Custom ({})", current.to_hex())
            } else {
                "Custom".to_string()
            },
            input,
        )
        .checked(is_custom)
        .into(),
    );
    entries
}

/// Resolve a preset name or hex literal to a color.
pub fn resolve_color(presets: &[ColorPreset], value: &str) -> Option<crate::config::Rgba> {
    find_preset(presets, value)
        .map(|p| p.color)
        .or_else(|| crate::config::Rgba::from_hex(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(phase: TimerPhase) -> MenuContext {
        MenuContext {
            timer_phase: phase,
            login_registered: false,
        }
    }

    #[test]
    fn test_action_ids_round_trip() {
        let actions = vec![
            MenuAction::StartTimer(300),
            MenuAction::StartTimerInput("1:30".to_string()),
            MenuAction::PauseTimer,
            MenuAction::ResumeTimer,
            MenuAction::ResetTimer,
            MenuAction::ToggleSeconds,
            MenuAction::ToggleTimeSubtext,
            MenuAction::ToggleNetwork,
            MenuAction::ToggleCpu,
            MenuAction::ToggleMem,
            MenuAction::ToggleGpu,
            MenuAction::IncreaseScale,
            MenuAction::DecreaseScale,
            MenuAction::ResetScale,
            MenuAction::SetBackground("#11223344".to_string()),
            MenuAction::SetForeground("amber".to_string()),
            MenuAction::ResetPosition,
            MenuAction::ToggleLoginItem,
            MenuAction::Quit,
        ];
        for action in actions {
            let text = action.to_string();
            assert_eq!(text.parse::<MenuAction>(), Ok(action), "{}", text);
        }
    }

    #[test]
    fn test_duration_input_keeps_colons() {
        assert_eq!(
            "timer.start:01:02:03".parse::<MenuAction>(),
            Ok(MenuAction::StartTimerInput("01:02:03".to_string()))
        );
    }

    #[test]
    fn test_unknown_actions_rejected() {
        assert!("nope".parse::<MenuAction>().is_err());
        assert!("timer.preset:abc".parse::<MenuAction>().is_err());
        assert!("timer.pause:1".parse::<MenuAction>().is_err());
        assert!("background:".parse::<MenuAction>().is_err());
    }

    #[test]
    fn test_timer_items_follow_phase() {
        let menu = build_menu(&Configuration::default(), ctx(TimerPhase::Inactive));
        assert!(!MenuEntry::find(&menu, "timer.pause").unwrap().enabled);
        assert!(!MenuEntry::find(&menu, "timer.reset").unwrap().enabled);

        let menu = build_menu(&Configuration::default(), ctx(TimerPhase::Paused));
        assert!(!MenuEntry::find(&menu, "timer.pause").unwrap().enabled);
        assert!(MenuEntry::find(&menu, "timer.resume").unwrap().enabled);
        assert!(MenuEntry::find(&menu, "timer.reset").unwrap().enabled);
    }

    #[test]
    fn test_checkmarks_reflect_config() {
        let config = Configuration {
            show_cpu: true,
            show_seconds: false,
            ..Configuration::default()
        };
        let menu = build_menu(&config, ctx(TimerPhase::Inactive));
        assert!(MenuEntry::find(&menu, "show.cpu").unwrap().checked);
        assert!(!MenuEntry::find(&menu, "show.seconds").unwrap().checked);
        assert!(!MenuEntry::find(&menu, "position.reset").unwrap().enabled);
    }

    #[test]
    fn test_scale_bounds_disable_items() {
        let config = Configuration {
            scale: crate::constants::scale::MAX_SCALE,
            ..Configuration::default()
        };
        let menu = build_menu(&config, ctx(TimerPhase::Inactive));
        assert!(!MenuEntry::find(&menu, "scale.up").unwrap().enabled);
        assert!(MenuEntry::find(&menu, "scale.down").unwrap().enabled);
    }

    #[test]
    fn test_timer_input_and_presets_present() {
        let menu = build_menu(&Configuration::default(), ctx(TimerPhase::Inactive));
        let MenuEntry::Item(timer) = &menu[0] else {
            panic!("timer submenu missing");
        };
        assert_eq!(timer.label, "Timer");
        let MenuEntry::Item(field) = &timer.submenu[0] else {
            panic!("input missing");
        };
        assert_eq!(field.input, Some(MenuInput::TimerDuration));
        assert_eq!(
            MenuInput::TimerDuration.action(" 5:00 "),
            MenuAction::StartTimerInput("5:00".to_string())
        );
        let presets = timer
            .submenu
            .iter()
            .filter(|e| matches!(e, MenuEntry::Item(i) if matches!(i.action, Some(MenuAction::StartTimer(_)))))
            .count();
        assert_eq!(presets, TIMER_PRESETS.len());
    }

    #[test]
    fn test_resolve_color() {
        assert_eq!(
            resolve_color(&BACKGROUND_PRESETS, "light"),
            Some(BACKGROUND_PRESETS[2].color)
        );
        assert!(resolve_color(&BACKGROUND_PRESETS, "#000000").is_some());
        assert!(resolve_color(&BACKGROUND_PRESETS, "chartreuse").is_none());
    }
}
