// Terminal presentation: one status line for the widget, the menu printed on demand,
// commands read from stdin.

use float_clock_core::{
    HostEvent, Label, LayoutResult, MenuAction, MenuEntry, MenuHost, Point, Rect, SurfaceStyle,
    WindowHost,
};
use log::{debug, info};
use std::io::{self, Write};

pub struct TerminalWindow {
    screen: Rect,
    frame: Option<Rect>,
    style: Option<SurfaceStyle>,
}

impl TerminalWindow {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            frame: None,
            style: None,
        }
    }

    fn redraw(&self, line: &str) {
        let mut out = io::stdout().lock();
        // clear the line, then draw in place
        let result = write!(out, "\r\x1b[2K{}", line).and_then(|_| out.flush());
        if let Err(e) = result {
            debug!("[terminal] write failed: {}", e);
        }
    }
}

impl WindowHost for TerminalWindow {
    fn screen_frame(&self) -> Rect {
        self.screen
    }

    fn apply_geometry(&mut self, frame: Rect, style: &SurfaceStyle, layout: &LayoutResult) {
        if self.frame.is_none() {
            info!("[terminal] surface created at {:?}", frame);
        } else {
            debug!(
                "[terminal] surface now {:?}, {} line(s), radius {:.1}",
                frame,
                layout.lines.len(),
                style.corner_radius
            );
        }
        self.frame = Some(frame);
        self.style = Some(*style);
    }

    fn move_to(&mut self, origin: Point) {
        if let Some(frame) = self.frame.as_mut() {
            *frame = frame.with_origin(origin);
        }
        debug!("[terminal] moved to ({:.0}, {:.0})", origin.x, origin.y);
    }

    fn apply_labels(&mut self, labels: &[Label]) {
        let line = labels
            .iter()
            .map(|label| {
                if label.opacity > 0.0 {
                    label.text.clone()
                } else {
                    " ".repeat(label.text.chars().count())
                }
            })
            .collect::<Vec<_>>()
            .join("  |  ");
        self.redraw(&line);
    }
}

#[derive(Default)]
pub struct TerminalMenu {
    entries: Vec<MenuEntry>,
}

impl MenuHost for TerminalMenu {
    fn set_menu(&mut self, menu: &[MenuEntry]) {
        self.entries = menu.to_vec();
    }

    fn show_menu(&mut self, at: Point) {
        debug!("[terminal] menu requested at ({:.0}, {:.0})", at.x, at.y);
        let mut text = String::from("\n");
        render_entries(&self.entries, 0, &mut text);
        eprint!("{}", text);
    }
}

fn render_entries(entries: &[MenuEntry], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        let item = match entry {
            MenuEntry::Separator => {
                out.push_str(&format!("{}---\n", indent));
                continue;
            }
            MenuEntry::Item(item) => item,
        };

        let mark = if item.checked { "[x]" } else { "[ ]" };
        let command = match (&item.action, &item.input) {
            (Some(action), _) => format!("  ({})", action),
            (None, Some(input)) => format!("  ({}:<{}>)", input.action("").id(), input.placeholder()),
            (None, None) => String::new(),
        };
        let disabled = if item.enabled { "" } else { "  (disabled)" };
        out.push_str(&format!("{}{} {}{}{}\n", indent, mark, item.label, command, disabled));
        render_entries(&item.submenu, depth + 1, out);
    }
}

/// Turn one line of user input into a host event.
pub fn parse_command(line: &str) -> Result<Option<HostEvent>, String> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let event = match words.next() {
        None => return Ok(None),
        Some("menu" | "m") => HostEvent::ContextMenuRequested { x: 0.0, y: 0.0 },
        Some("tick") => HostEvent::Tick,
        Some("drag") => {
            let mut delta = || -> Result<f64, String> {
                words
                    .next()
                    .ok_or_else(|| "usage: drag <dx> <dy>".to_string())?
                    .parse::<f64>()
                    .map_err(|e| format!("bad drag offset: {}", e))
                    .and_then(|v| {
                        if v.is_finite() {
                            Ok(v)
                        } else {
                            Err(format!("bad drag offset: {}", v))
                        }
                    })
            };
            let dx = delta()?;
            let dy = delta()?;
            HostEvent::Dragged { dx, dy }
        }
        Some("release") => HostEvent::DragEnded,
        Some("q" | "exit") => HostEvent::Quit,
        Some(_) => HostEvent::Action(line.parse::<MenuAction>()?),
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_clock_core::config::Configuration;
    use float_clock_core::menu::{build_menu, MenuContext};
    use float_clock_core::TimerPhase;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("drag -10 4.5"),
            Ok(Some(HostEvent::Dragged { dx: -10.0, dy: 4.5 }))
        );
        assert!(parse_command("drag 1").is_err());
        assert!(parse_command("drag nan 0").is_err());
        assert!(parse_command("drag 0 inf").is_err());
        assert_eq!(parse_command("release"), Ok(Some(HostEvent::DragEnded)));
        assert_eq!(
            parse_command("timer.start:25:00"),
            Ok(Some(HostEvent::Action(MenuAction::StartTimerInput(
                "25:00".to_string()
            ))))
        );
        assert_eq!(
            parse_command("quit"),
            Ok(Some(HostEvent::Action(MenuAction::Quit)))
        );
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_render_menu_lists_commands() {
        let ctx = MenuContext {
            timer_phase: TimerPhase::Inactive,
            login_registered: false,
        };
        let mut text = String::new();
        render_entries(&build_menu(&Configuration::default(), ctx), 0, &mut text);

        assert!(text.contains("[x] Show Seconds  (show.seconds)"));
        assert!(text.contains("  [ ] Pause  (timer.pause)  (disabled)"));
        assert!(text.contains("(timer.start:<H:MM:SS, MM:SS or seconds>)"));
        assert!(text.contains("(timer.preset:300)"));
    }
}
