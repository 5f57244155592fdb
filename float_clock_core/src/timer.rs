//! Countdown timer state machine

/// Runtime countdown state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub is_active: bool,
    pub is_running: bool,
    pub is_finished: bool,
    pub flash_on: bool,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            total_seconds: 0,
            remaining_seconds: 0,
            is_active: false,
            is_running: false,
            is_finished: false,
            flash_on: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Inactive,
    Running,
    Paused,
    Finished,
}

/// What a single `advance` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Idle,
    Ticked,
    Finished,
    Flashed,
}

#[derive(Debug, Default)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> TimerPhase {
        let s = &self.state;
        if !s.is_active {
            TimerPhase::Inactive
        } else if s.is_finished {
            TimerPhase::Finished
        } else if s.is_running {
            TimerPhase::Running
        } else {
            TimerPhase::Paused
        }
    }

    /// Start a countdown from Inactive, or resume from Paused.
    /// Returns whether the state changed.
    pub fn start(&mut self, duration_seconds: i64) -> bool {
        match self.phase() {
            TimerPhase::Inactive => {
                if duration_seconds <= 0 {
                    log::debug!("Rejected timer duration {}", duration_seconds);
                    return false;
                }
                let total = duration_seconds as u64;
                self.state = TimerState {
                    total_seconds: total,
                    remaining_seconds: total,
                    is_active: true,
                    is_running: true,
                    ..TimerState::default()
                };
                true
            }
            TimerPhase::Paused => self.resume(),
            TimerPhase::Running | TimerPhase::Finished => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase() != TimerPhase::Running {
            return false;
        }
        self.state.is_running = false;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase() != TimerPhase::Paused {
            return false;
        }
        self.state.is_running = true;
        true
    }

    pub fn reset(&mut self) {
        self.state = TimerState::default();
    }

    /// One tick of the countdown.
    pub fn advance(&mut self) -> TimerEvent {
        match self.phase() {
            TimerPhase::Running => {
                self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
                if self.state.remaining_seconds == 0 {
                    self.state.is_running = false;
                    self.state.is_finished = true;
                    TimerEvent::Finished
                } else {
                    TimerEvent::Ticked
                }
            }
            TimerPhase::Finished => {
                self.state.flash_on = !self.state.flash_on;
                TimerEvent::Flashed
            }
            TimerPhase::Inactive | TimerPhase::Paused => TimerEvent::Idle,
        }
    }
}

/// Parse `H:MM:SS`, `MM:SS` or bare seconds.
pub fn parse_duration(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parts: Vec<&str> = input.split(':').collect();
    let mut numbers = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        numbers.push(part.parse::<u64>().ok()?);
    }

    match numbers.as_slice() {
        [seconds] => Some(*seconds),
        [minutes, seconds] if *seconds < 60 => minutes.checked_mul(60)?.checked_add(*seconds),
        [hours, minutes, seconds] if *minutes < 60 && *seconds < 60 => hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds),
        _ => None,
    }
}

pub fn format_countdown(remaining: u64, show_seconds: bool) -> String {
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;
    if show_seconds || hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Short label for menu presets: `1 min`, `1 hr`, `90 sec`
pub fn format_preset(seconds: u64) -> String {
    if seconds % 3600 == 0 {
        format!("{} hr", seconds / 3600)
    } else if seconds % 60 == 0 {
        format!("{} min", seconds / 60)
    } else {
        format!("{} sec", seconds)
    }
}
