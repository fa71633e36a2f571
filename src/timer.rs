//! Countdown/cycle state machine behind the pomodoro display.
//!
//! A session alternates focus and break intervals for [`TOTAL_CYCLES`]
//! cycles. The cycle counter only moves when a break finishes; finishing the
//! last break resets the whole session back to idle.

use crate::error::{DurationField, TimerError, ValidationError};

pub const TOTAL_CYCLES: u32 = 4;
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
/// Upper bound for either duration, keeps the clock at three minute digits
pub const MAX_MINUTES: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn flipped(self) -> Self {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }
}

/// Externally observable state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Focus,
    Break,
}

/// Validated interval lengths in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    focus_secs: u32,
    break_secs: u32,
}

impl Durations {
    pub fn from_minutes(focus: u32, brk: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            focus_secs: check_minutes(DurationField::Focus, i64::from(focus))? * 60,
            break_secs: check_minutes(DurationField::Break, i64::from(brk))? * 60,
        })
    }

    /// Parse the raw text of the two input fields
    pub fn parse(focus: &str, brk: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            focus_secs: parse_minutes(DurationField::Focus, focus)? * 60,
            break_secs: parse_minutes(DurationField::Break, brk)? * 60,
        })
    }

    pub fn focus_secs(&self) -> u32 {
        self.focus_secs
    }

    pub fn break_secs(&self) -> u32 {
        self.break_secs
    }

    pub fn seconds_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_secs,
            Mode::Break => self.break_secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_secs: DEFAULT_FOCUS_MINUTES * 60,
            break_secs: DEFAULT_BREAK_MINUTES * 60,
        }
    }
}

fn parse_minutes(field: DurationField, input: &str) -> Result<u32, ValidationError> {
    let value = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotNumeric {
            field,
            input: input.to_string(),
        })?;
    check_minutes(field, value)
}

fn check_minutes(field: DurationField, value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    if value > i64::from(MAX_MINUTES) {
        return Err(ValidationError::TooLarge {
            field,
            value,
            max: MAX_MINUTES,
        });
    }
    // bounded by MAX_MINUTES above
    Ok(value as u32)
}

/// Something the user should be told about, raised by interval expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    IntervalStarted(Mode),
    AllCyclesComplete,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::IntervalStarted(mode) => {
                format!("Time for {} has started!", mode.to_string().to_lowercase())
            }
            Notice::AllCyclesComplete => "All cycles complete! Great work!".to_string(),
        }
    }
}

/// What the display needs to render one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub clock: String,
    pub mode: Mode,
    pub mode_label: String,
    pub cycle_label: String,
    pub running: bool,
}

/// `MM:SS`, zero padded. Minutes grow past two digits for long intervals.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone)]
pub struct TimerSession {
    durations: Durations,
    mode: Mode,
    remaining_secs: u32,
    cycle: u32,
    total_cycles: u32,
    running: bool,
}

impl TimerSession {
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            mode: Mode::Focus,
            remaining_secs: durations.focus_secs(),
            cycle: 1,
            total_cycles: TOTAL_CYCLES,
            running: false,
        }
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn total_cycles(&self) -> u32 {
        self.total_cycles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> TimerState {
        match (self.running, self.mode) {
            (false, _) => TimerState::Idle,
            (true, Mode::Focus) => TimerState::Focus,
            (true, Mode::Break) => TimerState::Break,
        }
    }

    /// Validate and apply the raw duration inputs. Only allowed while idle;
    /// nothing is modified when an error is returned.
    pub fn configure(
        &mut self,
        focus_minutes: &str,
        break_minutes: &str,
    ) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::Running);
        }
        let durations = Durations::parse(focus_minutes, break_minutes)?;
        self.apply(durations)
    }

    pub fn apply(&mut self, durations: Durations) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::Running);
        }
        self.durations = durations;
        self.remaining_secs = durations.seconds_for(self.mode);
        Ok(())
    }

    /// Begin a full interval of the current mode. Returns false, leaving the
    /// session untouched, when a run is already in progress.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.remaining_secs = self.durations.seconds_for(self.mode);
        self.running = true;
        true
    }

    /// Halt the countdown but keep mode and cycle
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.remaining_secs = self.durations.seconds_for(self.mode);
        true
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.mode = Mode::Focus;
        self.cycle = 1;
        self.remaining_secs = self.durations.focus_secs();
    }

    /// One second elapsed. Returns true when this tick emptied the interval.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        self.remaining_secs == 0
    }

    /// Move to the next interval once the current one has run out
    pub fn on_interval_expire(&mut self) -> Option<Notice> {
        if !self.running || self.remaining_secs > 0 {
            return None;
        }

        if self.mode == Mode::Break {
            self.cycle += 1;
            if self.cycle > self.total_cycles {
                self.reset();
                return Some(Notice::AllCyclesComplete);
            }
        }

        self.mode = self.mode.flipped();
        self.remaining_secs = self.durations.seconds_for(self.mode);
        Some(Notice::IntervalStarted(self.mode))
    }

    /// Drive one tick, rolling over into the next interval if it expired
    pub fn advance(&mut self) -> Option<Notice> {
        if self.tick() {
            self.on_interval_expire()
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clock: format_clock(self.remaining_secs),
            mode: self.mode,
            mode_label: format!("Mode: {}", self.mode),
            cycle_label: format!("Cycle {} of {}", self.cycle, self.total_cycles),
            running: self.running,
        }
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
