use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    error::{DurationField, TimerError},
    runtime::{AppEvent, RunId, TickLoop},
    timer::{Durations, Notice, TimerSession},
};

/// Longest text accepted in a duration field
pub const FIELD_MAX_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// Modal message waiting for acknowledgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn info(message: String) -> Self {
        Self {
            kind: DialogKind::Info,
            title: "Pomodoro".to_string(),
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            kind: DialogKind::Error,
            title: "Error".to_string(),
            message,
        }
    }
}

impl From<Notice> for Dialog {
    fn from(notice: Notice) -> Self {
        Dialog::info(notice.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub field: DurationField,
    pub value: String,
}

impl InputField {
    fn new(field: DurationField, minutes: u32) -> Self {
        Self {
            field,
            value: minutes.to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.field {
            DurationField::Focus => "Focus time (min):",
            DurationField::Break => "Break time (min):",
        }
    }
}

/// The interactive surface: owns the session and forwards user commands and
/// ticks into it.
pub struct App {
    pub session: TimerSession,
    pub focus_input: InputField,
    pub break_input: InputField,
    pub editing: DurationField,
    pub dialogs: VecDeque<Dialog>,
    pub started_at: Option<DateTime<Local>>,
    pub should_quit: bool,
    ticks: TickLoop,
}

impl App {
    pub fn new(durations: Durations, ticks: TickLoop) -> Self {
        Self {
            session: TimerSession::new(durations),
            focus_input: InputField::new(DurationField::Focus, durations.focus_secs() / 60),
            break_input: InputField::new(DurationField::Break, durations.break_secs() / 60),
            editing: DurationField::Focus,
            dialogs: VecDeque::new(),
            started_at: None,
            should_quit: false,
            ticks,
        }
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticks.is_active()
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Tick(run) => self.on_tick(run),
            AppEvent::Resize => {}
        }
    }

    /// Start action: validate the fields, configure the session, spawn ticks
    pub fn start(&mut self) {
        if self.session.is_running() {
            tracing::debug!("start ignored, timer already running");
            return;
        }

        match self
            .session
            .configure(&self.focus_input.value, &self.break_input.value)
        {
            Ok(()) => {}
            Err(TimerError::Invalid(err)) => {
                tracing::warn!(%err, "rejected duration input");
                self.dialogs.push_back(Dialog::error(format!(
                    "Enter valid numeric values!\n{}",
                    err
                )));
                return;
            }
            Err(TimerError::Running) => return,
        }

        if !self.session.start() {
            return;
        }
        self.ticks.spawn();

        self.started_at = Some(Local::now());
        let durations = self.session.durations();
        tracing::info!(
            mode = %self.session.mode(),
            cycle = self.session.cycle(),
            focus_secs = durations.focus_secs(),
            break_secs = durations.break_secs(),
            "timer started"
        );
    }

    pub fn stop(&mut self) {
        if self.session.stop() {
            self.ticks.cancel();
            self.started_at = None;
            tracing::info!(
                mode = %self.session.mode(),
                cycle = self.session.cycle(),
                "timer stopped"
            );
        }
    }

    pub fn reset(&mut self) {
        self.ticks.cancel();
        self.session.reset();
        self.started_at = None;

        // like the start action, pick up whatever the fields currently say
        if let Err(err) = self
            .session
            .configure(&self.focus_input.value, &self.break_input.value)
        {
            tracing::debug!(%err, "keeping previous durations on reset");
        }
        tracing::info!("timer reset");
    }

    pub fn on_tick(&mut self, run: RunId) {
        if !self.ticks.is_current(run) {
            tracing::debug!(run, "dropping stale tick");
            return;
        }

        tracing::trace!(remaining = self.session.remaining_secs(), "tick");
        if let Some(notice) = self.session.advance() {
            match notice {
                Notice::IntervalStarted(mode) => {
                    tracing::info!(%mode, cycle = self.session.cycle(), "interval started");
                }
                Notice::AllCyclesComplete => {
                    tracing::info!("all cycles complete");
                }
            }
            self.dialogs.push_back(notice.into());
        }

        if !self.session.is_running() {
            self.ticks.cancel();
            self.started_at = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if !self.dialogs.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialogs.pop_front();
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char('s') => self.start(),
            KeyCode::Char('x') => self.stop(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                if !self.session.is_running() {
                    self.editing = match self.editing {
                        DurationField::Focus => DurationField::Break,
                        DurationField::Break => DurationField::Focus,
                    };
                }
            }
            KeyCode::Backspace => {
                if !self.session.is_running() {
                    self.editing_input_mut().value.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => {
                if !self.session.is_running() {
                    let input = self.editing_input_mut();
                    if input.value.chars().count() < FIELD_MAX_CHARS {
                        input.value.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn editing_input_mut(&mut self) -> &mut InputField {
        match self.editing {
            DurationField::Focus => &mut self.focus_input,
            DurationField::Break => &mut self.break_input,
        }
    }
}
