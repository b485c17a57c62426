use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::fade::FadeGranularity;
use crate::notify::{Notification, Notifier, ToastQueue};
use crate::params::SessionParams;
use crate::session::{GoalType, Session, SessionConfig, COUNTDOWN_CHOICES, DEFAULT_COUNTDOWN_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Editor,
}

/// What the event loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    GoalType,
    GoalValue,
    Countdown,
    Hardcore,
    Start,
}

impl SetupField {
    const ORDER: [SetupField; 5] = [
        SetupField::GoalType,
        SetupField::GoalValue,
        SetupField::Countdown,
        SetupField::Hardcore,
        SetupField::Start,
    ];

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Session configuration form shown before writing starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub goal_type: GoalType,
    pub goal_value: String,
    pub countdown_duration: u32,
    pub hardcore: bool,
    pub focus: SetupField,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            goal_type: GoalType::Time,
            goal_value: String::new(),
            countdown_duration: DEFAULT_COUNTDOWN_SECS,
            hardcore: false,
            focus: SetupField::GoalValue,
        }
    }
}

impl From<&Config> for SetupForm {
    fn from(cfg: &Config) -> Self {
        Self {
            goal_type: cfg.goal_type,
            goal_value: cfg.goal_value.map(|v| v.to_string()).unwrap_or_default(),
            countdown_duration: cfg.countdown_duration,
            hardcore: cfg.hardcore,
            ..Self::default()
        }
    }
}

impl SetupForm {
    pub fn set_goal_type(&mut self, goal_type: GoalType) {
        if self.goal_type != goal_type {
            self.goal_type = goal_type;
            self.goal_value.clear();
        }
    }

    /// Step through the offered countdown durations
    pub fn cycle_countdown(&mut self, forward: bool) {
        let idx = COUNTDOWN_CHOICES
            .iter()
            .position(|&c| c == self.countdown_duration);
        let len = COUNTDOWN_CHOICES.len();
        let next = match (idx, forward) {
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
            (None, _) => COUNTDOWN_CHOICES
                .iter()
                .position(|&c| c == DEFAULT_COUNTDOWN_SECS)
                .unwrap_or(0),
        };
        self.countdown_duration = COUNTDOWN_CHOICES[next];
    }

    pub fn can_start(&self) -> bool {
        !self.goal_value.is_empty()
    }

    pub fn to_params(&self) -> SessionParams {
        SessionParams {
            goal_type: Some(self.goal_type.to_string()),
            goal_value: Some(self.goal_value.clone()),
            countdown_duration: Some(self.countdown_duration.to_string()),
            is_hardcore_mode: Some(self.hardcore.to_string()),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.focus {
                    SetupField::GoalType => self.set_goal_type(if forward {
                        GoalType::Words
                    } else {
                        GoalType::Time
                    }),
                    SetupField::Countdown => self.cycle_countdown(forward),
                    _ => return false,
                }
            }
            KeyCode::Char(' ') if self.focus == SetupField::Hardcore => {
                self.hardcore = !self.hardcore
            }
            KeyCode::Char(c) if self.focus == SetupField::GoalValue && c.is_ascii_digit() => {
                // keep the number within u32 range
                if self.goal_value.len() < 9 {
                    self.goal_value.push(c);
                }
            }
            KeyCode::Backspace if self.focus == SetupField::GoalValue => {
                self.goal_value.pop();
            }
            _ => return false,
        }
        true
    }
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub setup: SetupForm,
    pub fade: FadeGranularity,
    pub session: Option<Session>,
    pub toasts: ToastQueue,
    /// Set once any session has been started, so preferences are worth saving
    pub started_any: bool,
}

impl App {
    pub fn new(setup: SetupForm, fade: FadeGranularity) -> Self {
        Self {
            state: AppState::Setup,
            setup,
            fade,
            session: None,
            toasts: ToastQueue::new(),
            started_any: false,
        }
    }

    /// Skip the setup screen and go straight to writing
    pub fn with_session(config: SessionConfig, fade: FadeGranularity) -> Self {
        let setup = SetupForm {
            goal_type: config.goal_type,
            goal_value: config.goal_value.to_string(),
            countdown_duration: config.countdown_duration,
            hardcore: config.hardcore,
            ..SetupForm::default()
        };
        let mut app = Self::new(setup, fade);
        app.start_session(config);
        app
    }

    pub fn start_session(&mut self, config: SessionConfig) {
        self.session = Some(Session::with_policy(config, self.fade.policy()));
        self.state = AppState::Editor;
        self.started_any = true;
    }

    /// Validate the setup form and enter the editor, or raise an error toast
    pub fn try_start_from_setup(&mut self) -> bool {
        match self.setup.to_params().validate() {
            Ok(config) => {
                self.start_session(config);
                true
            }
            Err(err) => {
                self.toasts.notify(Notification::invalid_config(&err));
                false
            }
        }
    }

    pub fn back_to_setup(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(
                words = session.word_count(),
                phase = ?session.phase(),
                "session left"
            );
        }
        self.state = AppState::Setup;
    }

    /// Whether the event loop should be producing ticks
    pub fn wants_ticks(&self) -> bool {
        self.state == AppState::Editor && self.session.as_ref().is_some_and(Session::is_ticking)
    }

    /// Drop toasts whose TTL ran out
    pub fn expire_toasts(&mut self) {
        self.toasts.prune(Instant::now());
    }

    /// When the loop must wake up even without input or ticks
    pub fn next_wake(&self) -> Option<Instant> {
        self.toasts.next_expiry()
    }

    pub fn on_tick(&mut self) {
        self.expire_toasts();
        if let Some(session) = self.session.as_mut() {
            if let Some(n) = session.on_tick() {
                self.toasts.notify(n);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        self.expire_toasts();

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::Setup => self.on_setup_key(key),
            AppState::Editor => self.on_editor_key(key),
        }
    }

    fn on_setup_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Enter => {
                self.try_start_from_setup();
            }
            KeyCode::Char(' ') if self.setup.focus == SetupField::Start => {
                self.try_start_from_setup();
            }
            _ => {
                self.setup.on_key(key);
            }
        }
        KeyOutcome::Continue
    }

    fn on_editor_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Esc {
            self.back_to_setup();
            return KeyOutcome::Continue;
        }

        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::Continue;
        };

        let mut text = session.text().to_string();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(c),
            KeyCode::Enter => text.push('\n'),
            KeyCode::Tab => text.push('\t'),
            KeyCode::Backspace => {
                if text.pop().is_none() {
                    return KeyOutcome::Continue;
                }
            }
            _ => return KeyOutcome::Continue,
        }

        if let Some(n) = session.on_text_change(text) {
            self.toasts.notify(n);
        }
        KeyOutcome::Continue
    }

    /// Preferences to remember for the next run
    pub fn preferences(&self) -> Config {
        Config {
            goal_type: self.setup.goal_type,
            goal_value: self.setup.goal_value.parse().ok(),
            countdown_duration: self.setup.countdown_duration,
            hardcore: self.setup.hardcore,
            fade: self.fade,
        }
    }

    /// Text to hand back to the user on exit
    pub fn final_text(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(Session::text)
            .filter(|t| !t.trim().is_empty())
    }
}
