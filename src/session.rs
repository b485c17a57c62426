//! The writing session state machine.
//!
//! A session reacts to two events, text changes and clock ticks. All state
//! changes go through [`reduce`], which is a pure function of the previous
//! state, the session config, the fade policy and the event. [`Session`] owns
//! one state record and feeds events to the reducer.

use serde::{Deserialize, Serialize};

use crate::fade::FadePolicy;
use crate::notify::Notification;
use crate::progress;

/// Countdown durations offered by the setup screen, in seconds
pub const COUNTDOWN_CHOICES: [u32; 5] = [3, 5, 10, 15, 30];

pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GoalType {
    Time,
    Words,
}

impl GoalType {
    /// Accepts exactly "time" or "words"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "time" => Some(GoalType::Time),
            "words" => Some(GoalType::Words),
            _ => None,
        }
    }

    /// Unit of the goal value
    pub fn unit(&self) -> &'static str {
        match self {
            GoalType::Time => "minutes",
            GoalType::Words => "words",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub goal_type: GoalType,
    pub goal_value: u32,
    pub countdown_duration: u32,
    pub hardcore: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    Writing,
    Fading,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub text: String,
    pub countdown_remaining: u32,
    pub fade_level: f64,
    pub writing_time_secs: u64,
    pub goal_achieved: bool,
    /// Milliseconds of writing ticks not yet folded into a whole second
    pub tick_carry_ms: u64,
}

impl SessionState {
    pub fn idle(config: &SessionConfig) -> Self {
        Self {
            countdown_remaining: config.countdown_duration,
            ..Self::default()
        }
    }

    pub fn word_count(&self) -> usize {
        progress::word_count(&self.text)
    }

    pub fn progress(&self, config: &SessionConfig) -> f64 {
        progress::progress(
            config.goal_type,
            config.goal_value,
            self.word_count(),
            self.writing_time_secs,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The text area now holds this text
    TextChanged(String),
    Tick,
}

/// Advance the session by one event.
///
/// Returns the next state and, when the event caused a user-visible outcome,
/// the notification to raise.
pub fn reduce(
    mut state: SessionState,
    config: &SessionConfig,
    policy: &FadePolicy,
    event: SessionEvent,
) -> (SessionState, Option<Notification>) {
    match event {
        SessionEvent::TextChanged(text) => {
            state.text = text;
            if state.goal_achieved {
                return (state, None);
            }
            if state.phase != SessionPhase::Writing {
                tracing::debug!(from = ?state.phase, "resumed writing");
            }
            state.phase = SessionPhase::Writing;
            state.countdown_remaining = config.countdown_duration;
            state.fade_level = 0.0;
            (state, None)
        }
        SessionEvent::Tick => match state.phase {
            SessionPhase::Idle | SessionPhase::Completed => (state, None),
            SessionPhase::Writing => tick_writing(state, config, policy),
            SessionPhase::Fading => tick_fading(state, config, policy),
        },
    }
}

fn tick_writing(
    mut state: SessionState,
    config: &SessionConfig,
    policy: &FadePolicy,
) -> (SessionState, Option<Notification>) {
    if state.progress(config) >= 100.0 {
        state.goal_achieved = true;
        state.phase = SessionPhase::Completed;
        state.fade_level = 0.0;
        tracing::info!(
            words = state.word_count(),
            writing_time_secs = state.writing_time_secs,
            "goal achieved"
        );
        return (state, Some(Notification::goal_achieved()));
    }

    state.tick_carry_ms += policy.tick_ms();
    while state.tick_carry_ms >= 1000 {
        state.tick_carry_ms -= 1000;

        if state.countdown_remaining <= 1 {
            state.countdown_remaining = 0;
            state.phase = SessionPhase::Fading;
            state.tick_carry_ms = 0;
            tracing::debug!("countdown expired, fading");
            break;
        }

        state.countdown_remaining -= 1;
        state.writing_time_secs += 1;
    }

    (state, None)
}

fn tick_fading(
    mut state: SessionState,
    config: &SessionConfig,
    policy: &FadePolicy,
) -> (SessionState, Option<Notification>) {
    if !policy.is_terminal(state.fade_level) {
        state.fade_level = policy.advance(state.fade_level);
        return (state, None);
    }

    if !config.hardcore {
        return (state, None);
    }

    tracing::info!(
        chars = state.text.chars().count(),
        "hardcore mode erased the text"
    );
    let state = SessionState::idle(config);
    (state, Some(Notification::text_erased()))
}

/// Urgency tier of the countdown label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn for_remaining(remaining: u32) -> Self {
        match remaining {
            3 => Urgency::Low,
            2 => Urgency::Medium,
            1 => Urgency::High,
            _ => Urgency::Calm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownLabel {
    Hidden,
    Counting { remaining: u32, urgency: Urgency },
    Fading,
}

/// Owner of one session's state; the only way to mutate it is [`Session::dispatch`].
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    policy: FadePolicy,
    state: SessionState,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_policy(config, FadePolicy::default())
    }

    pub fn with_policy(config: SessionConfig, policy: FadePolicy) -> Self {
        tracing::info!(
            goal_type = %config.goal_type,
            goal_value = config.goal_value,
            countdown = config.countdown_duration,
            hardcore = config.hardcore,
            "session created"
        );
        Self {
            state: SessionState::idle(&config),
            config,
            policy,
        }
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Option<Notification> {
        let state = std::mem::take(&mut self.state);
        let (next, notification) = reduce(state, &self.config, &self.policy, event);
        self.state = next;
        notification
    }

    pub fn on_text_change(&mut self, text: String) -> Option<Notification> {
        self.dispatch(SessionEvent::TextChanged(text))
    }

    pub fn on_tick(&mut self) -> Option<Notification> {
        self.dispatch(SessionEvent::Tick)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn policy(&self) -> &FadePolicy {
        &self.policy
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn text(&self) -> &str {
        &self.state.text
    }

    pub fn word_count(&self) -> usize {
        self.state.word_count()
    }

    pub fn progress(&self) -> f64 {
        self.state.progress(&self.config)
    }

    /// Whether the session still needs clock ticks
    pub fn is_ticking(&self) -> bool {
        !self.state.goal_achieved
    }

    /// Opacity of the text area, `1 - fade_level`
    pub fn opacity(&self) -> f64 {
        1.0 - self.state.fade_level
    }

    pub fn countdown_label(&self) -> CountdownLabel {
        match self.state.phase {
            SessionPhase::Idle | SessionPhase::Completed => CountdownLabel::Hidden,
            SessionPhase::Fading => CountdownLabel::Fading,
            SessionPhase::Writing => CountdownLabel::Counting {
                remaining: self.state.countdown_remaining,
                urgency: Urgency::for_remaining(self.state.countdown_remaining),
            },
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        if self.state.phase == SessionPhase::Idle && self.state.text.is_empty() {
            Some("Start writing...")
        } else {
            None
        }
    }
}
