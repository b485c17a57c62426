//! Raw session parameters and their validation.
//!
//! Parameters arrive as strings, either as a query string
//! (`goalType=words&goalValue=500&countdownDuration=10&isHardcoreMode=true`),
//! as CLI flags or from the setup form. Nothing reaches the editor without
//! passing [`SessionParams::validate`].

use thiserror::Error;

use crate::session::{GoalType, SessionConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing goal type (expected \"time\" or \"words\")")]
    MissingGoalType,
    #[error("unknown goal type \"{0}\" (expected \"time\" or \"words\")")]
    InvalidGoalType(String),
    #[error("missing goal value")]
    MissingGoalValue,
    #[error("goal value must be a positive whole number, got \"{0}\"")]
    InvalidGoalValue(String),
    #[error("missing countdown duration")]
    MissingCountdown,
    #[error("countdown duration must be a positive whole number of seconds, got \"{0}\"")]
    InvalidCountdown(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionParams {
    pub goal_type: Option<String>,
    pub goal_value: Option<String>,
    pub countdown_duration: Option<String>,
    pub is_hardcore_mode: Option<String>,
}

impl SessionParams {
    /// Parse a URL query string. A leading `?` is allowed, unknown keys are
    /// ignored and the last occurrence of a key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = Some(value.into_owned());
            match &*key {
                "goalType" => params.goal_type = value,
                "goalValue" => params.goal_value = value,
                "countdownDuration" => params.countdown_duration = value,
                "isHardcoreMode" => params.is_hardcore_mode = value,
                other => tracing::debug!(key = other, "ignoring unknown session parameter"),
            }
        }

        params
    }

    /// Fields set in `overrides` replace ours
    pub fn overridden_by(self, overrides: SessionParams) -> Self {
        Self {
            goal_type: overrides.goal_type.or(self.goal_type),
            goal_value: overrides.goal_value.or(self.goal_value),
            countdown_duration: overrides.countdown_duration.or(self.countdown_duration),
            is_hardcore_mode: overrides.is_hardcore_mode.or(self.is_hardcore_mode),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.goal_type.is_none()
            && self.goal_value.is_none()
            && self.countdown_duration.is_none()
            && self.is_hardcore_mode.is_none()
    }

    pub fn validate(&self) -> Result<SessionConfig, ConfigError> {
        let goal_type = match self.goal_type.as_deref() {
            None | Some("") => return Err(ConfigError::MissingGoalType),
            Some(raw) => GoalType::parse(raw)
                .ok_or_else(|| ConfigError::InvalidGoalType(raw.to_string()))?,
        };

        let goal_value = parse_positive(self.goal_value.as_deref()).map_err(|raw| {
            raw.map_or(ConfigError::MissingGoalValue, ConfigError::InvalidGoalValue)
        })?;

        let countdown_duration =
            parse_positive(self.countdown_duration.as_deref()).map_err(|raw| {
                raw.map_or(ConfigError::MissingCountdown, ConfigError::InvalidCountdown)
            })?;

        Ok(SessionConfig {
            goal_type,
            goal_value,
            countdown_duration,
            hardcore: self.is_hardcore_mode.as_deref() == Some("true"),
        })
    }
}

/// Positive integer, or the offending input (`None` when missing or blank)
fn parse_positive(raw: Option<&str>) -> Result<u32, Option<String>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Err(None),
        Some(s) => s,
    };
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Some(raw.to_string())),
    }
}
