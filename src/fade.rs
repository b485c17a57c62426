use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Float noise tolerated when comparing a fade level to its threshold.
/// Ten additions of 0.1 land on 0.9999999999999999, not 1.0.
const FADE_EPSILON: f64 = 1e-9;

/// How fast inactive text fades and where it stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadePolicy {
    /// Interval between ticks while a session is running
    pub tick: Duration,
    /// Fade added per tick while fading
    pub step: f64,
    /// Terminal fade level; hardcore erasure happens once it is reached
    pub threshold: f64,
}

impl FadePolicy {
    /// One tick per second, +0.1 per tick, fades to fully invisible.
    pub const COARSE: FadePolicy = FadePolicy {
        tick: Duration::from_millis(1000),
        step: 0.1,
        threshold: 1.0,
    };

    /// Ten ticks per second, +0.02 per tick, stops just short of invisible.
    pub const FINE: FadePolicy = FadePolicy {
        tick: Duration::from_millis(100),
        step: 0.02,
        threshold: 0.95,
    };

    pub fn tick_ms(&self) -> u64 {
        self.tick.as_millis() as u64
    }

    /// Next fade level after one fading tick, clamped to the threshold.
    pub fn advance(&self, fade_level: f64) -> f64 {
        let next = fade_level + self.step;
        if next >= self.threshold - FADE_EPSILON {
            self.threshold
        } else {
            next
        }
    }

    pub fn is_terminal(&self, fade_level: f64) -> bool {
        fade_level >= self.threshold - FADE_EPSILON
    }
}

impl Default for FadePolicy {
    fn default() -> Self {
        Self::COARSE
    }
}

/// User-facing selector for a [`FadePolicy`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FadeGranularity {
    #[default]
    Coarse,
    Fine,
}

impl FadeGranularity {
    pub fn policy(&self) -> FadePolicy {
        match self {
            FadeGranularity::Coarse => FadePolicy::COARSE,
            FadeGranularity::Fine => FadePolicy::FINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_reaches_exactly_one_after_ten_ticks() {
        let policy = FadePolicy::COARSE;
        let mut level = 0.0;
        for _ in 0..9 {
            level = policy.advance(level);
            assert!(!policy.is_terminal(level));
        }
        level = policy.advance(level);
        assert_eq!(level, 1.0);
        assert!(policy.is_terminal(level));
    }

    #[test]
    fn test_fine_caps_at_threshold() {
        let policy = FadePolicy::FINE;
        let mut level = 0.0;
        let mut ticks = 0;
        while !policy.is_terminal(level) {
            level = policy.advance(level);
            ticks += 1;
            assert!(ticks < 100, "fine fade never reached its threshold");
        }
        assert_eq!(level, 0.95);
        assert!(ticks >= 47 && ticks <= 48);
        assert_eq!(policy.advance(level), 0.95);
    }

    #[test]
    fn test_tick_ms() {
        assert_eq!(FadePolicy::COARSE.tick_ms(), 1000);
        assert_eq!(FadePolicy::FINE.tick_ms(), 100);
    }

    #[test]
    fn test_granularity_policy() {
        assert_eq!(FadeGranularity::Coarse.policy(), FadePolicy::COARSE);
        assert_eq!(FadeGranularity::Fine.policy(), FadePolicy::FINE);
        assert_eq!(FadeGranularity::default(), FadeGranularity::Coarse);
    }

    #[test]
    fn test_granularity_display() {
        assert_eq!(FadeGranularity::Coarse.to_string(), "coarse");
        assert_eq!(FadeGranularity::Fine.to_string(), "fine");
    }
}
