//! Timer configuration and lenient configuration input

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::money::Cents;

pub const DEFAULT_GOAL_COUNT: u64 = 20;
pub const DEFAULT_CYCLE_MINUTES: u64 = 4;
pub const DEFAULT_CYCLE_SECONDS: u64 = 0;
pub const DEFAULT_REWARD_PER_CYCLE: Cents = Cents::new(100);

/// Cycle length, reward rate and goal supplied by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub cycle_minutes: u64,
    pub cycle_seconds: u64,
    pub reward_per_cycle: Cents,
    /// Always at least 1
    pub goal_count: u64,
}

impl TimerConfig {
    pub fn new(cycle_minutes: u64, cycle_seconds: u64, reward_per_cycle: Cents, goal_count: u64) -> Self {
        Self {
            cycle_minutes,
            cycle_seconds,
            reward_per_cycle,
            goal_count: goal_count.max(1),
        }
    }

    /// Length of one cycle in milliseconds
    pub fn cycle_duration_ms(&self) -> u64 {
        self.cycle_minutes
            .saturating_mul(60)
            .saturating_add(self.cycle_seconds)
            .saturating_mul(1_000)
    }

    /// Merge a patch into this configuration.
    ///
    /// Minutes, seconds and rate clamp to zero when negative or non-numeric.
    /// The goal clamps to at least 1; a non-numeric goal is ignored and the
    /// current goal kept. Returns whether anything changed.
    pub fn apply(&mut self, patch: &ConfigPatch) -> bool {
        let before = self.clone();

        if let Some(minutes) = &patch.cycle_minutes {
            self.cycle_minutes = minutes.to_non_negative();
        }
        if let Some(seconds) = &patch.cycle_seconds {
            self.cycle_seconds = seconds.to_non_negative();
        }
        if let Some(rate) = &patch.reward_per_cycle {
            self.reward_per_cycle = rate.to_amount().unwrap_or(Cents::ZERO);
        }
        if let Some(goal) = &patch.goal_count {
            match goal.to_integer() {
                Some(goal) => self.goal_count = u64::try_from(goal).unwrap_or(0).max(1),
                None => warn!("Ignoring non-numeric goal {:?}, keeping {}", goal, self.goal_count),
            }
        }

        *self != before
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CYCLE_MINUTES,
            DEFAULT_CYCLE_SECONDS,
            DEFAULT_REWARD_PER_CYCLE,
            DEFAULT_GOAL_COUNT,
        )
    }
}

/// A numeric field as typed by a user: a number, a string, or anything else
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumberInput {
    /// Integer reading, truncating any fractional part
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            NumberInput::Integer(n) => Some(*n),
            NumberInput::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            NumberInput::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            }
            _ => None,
        }
    }

    /// Integer reading clamped to zero, with non-numeric input reading as zero
    pub fn to_non_negative(&self) -> u64 {
        self.to_integer()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn to_amount(&self) -> Option<Cents> {
        match self {
            NumberInput::Integer(n) => Some(Cents::new(u64::try_from(*n).unwrap_or(0).saturating_mul(100))),
            NumberInput::Float(f) => Cents::from_f64(*f),
            NumberInput::Text(s) => Cents::parse(s),
            NumberInput::Other(_) => None,
        }
    }
}

impl From<i64> for NumberInput {
    fn from(n: i64) -> Self {
        NumberInput::Integer(n)
    }
}

impl From<f64> for NumberInput {
    fn from(f: f64) -> Self {
        NumberInput::Float(f)
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        NumberInput::Text(s.to_string())
    }
}

/// Partial configuration update; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigPatch {
    #[serde(default, alias = "cycleMinutes")]
    pub cycle_minutes: Option<NumberInput>,
    #[serde(default, alias = "cycleSeconds")]
    pub cycle_seconds: Option<NumberInput>,
    #[serde(default, alias = "rewardPerCycle")]
    pub reward_per_cycle: Option<NumberInput>,
    #[serde(default, alias = "goalCount", alias = "goal")]
    pub goal_count: Option<NumberInput>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.cycle_minutes.is_none()
            && self.cycle_seconds.is_none()
            && self.reward_per_cycle.is_none()
            && self.goal_count.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_persisted_layout() {
        let config = TimerConfig::default();
        assert_eq!(config.goal_count, 20);
        assert_eq!(config.cycle_minutes, 4);
        assert_eq!(config.cycle_seconds, 0);
        assert_eq!(config.reward_per_cycle, Cents::new(100));
        assert_eq!(config.cycle_duration_ms(), 240_000);
    }

    #[test]
    fn duration_combines_minutes_and_seconds() {
        let config = TimerConfig::new(1, 30, Cents::ZERO, 1);
        assert_eq!(config.cycle_duration_ms(), 90_000);
        let huge = TimerConfig::new(u64::MAX, 59, Cents::ZERO, 1);
        assert_eq!(huge.cycle_duration_ms(), u64::MAX);
    }

    #[test]
    fn patch_clamps_negative_and_garbage_to_zero() {
        let mut config = TimerConfig::default();
        let patch = ConfigPatch {
            cycle_minutes: Some((-3i64).into()),
            cycle_seconds: Some("soon".into()),
            reward_per_cycle: Some((-1.5f64).into()),
            goal_count: None,
        };
        assert!(config.apply(&patch));
        assert_eq!(config.cycle_minutes, 0);
        assert_eq!(config.cycle_seconds, 0);
        assert_eq!(config.reward_per_cycle, Cents::ZERO);
        assert_eq!(config.goal_count, 20);
    }

    #[test]
    fn goal_is_at_least_one_and_garbage_is_ignored() {
        let mut config = TimerConfig::default();
        config.apply(&ConfigPatch {
            goal_count: Some(0i64.into()),
            ..Default::default()
        });
        assert_eq!(config.goal_count, 1);

        config.apply(&ConfigPatch {
            goal_count: Some((-40i64).into()),
            ..Default::default()
        });
        assert_eq!(config.goal_count, 1);

        config.apply(&ConfigPatch {
            goal_count: Some(50i64.into()),
            ..Default::default()
        });
        let changed = config.apply(&ConfigPatch {
            goal_count: Some("lots".into()),
            ..Default::default()
        });
        assert!(!changed);
        assert_eq!(config.goal_count, 50);
    }

    #[test]
    fn patch_accepts_strings_floats_and_camel_case() {
        let patch: ConfigPatch = serde_json::from_str(
            r#"{"cycleMinutes": "2", "cycle_seconds": 7.9, "rewardPerCycle": "0.25", "goal": 100}"#,
        )
        .unwrap();
        let mut config = TimerConfig::default();
        config.apply(&patch);
        assert_eq!(config.cycle_minutes, 2);
        assert_eq!(config.cycle_seconds, 7);
        assert_eq!(config.reward_per_cycle, Cents::new(25));
        assert_eq!(config.goal_count, 100);
    }

    #[test]
    fn patch_tolerates_non_numeric_json() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"cycle_minutes": true, "reward_per_cycle": {"x": 1}, "goal_count": null}"#)
                .unwrap();
        assert_eq!(patch.goal_count, None);
        let mut config = TimerConfig::default();
        config.apply(&patch);
        assert_eq!(config.cycle_minutes, 0);
        assert_eq!(config.reward_per_cycle, Cents::ZERO);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let patch = ConfigPatch::default();
        assert!(patch.is_empty());
        let mut config = TimerConfig::default();
        assert!(!config.apply(&patch));
    }
}
