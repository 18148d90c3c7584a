//! Persisted key layout for timer state and configuration
//!
//! Every key is read independently. A missing key, an unreadable store, or a
//! value that does not parse falls back to that key's default.

use tracing::{debug, warn};

use super::store::KeyValueStore;
use crate::engine::money::Cents;
use crate::state::{
    timer_config::{DEFAULT_CYCLE_MINUTES, DEFAULT_CYCLE_SECONDS, DEFAULT_GOAL_COUNT, DEFAULT_REWARD_PER_CYCLE},
    CycleTimer, NumberInput, TimerConfig, TimerState,
};

pub const KEY_GOAL: &str = "goal";
pub const KEY_CYCLE_MINUTES: &str = "cycleMinutes";
pub const KEY_CYCLE_SECONDS: &str = "cycleSeconds";
pub const KEY_REWARD_PER_CYCLE: &str = "rewardPerCycle";
pub const KEY_START_TIMESTAMP: &str = "startTimestamp";
pub const KEY_ACCUMULATED_OFFSET: &str = "accumulatedOffsetMs";

/// Rebuild the timer from whatever the store holds.
pub fn load_timer(store: &dyn KeyValueStore) -> CycleTimer {
    let config = TimerConfig::new(
        read_non_negative(store, KEY_CYCLE_MINUTES, DEFAULT_CYCLE_MINUTES),
        read_non_negative(store, KEY_CYCLE_SECONDS, DEFAULT_CYCLE_SECONDS),
        read_parsed(store, KEY_REWARD_PER_CYCLE, DEFAULT_REWARD_PER_CYCLE, Cents::parse),
        read_non_negative(store, KEY_GOAL, DEFAULT_GOAL_COUNT),
    );

    let state = TimerState {
        start_timestamp_ms: read_parsed(store, KEY_START_TIMESTAMP, None, |raw| {
            raw.trim().parse::<i64>().ok().map(Some)
        }),
        accumulated_offset_ms: read_non_negative(store, KEY_ACCUMULATED_OFFSET, 0),
    };

    debug!("Loaded persisted timer: {:?} {:?}", config, state);
    CycleTimer::new(config, state)
}

/// Write every configuration key in one batch. Failures are logged, never returned.
pub fn save_config(store: &dyn KeyValueStore, config: &TimerConfig) {
    let pairs = [
        (KEY_GOAL, config.goal_count.to_string()),
        (KEY_CYCLE_MINUTES, config.cycle_minutes.to_string()),
        (KEY_CYCLE_SECONDS, config.cycle_seconds.to_string()),
        (KEY_REWARD_PER_CYCLE, config.reward_per_cycle.to_string()),
    ];
    if let Err(e) = store.set_many(&pairs) {
        warn!("Failed to persist configuration: {}", e);
    }
}

/// Write the timer state keys. An idle timer has no start timestamp key.
pub fn save_state(store: &dyn KeyValueStore, state: &TimerState) {
    match state.start_timestamp_ms {
        Some(start) => write(store, KEY_START_TIMESTAMP, &start.to_string()),
        None => {
            if let Err(e) = store.delete(KEY_START_TIMESTAMP) {
                warn!("Failed to delete {}: {}", KEY_START_TIMESTAMP, e);
            }
        }
    }
    write(store, KEY_ACCUMULATED_OFFSET, &state.accumulated_offset_ms.to_string());
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!("Failed to persist {}={}: {}", key, value, e);
    }
}

fn read_parsed<T>(store: &dyn KeyValueStore, key: &str, default: T, parse: impl FnOnce(&str) -> Option<T>) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            warn!("Failed to read {}: {}; using default", key, e);
            return default;
        }
    };
    match parse(&raw) {
        Some(value) => value,
        None => {
            warn!("Malformed value for {}: {:?}; using default", key, raw);
            default
        }
    }
}

/// Integers clamp to zero; text that is not a number takes the default.
fn read_non_negative(store: &dyn KeyValueStore, key: &str, default: u64) -> u64 {
    read_parsed(store, key, default, |raw| {
        NumberInput::Text(raw.to_string())
            .to_integer()
            .map(|n| u64::try_from(n).unwrap_or(0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::{JsonFileStore, MemoryStore};

    #[test]
    fn empty_store_yields_defaults() {
        let timer = load_timer(&MemoryStore::new());
        assert_eq!(timer.config(), &TimerConfig::default());
        assert_eq!(timer.state(), &TimerState::new());
    }

    #[test]
    fn save_then_load_restores_running_timer() {
        let store = MemoryStore::new();
        let config = TimerConfig::new(2, 30, Cents::new(375), 100);
        let state = TimerState::running(1_700_000_000_000, 42_000);
        save_config(&store, &config);
        save_state(&store, &state);

        let timer = load_timer(&store);
        assert_eq!(timer.config(), &config);
        assert_eq!(timer.state(), &state);
        assert_eq!(store.get(KEY_REWARD_PER_CYCLE).unwrap().as_deref(), Some("3.75"));
    }

    #[test]
    fn config_lands_in_the_file_as_one_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::open(&path).unwrap();
        save_config(&store, &TimerConfig::new(1, 15, Cents::new(50), 8));

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[KEY_GOAL], "8");
        assert_eq!(raw[KEY_CYCLE_MINUTES], "1");
        assert_eq!(raw[KEY_CYCLE_SECONDS], "15");
        assert_eq!(raw[KEY_REWARD_PER_CYCLE], "0.50");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn idle_state_removes_start_timestamp() {
        let store = MemoryStore::new();
        save_state(&store, &TimerState::running(5, 0));
        save_state(&store, &TimerState::paused(5_000));
        assert_eq!(store.get(KEY_START_TIMESTAMP).unwrap(), None);
        assert_eq!(store.get(KEY_ACCUMULATED_OFFSET).unwrap().as_deref(), Some("5000"));
    }

    #[test]
    fn malformed_values_fall_back_per_key() {
        let store = MemoryStore::new();
        store.set(KEY_GOAL, "NaN").unwrap();
        store.set(KEY_CYCLE_MINUTES, "ten").unwrap();
        store.set(KEY_CYCLE_SECONDS, "-5").unwrap();
        store.set(KEY_REWARD_PER_CYCLE, "1,50").unwrap();
        store.set(KEY_START_TIMESTAMP, "yesterday").unwrap();
        store.set(KEY_ACCUMULATED_OFFSET, "9000").unwrap();

        let timer = load_timer(&store);
        assert_eq!(timer.config().goal_count, 20);
        assert_eq!(timer.config().cycle_minutes, 4);
        assert_eq!(timer.config().cycle_seconds, 0);
        assert_eq!(timer.config().reward_per_cycle, Cents::new(100));
        assert_eq!(timer.state().start_timestamp_ms, None);
        assert_eq!(timer.state().accumulated_offset_ms, 9_000);
    }

    #[test]
    fn stored_zero_goal_is_raised_to_one() {
        let store = MemoryStore::new();
        store.set(KEY_GOAL, "0").unwrap();
        assert_eq!(load_timer(&store).config().goal_count, 1);
    }
}
