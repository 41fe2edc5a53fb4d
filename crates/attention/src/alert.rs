//! Alert cooldown gating
//!
//! Deduplicates user-facing alerts: repeated frames in an alertable
//! state raise at most one alert per cooldown period per event kind.
//! The embedding application decides what an alert looks like (sound,
//! toast, email); this only answers "should one fire now".

use crate::arbiter::AttentionState;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Per-event-kind cooldown gate.
#[derive(Debug)]
pub struct AlertGate {
    cooldown_secs: f32,
    last_fired: HashMap<AttentionState, Instant>,
}

impl AlertGate {
    pub fn new(cooldown_secs: f32) -> Self {
        Self {
            cooldown_secs,
            last_fired: HashMap::new(),
        }
    }

    /// Whether an alert for this state should fire now. Focused never
    /// alerts.
    pub fn should_fire(&mut self, state: AttentionState, now: Instant) -> bool {
        if state == AttentionState::Focused {
            return false;
        }

        if let Some(last) = self.last_fired.get(&state) {
            if now.duration_since(*last).as_secs_f32() < self.cooldown_secs {
                debug!("{} alert suppressed: in cooldown", state);
                return false;
            }
        }

        self.last_fired.insert(state, now);
        true
    }

    /// Forget all cooldowns (session reset).
    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cooldown_suppresses_duplicates() {
        let base = Instant::now();
        let mut gate = AlertGate::new(5.0);

        assert!(gate.should_fire(AttentionState::Drowsy, base));
        assert!(!gate.should_fire(AttentionState::Drowsy, base + Duration::from_secs(2)));
        assert!(gate.should_fire(AttentionState::Drowsy, base + Duration::from_secs(6)));
    }

    #[test]
    fn test_cooldowns_are_per_event_kind() {
        let base = Instant::now();
        let mut gate = AlertGate::new(5.0);

        assert!(gate.should_fire(AttentionState::Drowsy, base));
        assert!(gate.should_fire(AttentionState::Yawning, base));
    }

    #[test]
    fn test_focused_never_alerts() {
        let mut gate = AlertGate::new(5.0);
        assert!(!gate.should_fire(AttentionState::Focused, Instant::now()));
    }

    #[test]
    fn test_clear_rearms_immediately() {
        let base = Instant::now();
        let mut gate = AlertGate::new(5.0);
        gate.should_fire(AttentionState::NotPresent, base);
        gate.clear();
        assert!(gate.should_fire(AttentionState::NotPresent, base + Duration::from_secs(1)));
    }
}
