//! Session statistics aggregation
//!
//! Accumulates per-state durations and transition-edge event counts
//! over a monitoring session. Time flushes into the bucket of the
//! state being *left* on every transition; the open interval of the
//! current state is folded in virtually on snapshot and explicitly on
//! finalize.

use crate::arbiter::AttentionState;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Cumulative per-state durations and per-event transition counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub focused_secs: f64,
    pub drowsy_secs: f64,
    pub yawning_secs: f64,
    pub not_present_secs: f64,
    pub drowsy_events: u32,
    pub yawn_events: u32,
    pub not_present_events: u32,
}

impl SessionStats {
    /// Cumulative seconds spent in a state.
    pub fn duration_for(&self, state: AttentionState) -> f64 {
        match state {
            AttentionState::Focused => self.focused_secs,
            AttentionState::Drowsy => self.drowsy_secs,
            AttentionState::Yawning => self.yawning_secs,
            AttentionState::NotPresent => self.not_present_secs,
        }
    }

    /// Total accumulated time across all buckets.
    pub fn total_secs(&self) -> f64 {
        self.focused_secs + self.drowsy_secs + self.yawning_secs + self.not_present_secs
    }

    /// Percent-of-session figures for reporting.
    pub fn summary(&self) -> SessionSummary {
        // A session with no accumulated time divides by 1, not 0
        let total = self.total_secs();
        let divisor = if total == 0.0 { 1.0 } else { total };

        let focus_pct = self.focused_secs / divisor * 100.0;
        SessionSummary {
            focus_pct,
            drowsy_pct: self.drowsy_secs / divisor * 100.0,
            yawning_pct: self.yawning_secs / divisor * 100.0,
            not_present_pct: self.not_present_secs / divisor * 100.0,
            total_secs: total,
            focus_band: FocusBand::from_pct(focus_pct),
        }
    }
}

/// Qualitative banding of the focus percentage, matching the report
/// thresholds (80/60/40).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusBand {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl FocusBand {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 80.0 {
            FocusBand::Excellent
        } else if pct >= 60.0 {
            FocusBand::Good
        } else if pct >= 40.0 {
            FocusBand::Moderate
        } else {
            FocusBand::Poor
        }
    }
}

/// Percent-of-session report derived from [`SessionStats`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionSummary {
    pub focus_pct: f64,
    pub drowsy_pct: f64,
    pub yawning_pct: f64,
    pub not_present_pct: f64,
    pub total_secs: f64,
    pub focus_band: FocusBand,
}

/// Per-session aggregator, single-writer, fed once per frame.
#[derive(Debug)]
pub struct SessionAggregator {
    totals: SessionStats,
    last_state: AttentionState,
    state_started: Instant,
    /// Timestamp of the most recent observation. Snapshots fold the
    /// open interval up to this point (not wall-clock now), keeping
    /// reads idempotent between frames.
    last_seen: Instant,
}

impl SessionAggregator {
    pub fn new(now: Instant) -> Self {
        Self {
            totals: SessionStats::default(),
            last_state: AttentionState::Focused,
            state_started: now,
            last_seen: now,
        }
    }

    /// Record the arbitrated state of one frame.
    pub fn observe(&mut self, state: AttentionState, now: Instant) {
        if state != self.last_state {
            let elapsed = now.duration_since(self.state_started).as_secs_f64();
            self.add_duration(self.last_state, elapsed);
            self.count_entry(state);
            debug!(
                "state transition {} -> {} after {:.2}s",
                self.last_state, state, elapsed
            );
            self.last_state = state;
            self.state_started = now;
        }
        self.last_seen = now;
    }

    /// Read-only snapshot including the open interval up to the last
    /// observed frame. Idempotent between frames.
    pub fn snapshot(&self) -> SessionStats {
        let mut stats = self.totals;
        let open = self.last_seen.duration_since(self.state_started).as_secs_f64();
        match self.last_state {
            AttentionState::Focused => stats.focused_secs += open,
            AttentionState::Drowsy => stats.drowsy_secs += open,
            AttentionState::Yawning => stats.yawning_secs += open,
            AttentionState::NotPresent => stats.not_present_secs += open,
        }
        stats
    }

    /// Flush the final open interval and return the closed-out stats.
    pub fn finalize(&mut self, now: Instant) -> SessionStats {
        let elapsed = now.duration_since(self.state_started).as_secs_f64();
        self.add_duration(self.last_state, elapsed);
        self.state_started = now;
        self.last_seen = now;
        self.totals
    }

    /// Reinitialize for a fresh session.
    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }

    pub fn last_state(&self) -> AttentionState {
        self.last_state
    }

    fn add_duration(&mut self, state: AttentionState, secs: f64) {
        match state {
            AttentionState::Focused => self.totals.focused_secs += secs,
            AttentionState::Drowsy => self.totals.drowsy_secs += secs,
            AttentionState::Yawning => self.totals.yawning_secs += secs,
            AttentionState::NotPresent => self.totals.not_present_secs += secs,
        }
    }

    fn count_entry(&mut self, state: AttentionState) {
        match state {
            AttentionState::Drowsy => self.totals.drowsy_events += 1,
            AttentionState::Yawning => self.totals.yawn_events += 1,
            AttentionState::NotPresent => self.totals.not_present_events += 1,
            AttentionState::Focused => {}
        }
    }
}
