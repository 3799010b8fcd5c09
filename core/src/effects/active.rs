use chrono::{NaiveDateTime, TimeDelta};

use crate::schedule::TimerHandle;

/// A running power-up. Owned exclusively by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEffect {
    pub definition_id: String,
    pub activated_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    /// Pending expiry check in the engine's timer queue
    pub(crate) check: TimerHandle,
}

impl ActiveEffect {
    /// Time left, clamped at zero
    pub fn remaining(&self, now: NaiveDateTime) -> TimeDelta {
        (self.expires_at - now).max(TimeDelta::zero())
    }

    pub fn has_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }

    pub fn total(&self) -> TimeDelta {
        self.expires_at - self.activated_at
    }

    /// Remaining fraction, 1.0 (just activated) to 0.0 (expired)
    pub fn progress(&self, now: NaiveDateTime) -> f32 {
        let total = self.total().num_milliseconds();
        if total <= 0 {
            return 0.0;
        }
        (self.remaining(now).num_milliseconds() as f32 / total as f32).clamp(0.0, 1.0)
    }
}

/// Display-only countdown sample. Never used to decide expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectCountdown {
    pub effect_id: String,
    pub remaining_ms: i64,
    pub total_ms: i64,
    pub progress: f32,
}
