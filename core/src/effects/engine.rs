//! Power-up engine
//!
//! Per effect id this is a two-state machine, `Idle` and `Active`:
//!
//! ```text
//!            activate(id)                 expiry check: remaining <= 0
//!   Idle ───────────────────▶ Active ─────────────────────────────────▶ Idle
//!                               │  deactivate(id) / reset_all()          ▲
//!                               └────────────────────────────────────────┘
//! ```
//!
//! Activation applies the effect through [`EffectHooks`] and schedules an
//! expiry check. Each check recomputes `expires_at - now` instead of
//! counting ticks, so coarse or late scheduling can't stretch or shrink the
//! effective duration. Re-activating an active effect does not extend it.
//!
//! Hook failures are logged and never stop a transition: the engine's own
//! bookkeeping always completes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};

use crate::clock::Clock;
use crate::host::HostError;
use crate::schedule::TimerQueue;

use super::{ActiveEffect, DefinitionSet, EffectCountdown, EffectDefinition};

/// Host-side mutation points for effects, supplied by the host bridge.
pub trait EffectHooks {
    fn apply(&mut self, definition: &EffectDefinition) -> Result<(), HostError>;
    fn restore(&mut self, definition: &EffectDefinition) -> Result<(), HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivateReason {
    Expired,
    Manual,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Activated {
        effect_id: String,
        expires_at: NaiveDateTime,
    },
    AlreadyActive {
        effect_id: String,
        expires_at: NaiveDateTime,
    },
    Deactivated {
        effect_id: String,
        reason: DeactivateReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateOutcome {
    Activated { expires_at: NaiveDateTime },
    /// Already running; `expires_at` is the unchanged deadline
    AlreadyActive { expires_at: NaiveDateTime },
    /// The deadline does not fit in the calendar; nothing was applied
    OutOfRange,
    Unknown,
}

pub struct PowerUpEngine<H> {
    definitions: DefinitionSet,
    active: HashMap<String, ActiveEffect>,
    /// Pending expiry checks, payload is the effect id
    checks: TimerQueue<String>,
    hooks: H,
    clock: Arc<dyn Clock>,
    check_interval: TimeDelta,
    events: Vec<EngineEvent>,
}

impl<H: EffectHooks> PowerUpEngine<H> {
    pub fn new(
        definitions: DefinitionSet,
        hooks: H,
        clock: Arc<dyn Clock>,
        check_interval: TimeDelta,
    ) -> Self {
        Self {
            definitions,
            active: HashMap::new(),
            checks: TimerQueue::new(),
            hooks,
            clock,
            check_interval: check_interval.max(TimeDelta::milliseconds(1)),
            events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn activate(&mut self, id: &str) -> ActivateOutcome {
        let Some(def) = self.definitions.get(id) else {
            tracing::warn!(effect = id, "Unknown power-up, ignoring");
            return ActivateOutcome::Unknown;
        };

        if let Some(existing) = self.active.get(id) {
            tracing::info!(effect = id, expires_at = %existing.expires_at, "Power-up already active");
            let expires_at = existing.expires_at;
            self.events.push(EngineEvent::AlreadyActive {
                effect_id: id.to_string(),
                expires_at,
            });
            return ActivateOutcome::AlreadyActive { expires_at };
        }

        let now = self.clock.now();
        let Some(expires_at) = now.checked_add_signed(def.duration()) else {
            tracing::error!(
                effect = id,
                duration_ms = def.duration_ms,
                "Power-up deadline out of range, ignoring"
            );
            return ActivateOutcome::OutOfRange;
        };

        if let Err(e) = self.hooks.apply(def) {
            tracing::error!(effect = id, error = %e, "Failed to apply power-up effect");
        }

        let check = self
            .checks
            .schedule(next_check(now, expires_at, self.check_interval), id.to_string());
        self.active.insert(
            id.to_string(),
            ActiveEffect {
                definition_id: id.to_string(),
                activated_at: now,
                expires_at,
                check,
            },
        );

        tracing::info!(effect = id, duration_ms = def.duration_ms, "Power-up activated");
        self.events.push(EngineEvent::Activated {
            effect_id: id.to_string(),
            expires_at,
        });
        ActivateOutcome::Activated { expires_at }
    }

    /// Force an effect back to idle. No-op (returns false) if it isn't active.
    pub fn deactivate(&mut self, id: &str) -> bool {
        if !self.active.contains_key(id) {
            tracing::debug!(effect = id, "Deactivate on idle power-up, nothing to do");
            return false;
        }
        self.finish(id, DeactivateReason::Manual);
        true
    }

    /// Deactivate every active effect regardless of remaining time.
    /// Returns how many were deactivated.
    pub fn reset_all(&mut self) -> usize {
        let mut ids: Vec<String> = self.active.keys().cloned().collect();
        ids.sort_by_key(|id| self.definitions.position(id));
        for id in &ids {
            self.finish(id, DeactivateReason::Reset);
        }
        // Every check belonged to an active effect
        self.checks.clear();
        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "Power-ups reset");
        }
        ids.len()
    }

    /// Run every expiry check that is due. Returns how many effects expired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut expired = 0;

        while let Some((handle, id)) = self.checks.pop_due(now) {
            let Some(effect) = self.active.get_mut(&id) else {
                continue;
            };
            if effect.check != handle {
                // Superseded; cancellation should have removed it
                continue;
            }

            if effect.has_expired(now) {
                self.finish(&id, DeactivateReason::Expired);
                expired += 1;
            } else {
                let due = next_check(now, effect.expires_at, self.check_interval);
                effect.check = self.checks.schedule(due, id);
            }
        }

        expired
    }

    /// Tear down an active effect: cancel its check, restore the host, drop the record.
    fn finish(&mut self, id: &str, reason: DeactivateReason) {
        let Some(effect) = self.active.remove(id) else {
            return;
        };
        self.checks.cancel(effect.check);

        match self.definitions.get(id) {
            Some(def) => {
                if let Err(e) = self.hooks.restore(def) {
                    tracing::error!(effect = id, error = %e, "Failed to restore after power-up");
                }
            }
            None => tracing::error!(effect = id, "BUG: active power-up has no definition"),
        }

        tracing::info!(effect = id, ?reason, "Power-up deactivated");
        self.events.push(EngineEvent::Deactivated {
            effect_id: id.to_string(),
            reason,
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn expires_at(&self, id: &str) -> Option<NaiveDateTime> {
        self.active.get(id).map(|e| e.expires_at)
    }

    /// Copy of the active effects, in definition order
    pub fn snapshot(&self) -> Vec<ActiveEffect> {
        let mut effects: Vec<ActiveEffect> = self.active.values().cloned().collect();
        effects.sort_by_key(|e| self.definitions.position(&e.definition_id));
        effects
    }

    /// Sample remaining time for display, in definition order
    pub fn countdowns(&self) -> Vec<EffectCountdown> {
        let now = self.clock.now();
        self.snapshot()
            .into_iter()
            .map(|effect| EffectCountdown {
                remaining_ms: effect.remaining(now).num_milliseconds(),
                total_ms: effect.total().num_milliseconds(),
                progress: effect.progress(now),
                effect_id: effect.definition_id,
            })
            .collect()
    }

    /// When the next expiry check is due, for drivers that want to sleep until then
    pub fn next_check(&self) -> Option<NaiveDateTime> {
        self.checks.next_due()
    }

    pub fn pending_checks(&self) -> usize {
        self.checks.len()
    }

    pub fn definitions(&self) -> &DefinitionSet {
        &self.definitions
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Take queued events (drains the queue)
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<H> std::fmt::Debug for PowerUpEngine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerUpEngine")
            .field("active", &self.active)
            .field("pending_checks", &self.checks.len())
            .field("check_interval", &self.check_interval)
            .finish_non_exhaustive()
    }
}

fn next_check(now: NaiveDateTime, expires_at: NaiveDateTime, interval: TimeDelta) -> NaiveDateTime {
    (now + interval).min(expires_at)
}
