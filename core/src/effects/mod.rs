//! Timed power-up effects
//!
//! This module provides:
//! - **Definitions**: what each power-up does and how long it lasts (from config)
//! - **Active instances**: runtime state of running power-ups
//! - **Engine**: activation / expiry state machine driving host hooks
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  EffectDefinition (TOML config)                 │
//! │        "speed: ⚡ 加速, gold, 5000ms, speed × 2"                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                      engine.activate("speed")
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  ActiveEffect (runtime state)                   │
//! │        "speed active since t, expires at t + 5s"                │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                  EffectHooks (host bridge) + overlay
//! ```

mod active;
mod definition;
pub mod engine;


pub use active::{ActiveEffect, EffectCountdown};
pub use definition::{DefinitionSet, EffectDefinition, MAX_DURATION_MS};
pub use engine::{
    ActivateOutcome, DeactivateReason, EffectHooks, EngineEvent, PowerUpEngine,
};
