//! dragonfin core: fish tally, timed power-ups and the host game bridge.

pub mod bridge;
pub mod clock;
pub mod config;
pub mod effects;
pub mod host;
pub mod hotkeys;
pub mod notify;
pub mod readiness;
pub mod schedule;
pub mod session;
pub mod tally;

// Re-exports for convenience
pub use bridge::{BridgeError, DeathVerdict, HostBridge, HostEffects};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, default_config_path, load_config, save_config};
pub use effects::{
    ActivateOutcome, ActiveEffect, DeactivateReason, DefinitionSet, EffectCountdown,
    EffectDefinition, EffectHooks, EngineEvent, PowerUpEngine,
};
pub use host::{GameComponent, HostError, HostRuntime, NodeHandle, SharedComponent, WeakComponent};
pub use hotkeys::{HotkeyAction, HotkeyMap};
pub use notify::{Notification, NotificationKind, NotificationQueue};
pub use readiness::{Capabilities, Readiness, ReadinessGate, await_capabilities};
pub use session::{HostCapabilities, Session};
pub use tally::{CategoryInfo, FishTally, TallyEvent, TallySnapshot};

pub use dragonfin_types as types;
