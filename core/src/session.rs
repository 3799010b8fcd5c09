//! Session wiring
//!
//! A [`Session`] owns one fish tally, one power-up engine and (once the host
//! is ready) one host bridge. The host calls its intercepts; a driver calls
//! [`Session::tick`] on a fixed cadence to run expiry checks and age out
//! notifications.

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use dragonfin_types::color::EXPIRED_GREY;
use dragonfin_types::{BridgeConfig, DragonfinConfig, OverlayConfig};

use crate::bridge::{DeathVerdict, HostBridge, HostEffects};
use crate::clock::Clock;
use crate::config::ConfigError;
use crate::effects::{ActivateOutcome, DefinitionSet, EngineEvent, PowerUpEngine};
use crate::host::{HostError, HostRuntime};
use crate::hotkeys::{HotkeyAction, HotkeyMap};
use crate::notify::{NotificationKind, NotificationQueue};
use crate::readiness::Capabilities;
use crate::tally::{FishTally, TallyEvent, TallySnapshot};

/// Capability name: the host runtime and its scene director exist
pub const CAP_DIRECTOR: &str = "director";
/// Capability name: the fish tally is available
pub const CAP_FISH_TALLY: &str = "fish_tally";
/// Capability name: the gameplay component can be found
pub const CAP_GAME_COMPONENT: &str = "game_component";

/// Readiness probe over a host runtime.
pub struct HostCapabilities<'a> {
    runtime: &'a dyn HostRuntime,
    bridge: &'a BridgeConfig,
}

impl<'a> HostCapabilities<'a> {
    pub fn new(runtime: &'a dyn HostRuntime, bridge: &'a BridgeConfig) -> Self {
        Self { runtime, bridge }
    }
}

impl Capabilities for HostCapabilities<'_> {
    fn is_present(&self, name: &str) -> bool {
        match name {
            CAP_DIRECTOR => self.runtime.director_ready(),
            // Owned by the session, so always there
            CAP_FISH_TALLY => true,
            CAP_GAME_COMPONENT => {
                self.runtime.director_ready()
                    && self
                        .runtime
                        .find_node(&self.bridge.node_name)
                        .and_then(|node| self.runtime.component(&node, &self.bridge.component_type))
                        .is_some()
            }
            other => {
                tracing::debug!(capability = other, "Unknown capability name");
                false
            }
        }
    }
}

pub struct Session {
    tally: FishTally,
    engine: PowerUpEngine<HostEffects>,
    bridge: Option<HostBridge>,
    bridge_config: BridgeConfig,
    notifications: NotificationQueue,
    hotkeys: HotkeyMap,
    overlay: OverlayConfig,
    clock: Arc<dyn Clock>,
    toast_ttl: TimeDelta,
    notification_ttl: TimeDelta,
    /// Installation was attempted for the current scene
    installed: bool,
    /// Bumped whenever anything the overlay shows changes
    revision: u64,
}

impl Session {
    pub fn new(config: &DragonfinConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let engine = PowerUpEngine::new(
            DefinitionSet::from_config(&config.effects)?,
            HostEffects::detached(&config.bridge),
            clock.clone(),
            TimeDelta::milliseconds(config.engine.check_interval_ms as i64),
        );

        Ok(Self {
            tally: FishTally::from_config(&config.fish)?,
            engine,
            bridge: None,
            bridge_config: config.bridge.clone(),
            notifications: NotificationQueue::new(),
            hotkeys: HotkeyMap::from_config(&config.hotkeys),
            overlay: config.overlay.clone(),
            clock,
            toast_ttl: TimeDelta::milliseconds(config.overlay.toast_ms as i64),
            notification_ttl: TimeDelta::milliseconds(config.engine.notification_ms as i64),
            installed: false,
            revision: 0,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Install the host bridge. Attempted once per scene; a failure leaves
    /// the session running without host effects. Returns whether a bridge
    /// is installed.
    pub fn install(&mut self, runtime: &dyn HostRuntime) -> bool {
        if self.installed {
            return self.bridge.is_some();
        }
        self.installed = true;

        match HostBridge::install(runtime, &self.bridge_config) {
            Ok(bridge) => {
                self.engine.hooks_mut().attach(bridge.component());
                self.bridge = Some(bridge);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Host bridge not installed, power-ups won't affect the game");
                false
            }
        }
    }

    /// The host loaded a new scene: drop the old component and install again.
    pub fn on_scene_launched(&mut self, runtime: &dyn HostRuntime) -> bool {
        tracing::debug!("Scene launched, reinstalling host bridge");
        self.bridge = None;
        self.engine.hooks_mut().detach();
        self.installed = false;
        self.install(runtime)
    }

    pub fn is_installed(&self) -> bool {
        self.bridge.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host intercepts
    // ─────────────────────────────────────────────────────────────────────────

    /// The player ate a fish of `category`.
    pub fn on_fish_eaten(&mut self, category: u32) -> bool {
        let recorded = self.tally.record(category);
        self.pump_events();
        recorded
    }

    /// A new round started: clear counts and every running power-up.
    pub fn on_session_start(&mut self) {
        tracing::info!("New round, resetting tally and power-ups");
        self.tally.reset();
        self.engine.reset_all();
        self.pump_events();
    }

    /// Route the host's death check. Without a bridge there is nothing to
    /// intercept and the host should run its own logic.
    pub fn judge_death(&self) -> Result<DeathVerdict, HostError> {
        match &self.bridge {
            Some(bridge) => bridge.judge_death(),
            None => Err(HostError::ComponentMissing),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Page API
    // ─────────────────────────────────────────────────────────────────────────

    pub fn activate(&mut self, effect_id: &str) -> ActivateOutcome {
        let outcome = self.engine.activate(effect_id);
        self.pump_events();
        outcome
    }

    pub fn deactivate(&mut self, effect_id: &str) -> bool {
        let deactivated = self.engine.deactivate(effect_id);
        self.pump_events();
        deactivated
    }

    pub fn reset_tally(&mut self) {
        self.tally.reset();
        self.pump_events();
    }

    /// Handle a key press. Returns the action it was bound to, if any.
    pub fn handle_key(&mut self, key: &str) -> Option<HotkeyAction> {
        let action = self.hotkeys.resolve(key)?.clone();
        match &action {
            HotkeyAction::ShowTally => {
                for line in self.tally_report().lines() {
                    tracing::info!("{line}");
                }
            }
            HotkeyAction::ResetTally => self.reset_tally(),
            HotkeyAction::Activate(id) => {
                self.activate(id);
            }
        }
        Some(action)
    }

    /// Run due expiry checks and drop stale notifications. Returns how many
    /// power-ups expired.
    pub fn tick(&mut self) -> usize {
        let expired = self.engine.tick();
        self.pump_events();
        if self.notifications.expire(self.clock.now()) > 0 {
            self.revision += 1;
        }
        expired
    }

    /// Turn queued tally and engine events into notifications.
    fn pump_events(&mut self) {
        let now = self.clock.now();

        for event in self.tally.take_events() {
            self.revision += 1;
            if let TallyEvent::Eaten(info) = event {
                self.notifications.push(
                    format!("+1 {}", info.name),
                    info.color,
                    NotificationKind::FishEaten { category: info.id },
                    now,
                    self.toast_ttl,
                );
            }
        }

        for event in self.engine.take_events() {
            self.revision += 1;
            let (effect_id, message, color, kind) = match event {
                EngineEvent::Activated { effect_id, .. } => {
                    let Some(def) = self.engine.definitions().get(&effect_id) else {
                        continue;
                    };
                    (
                        effect_id.clone(),
                        format!("{}已激活！", def.label()),
                        def.color,
                        NotificationKind::EffectActivated { effect_id },
                    )
                }
                EngineEvent::AlreadyActive { effect_id, .. } => {
                    let Some(def) = self.engine.definitions().get(&effect_id) else {
                        continue;
                    };
                    (
                        effect_id.clone(),
                        format!("{}道具已激活中", def.name),
                        def.color,
                        NotificationKind::EffectAlreadyActive { effect_id },
                    )
                }
                EngineEvent::Deactivated { effect_id, .. } => {
                    let Some(def) = self.engine.definitions().get(&effect_id) else {
                        continue;
                    };
                    (
                        effect_id.clone(),
                        format!("{}已失效", def.label()),
                        EXPIRED_GREY,
                        NotificationKind::EffectExpired { effect_id },
                    )
                }
            };
            tracing::trace!(effect = %effect_id, %message, "Notification");
            self.notifications
                .push(message, color, kind, now, self.notification_ttl);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tally(&self) -> &FishTally {
        &self.tally
    }

    pub fn tally_snapshot(&self) -> TallySnapshot {
        self.tally.snapshot()
    }

    /// Multi-line tally summary for logs and the console
    pub fn tally_report(&self) -> String {
        let snapshot = self.tally.snapshot();
        let european = self.overlay.european_number_format;
        let mut report = format!("Fish eaten: {}", snapshot.total);
        for category in &snapshot.categories {
            let count = snapshot.count(category.id);
            if count > 0 {
                report.push_str(&format!(
                    "\n  {}: {} ({})",
                    category.name,
                    count,
                    snapshot.share_text(category.id, european)
                ));
            }
        }
        report
    }

    pub fn engine(&self) -> &PowerUpEngine<HostEffects> {
        &self.engine
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn hotkeys(&self) -> &HotkeyMap {
        &self.hotkeys
    }

    pub fn overlay_config(&self) -> &OverlayConfig {
        &self.overlay
    }

    pub fn bridge_config(&self) -> &BridgeConfig {
        &self.bridge_config
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("total", &self.tally.total())
            .field("engine", &self.engine)
            .field("bridge", &self.bridge)
            .field("notifications", &self.notifications.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
