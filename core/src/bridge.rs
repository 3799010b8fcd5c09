//! Host bridge
//!
//! Locates the host's gameplay component once per scene load and exposes:
//! - the effect hooks the power-up engine drives ([`HostEffects`])
//! - the death-judgment intercept that honours invincibility
//!
//! The component is held weakly: if the host tears the scene down, hooks
//! report [`HostError::ComponentMissing`] instead of keeping it alive.

use dragonfin_types::{BridgeConfig, EffectKind};
use thiserror::Error;

use crate::effects::{EffectDefinition, EffectHooks};
use crate::host::{HostError, HostRuntime, NodeHandle, WeakComponent, with_component};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("host runtime director is not available")]
    RuntimeUnavailable,
    #[error("node {0:?} not found")]
    NodeNotFound(String),
    #[error("component {component:?} not found on node {node:?}")]
    ComponentNotFound { node: String, component: String },
}

/// Result of routing the host's death check through the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathVerdict {
    /// Invincible: the host's death logic was skipped
    Suppressed,
    /// The host's own judgment ran
    Delegated,
}

pub struct HostBridge {
    node: NodeHandle,
    component: WeakComponent,
}

impl HostBridge {
    /// Find the gameplay component. Not retried on failure: callers log and
    /// continue without the bridge.
    pub fn install(runtime: &dyn HostRuntime, config: &BridgeConfig) -> Result<Self, BridgeError> {
        if !runtime.director_ready() {
            return Err(BridgeError::RuntimeUnavailable);
        }

        let node = runtime
            .find_node(&config.node_name)
            .ok_or_else(|| BridgeError::NodeNotFound(config.node_name.clone()))?;

        let component = runtime
            .component(&node, &config.component_type)
            .ok_or_else(|| BridgeError::ComponentNotFound {
                node: config.node_name.clone(),
                component: config.component_type.clone(),
            })?;

        tracing::info!(node = %config.node_name, component = %config.component_type, "Found game component, bridge installed");
        Ok(Self {
            node,
            component: std::sync::Arc::downgrade(&component),
        })
    }

    pub fn node(&self) -> &NodeHandle {
        &self.node
    }

    pub fn component(&self) -> WeakComponent {
        self.component.clone()
    }

    /// Whether the host still holds the component
    pub fn is_attached(&self) -> bool {
        self.component.strong_count() > 0
    }

    /// Death-judgment intercept. Skips the host's logic while invincible.
    pub fn judge_death(&self) -> Result<DeathVerdict, HostError> {
        with_component(Some(&self.component), |game| {
            if game.invincible() {
                tracing::debug!("Invincible, ignoring death judgment");
                DeathVerdict::Suppressed
            } else {
                game.judge_death();
                DeathVerdict::Delegated
            }
        })
    }
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("node", &self.node)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Effect hooks that mutate the host's gameplay component.
pub struct HostEffects {
    component: Option<WeakComponent>,
    /// Speed before the first boost, restored on expiry
    baseline_speed: Option<f32>,
    fallback_speed: f32,
}

impl HostEffects {
    /// Hooks with no component attached yet; every call fails with
    /// `ComponentMissing` until [`attach`](Self::attach).
    pub fn detached(config: &BridgeConfig) -> Self {
        Self {
            component: None,
            baseline_speed: None,
            fallback_speed: config.fallback_speed,
        }
    }

    pub fn attach(&mut self, component: WeakComponent) {
        self.component = Some(component);
        // A new scene has its own baseline
        self.baseline_speed = None;
    }

    pub fn detach(&mut self) {
        self.component = None;
        self.baseline_speed = None;
    }

    pub fn is_attached(&self) -> bool {
        self.component
            .as_ref()
            .is_some_and(|c| c.strong_count() > 0)
    }

    pub fn baseline_speed(&self) -> Option<f32> {
        self.baseline_speed
    }
}

impl EffectHooks for HostEffects {
    fn apply(&mut self, definition: &EffectDefinition) -> Result<(), HostError> {
        match definition.kind {
            EffectKind::Speed { multiplier } => {
                let fallback = self.fallback_speed;
                let saved = self.baseline_speed;
                let baseline = with_component(self.component.as_ref(), |game| {
                    let baseline = saved.unwrap_or_else(|| game.speed().unwrap_or(fallback));
                    game.set_speed(baseline * multiplier);
                    tracing::info!(from = baseline, to = baseline * multiplier, "Speed boosted");
                    baseline
                })?;
                self.baseline_speed = Some(baseline);
                Ok(())
            }
            EffectKind::Invincible => with_component(self.component.as_ref(), |game| {
                game.set_invincible(true);
                tracing::info!("Invincibility on");
            }),
        }
    }

    fn restore(&mut self, definition: &EffectDefinition) -> Result<(), HostError> {
        match definition.kind {
            EffectKind::Speed { .. } => {
                let Some(baseline) = self.baseline_speed else {
                    // Apply never reached the host; nothing to undo
                    return Ok(());
                };
                with_component(self.component.as_ref(), |game| {
                    game.set_speed(baseline);
                    tracing::info!(speed = baseline, "Speed restored");
                })
            }
            EffectKind::Invincible => with_component(self.component.as_ref(), |game| {
                game.set_invincible(false);
                tracing::info!("Invincibility off");
            }),
        }
    }
}

impl std::fmt::Debug for HostEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEffects")
            .field("attached", &self.is_attached())
            .field("baseline_speed", &self.baseline_speed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::effects::DefinitionSet;
    use crate::host::SharedComponent;
    use crate::host::fake::{FakeGame, FakeRuntime};
    use dragonfin_types::default_effects;

    fn game(speed: Option<f32>) -> Arc<Mutex<FakeGame>> {
        FakeGame::shared(speed)
    }

    fn runtime_with(game: &Arc<Mutex<FakeGame>>) -> FakeRuntime {
        FakeRuntime::with_game(game)
    }

    fn definition(id: &str) -> EffectDefinition {
        DefinitionSet::from_config(&default_effects())
            .unwrap()
            .get(id)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_install_finds_component() {
        let game = game(Some(400.0));
        let bridge = HostBridge::install(&runtime_with(&game), &BridgeConfig::default()).unwrap();
        assert_eq!(bridge.node(), &NodeHandle("Canvas".to_string()));
        assert!(bridge.is_attached());
    }

    #[test]
    fn test_install_failures() {
        let config = BridgeConfig::default();
        let not_ready = FakeRuntime {
            ready: false,
            node: Some("Canvas"),
            game: None,
        };
        assert_eq!(
            HostBridge::install(&not_ready, &config).unwrap_err(),
            BridgeError::RuntimeUnavailable
        );

        let no_node = FakeRuntime {
            ready: true,
            node: None,
            game: None,
        };
        assert_eq!(
            HostBridge::install(&no_node, &config).unwrap_err(),
            BridgeError::NodeNotFound("Canvas".to_string())
        );

        let no_component = FakeRuntime {
            ready: true,
            node: Some("Canvas"),
            game: None,
        };
        assert!(matches!(
            HostBridge::install(&no_component, &config),
            Err(BridgeError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_speed_boost_and_restore() {
        let game = game(Some(400.0));
        let bridge = HostBridge::install(&runtime_with(&game), &BridgeConfig::default()).unwrap();
        let mut hooks = HostEffects::detached(&BridgeConfig::default());
        hooks.attach(bridge.component());
        let speed = definition("speed");

        hooks.apply(&speed).unwrap();
        assert_eq!(game.lock().unwrap().speed, Some(800.0));

        hooks.restore(&speed).unwrap();
        assert_eq!(game.lock().unwrap().speed, Some(400.0));
    }

    #[test]
    fn test_speed_baseline_is_saved_once() {
        let game = game(Some(300.0));
        let mut hooks = HostEffects::detached(&BridgeConfig::default());
        let shared: SharedComponent = game.clone();
        hooks.attach(Arc::downgrade(&shared));
        let speed = definition("speed");

        hooks.apply(&speed).unwrap();
        hooks.restore(&speed).unwrap();
        // Host changed speed meanwhile; baseline from the first boost is kept
        game.lock().unwrap().speed = Some(350.0);
        hooks.apply(&speed).unwrap();
        assert_eq!(game.lock().unwrap().speed, Some(600.0));
        assert_eq!(hooks.baseline_speed(), Some(300.0));
    }

    #[test]
    fn test_speed_falls_back_when_host_has_none() {
        let game = game(None);
        let mut hooks = HostEffects::detached(&BridgeConfig::default());
        let shared: SharedComponent = game.clone();
        hooks.attach(Arc::downgrade(&shared));

        hooks.apply(&definition("speed")).unwrap();
        assert_eq!(game.lock().unwrap().speed, Some(800.0));
    }

    #[test]
    fn test_invincibility_suppresses_death() {
        let game = game(Some(400.0));
        let bridge = HostBridge::install(&runtime_with(&game), &BridgeConfig::default()).unwrap();
        let mut hooks = HostEffects::detached(&BridgeConfig::default());
        hooks.attach(bridge.component());
        let invincible = definition("invincible");

        assert_eq!(bridge.judge_death(), Ok(DeathVerdict::Delegated));
        assert_eq!(game.lock().unwrap().deaths, 1);

        hooks.apply(&invincible).unwrap();
        assert_eq!(bridge.judge_death(), Ok(DeathVerdict::Suppressed));
        assert_eq!(game.lock().unwrap().deaths, 1);

        hooks.restore(&invincible).unwrap();
        assert_eq!(bridge.judge_death(), Ok(DeathVerdict::Delegated));
        assert_eq!(game.lock().unwrap().deaths, 2);
    }

    #[test]
    fn test_detached_hooks_report_missing() {
        let mut hooks = HostEffects::detached(&BridgeConfig::default());
        assert_eq!(
            hooks.apply(&definition("invincible")),
            Err(HostError::ComponentMissing)
        );
        // Speed was never applied, so restore has nothing to do
        assert_eq!(hooks.restore(&definition("speed")), Ok(()));
    }

    #[test]
    fn test_dropped_component_reports_missing() {
        let game = game(Some(400.0));
        let bridge = HostBridge::install(&runtime_with(&game), &BridgeConfig::default()).unwrap();
        let mut hooks = HostEffects::detached(&BridgeConfig::default());
        hooks.attach(bridge.component());
        drop(game);

        assert!(!bridge.is_attached());
        assert_eq!(bridge.judge_death(), Err(HostError::ComponentMissing));
        assert_eq!(
            hooks.apply(&definition("speed")),
            Err(HostError::ComponentMissing)
        );
    }
}
