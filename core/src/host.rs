//! Host game capability contract
//!
//! The game engine and its gameplay component are external. Instead of
//! patching their methods at runtime, the host implements these traits and
//! calls the bridge's intercepts where it used to run its own behavior.

use std::sync::{Arc, Mutex, Weak};

use thiserror::Error;

/// The host's main gameplay component.
pub trait GameComponent: Send {
    /// Current movement speed, `None` if the host hasn't set one
    fn speed(&self) -> Option<f32>;
    fn set_speed(&mut self, speed: f32);
    fn invincible(&self) -> bool;
    fn set_invincible(&mut self, invincible: bool);
    /// The host's own death judgment (player eaten by a bigger fish)
    fn judge_death(&mut self);
}

pub type SharedComponent = Arc<Mutex<dyn GameComponent>>;
pub type WeakComponent = Weak<Mutex<dyn GameComponent>>;

/// Opaque scene-graph node reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub String);

/// The host engine's runtime: scene director and scene-graph lookups.
pub trait HostRuntime {
    /// Whether the runtime and its scene director exist yet
    fn director_ready(&self) -> bool;
    fn find_node(&self, name: &str) -> Option<NodeHandle>;
    fn component(&self, node: &NodeHandle, type_name: &str) -> Option<SharedComponent>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The component went away (scene unloaded) or was never attached
    #[error("game component is not available")]
    ComponentMissing,
    /// A previous host call panicked while holding the component lock
    #[error("game component lock is poisoned")]
    ComponentPoisoned,
}

/// Run `f` against a weakly held component.
pub(crate) fn with_component<R>(
    component: Option<&WeakComponent>,
    f: impl FnOnce(&mut dyn GameComponent) -> R,
) -> Result<R, HostError> {
    let strong = component
        .and_then(Weak::upgrade)
        .ok_or(HostError::ComponentMissing)?;
    let mut guard = strong.lock().map_err(|_| HostError::ComponentPoisoned)?;
    Ok(f(&mut *guard))
}
