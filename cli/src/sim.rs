//! Simulated host game
//!
//! Stands in for the real engine: the runtime's director only "exists" after
//! a startup delay, and relaunching the scene swaps in a fresh gameplay
//! component.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dragonfin_core::{GameComponent, HostRuntime, NodeHandle, SharedComponent};
use dragonfin_types::BridgeConfig;
use tokio::time::Instant;

/// The simulated gameplay component
#[derive(Debug, Clone, PartialEq)]
pub struct SimGame {
    pub speed: Option<f32>,
    pub invincible: bool,
    pub deaths: u32,
}

impl Default for SimGame {
    fn default() -> Self {
        Self {
            speed: Some(400.0),
            invincible: false,
            deaths: 0,
        }
    }
}

impl GameComponent for SimGame {
    fn speed(&self) -> Option<f32> {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = Some(speed);
    }

    fn invincible(&self) -> bool {
        self.invincible
    }

    fn set_invincible(&mut self, invincible: bool) {
        self.invincible = invincible;
    }

    fn judge_death(&mut self) {
        self.deaths += 1;
        tracing::info!(deaths = self.deaths, "Player was eaten");
    }
}

pub struct SimHost {
    ready_at: Instant,
    node_name: String,
    component_type: String,
    game: Mutex<Arc<Mutex<SimGame>>>,
}

impl SimHost {
    pub fn new(ready_after: Duration, bridge: &BridgeConfig) -> Self {
        Self {
            ready_at: Instant::now() + ready_after,
            node_name: bridge.node_name.clone(),
            component_type: bridge.component_type.clone(),
            game: Mutex::new(Arc::new(Mutex::new(SimGame::default()))),
        }
    }

    /// Load a new scene with a fresh component. The old one is dropped.
    pub fn relaunch(&self) {
        let mut game = self.game.lock().unwrap_or_else(PoisonError::into_inner);
        *game = Arc::new(Mutex::new(SimGame::default()));
        tracing::info!("Scene relaunched");
    }

    /// Copy of the current component's state
    pub fn game_state(&self) -> SimGame {
        let game = self.current();
        let state = game.lock().unwrap_or_else(PoisonError::into_inner);
        state.clone()
    }

    fn current(&self) -> Arc<Mutex<SimGame>> {
        self.game
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HostRuntime for SimHost {
    fn director_ready(&self) -> bool {
        Instant::now() >= self.ready_at
    }

    fn find_node(&self, name: &str) -> Option<NodeHandle> {
        (self.director_ready() && name == self.node_name).then(|| NodeHandle(name.to_string()))
    }

    fn component(&self, node: &NodeHandle, type_name: &str) -> Option<SharedComponent> {
        if node.0 != self.node_name || type_name != self.component_type {
            return None;
        }
        let shared: SharedComponent = self.current();
        Some(shared)
    }
}
