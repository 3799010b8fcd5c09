//! Keyboard shortcut dispatch.

use std::collections::HashMap;

use dragonfin_types::HotkeyConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Log the current tally
    ShowTally,
    ResetTally,
    /// Activate the power-up with this id
    Activate(String),
}

#[derive(Debug, Clone, Default)]
pub struct HotkeyMap {
    bindings: HashMap<String, HotkeyAction>,
}

impl HotkeyMap {
    /// Effect bindings win over tally bindings on the same key.
    pub fn from_config(config: &HotkeyConfig) -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(normalize(&config.show_tally), HotkeyAction::ShowTally);
        bindings.insert(normalize(&config.reset_tally), HotkeyAction::ResetTally);
        for (key, effect) in &config.effects {
            if let Some(previous) = bindings.insert(normalize(key), HotkeyAction::Activate(effect.clone())) {
                tracing::warn!(key = %key, ?previous, effect = %effect, "Hotkey rebound");
            }
        }
        Self { bindings }
    }

    pub fn resolve(&self, key: &str) -> Option<&HotkeyAction> {
        self.bindings.get(&normalize(key))
    }

    /// Key bound to activating `effect_id`, for control button labels
    pub fn key_for_effect(&self, effect_id: &str) -> Option<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, action)| matches!(action, HotkeyAction::Activate(id) if id == effect_id))
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys.first().copied()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}
