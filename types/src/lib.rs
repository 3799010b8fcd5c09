//! Shared configuration types for dragonfin.
//!
//! Everything here is plain serde data: the core crate turns these into
//! runtime registries, the overlay reads display metadata from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod color;
pub mod formatting;

// ─────────────────────────────────────────────────────────────────────────────
// Fish categories
// ─────────────────────────────────────────────────────────────────────────────

/// Display metadata for one fish category the host can report as eaten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishCategory {
    /// Category id as reported by the host (`typeID`)
    pub id: u32,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
}

impl FishCategory {
    pub fn new(id: u32, name: &str, color: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// The ten categories the game ships with.
pub fn default_fish_categories() -> Vec<FishCategory> {
    vec![
        FishCategory::new(1, "蝌蚪", "#90EE90"),
        FishCategory::new(2, "青蛙", "#32CD32"),
        FishCategory::new(3, "海龟", "#4682B4"),
        FishCategory::new(4, "小金鱼", "#FFD700"),
        FishCategory::new(5, "锦鲤", "#FF6347"),
        FishCategory::new(6, "电鳗", "#9370DB"),
        FishCategory::new(7, "鲨鱼", "#708090"),
        FishCategory::new(8, "鲸鱼", "#4169E1"),
        FishCategory::new(9, "蛟龙", "#DC143C"),
        FishCategory::new(10, "神龙", "#FF4500"),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Power-up effects
// ─────────────────────────────────────────────────────────────────────────────

/// What an effect does to the host while active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    /// Multiply the host's movement speed
    Speed { multiplier: f32 },
    /// Suppress the host's death judgment
    Invincible,
}

/// A configured power-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// `#RRGGBB`
    pub color: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub description: String,
    pub kind: EffectKind,
}

/// The speed and invincibility power-ups, five seconds each.
pub fn default_effects() -> Vec<EffectConfig> {
    vec![
        EffectConfig {
            id: "speed".to_string(),
            name: "加速".to_string(),
            icon: "⚡".to_string(),
            color: "#FFD700".to_string(),
            duration_ms: 5000,
            description: "速度提升2倍".to_string(),
            kind: EffectKind::Speed { multiplier: 2.0 },
        },
        EffectConfig {
            id: "invincible".to_string(),
            name: "无敌".to_string(),
            icon: "🛡️".to_string(),
            color: "#00FFFF".to_string(),
            duration_ms: 5000,
            description: "大鱼无法吃掉你".to_string(),
            kind: EffectKind::Invincible,
        },
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Section configs
// ─────────────────────────────────────────────────────────────────────────────

/// Readiness gate polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    /// Capability names that must be present before the bridge installs
    pub capabilities: Vec<String>,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            timeout_ms: 20_000,
            capabilities: vec!["director".to_string(), "fish_tally".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interval between expiry re-checks while an effect is active
    pub check_interval_ms: u64,
    /// How long engine notifications stay on screen
    pub notification_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 100,
            notification_ms: 2000,
        }
    }
}

/// Where the bridge finds the host's gameplay component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub node_name: String,
    pub component_type: String,
    /// Baseline speed assumed when the host reports none
    pub fallback_speed: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            node_name: "Canvas".to_string(),
            component_type: "MainGameJS".to_string(),
            fallback_speed: 400.0,
        }
    }
}

/// Keyboard shortcuts. Keys compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub show_tally: String,
    pub reset_tally: String,
    /// Key -> effect id
    pub effects: BTreeMap<String, String>,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        let mut effects = BTreeMap::new();
        effects.insert("1".to_string(), "speed".to_string());
        effects.insert("2".to_string(), "invincible".to_string());
        Self {
            show_tally: "c".to_string(),
            reset_tally: "r".to_string(),
            effects,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub european_number_format: bool,
    /// How long a "+1 fish" toast stays on screen
    pub toast_ms: u64,
    pub speed_line_count: usize,
    pub shield_sparks: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            european_number_format: false,
            toast_ms: 2000,
            speed_line_count: 20,
            shield_sparks: 6,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragonfinConfig {
    pub readiness: ReadinessConfig,
    pub engine: EngineConfig,
    pub bridge: BridgeConfig,
    pub hotkeys: HotkeyConfig,
    pub overlay: OverlayConfig,
    #[serde(rename = "effect")]
    pub effects: Vec<EffectConfig>,
    #[serde(rename = "fish")]
    pub fish: Vec<FishCategory>,
}

impl Default for DragonfinConfig {
    fn default() -> Self {
        Self {
            readiness: ReadinessConfig::default(),
            engine: EngineConfig::default(),
            bridge: BridgeConfig::default(),
            hotkeys: HotkeyConfig::default(),
            overlay: OverlayConfig::default(),
            effects: default_effects(),
            fish: default_fish_categories(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: DragonfinConfig = toml::from_str("").unwrap();
        assert_eq!(config, DragonfinConfig::default());
        assert_eq!(config.fish.len(), 10);
        assert_eq!(config.effects.len(), 2);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let toml = r##"
[readiness]
timeout_ms = 5000

[hotkeys.effects]
"3" = "speed"

[[effect]]
id = "turbo"
name = "Turbo"
color = "#FF0000"
duration_ms = 3000
kind = { type = "speed", multiplier = 3.0 }
"##;
        let config: DragonfinConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.readiness.timeout_ms, 5000);
        assert_eq!(config.readiness.poll_interval_ms, 100);
        assert_eq!(config.hotkeys.show_tally, "c");
        assert_eq!(config.hotkeys.effects.get("3").map(String::as_str), Some("speed"));
        assert_eq!(config.effects.len(), 1);
        assert_eq!(config.effects[0].kind, EffectKind::Speed { multiplier: 3.0 });
        assert!(config.effects[0].icon.is_empty());
        // fish table untouched
        assert_eq!(config.fish, default_fish_categories());
    }

    #[test]
    fn test_invincible_kind_parses() {
        let toml = r##"
[[effect]]
id = "shield"
name = "Shield"
color = "#00FFFF"
duration_ms = 8000
kind = { type = "invincible" }
"##;
        let config: DragonfinConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.effects[0].kind, EffectKind::Invincible);
    }
}
