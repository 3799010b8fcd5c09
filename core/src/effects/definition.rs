//! Effect definitions
//!
//! Static description of each power-up: how long it lasts, what it does to
//! the host, and how the overlay should present it.

use std::collections::HashMap;

use chrono::TimeDelta;
use dragonfin_types::color::{Rgba, parse_hex};
use dragonfin_types::{EffectConfig, EffectKind};

use crate::config::ConfigError;

/// Longest power-up a config may declare (one hour)
pub const MAX_DURATION_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct EffectDefinition {
    /// Unique id (`"speed"`, `"invincible"`)
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: Rgba,
    pub duration_ms: u64,
    pub description: String,
    pub kind: EffectKind,
}

impl EffectDefinition {
    pub fn duration(&self) -> TimeDelta {
        i64::try_from(self.duration_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// Label used in notifications and buttons (`"⚡ 加速"`)
    pub fn label(&self) -> String {
        if self.icon.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.icon, self.name)
        }
    }
}

impl TryFrom<&EffectConfig> for EffectDefinition {
    type Error = ConfigError;

    fn try_from(config: &EffectConfig) -> Result<Self, Self::Error> {
        if config.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                id: config.id.clone(),
            });
        }
        if config.duration_ms > MAX_DURATION_MS {
            return Err(ConfigError::DurationTooLong {
                id: config.id.clone(),
                duration_ms: config.duration_ms,
                max_ms: MAX_DURATION_MS,
            });
        }
        if let EffectKind::Speed { multiplier } = config.kind
            && !(multiplier.is_finite() && multiplier > 0.0)
        {
            return Err(ConfigError::InvalidMultiplier {
                id: config.id.clone(),
                multiplier,
            });
        }
        let color = parse_hex(&config.color).ok_or_else(|| ConfigError::InvalidColor {
            owner: format!("effect {:?}", config.id),
            color: config.color.clone(),
        })?;

        Ok(Self {
            id: config.id.clone(),
            name: config.name.clone(),
            icon: config.icon.clone(),
            color,
            duration_ms: config.duration_ms,
            description: config.description.clone(),
            kind: config.kind,
        })
    }
}

/// Effect definitions keyed by id, remembering insertion order for display
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    effects: HashMap<String, EffectDefinition>,
    order: Vec<String>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add definitions. Duplicates are skipped (the first definition wins);
    /// their IDs are returned.
    pub fn add_definitions(&mut self, definitions: Vec<EffectDefinition>) -> Vec<String> {
        let mut duplicates = Vec::new();
        for def in definitions {
            if self.effects.contains_key(&def.id) {
                duplicates.push(def.id.clone());
                continue;
            }
            self.order.push(def.id.clone());
            self.effects.insert(def.id.clone(), def);
        }
        duplicates
    }

    /// Build from config, validating every entry.
    pub fn from_config(configs: &[EffectConfig]) -> Result<Self, ConfigError> {
        let definitions = configs
            .iter()
            .map(EffectDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut set = Self::new();
        let duplicates = set.add_definitions(definitions);
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "Duplicate effect IDs in config, keeping first");
        }
        Ok(set)
    }

    pub fn get(&self, id: &str) -> Option<&EffectDefinition> {
        self.effects.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.effects.contains_key(id)
    }

    /// Definitions in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.order.iter().filter_map(|id| self.effects.get(id))
    }

    /// Position of `id` in display order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonfin_types::default_effects;

    #[test]
    fn test_defaults_load_in_order() {
        let set = DefinitionSet::from_config(&default_effects()).unwrap();
        let ids: Vec<_> = set.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["speed", "invincible"]);

        let speed = set.get("speed").unwrap();
        assert_eq!(speed.duration(), TimeDelta::milliseconds(5000));
        assert_eq!(speed.color, [0xFF, 0xD7, 0x00, 255]);
        assert_eq!(speed.label(), "⚡ 加速");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut configs = default_effects();
        let mut dup = configs[0].clone();
        dup.duration_ms = 9000;
        configs.push(dup);

        let set = DefinitionSet::from_config(&configs).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("speed").unwrap().duration_ms, 5000);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut configs = default_effects();
        configs[1].duration_ms = 0;
        assert!(matches!(
            DefinitionSet::from_config(&configs),
            Err(ConfigError::ZeroDuration { id }) if id == "invincible"
        ));
    }

    #[test]
    fn test_oversized_duration_rejected() {
        let mut configs = default_effects();
        configs[0].duration_ms = u64::MAX - 1000;
        assert!(matches!(
            DefinitionSet::from_config(&configs),
            Err(ConfigError::DurationTooLong { id, max_ms, .. }) if id == "speed" && max_ms == MAX_DURATION_MS
        ));

        configs[0].duration_ms = 10_000_000_000_000_000;
        assert!(matches!(
            DefinitionSet::from_config(&configs),
            Err(ConfigError::DurationTooLong { .. })
        ));

        configs[0].duration_ms = MAX_DURATION_MS;
        assert!(DefinitionSet::from_config(&configs).is_ok());
    }

    #[test]
    fn test_duration_saturates_instead_of_wrapping() {
        let mut def = EffectDefinition::try_from(&default_effects()[0]).unwrap();
        def.duration_ms = u64::MAX;
        assert!(def.duration() > TimeDelta::zero());
    }

    #[test]
    fn test_bad_multiplier_rejected() {
        let mut configs = default_effects();
        configs[0].kind = EffectKind::Speed { multiplier: 0.0 };
        assert!(matches!(
            DefinitionSet::from_config(&configs),
            Err(ConfigError::InvalidMultiplier { .. })
        ));
    }
}
