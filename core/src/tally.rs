//! Fish tally
//!
//! Counts eaten fish per category. Every successful record queues a
//! `Changed` event for the overlay and an `Eaten` event carrying the
//! category's display metadata (used for the "+1" toast).

use std::collections::BTreeMap;

use dragonfin_types::FishCategory;
use dragonfin_types::color::{Rgba, parse_hex};
use dragonfin_types::formatting::format_share;

use crate::config::ConfigError;

/// Runtime form of a configured fish category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub id: u32,
    pub name: String,
    pub color: Rgba,
}

impl TryFrom<&FishCategory> for CategoryInfo {
    type Error = ConfigError;

    fn try_from(category: &FishCategory) -> Result<Self, Self::Error> {
        let color = parse_hex(&category.color).ok_or_else(|| ConfigError::InvalidColor {
            owner: format!("fish category {}", category.id),
            color: category.color.clone(),
        })?;
        Ok(Self {
            id: category.id,
            name: category.name.clone(),
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyEvent {
    /// Counts changed; the overlay should refresh
    Changed,
    /// A fish was recorded
    Eaten(CategoryInfo),
}

/// Immutable copy of the tally at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallySnapshot {
    pub total: u64,
    /// Every known category, zero-filled
    pub by_category: BTreeMap<u32, u64>,
    /// Category metadata in display order
    pub categories: Vec<CategoryInfo>,
}

impl TallySnapshot {
    pub fn count(&self, category: u32) -> u64 {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Share of the total as a 0.0..=1.0 fraction
    pub fn fraction(&self, category: u32) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(category) as f32 / self.total as f32
    }

    /// Share of the total formatted for display (`"75.0%"`)
    pub fn share_text(&self, category: u32, european: bool) -> String {
        format_share(self.count(category), self.total, european)
    }
}

#[derive(Debug, Clone)]
pub struct FishTally {
    categories: Vec<CategoryInfo>,
    counts: BTreeMap<u32, u64>,
    total: u64,
    events: Vec<TallyEvent>,
}

impl FishTally {
    pub fn new(categories: Vec<CategoryInfo>) -> Self {
        let counts = categories.iter().map(|c| (c.id, 0)).collect();
        Self {
            categories,
            counts,
            total: 0,
            events: Vec::new(),
        }
    }

    /// Build from config. Later duplicates of a category id are ignored.
    pub fn from_config(categories: &[FishCategory]) -> Result<Self, ConfigError> {
        let mut infos: Vec<CategoryInfo> = Vec::with_capacity(categories.len());
        for category in categories {
            if infos.iter().any(|c| c.id == category.id) {
                tracing::warn!(category = category.id, "Duplicate fish category, keeping first");
                continue;
            }
            infos.push(CategoryInfo::try_from(category)?);
        }
        Ok(Self::new(infos))
    }

    pub fn category(&self, id: u32) -> Option<&CategoryInfo> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Record one eaten fish. Unknown categories are logged and ignored.
    pub fn record(&mut self, category: u32) -> bool {
        let Some(info) = self.category(category).cloned() else {
            tracing::warn!(category, "Unknown fish category, ignoring");
            return false;
        };

        *self.counts.entry(category).or_insert(0) += 1;
        self.total += 1;

        tracing::debug!(category, name = %info.name, total = self.total, "Fish eaten");
        self.events.push(TallyEvent::Changed);
        self.events.push(TallyEvent::Eaten(info));
        true
    }

    pub fn reset(&mut self) {
        for count in self.counts.values_mut() {
            *count = 0;
        }
        self.total = 0;
        self.events.push(TallyEvent::Changed);
        tracing::info!("Fish tally reset");
    }

    pub fn count(&self, category: u32) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            total: self.total,
            by_category: self.counts.clone(),
            categories: self.categories.clone(),
        }
    }

    /// Take queued events (drains the queue)
    pub fn take_events(&mut self) -> Vec<TallyEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonfin_types::default_fish_categories;

    fn tally() -> FishTally {
        FishTally::from_config(&default_fish_categories()).unwrap()
    }

    #[test]
    fn test_total_matches_number_of_records() {
        let mut tally = tally();
        let calls = [1, 4, 4, 10, 2, 4, 9, 1];
        for c in calls {
            assert!(tally.record(c));
        }

        let snap = tally.snapshot();
        assert_eq!(snap.total, calls.len() as u64);
        for c in 1..=10 {
            let expected = calls.iter().filter(|&&x| x == c).count() as u64;
            assert_eq!(snap.count(c), expected, "category {c}");
        }
        assert_eq!(snap.by_category.values().sum::<u64>(), snap.total);
    }

    #[test]
    fn test_three_goldfish_and_a_shark() {
        let mut tally = tally();
        tally.record(4);
        tally.record(4);
        tally.record(4);
        tally.record(7);

        let snap = tally.snapshot();
        assert_eq!(snap.total, 4);
        assert_eq!(snap.count(4), 3);
        assert_eq!(snap.count(7), 1);
        for c in [1, 2, 3, 5, 6, 8, 9, 10] {
            assert_eq!(snap.count(c), 0);
        }
        assert_eq!(snap.by_category.len(), 10);
        assert_eq!(snap.share_text(4, false), "75.0%");
        assert!((snap.fraction(7) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_category_is_noop() {
        let mut tally = tally();
        tally.record(3);
        tally.take_events();
        let before = tally.snapshot();

        assert!(!tally.record(0));
        assert!(!tally.record(11));

        assert_eq!(tally.snapshot(), before);
        assert!(tally.take_events().is_empty());
    }

    #[test]
    fn test_record_emits_changed_and_eaten() {
        let mut tally = tally();
        tally.record(5);

        let events = tally.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TallyEvent::Changed);
        match &events[1] {
            TallyEvent::Eaten(info) => {
                assert_eq!(info.id, 5);
                assert_eq!(info.name, "锦鲤");
                assert_eq!(info.color, [0xFF, 0x63, 0x47, 255]);
            }
            other => panic!("expected Eaten, got {other:?}"),
        }
        assert!(tally.take_events().is_empty());
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut tally = tally();
        tally.record(1);
        tally.record(2);
        tally.take_events();

        tally.reset();

        let snap = tally.snapshot();
        assert_eq!(snap.total, 0);
        assert!(snap.by_category.values().all(|&c| c == 0));
        assert_eq!(snap.by_category.len(), 10);
        assert_eq!(tally.take_events(), vec![TallyEvent::Changed]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut tally = tally();
        tally.record(8);
        let mut snap = tally.snapshot();
        snap.by_category.insert(8, 100);
        snap.total = 100;

        assert_eq!(tally.count(8), 1);
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let bad = vec![FishCategory::new(1, "Nemo", "orange")];
        assert!(matches!(
            FishTally::from_config(&bad),
            Err(ConfigError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_duplicate_category_keeps_first() {
        let cats = vec![
            FishCategory::new(1, "first", "#000000"),
            FishCategory::new(1, "second", "#FFFFFF"),
        ];
        let tally = FishTally::from_config(&cats).unwrap();
        assert_eq!(tally.category(1).map(|c| c.name.as_str()), Some("first"));
        assert_eq!(tally.snapshot().categories.len(), 1);
    }
}
