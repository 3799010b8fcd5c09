//! State → view projection
//!
//! [`project`] is a pure function: the same [`OverlayInput`] always yields the
//! same [`OverlayView`]. Rebuild the view whenever the session's revision
//! changes (or every tick while a countdown is running) and hand it to the
//! renderer; no widget is patched in place.

use std::collections::BTreeMap;

use dragonfin_core::{EffectCountdown, EffectDefinition, Notification, Session, TallySnapshot};
use dragonfin_types::color::contrast_text;
use dragonfin_types::formatting::{format_countdown_ms, format_total};
use dragonfin_types::{EffectKind, OverlayConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::truncate_name;
use crate::widgets::{
    ControlButton, CounterBadge, Decoration, DetailPanel, PanelRow, PowerUpBadge, SpeedLine, Toast,
};

/// Speed line placement is seeded so rebuilding the view doesn't reshuffle them
pub const SPEED_LINE_SEED: u64 = 0x5eed_f15b;

const MAX_NAME_CHARS: usize = 12;

const TITLE: &str = "🐟 吃鱼统计";
const HINT: &str = "点击查看详情";
const CLOSE_LABEL: &str = "关闭详情";

/// Whether the tally detail panel is open. Toggled by clicking the counter
/// badge or the panel's close button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Collapsed,
    Expanded,
}

impl PanelState {
    pub fn toggled(self) -> Self {
        match self {
            PanelState::Collapsed => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsed,
        }
    }
}

/// Everything the overlay shows, captured at one instant
#[derive(Debug, Clone)]
pub struct OverlayInput {
    pub tally: TallySnapshot,
    pub countdowns: Vec<EffectCountdown>,
    /// Every configured effect, in display order
    pub effects: Vec<EffectDefinition>,
    /// Effect id -> hotkey label
    pub effect_keys: BTreeMap<String, String>,
    pub notifications: Vec<Notification>,
    pub config: OverlayConfig,
    pub panel: PanelState,
}

impl OverlayInput {
    pub fn capture(session: &Session, panel: PanelState) -> Self {
        let effects: Vec<EffectDefinition> = session.engine().definitions().iter().cloned().collect();
        let effect_keys = effects
            .iter()
            .filter_map(|def| {
                session
                    .hotkeys()
                    .key_for_effect(&def.id)
                    .map(|key| (def.id.clone(), key.to_uppercase()))
            })
            .collect();

        Self {
            tally: session.tally_snapshot(),
            countdowns: session.engine().countdowns(),
            effects,
            effect_keys,
            notifications: session.notifications().visible().cloned().collect(),
            config: session.overlay_config().clone(),
            panel,
        }
    }

    fn effect(&self, id: &str) -> Option<&EffectDefinition> {
        self.effects.iter().find(|def| def.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayView {
    pub counter: Option<CounterBadge>,
    pub panel: Option<DetailPanel>,
    pub badges: Vec<PowerUpBadge>,
    pub buttons: Vec<ControlButton>,
    pub decorations: Vec<Decoration>,
    pub toasts: Vec<Toast>,
}

pub fn project(input: &OverlayInput) -> OverlayView {
    let european = input.config.european_number_format;

    let (counter, panel) = match input.panel {
        PanelState::Collapsed => (Some(counter_badge(&input.tally, european)), None),
        PanelState::Expanded => (None, Some(detail_panel(&input.tally, european))),
    };

    let badges = input
        .countdowns
        .iter()
        .filter_map(|countdown| {
            let def = input.effect(&countdown.effect_id)?;
            Some(PowerUpBadge {
                effect_id: def.id.clone(),
                icon: def.icon.clone(),
                name: def.name.clone(),
                color: def.color,
                countdown_text: format_countdown_ms(countdown.remaining_ms, european),
                progress: countdown.progress,
            })
        })
        .collect();

    let buttons = input
        .effects
        .iter()
        .map(|def| ControlButton {
            effect_id: def.id.clone(),
            icon: def.icon.clone(),
            name: def.name.clone(),
            color: def.color,
            text_color: contrast_text(def.color),
            hotkey: input.effect_keys.get(&def.id).cloned(),
            active: input.countdowns.iter().any(|c| c.effect_id == def.id),
        })
        .collect();

    let toasts = input
        .notifications
        .iter()
        .map(|n| Toast {
            id: n.id,
            message: n.message.clone(),
            background: n.color,
            text: contrast_text(n.color),
        })
        .collect();

    OverlayView {
        counter,
        panel,
        badges,
        buttons,
        decorations: decorations(input),
        toasts,
    }
}

fn counter_badge(tally: &TallySnapshot, european: bool) -> CounterBadge {
    CounterBadge {
        title: TITLE.to_string(),
        total: tally.total,
        total_text: format_total(tally.total, european),
        hint: HINT.to_string(),
    }
}

fn detail_panel(tally: &TallySnapshot, european: bool) -> DetailPanel {
    let rows = tally
        .categories
        .iter()
        .filter(|category| tally.count(category.id) > 0)
        .map(|category| PanelRow {
            category: category.id,
            name: truncate_name(&category.name, MAX_NAME_CHARS),
            color: category.color,
            count: tally.count(category.id),
            share_text: format!("占比: {}", tally.share_text(category.id, european)),
            fraction: tally.fraction(category.id),
        })
        .collect();

    DetailPanel {
        title: TITLE.to_string(),
        total_text: format!("总计: {}", format_total(tally.total, european)),
        rows,
        close_label: CLOSE_LABEL.to_string(),
    }
}

/// One decoration per active effect kind, in effect order
fn decorations(input: &OverlayInput) -> Vec<Decoration> {
    input
        .countdowns
        .iter()
        .filter_map(|countdown| input.effect(&countdown.effect_id))
        .map(|def| match def.kind {
            EffectKind::Speed { .. } => Decoration::SpeedLines {
                color: def.color,
                lines: speed_lines(SPEED_LINE_SEED, input.config.speed_line_count),
            },
            EffectKind::Invincible => Decoration::Shield {
                color: def.color,
                sparks: input.config.shield_sparks,
            },
        })
        .collect()
}

/// Generate `count` speed lines from `seed`. Same seed, same lines.
pub fn speed_lines(seed: u64, count: usize) -> Vec<SpeedLine> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| SpeedLine {
            top_pct: rng.gen_range(0.0..100.0),
            width_px: rng.gen_range(50.0..150.0),
            duration_s: rng.gen_range(0.3..0.6),
            delay_s: rng.gen_range(0.0..0.2),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDateTime;
    use dragonfin_core::ManualClock;
    use dragonfin_types::DragonfinConfig;

    fn session() -> (Session, ManualClock) {
        let start = NaiveDateTime::parse_from_str("2026-01-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let clock = ManualClock::new(start);
        let session = Session::new(&DragonfinConfig::default(), Arc::new(clock.clone())).unwrap();
        (session, clock)
    }

    #[test]
    fn test_idle_view() {
        let (session, _clock) = session();
        let view = project(&OverlayInput::capture(&session, PanelState::Collapsed));

        let counter = view.counter.unwrap();
        assert_eq!(counter.total, 0);
        assert_eq!(counter.total_text, "0");
        assert!(view.panel.is_none());
        assert!(view.badges.is_empty());
        assert!(view.decorations.is_empty());
        assert!(view.toasts.is_empty());

        let keys: Vec<_> = view.buttons.iter().map(|b| b.hotkey.as_deref()).collect();
        assert_eq!(keys, vec![Some("1"), Some("2")]);
        assert!(view.buttons.iter().all(|b| !b.active));
    }

    #[test]
    fn test_panel_lists_only_eaten_categories() {
        let (mut session, _clock) = session();
        for category in [4, 4, 4, 7] {
            session.on_fish_eaten(category);
        }

        let view = project(&OverlayInput::capture(&session, PanelState::Expanded));
        assert!(view.counter.is_none());

        let panel = view.panel.unwrap();
        assert_eq!(panel.total_text, "总计: 4");
        let rows: Vec<_> = panel
            .rows
            .iter()
            .map(|r| (r.name.as_str(), r.count, r.share_text.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![("小金鱼", 3, "占比: 75.0%"), ("鲨鱼", 1, "占比: 25.0%")]
        );
        assert!((panel.rows[0].fraction - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_active_effects_show_badges_and_decorations() {
        let (mut session, clock) = session();
        session.activate("speed");
        session.activate("invincible");
        clock.advance_ms(800);

        let view = project(&OverlayInput::capture(&session, PanelState::Collapsed));
        let badges: Vec<_> = view
            .badges
            .iter()
            .map(|b| (b.effect_id.as_str(), b.countdown_text.as_str()))
            .collect();
        assert_eq!(badges, vec![("speed", "4.2s"), ("invincible", "4.2s")]);
        assert!(view.buttons.iter().all(|b| b.active));

        match &view.decorations[..] {
            [Decoration::SpeedLines { lines, .. }, Decoration::Shield { sparks, color }] => {
                assert_eq!(lines.len(), 20);
                assert_eq!(*sparks, 6);
                assert_eq!(*color, [0x00, 0xFF, 0xFF, 0xFF]);
            }
            other => panic!("unexpected decorations: {other:?}"),
        }
    }

    #[test]
    fn test_toasts_use_contrast_text() {
        let (mut session, _clock) = session();
        session.on_fish_eaten(4);
        session.on_fish_eaten(8);

        let view = project(&OverlayInput::capture(&session, PanelState::Collapsed));
        let toasts: Vec<_> = view
            .toasts
            .iter()
            .map(|t| (t.message.as_str(), t.text))
            .collect();
        assert_eq!(
            toasts,
            vec![
                ("+1 小金鱼", [0, 0, 0, 255]),
                ("+1 鲸鱼", [255, 255, 255, 255]),
            ]
        );
    }

    #[test]
    fn test_european_format_groups_totals_with_dots() {
        let (session, _clock) = session();
        let mut input = OverlayInput::capture(&session, PanelState::Collapsed);
        input.tally.total = 12_345;
        input.config.european_number_format = true;

        let counter = project(&input).counter.unwrap();
        assert_eq!(counter.total_text, "12.345");

        input.panel = PanelState::Expanded;
        let panel = project(&input).panel.unwrap();
        assert_eq!(panel.total_text, "总计: 12.345");
    }

    #[test]
    fn test_projection_is_deterministic() {
        let (mut session, _clock) = session();
        session.on_fish_eaten(1);
        session.activate("speed");

        let input = OverlayInput::capture(&session, PanelState::Expanded);
        assert_eq!(project(&input), project(&input));
    }

    #[test]
    fn test_speed_lines_in_range() {
        let lines = speed_lines(SPEED_LINE_SEED, 20);
        assert_eq!(lines, speed_lines(SPEED_LINE_SEED, 20));
        for line in lines {
            assert!((0.0..100.0).contains(&line.top_pct));
            assert!((50.0..150.0).contains(&line.width_px));
            assert!((0.3..0.6).contains(&line.duration_s));
            assert!((0.0..0.2).contains(&line.delay_s));
        }
    }

    #[test]
    fn test_panel_toggle() {
        assert_eq!(PanelState::default().toggled(), PanelState::Expanded);
        assert_eq!(PanelState::Expanded.toggled(), PanelState::Collapsed);
    }
}
