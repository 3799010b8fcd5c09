use std::path::Path;

use dragonfin_core::{ActivateOutcome, DeathVerdict, HotkeyAction, save_config};
use dragonfin_overlay::{OverlayInput, project, rasterize};
use dragonfin_types::DragonfinConfig;
use dragonfin_types::formatting::format_countdown_ms;

use crate::AppState;

pub fn eat(state: &mut AppState, category: u32, count: u32) -> Result<(), String> {
    for _ in 0..count {
        if !state.session.on_fish_eaten(category) {
            return Err(format!("unknown fish category {category}\n"));
        }
    }
    println!("Total: {}", state.session.tally().total());
    Ok(())
}

pub fn key(state: &mut AppState, key: &str) -> Result<(), String> {
    match state.session.handle_key(key) {
        Some(HotkeyAction::ShowTally) => show_tally(state),
        Some(action) => {
            println!("{action:?}");
            Ok(())
        }
        None => Err(format!("key {key:?} is not bound\n")),
    }
}

pub fn activate(state: &mut AppState, effect: &str) -> Result<(), String> {
    match state.session.activate(effect) {
        ActivateOutcome::Activated { expires_at } => println!("{effect} active until {expires_at}"),
        ActivateOutcome::AlreadyActive { expires_at } => {
            println!("{effect} already active until {expires_at}")
        }
        ActivateOutcome::OutOfRange => {
            return Err(format!("{effect} duration is out of range\n"));
        }
        ActivateOutcome::Unknown => return Err(format!("unknown power-up {effect:?}\n")),
    }
    Ok(())
}

pub fn deactivate(state: &mut AppState, effect: &str) -> Result<(), String> {
    if !state.session.deactivate(effect) {
        println!("{effect} is not active");
    }
    Ok(())
}

pub fn start_round(state: &mut AppState) -> Result<(), String> {
    state.session.on_session_start();
    println!("New round");
    Ok(())
}

pub fn death(state: &mut AppState) -> Result<(), String> {
    match state.session.judge_death() {
        Ok(DeathVerdict::Suppressed) => println!("Invincible, the big fish bounces off"),
        Ok(DeathVerdict::Delegated) => println!("Eaten! (deaths: {})", state.host.game_state().deaths),
        Err(e) => return Err(format!("{e}\n")),
    }
    Ok(())
}

pub fn relaunch(state: &mut AppState) -> Result<(), String> {
    state.host.relaunch();
    if state.session.on_scene_launched(state.host.as_ref()) {
        println!("Scene relaunched, bridge reinstalled");
    } else {
        println!("Scene relaunched, bridge unavailable");
    }
    Ok(())
}

pub fn show_tally(state: &AppState) -> Result<(), String> {
    println!("{}", state.session.tally_report());
    Ok(())
}

pub fn show_status(state: &AppState) -> Result<(), String> {
    let european = state.session.overlay_config().european_number_format;
    show_tally(state)?;

    let countdowns = state.session.engine().countdowns();
    if countdowns.is_empty() {
        println!("No power-ups active");
    }
    for countdown in countdowns {
        println!(
            "  {} {}",
            countdown.effect_id,
            format_countdown_ms(countdown.remaining_ms, european)
        );
    }

    let game = state.host.game_state();
    println!(
        "Game: speed={:?} invincible={} deaths={} bridge={}",
        game.speed,
        game.invincible,
        game.deaths,
        if state.session.is_installed() { "installed" } else { "missing" }
    );
    Ok(())
}

pub fn toggle_panel(state: &mut AppState) -> Result<(), String> {
    state.panel = state.panel.toggled();
    println!("Panel {:?}", state.panel);
    Ok(())
}

/// Print the projected widget tree
pub fn view(state: &AppState) -> Result<(), String> {
    let view = project(&OverlayInput::capture(&state.session, state.panel));

    if let Some(counter) = &view.counter {
        println!("[{}] {} ({})", counter.title, counter.total_text, counter.hint);
    }
    if let Some(panel) = &view.panel {
        println!("[{}] {}", panel.title, panel.total_text);
        for row in &panel.rows {
            println!("  {} {} {}", row.name, row.count, row.share_text);
        }
        println!("  [{}]", panel.close_label);
    }
    for badge in &view.badges {
        println!("{} {} {}", badge.icon, badge.name, badge.countdown_text);
    }
    for button in &view.buttons {
        println!(
            "<{} {}{}>{}",
            button.icon,
            button.name,
            button
                .hotkey
                .as_deref()
                .map(|k| format!(" [{k}]"))
                .unwrap_or_default(),
            if button.active { " *" } else { "" }
        );
    }
    for decoration in &view.decorations {
        println!("~ {decoration:?}");
    }
    for toast in &view.toasts {
        println!("» {}", toast.message);
    }
    Ok(())
}

pub fn render(state: &AppState, path: &Path, width: u32, height: u32) -> Result<(), String> {
    let view = project(&OverlayInput::capture(&state.session, state.panel));
    let pixmap = rasterize(&view, width, height).map_err(|e| e.to_string())?;
    pixmap.save_png(path).map_err(|e| e.to_string())?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<(), String> {
    let path = path.ok_or("no config path; pass --path\n")?;
    save_config(path, &DragonfinConfig::default()).map_err(|e| e.to_string())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn exit() {
    println!("Bye");
}
