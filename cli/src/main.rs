use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dragonfin_cli::sim::SimHost;
use dragonfin_cli::{AppState, commands, logging, readline, stdin_lines};
use dragonfin_core::{
    HostCapabilities, Readiness, ReadinessGate, Session, SystemClock, default_config_path,
    load_config,
};
use dragonfin_overlay::PanelState;
use tokio::sync::Mutex;
use tokio::task::LocalSet;

#[derive(Parser)]
#[command(version, about = "Fish tally and power-up simulator")]
struct Args {
    /// Config file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Delay before the simulated game finishes loading
    #[arg(long, default_value_t = 1500)]
    ready_after_ms: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    logging::init_logging();
    let args = Args::parse();
    LocalSet::new().run_until(run(args)).await
}

async fn run(args: Args) -> Result<(), String> {
    let config_path = args.config.or_else(default_config_path);
    let config = match &config_path {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => Default::default(),
    };

    let session = Session::new(&config, Arc::new(SystemClock)).map_err(|e| e.to_string())?;
    let host = Arc::new(SimHost::new(
        Duration::from_millis(args.ready_after_ms),
        &config.bridge,
    ));
    let state = Arc::new(Mutex::new(AppState {
        session,
        host: Arc::clone(&host),
        panel: PanelState::default(),
        config_path,
    }));

    // Wait for the game, then hook into it. The REPL runs meanwhile.
    let gate = ReadinessGate::from_config(&config.readiness);
    let bridge_config = config.bridge.clone();
    let install_state = Arc::clone(&state);
    tokio::task::spawn_local(async move {
        let probe = HostCapabilities::new(host.as_ref(), &bridge_config);
        match gate.wait(&probe).await {
            Readiness::Ready { waited } => {
                tracing::info!(waited_ms = waited.as_millis() as u64, "Game ready");
            }
            Readiness::Degraded { missing } => {
                tracing::warn!(?missing, "Game not ready, running without it");
            }
        }
        install_state.lock().await.session.install(host.as_ref());
    });

    let tick_state = Arc::clone(&state);
    let check_interval = Duration::from_millis(config.engine.check_interval_ms.max(1));
    tokio::task::spawn_local(async move {
        let mut ticker = tokio::time::interval(check_interval);
        loop {
            ticker.tick().await;
            tick_state.lock().await.session.tick();
        }
    });

    let mut lines = stdin_lines();
    while let Some(line) = readline(&mut lines).await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &state).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => eprint!("{err}"),
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Repl {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record eaten fish
    Eat {
        category: u32,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Press a hotkey
    Key { key: String },
    Activate { effect: String },
    Deactivate { effect: String },
    /// Start a new round
    Start,
    /// The player touches a bigger fish
    Death,
    /// Reload the game scene
    Relaunch,
    /// Tally, power-ups and game state
    Show,
    /// Toggle the tally detail panel
    Panel,
    /// Print the overlay widgets
    View,
    /// Paint the overlay to a PNG
    Render {
        path: PathBuf,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
    /// Write the default config file
    InitConfig {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    Exit,
}

async fn respond(line: &str, state: &Arc<Mutex<AppState>>) -> Result<bool, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting\n")?;
    let repl = Repl::try_parse_from(args).map_err(|e| e.to_string())?;

    let mut state = state.lock().await;
    match &repl.command {
        Some(Commands::Eat { category, count }) => commands::eat(&mut state, *category, *count)?,
        Some(Commands::Key { key }) => commands::key(&mut state, key)?,
        Some(Commands::Activate { effect }) => commands::activate(&mut state, effect)?,
        Some(Commands::Deactivate { effect }) => commands::deactivate(&mut state, effect)?,
        Some(Commands::Start) => commands::start_round(&mut state)?,
        Some(Commands::Death) => commands::death(&mut state)?,
        Some(Commands::Relaunch) => commands::relaunch(&mut state)?,
        Some(Commands::Show) => commands::show_status(&state)?,
        Some(Commands::Panel) => commands::toggle_panel(&mut state)?,
        Some(Commands::View) => commands::view(&state)?,
        Some(Commands::Render {
            path,
            width,
            height,
        }) => commands::render(&state, path, *width, *height)?,
        Some(Commands::InitConfig { path }) => {
            let path = path.clone().or_else(|| state.config_path.clone());
            commands::init_config(path.as_deref())?
        }
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
