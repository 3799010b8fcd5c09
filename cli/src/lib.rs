pub mod commands;
pub mod logging;
pub mod sim;

use std::path::PathBuf;
use std::sync::Arc;

use dragonfin_core::Session;
use dragonfin_overlay::PanelState;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::sim::SimHost;

/// Everything the REPL and the tick loop share
pub struct AppState {
    pub session: Session,
    pub host: Arc<SimHost>,
    pub panel: PanelState,
    pub config_path: Option<PathBuf>,
}

pub type InputLines = Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Prompt and read one line. `None` on end of input.
pub async fn readline(lines: &mut InputLines) -> Result<Option<String>, String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await.map_err(|e| e.to_string())?;
    stdout.flush().await.map_err(|e| e.to_string())?;
    lines.next_line().await.map_err(|e| e.to_string())
}
