use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::EnvFilter;

const LOG_PATH_VAR: &str = "DRAGONFIN_LOG_PATH";

/// Where log lines go while the REPL owns stdout
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogSink {
    /// Full timestamped lines appended to a file
    File(PathBuf),
    /// Short lines on stderr, interleaved with the prompt
    Stderr,
}

impl LogSink {
    fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(path) if !path.trim().is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Stderr,
        }
    }

    /// A file can take everything; the terminal only gets what interrupts the prompt.
    fn default_level(&self) -> Level {
        match self {
            Self::File(_) => Level::INFO,
            Self::Stderr => Level::WARN,
        }
    }
}

fn filter_for(sink: &LogSink) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(sink.default_level().into())
        .from_env_lossy()
}

fn open_log(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. `RUST_LOG` overrides the level;
/// `DRAGONFIN_LOG_PATH` sends logs to a file instead of stderr.
pub fn init_logging() {
    let mut sink = LogSink::from_env_value(std::env::var(LOG_PATH_VAR).ok());
    let mut open_error = None;

    if let LogSink::File(path) = &sink {
        match open_log(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter_for(&sink))
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file)
                    .init();
                tracing::info!(path = %path.display(), "Session log opened");
                return;
            }
            Err(e) => {
                open_error = Some((path.clone(), e));
                sink = LogSink::Stderr;
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(&sink))
        .with_target(false)
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .init();

    if let Some((path, error)) = open_error {
        tracing::warn!(path = %path.display(), %error, "Could not open log file, logging to stderr");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_from_env() {
        assert_eq!(LogSink::from_env_value(None), LogSink::Stderr);
        assert_eq!(LogSink::from_env_value(Some("  ".into())), LogSink::Stderr);
        assert_eq!(
            LogSink::from_env_value(Some("/tmp/dragonfin.log".into())),
            LogSink::File(PathBuf::from("/tmp/dragonfin.log"))
        );
    }

    #[test]
    fn test_terminal_is_quieter_than_file() {
        assert_eq!(LogSink::Stderr.default_level(), Level::WARN);
        assert_eq!(LogSink::File(PathBuf::new()).default_level(), Level::INFO);
    }
}
