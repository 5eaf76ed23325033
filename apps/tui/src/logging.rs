use color_eyre::eyre::{Result, WrapErr};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// The UI owns the terminal, so logs are appended to a file.
    File(&'a Path),
    Stderr,
}

/// `RUST_LOG` wins; otherwise `debug` or `info`.
pub fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

pub fn init_tracing(target: LogTarget<'_>, debug: bool) -> Result<()> {
    let filter = env_filter(debug);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }

    Ok(())
}
