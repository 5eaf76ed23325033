use clap::Parser;
use color_eyre::Result;
use tokio::sync::mpsc;
use v1_dashboard::app::{App, AppActions};
use v1_dashboard::cli::CliArgs;
use v1_dashboard::config::load_config;
use v1_dashboard::device::DeviceClient;
use v1_dashboard::logging::{init_tracing, LogTarget};
use v1_dashboard::{event, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = load_config()?;

    // Headless when asked to, or when stdout is not a terminal
    let headless = args.headless || !is_terminal();
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(&config.log_file)
    };
    init_tracing(target, config.debug)?;
    tracing::info!(device = %config.device_url, headless, "starting v1 dashboard");

    let client = DeviceClient::new(&config.device_url, config.request_timeout)?;

    if headless {
        return event::run_headless(&client, args.json, args.export.as_deref()).await;
    }

    let (tx, mut responses) = mpsc::unbounded_channel();
    let mut actions = AppActions::new(client, tx);
    let mut app = App::new(config.export_dir.clone());

    // Setup terminal
    let mut terminal = terminal::setup_terminal()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, &mut actions, &mut responses, &config).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);
    if let Err(error) = &result {
        tracing::error!(%error, "dashboard exited with an error");
    }

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
