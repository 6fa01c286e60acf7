use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod client;
mod command;
mod config;
mod conversation;
mod handler;
mod movement;
mod tabs;
#[cfg(test)]
mod testing;
mod theme;
mod tui;
mod ui;

use app::App;
use client::{RobotClient, DEFAULT_SERVER_URL};
use config::Config;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "robot-panel")]
#[command(about = "Drive a remote robot and talk to its assistant from the terminal")]
struct Cli {
    /// Robot server base URL (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,
    /// Config file holding the server URL and theme
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Where to write logs; the terminal is taken by the UI
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let log_file = match path {
        Some(path) => path,
        None => Config::get_log_path()?,
    };

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file)?;

    let config_path = match cli.config {
        Some(path) => Some(path),
        None => Config::get_config_path().ok(),
    };
    let config = match &config_path {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable config {}: {:#}", path.display(), e);
            Config::new()
        }),
        None => Config::new(),
    };

    let server_url = cli
        .server
        .or_else(|| config.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    tracing::info!(server = %server_url, "starting robot panel");

    let mut events = EventHandler::new();
    let mut app = App::new(&config, config_path, RobotClient::new(&server_url), events.sender());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}
