//! user-manager-tui binary entry point.
//!
//! Parses the command line, installs file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use user_manager_tui::app::keymap::Keymap;
use user_manager_tui::app::{self, AppState, Theme};
use user_manager_tui::config::Cli;
use user_manager_tui::error::{Result, StartupError};
use user_manager_tui::remote::HttpUserService;
use user_manager_tui::store::UserStore;

/// Send `tracing` output to the log file; the alternate screen owns stdout.
fn init_logging(cli: &Cli) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .map_err(|source| StartupError::LogFile { path: cli.log_file.clone(), source })?;
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    tracing::info!(base_url = %cli.base_url, "starting");

    let service = HttpUserService::new(&cli.base_url, cli.timeout())?;
    let store = UserStore::new(Arc::new(service));
    let state = AppState::new(
        store,
        cli.base_url.clone(),
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
    );

    let mut terminal = init_terminal().map_err(StartupError::Terminal)?;

    let res = app::run(&mut terminal, state);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
