//! tui-dialogs - ask a confirmation or a prompt from the terminal.
//!
//! Exit codes: 0 answered, 1 cancelled, 2 failed.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;

use tui_dialogs::cli::{Cli, Command};
use tui_dialogs::config::Config;
use tui_dialogs::ui::TerminalHost;
use tui_dialogs::{input, logging, DialogError, DialogService};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load(),
    };

    // Must outlive every dialog so buffered log lines get flushed
    let _log_guard = logging::init(&config.logging)?;

    let host = TerminalHost::new(config.profiles.clone());
    let service = DialogService::new(Arc::new(host.clone()));

    let outcome = match cli.command {
        Command::Confirm { title, message } => {
            let mut handle = service.confirm(title, message);
            run_terminal(&host, &config)?;
            handle.try_result().map(|r| r.map(|()| Value::Bool(true)))
        }
        Command::Prompt { title, fields } => {
            let mut handle = service.prompt(title, fields);
            run_terminal(&host, &config)?;
            handle
                .try_result()
                .map(|r| r.map(|values| Value::Object(values.into_iter().collect())))
        }
    };

    match outcome.unwrap_or(Err(DialogError::Abandoned)) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_cancelled() => {
            eprintln!("cancelled");
            Ok(ExitCode::from(1))
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(ExitCode::from(2))
        }
    }
}

/// Take over the terminal while dialogs are open.
fn run_terminal(host: &TerminalHost, config: &Config) -> Result<()> {
    // A rejected request never reached the host; leave the terminal alone.
    if !host.has_active() {
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let res = input::run_host(&mut terminal, host, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        // Anything still open was abandoned with the terminal
        host.dismiss_all();
        return Err(err.into());
    }
    Ok(())
}
