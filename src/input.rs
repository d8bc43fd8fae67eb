use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    style::Style,
    widgets::{Block, Clear},
    Terminal,
};

use crate::config::Config;
use crate::ui::TerminalHost;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Dialogs are still open
    Continue,
    /// Nothing left to show
    Exit,
}

/// Drive the terminal host until every presented dialog is settled.
pub fn run_host<B: Backend>(
    terminal: &mut Terminal<B>,
    host: &TerminalHost,
    config: &Config,
) -> io::Result<()> {
    let behavior = &config.behavior;
    let theme = &config.theme;
    let mut cursor_visible = true;
    let mut last_cursor_toggle = Instant::now();

    while host.has_active() {
        terminal.draw(|f| {
            let area = f.size();
            f.render_widget(Clear, area);
            f.render_widget(Block::default().style(Style::default().bg(theme.background())), area);
            host.render(f, area, theme, cursor_visible);
        })?;

        // Toggle cursor blink
        if last_cursor_toggle.elapsed() >= Duration::from_millis(behavior.cursor_blink_ms) {
            cursor_visible = !cursor_visible;
            last_cursor_toggle = Instant::now();
        }

        if event::poll(Duration::from_millis(behavior.poll_ms))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Reset cursor to visible on any keypress
                    cursor_visible = true;
                    last_cursor_toggle = Instant::now();

                    if handle_key_event(host, key.code, key.modifiers) == HandleResult::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }
    Ok(())
}

/// Handle a key event and report whether any dialog is still open.
pub fn handle_key_event(
    host: &TerminalHost,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> HandleResult {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            host.dismiss_all();
        }
        _ => {
            host.handle_key(code, modifiers);
        }
    }

    if host.has_active() {
        HandleResult::Continue
    } else {
        HandleResult::Exit
    }
}
