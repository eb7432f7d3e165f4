//! Single-process hot-seat mode on the local terminal.

use crate::config::Settings;
use crate::handler::{Reply, SessionHandler};
use crate::host::MatchHost;
use crate::input::Key;
use crate::view;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Runs a hot-seat match on this terminal until `ctrl+c`.
#[instrument(skip(settings))]
pub fn run(settings: &Settings) -> Result<()> {
    info!("Starting local match");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let host = Arc::new(MatchHost::new(settings));
    let res = game_loop(&mut terminal, SessionHandler::hot_seat(host));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Local game loop error");
    }
    res
}

fn game_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut handler: SessionHandler,
) -> Result<()> {
    loop {
        let state = handler.host().snapshot();
        let text = view::render(&state, handler.view(), Some(handler.draft()));
        terminal.draw(|f| {
            let paragraph = Paragraph::new(text)
                .block(Block::default().title(view::TITLE).borders(Borders::ALL));
            f.render_widget(paragraph, f.area());
        })?;

        if let Event::Key(key) = event::read()?
            && let Some(key) = map_key(key)
            && handler.handle(key) == Reply::Quit
        {
            info!("User quit");
            return Ok(());
        }
    }
}

/// Translates a terminal key event into a game key.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::CtrlC),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_maps_to_quit_key() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(event), Some(Key::CtrlC));
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(map_key(event), Some(Key::Char('c')));
        assert_eq!(map_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)), None);
    }
}
