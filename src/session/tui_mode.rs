//! TUI mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::clipboard::SystemClipboard;
use crate::ui;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the dashboard TUI: terminal setup, the UI loop, teardown, and
/// worker shutdown, in that order. The terminal is restored before the
/// UI result is propagated so an error cannot leave raw mode behind.
///
/// # Arguments
/// * `session` - Session data from setup
/// * `with_background` - Whether to paint the dashboard background
pub async fn run_tui_mode(
    session: SessionData,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    print_session_starting("TUI", session.user.as_deref());

    // Connect the system clipboard; the dashboard still works without one.
    let clipboard = match SystemClipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            log::debug!("Clipboard disabled: {}", e);
            None
        }
    };

    let SessionData {
        event_receiver,
        update_receiver,
        command_sender,
        join_handles,
        shutdown_sender,
        user,
        environment,
    } = session;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = ui::App::new(
        user,
        environment,
        event_receiver,
        update_receiver,
        command_sender,
        shutdown_sender,
        clipboard,
        with_background,
    );
    let result = ui::run(&mut terminal, app).await;

    // Restore the terminal whether or not the UI loop failed.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result?;

    print_session_shutdown();
    for handle in join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}
