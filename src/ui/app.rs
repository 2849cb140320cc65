//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::auth;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::controller::DashboardSnapshot;
use crate::environment::Environment;
use crate::events::Event as WorkerEvent;
use crate::proxy::CopyFormat;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::login::render_login;
use crate::ui::splash::render_splash;
use crate::workers::refresher::RefreshCommand;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// The different screens in the application.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Login screen where the user enters their email identity.
    Login,
    /// Dashboard screen displaying the proxy cards.
    Dashboard,
}

/// Application state
pub struct App {
    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Dashboard state, kept warm across screens so no event is lost.
    dashboard: DashboardState,

    /// Email being typed on the login screen.
    login_input: String,

    /// Whether the last login submission was rejected.
    login_invalid: bool,

    /// Receives events from the refresh worker.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Receives dashboard snapshots from the refresh worker.
    update_receiver: mpsc::Receiver<DashboardSnapshot>,

    /// Sends manual refreshes and identity changes to the worker.
    command_sender: mpsc::Sender<RefreshCommand>,

    /// Broadcasts shutdown signal to worker threads.
    shutdown_sender: broadcast::Sender<()>,

    /// System clipboard, if one could be connected.
    clipboard: Option<Box<dyn Clipboard>>,
}

impl App {
    /// Creates a new instance of the application.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user: Option<String>,
        environment: Environment,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        update_receiver: mpsc::Receiver<DashboardSnapshot>,
        command_sender: mpsc::Sender<RefreshCommand>,
        shutdown_sender: broadcast::Sender<()>,
        clipboard: Option<SystemClipboard>,
        with_background_color: bool,
    ) -> Self {
        Self {
            current_screen: Screen::Splash,
            dashboard: DashboardState::new(user, environment, with_background_color),
            login_input: String::new(),
            login_invalid: false,
            event_receiver,
            update_receiver,
            command_sender,
            shutdown_sender,
            clipboard: clipboard.map(|c| Box::new(c) as Box<dyn Clipboard>),
        }
    }

    /// Leaves the splash screen for the dashboard, or the login screen when
    /// no identity is available yet.
    fn leave_splash(&mut self) {
        self.current_screen = if self.dashboard.user.is_some() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
    }

    /// Completes a login, handing the new identity to the refresh worker.
    fn sign_in(&mut self, email: String) {
        self.dashboard.user = Some(email.clone());
        self.dashboard
            .add_event(WorkerEvent::session(format!("Signed in as {}", email)));
        let _ = self
            .command_sender
            .try_send(RefreshCommand::SetUser(Some(email)));
        self.current_screen = Screen::Dashboard;
    }

    fn request_refresh(&mut self) {
        let _ = self.command_sender.try_send(RefreshCommand::RefreshNow);
    }

    fn copy_selected(&mut self, format: CopyFormat) {
        let clipboard = self.clipboard.as_deref_mut();
        if let Some(event) = self.dashboard.copy_selected(format, clipboard) {
            self.dashboard.add_event(event);
        }
    }

    /// Handles one key press. Returns true when the application should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.current_screen {
            Screen::Splash => match code {
                KeyCode::Esc | KeyCode::Char('q') => return true,
                // Any other key press will skip the splash screen
                _ => self.leave_splash(),
            },
            Screen::Login => match code {
                KeyCode::Esc => return true,
                KeyCode::Enter => {
                    let email = self.login_input.trim().to_string();
                    if auth::is_valid_email(&email) {
                        self.login_invalid = false;
                        self.sign_in(email);
                    } else {
                        self.login_invalid = true;
                    }
                }
                KeyCode::Backspace => {
                    self.login_input.pop();
                }
                KeyCode::Char(c) => {
                    self.login_input.push(c);
                }
                _ => {}
            },
            Screen::Dashboard => match code {
                KeyCode::Esc | KeyCode::Char('q') => return true,
                KeyCode::Char('r') => self.request_refresh(),
                KeyCode::Up | KeyCode::Char('k') => self.dashboard.select_prev(),
                KeyCode::Down | KeyCode::Char('j') => self.dashboard.select_next(),
                KeyCode::Char('i') => self.copy_selected(CopyFormat::Ip),
                KeyCode::Char('p') => self.copy_selected(CopyFormat::Port),
                KeyCode::Char('u') => self.copy_selected(CopyFormat::Username),
                KeyCode::Char('w') => self.copy_selected(CopyFormat::Password),
                KeyCode::Char('f') => self.copy_selected(CopyFormat::Colon),
                KeyCode::Char('a') => self.copy_selected(CopyFormat::Auth),
                _ => {}
            },
        }
        false
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Queue all incoming worker events and state snapshots
        while let Ok(event) = app.event_receiver.try_recv() {
            app.dashboard.add_event(event);
        }
        while let Ok(snapshot) = app.update_receiver.try_recv() {
            app.dashboard.apply_snapshot(snapshot);
        }
        app.dashboard.update();

        terminal.draw(|f| render(f, &app))?;

        // Handle splash-to-dashboard transition
        if app.current_screen == Screen::Splash && splash_start.elapsed() >= splash_duration {
            app.leave_splash();
            continue;
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                if app.handle_key(key.code) {
                    // Send shutdown signal to workers
                    let _ = app.shutdown_sender.send(());
                    return Ok(());
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Splash => render_splash(f),
        Screen::Login => render_login(f, &app.login_input, app.login_invalid),
        Screen::Dashboard => render_dashboard(f, &app.dashboard),
    }
}
