//! Session setup and initialization

use crate::auth;
use crate::backend::{BaserowClient, RecordSource};
use crate::config::Config;
use crate::controller::DashboardSnapshot;
use crate::environment::Environment;
use crate::events::Event;
use crate::runtime::start_record_worker;
use crate::workers::refresher::RefreshCommand;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Receiver for dashboard state snapshots
    pub update_receiver: mpsc::Receiver<DashboardSnapshot>,
    /// Sender for manual refreshes and identity changes
    pub command_sender: mpsc::Sender<RefreshCommand>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all workers
    pub shutdown_sender: broadcast::Sender<()>,
    /// Identity the session starts with, if any
    pub user: Option<String>,
    /// The environment the session talks to
    pub environment: Environment,
}

/// Sets up a dashboard session.
///
/// Resolves the identity and API token, builds the record backend client,
/// and starts the refresh worker. A session may start without an identity;
/// the TUI then opens on the login screen and no fetches happen until the
/// user signs in.
///
/// # Arguments
/// * `env` - Environment to connect to
/// * `config` - Stored configuration, if a user is signed in
/// * `email_override` - Identity passed on the command line, taking
///   precedence over the stored one
pub fn setup_session(
    env: Environment,
    config: Option<Config>,
    email_override: Option<String>,
) -> Result<SessionData, Box<dyn Error>> {
    let user = email_override.or_else(|| config.as_ref().map(|c| c.email.clone()));
    if let Some(email) = &user {
        if !auth::is_valid_email(email) {
            return Err(Box::from(format!("Invalid email address: {}", email)));
        }
    }

    // The PROXYDASH_API_TOKEN environment variable overrides the stored token.
    let api_token = std::env::var("PROXYDASH_API_TOKEN")
        .ok()
        .filter(|t| !t.is_empty())
        .or_else(|| config.map(|c| c.api_token))
        .unwrap_or_default();

    let source = Arc::new(BaserowClient::new(env, api_token));
    let environment = *source.environment();

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let handles = start_record_worker(user.clone(), source, shutdown_sender.subscribe());

    Ok(SessionData {
        event_receiver: handles.event_receiver,
        update_receiver: handles.update_receiver,
        command_sender: handles.command_sender,
        join_handles: handles.join_handles,
        shutdown_sender,
        user,
        environment,
    })
}
