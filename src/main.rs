mod auth;
mod backend;
mod cli_messages;
mod clipboard;
mod config;
mod consts;
mod controller;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod login;
mod proxy;
mod runtime;
mod session;
mod ui;
mod workers;

use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use clap::{Parser, Subcommand};
use std::error::Error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the proxy dashboard
    Start {
        /// Email to fetch proxies for, overriding the stored identity
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,

        /// Run without the TUI, logging refresh events to stdout
        #[arg(long)]
        headless: bool,

        /// Disable dashboard background colors
        #[arg(long)]
        no_background_color: bool,
    },
    /// Store the email identity to fetch proxies for
    Login {
        /// Email the user's proxies are registered under
        #[arg(long, value_name = "EMAIL")]
        email: String,

        /// Record-backend API token to store alongside the identity
        #[arg(long, value_name = "TOKEN")]
        api_token: Option<String>,
    },
    /// Clear the stored identity and sign out
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let environment_str = std::env::var("PROXYDASH_ENVIRONMENT").unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            email,
            headless,
            no_background_color,
        } => {
            let config = Config::load_from_file(&config_path).ok();
            let session = session::setup_session(environment, config, email)?;
            if headless {
                // Stdout is free here, so diagnostics can go to a real logger.
                env_logger::init();
                session::run_headless_mode(session).await
            } else {
                session::run_tui_mode(session, !no_background_color).await
            }
        }
        Command::Login { email, api_token } => {
            env_logger::init();
            login::login_user(&email, api_token.as_deref(), &config_path)
        }
        Command::Logout => {
            env_logger::init();
            login::logout_user(&config_path)
        }
    }
}
