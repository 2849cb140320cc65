//! Signing a user in and out of the dashboard.

use crate::auth;
use crate::config::Config;
use crate::{print_cmd_error, print_cmd_info, print_cmd_success};
use std::path::Path;

/// Stores the dashboard identity locally.
///
/// # Arguments
/// * `email` - The email the user's proxies are registered under.
/// * `api_token` - Optional record-backend token to store alongside it.
/// * `config_path` - The path to the configuration file.
pub fn login_user(
    email: &str,
    api_token: Option<&str>,
    config_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check that the email is plausible before persisting it.
    if !auth::is_valid_email(email) {
        print_cmd_error!("❌ Invalid email address.");
        return Err(Box::from(format!("Invalid email address: {}", email)));
    }

    // Check if this identity is already stored.
    if config_path.exists() {
        if let Ok(existing) = Config::load_from_file(config_path) {
            if existing.email.eq_ignore_ascii_case(email) && api_token.is_none() {
                print_cmd_info!(
                    "Already signed in.",
                    "Email: {}. Open the dashboard with: proxydash start",
                    existing.email
                );
                return Ok(());
            }
        }
    }

    let config = Config::new(email.to_string(), api_token.unwrap_or_default().to_string());
    config
        .save(config_path)
        .map_err(|e| format!("Failed to save config: {}", e))?;

    print_cmd_success!(
        "✅ Signed in.",
        "Email: {}. Next step - open the dashboard: proxydash start",
        email
    );
    Ok(())
}

/// Clears the stored identity, signing the user out.
pub fn logout_user(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Logging out and clearing the stored identity...");
    Config::clear(config_path).map_err(Into::into)
}
