//! Proxy Record
//!
//! The leased proxy credential assigned to a user: endpoint address,
//! credential pair, lease status and expiry. Records are owned by the
//! record backend; the dashboard holds an ephemeral copy between refreshes.

use chrono::{DateTime, Utc};
use std::fmt::Display;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProxyRecord {
    /// Backend row ID, stable across refreshes.
    pub id: u64,

    /// Optional human-readable label.
    pub name: Option<String>,

    /// Optional reference to the originating order.
    pub order: Option<String>,

    /// Proxy endpoint address.
    pub ip: String,

    /// Proxy endpoint port.
    pub port: u16,

    /// Credential pair for the proxy.
    pub username: String,
    pub password: String,

    /// Lease status as reported by the backend.
    pub status: ProxyStatus,

    /// Lease expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Lease status of a proxy record.
///
/// The backend may encode more values; only `Active` and `Expired` drive
/// display, everything else collapses into `Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum ProxyStatus {
    Active,
    Expired,
    Unknown,
}

impl ProxyStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => ProxyStatus::Active,
            "expired" => ProxyStatus::Expired,
            _ => ProxyStatus::Unknown,
        }
    }
}

/// Clipboard format requested for a record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CopyFormat {
    /// The endpoint address alone.
    Ip,
    /// The port, rendered as its decimal string form.
    Port,
    /// The username alone.
    Username,
    /// The password alone.
    Password,
    /// `ip:port:username:password`.
    Colon,
    /// `username:password@ip:port`.
    Auth,
}

impl CopyFormat {
    /// Short slug used to build the transient copied-field key.
    pub fn slug(&self) -> &'static str {
        match self {
            CopyFormat::Ip => "ip",
            CopyFormat::Port => "port",
            CopyFormat::Username => "username",
            CopyFormat::Password => "password",
            CopyFormat::Colon => "full",
            CopyFormat::Auth => "auth",
        }
    }
}

impl ProxyRecord {
    /// Produces the clipboard text for the requested format.
    ///
    /// Fields are concatenated verbatim; no validation or escaping.
    pub fn copy_text(&self, format: CopyFormat) -> String {
        match format {
            CopyFormat::Ip => self.ip.clone(),
            CopyFormat::Port => self.port.to_string(),
            CopyFormat::Username => self.username.clone(),
            CopyFormat::Password => self.password.clone(),
            CopyFormat::Colon => format!(
                "{}:{}:{}:{}",
                self.ip, self.port, self.username, self.password
            ),
            CopyFormat::Auth => format!(
                "{}:{}@{}:{}",
                self.username, self.password, self.ip, self.port
            ),
        }
    }

    /// Key identifying one copy affordance of one record, used as the
    /// transient copied-field marker.
    pub fn field_key(&self, format: CopyFormat) -> String {
        format!("{}-{}", format.slug(), self.id)
    }
}

impl Display for ProxyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Proxy {}: {}:{} ({})",
            self.id, self.ip, self.port, self.status
        )
    }
}
