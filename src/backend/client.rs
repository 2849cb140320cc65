//! Baserow Record Client
//!
//! A client for the Baserow-style rows API holding the proxy records,
//! filtered down to the rows owned by one user.

use crate::backend::RecordSource;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::baserow;
use crate::environment::Environment;
use crate::proxy::{ProxyRecord, ProxyStatus};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

// User-Agent string with the dashboard version
const USER_AGENT: &str = concat!("proxydash/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BaserowClient {
    client: Client,
    environment: Environment,
    api_token: String,
}

/// Paged rows response, as returned by the rows endpoint.
#[derive(Debug, Deserialize)]
struct RowsResponse {
    results: Vec<ProxyRow>,
}

/// Number fields may arrive as JSON numbers or as numeric strings,
/// depending on how the backend field is configured.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }

    fn into_label(self) -> Option<String> {
        match self {
            NumberOrString::Number(n) => Some(n.to_string()),
            NumberOrString::Text(s) => {
                let s = s.trim().to_string();
                (!s.is_empty()).then_some(s)
            }
        }
    }
}

/// One raw row from the proxies table, requested with `user_field_names=true`.
#[derive(Debug, Deserialize)]
struct ProxyRow {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    order: Option<NumberOrString>,
    #[serde(default)]
    ip: String,
    #[serde(default)]
    port: Option<NumberOrString>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    expires_at: Option<String>,
}

impl ProxyRow {
    /// Converts a raw row into a `ProxyRecord`, enforcing the record
    /// contract: ip, port, username and password must be present.
    fn into_record(self) -> Result<ProxyRecord, BackendError> {
        let id = self.id;
        let malformed = |field: &str| {
            BackendError::MalformedRecord(format!("row {}: missing or invalid {}", id, field))
        };

        if self.ip.trim().is_empty() {
            return Err(malformed("ip"));
        }
        if self.username.is_empty() {
            return Err(malformed("username"));
        }
        if self.password.is_empty() {
            return Err(malformed("password"));
        }

        let port = self
            .port
            .as_ref()
            .and_then(NumberOrString::as_i64)
            .filter(|p| (1..=i64::from(u16::MAX)).contains(p))
            .ok_or_else(|| malformed("port"))? as u16;

        let expires_at = self
            .expires_at
            .as_deref()
            .and_then(parse_expiry)
            .ok_or_else(|| malformed("expires_at"))?;

        Ok(ProxyRecord {
            id,
            name: self.name.filter(|n| !n.trim().is_empty()),
            order: self.order.and_then(NumberOrString::into_label),
            ip: self.ip,
            port,
            username: self.username,
            password: self.password,
            status: ProxyStatus::parse(&self.status),
            expires_at,
        })
    }
}

/// Parses a backend date value: either a full RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date, which date fields produce.
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

impl BaserowClient {
    pub fn new(environment: Environment, api_token: String) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            environment,
            api_token,
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.backend_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn rows_endpoint(email: &str) -> String {
        format!(
            "api/database/rows/table/{}/?user_field_names=true&filter__{}__equal={}&order_by=id",
            baserow::PROXY_TABLE_ID,
            baserow::USER_EMAIL_FIELD,
            urlencoding::encode(email)
        )
    }

    fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BackendError> {
        serde_json::from_slice(bytes).map_err(BackendError::Decode)
    }

    async fn handle_response_status(response: Response) -> Result<Response, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, BackendError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.get(&url).header("User-Agent", USER_AGENT);
        if !self.api_token.is_empty() {
            request = request.header("Authorization", format!("Token {}", self.api_token));
        }
        let response = request.send().await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }
}

#[async_trait::async_trait]
impl RecordSource for BaserowClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Fetch all proxy rows belonging to the given user, in row order.
    async fn get_user_proxies(&self, email: &str) -> Result<Vec<ProxyRecord>, BackendError> {
        let response: RowsResponse = self.get_request(&Self::rows_endpoint(email)).await?;
        response
            .results
            .into_iter()
            .map(ProxyRow::into_record)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> ProxyRow {
        serde_json::from_value(value).expect("row should deserialize")
    }

    #[test]
    fn decodes_complete_row() {
        let record = row(json!({
            "id": 12,
            "name": "EU pool",
            "order": 981,
            "ip": "1.2.3.4",
            "port": 8080,
            "username": "u",
            "password": "p",
            "status": "active",
            "expires_at": "2026-09-01T00:00:00Z",
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.id, 12);
        assert_eq!(record.name.as_deref(), Some("EU pool"));
        assert_eq!(record.order.as_deref(), Some("981"));
        assert_eq!(record.ip, "1.2.3.4");
        assert_eq!(record.port, 8080);
        assert_eq!(record.status, ProxyStatus::Active);
    }

    #[test]
    fn accepts_port_encoded_as_string() {
        let record = row(json!({
            "id": 1,
            "ip": "1.2.3.4",
            "port": "8080",
            "username": "u",
            "password": "p",
            "status": "expired",
            "expires_at": "2026-01-31",
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.port, 8080);
        assert_eq!(record.status, ProxyStatus::Expired);
    }

    #[test]
    fn null_name_and_order_become_none() {
        let record = row(json!({
            "id": 1,
            "name": null,
            "order": "",
            "ip": "1.2.3.4",
            "port": 1,
            "username": "u",
            "password": "p",
            "status": "active",
            "expires_at": "2026-01-31",
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.name, None);
        assert_eq!(record.order, None);
    }

    #[test]
    fn rejects_rows_with_empty_credentials() {
        let result = row(json!({
            "id": 3,
            "ip": "1.2.3.4",
            "port": 8080,
            "username": "",
            "password": "p",
            "status": "active",
            "expires_at": "2026-01-31",
        }))
        .into_record();

        assert!(matches!(result, Err(BackendError::MalformedRecord(_))));
    }

    #[test]
    fn rejects_rows_with_out_of_range_port() {
        for port in [json!(0), json!(70000), json!("not-a-port")] {
            let result = row(json!({
                "id": 4,
                "ip": "1.2.3.4",
                "port": port,
                "username": "u",
                "password": "p",
                "status": "active",
                "expires_at": "2026-01-31",
            }))
            .into_record();

            assert!(matches!(result, Err(BackendError::MalformedRecord(_))));
        }
    }

    #[test]
    fn parses_both_expiry_encodings() {
        assert!(parse_expiry("2026-09-01T12:30:00Z").is_some());
        assert!(parse_expiry("2026-09-01T12:30:00+02:00").is_some());
        assert!(parse_expiry("2026-09-01").is_some());
        assert!(parse_expiry("next tuesday").is_none());
    }

    #[test]
    fn build_url_joins_base_and_endpoint() {
        let client = BaserowClient::new(Environment::Local, String::new());
        assert_eq!(
            client.build_url("/api/database/rows/table/1/"),
            "http://localhost:8000/api/database/rows/table/1/"
        );
    }

    #[test]
    fn rows_endpoint_encodes_the_email_filter() {
        let endpoint = BaserowClient::rows_endpoint("user+tag@example.com");
        assert!(endpoint.contains("filter__user_email__equal=user%2Btag%40example.com"));
        assert!(endpoint.contains("user_field_names=true"));
    }
}
