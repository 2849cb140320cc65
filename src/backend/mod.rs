use crate::backend::error::BackendError;
use crate::environment::Environment;
use crate::proxy::ProxyRecord;

pub(crate) mod client;
pub use client::BaserowClient;
pub mod error;

#[cfg(test)]
use mockall::{automock, predicate::*};

/// The authoritative source of a user's proxy records.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Fetch the ordered collection of proxy records owned by the given user.
    async fn get_user_proxies(&self, email: &str) -> Result<Vec<ProxyRecord>, BackendError>;
}
