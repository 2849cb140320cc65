//! Dashboard controller
//!
//! The state machine behind the proxy dashboard: the current record set for
//! the signed-in user, the refresh cycle, and the transient copied-field
//! marker driving the clipboard acknowledgment.

use crate::backend::error::BackendError;
use crate::consts::cli_consts::copy_feedback::copy_feedback;
use crate::proxy::ProxyRecord;
use chrono::{DateTime, Local};
use std::time::Instant;

/// The one message surfaced to the user when a refresh fails, whatever the
/// underlying cause. Failure detail goes to the logs only.
pub const FETCH_ERROR_MESSAGE: &str = "Unable to load proxy data. Please try again later.";

/// What a completed refresh cycle did to the dashboard state.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Record set fully replaced with this many records.
    Updated(usize),
    /// Fetch failed; prior records kept, error message set.
    Failed(BackendError),
}

/// Read-only copy of the dashboard state, sent to the UI after each change.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub records: Vec<ProxyRecord>,
    pub loading: bool,
    pub error: Option<&'static str>,
    pub last_updated: Option<DateTime<Local>>,
}

/// Owns the proxy records of the signed-in user between refreshes.
///
/// One refresh cycle runs idle → loading → idle-with-data or
/// idle-with-error. All refreshes go through `&mut self`, so two cycles can
/// never overlap; callers serialize timer ticks and manual triggers.
#[derive(Debug)]
pub struct DashboardController {
    user: Option<String>,
    records: Vec<ProxyRecord>,
    loading: bool,
    error: Option<&'static str>,
    last_updated: Option<DateTime<Local>>,
}

impl DashboardController {
    pub fn new(user: Option<String>) -> Self {
        Self {
            user,
            records: Vec::new(),
            loading: true,
            error: None,
            last_updated: None,
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Switches the active identity and resets to the initial state.
    ///
    /// The previous user's records must not leak into the new session. The
    /// caller is expected to start a fresh refresh cycle afterwards.
    pub fn set_user(&mut self, user: Option<String>) {
        self.user = user;
        self.records.clear();
        self.loading = true;
        self.error = None;
        self.last_updated = None;
    }

    /// Starts a refresh cycle, returning the identity to fetch for.
    ///
    /// Without an identity the refresh is a no-op: no state is touched and
    /// no error is surfaced, the view is simply not ready yet.
    pub fn begin_refresh(&mut self) -> Option<String> {
        let user = self.user.clone()?;
        self.loading = true;
        self.error = None;
        Some(user)
    }

    /// Applies the result of the awaited fetch, ending the cycle.
    pub fn complete_refresh(
        &mut self,
        result: Result<Vec<ProxyRecord>, BackendError>,
    ) -> RefreshOutcome {
        self.loading = false;
        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.last_updated = Some(Local::now());
                RefreshOutcome::Updated(count)
            }
            Err(e) => {
                log::warn!("Failed to fetch proxy data: {}", e);
                self.error = Some(FETCH_ERROR_MESSAGE);
                RefreshOutcome::Failed(e)
            }
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            records: self.records.clone(),
            loading: self.loading,
            error: self.error,
            last_updated: self.last_updated,
        }
    }
}

/// Transient marker naming the last-copied field.
///
/// Deadline-based rather than timer-based: setting a new key replaces the
/// old deadline outright, so a stale clear can never overwrite a newer
/// marker. Expired markers simply stop being reported.
#[derive(Debug, Default)]
pub struct CopyMarker {
    current: Option<(String, Instant)>,
}

impl CopyMarker {
    /// Marks the given field key as just copied, restarting the expiry.
    pub fn set(&mut self, key: impl Into<String>) {
        self.set_at(key, Instant::now());
    }

    fn set_at(&mut self, key: impl Into<String>, now: Instant) {
        self.current = Some((key.into(), now));
    }

    /// The currently acknowledged field key, if it has not expired.
    pub fn active(&self) -> Option<&str> {
        self.active_at(Instant::now())
    }

    fn active_at(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((key, set)) if now.duration_since(*set) < copy_feedback() => Some(key),
            _ => None,
        }
    }

    /// Drops an expired marker. Called on UI ticks.
    pub fn clear_expired(&mut self) {
        if self.active().is_none() {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyStatus;
    use chrono::Utc;
    use std::time::Duration;

    fn record(id: u64) -> ProxyRecord {
        ProxyRecord {
            id,
            name: None,
            order: None,
            ip: format!("10.0.0.{}", id),
            port: 8080,
            username: "u".to_string(),
            password: "p".to_string(),
            status: ProxyStatus::Active,
            expires_at: Utc::now(),
        }
    }

    fn http_error() -> BackendError {
        BackendError::Http {
            status: 502,
            message: "bad gateway".to_string(),
        }
    }

    #[test]
    /// A successful refresh fully replaces the record set, it never merges.
    fn refresh_replaces_records_wholesale() {
        let mut controller = DashboardController::new(Some("user@example.com".to_string()));

        controller.begin_refresh().unwrap();
        controller.complete_refresh(Ok(vec![record(1), record(2)]));
        assert_eq!(controller.snapshot().records.len(), 2);

        controller.begin_refresh().unwrap();
        controller.complete_refresh(Ok(vec![record(3)]));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].id, 3);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert!(snapshot.last_updated.is_some());
    }

    #[test]
    /// A failed refresh keeps the previous records and sets the one error message.
    fn failed_refresh_preserves_prior_records() {
        let mut controller = DashboardController::new(Some("user@example.com".to_string()));

        controller.begin_refresh().unwrap();
        controller.complete_refresh(Ok(vec![record(1)]));

        controller.begin_refresh().unwrap();
        let outcome = controller.complete_refresh(Err(http_error()));

        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].id, 1);
        assert_eq!(snapshot.error, Some(FETCH_ERROR_MESSAGE));
        assert!(!snapshot.loading);
    }

    #[test]
    /// Starting a refresh clears a previous error before the fetch runs.
    fn begin_refresh_clears_previous_error() {
        let mut controller = DashboardController::new(Some("user@example.com".to_string()));
        controller.begin_refresh().unwrap();
        controller.complete_refresh(Err(http_error()));
        assert!(controller.snapshot().error.is_some());

        controller.begin_refresh().unwrap();
        let snapshot = controller.snapshot();
        assert!(snapshot.error.is_none());
        assert!(snapshot.loading);
    }

    #[test]
    /// Without an identity, starting a refresh is a no-op: nothing to fetch
    /// for, and the state is left untouched.
    fn begin_refresh_without_identity_is_a_noop() {
        let mut controller = DashboardController::new(None);

        assert!(controller.begin_refresh().is_none());

        let snapshot = controller.snapshot();
        assert!(snapshot.records.is_empty());
        assert!(snapshot.loading); // still in its initial not-yet-ready state
        assert!(snapshot.error.is_none());
    }

    #[test]
    /// With an identity, the cycle begins with that identity to fetch for.
    fn begin_refresh_returns_the_current_identity() {
        let mut controller = DashboardController::new(Some("user@example.com".to_string()));
        assert_eq!(
            controller.begin_refresh().as_deref(),
            Some("user@example.com")
        );
        assert!(controller.snapshot().loading);
    }

    #[test]
    /// An identity change resets the dashboard to its initial state.
    fn identity_change_resets_state() {
        let mut controller = DashboardController::new(Some("a@example.com".to_string()));
        controller.begin_refresh().unwrap();
        controller.complete_refresh(Ok(vec![record(1)]));

        controller.set_user(Some("b@example.com".to_string()));

        let snapshot = controller.snapshot();
        assert!(snapshot.records.is_empty());
        assert!(snapshot.loading);
        assert!(snapshot.error.is_none());
        assert!(snapshot.last_updated.is_none());
        assert_eq!(controller.user(), Some("b@example.com"));
    }

    #[test]
    /// The marker reports its key until the fixed delay elapses.
    fn copy_marker_expires_after_delay() {
        let now = Instant::now();
        let mut marker = CopyMarker::default();
        marker.set_at("ip-1", now);

        assert_eq!(marker.active_at(now), Some("ip-1"));
        assert_eq!(
            marker.active_at(now + Duration::from_millis(1999)),
            Some("ip-1")
        );
        assert_eq!(marker.active_at(now + Duration::from_secs(2)), None);
        assert_eq!(marker.active_at(now + Duration::from_secs(60)), None);
    }

    #[test]
    /// A newer copy overwrites the marker and restarts its own expiry.
    fn copy_marker_overwrite_restarts_expiry() {
        let now = Instant::now();
        let mut marker = CopyMarker::default();
        marker.set_at("ip-1", now);

        let later = now + Duration::from_millis(1500);
        marker.set_at("auth-2", later);

        // The first marker's expiry no longer applies.
        assert_eq!(
            marker.active_at(now + Duration::from_millis(2500)),
            Some("auth-2")
        );
        assert_eq!(marker.active_at(later + Duration::from_secs(2)), None);
    }
}
