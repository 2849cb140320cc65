//! Record refresh worker owning the polling schedule
//!
//! One task serializes every refresh: the fixed interval, manual triggers
//! and identity changes all run through the same `&mut` controller, so a
//! second refresh can never overlap an in-flight one. A manual trigger that
//! arrives mid-fetch waits on the command channel and runs next.

use super::core::EventSender;
use crate::backend::RecordSource;
use crate::consts::cli_consts::record_fetching;
use crate::controller::{DashboardController, DashboardSnapshot, RefreshOutcome};
use crate::error_classifier::{ErrorClassifier, LogLevel};
use crate::events::EventType;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

/// Commands the UI can send into the refresh schedule.
#[derive(Debug, Clone)]
pub enum RefreshCommand {
    /// Refresh outside the timer cadence, without resetting its period.
    RefreshNow,
    /// Switch the active identity and start a fresh refresh cycle.
    SetUser(Option<String>),
}

/// Drives the dashboard controller on a schedule and publishes its state.
pub struct RecordRefresher {
    controller: DashboardController,
    source: Arc<dyn RecordSource>,
    classifier: ErrorClassifier,
    event_sender: EventSender,
    update_sender: mpsc::Sender<DashboardSnapshot>,
}

impl RecordRefresher {
    pub fn new(
        controller: DashboardController,
        source: Arc<dyn RecordSource>,
        event_sender: EventSender,
        update_sender: mpsc::Sender<DashboardSnapshot>,
    ) -> Self {
        Self {
            controller,
            source,
            classifier: ErrorClassifier::new(),
            event_sender,
            update_sender,
        }
    }

    /// Runs the refresh schedule until shutdown.
    ///
    /// The first interval tick fires immediately, so activation refreshes
    /// right away and then every `REFRESH_INTERVAL_SECS`.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<RefreshCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut interval = tokio::time::interval(record_fetching::refresh_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = interval.tick() => self.refresh_once().await,
                cmd = commands.recv() => match cmd {
                    Some(RefreshCommand::RefreshNow) => self.refresh_once().await,
                    Some(RefreshCommand::SetUser(user)) => {
                        self.controller.set_user(user);
                        if let Some(user) = self.controller.user() {
                            self.event_sender
                                .send_refresh_event(
                                    format!("Switched identity to {}", user),
                                    EventType::Refresh,
                                    LogLevel::Info,
                                )
                                .await;
                        }
                        self.publish_snapshot().await;
                        // The old cadence is cancelled; the new identity's
                        // cycle starts with an immediate refresh.
                        interval.reset_immediately();
                    }
                    None => break,
                },
            }
        }

        self.event_sender
            .send_refresh_event(
                "Refresh schedule stopped".to_string(),
                EventType::Shutdown,
                LogLevel::Info,
            )
            .await;
    }

    async fn refresh_once(&mut self) {
        let Some(user) = self.controller.begin_refresh() else {
            // No identity yet; the view is not ready, not in error.
            self.event_sender
                .send_refresh_event(
                    "Waiting for sign-in before fetching proxies".to_string(),
                    EventType::Waiting,
                    LogLevel::Debug,
                )
                .await;
            return;
        };

        self.publish_snapshot().await;
        self.event_sender
            .send_refresh_event(
                format!("Refreshing proxies for {}", user),
                EventType::Refresh,
                LogLevel::Info,
            )
            .await;

        let result = self.source.get_user_proxies(&user).await;
        match self.controller.complete_refresh(result) {
            RefreshOutcome::Updated(count) => {
                self.event_sender
                    .send_refresh_event(
                        format!("Loaded {} proxies", count),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
            }
            RefreshOutcome::Failed(e) => {
                let log_level = self.classifier.classify_fetch_error(&e);
                self.event_sender
                    .send_refresh_event(
                        format!("Failed to fetch proxy data: {}", e),
                        EventType::Error,
                        log_level,
                    )
                    .await;
            }
        }
        self.publish_snapshot().await;
    }

    async fn publish_snapshot(&self) {
        let _ = self.update_sender.send(self.controller.snapshot()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockRecordSource;
    use crate::events::Event;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::task::JoinHandle;

    struct Harness {
        fetches: Arc<AtomicUsize>,
        command_sender: mpsc::Sender<RefreshCommand>,
        shutdown_sender: broadcast::Sender<()>,
        _event_receiver: mpsc::Receiver<Event>,
        _update_receiver: mpsc::Receiver<DashboardSnapshot>,
        handle: JoinHandle<()>,
    }

    fn spawn(user: Option<&str>) -> Harness {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = fetches.clone();

        let mut source = MockRecordSource::new();
        source
            .expect_get_user_proxies()
            .withf(|email| email == "user@example.com")
            .returning(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![])
            });

        let (event_sender, event_receiver) = mpsc::channel(100);
        let (update_sender, update_receiver) = mpsc::channel(100);
        let (command_sender, command_receiver) = mpsc::channel(8);
        let (shutdown_sender, shutdown_receiver) = broadcast::channel(1);

        let controller = DashboardController::new(user.map(str::to_string));
        let refresher = RecordRefresher::new(
            controller,
            Arc::new(source),
            EventSender::new(event_sender),
            update_sender,
        );
        let handle = tokio::spawn(refresher.run(command_receiver, shutdown_receiver));

        Harness {
            fetches,
            command_sender,
            shutdown_sender,
            _event_receiver: event_receiver,
            _update_receiver: update_receiver,
            handle,
        }
    }

    #[tokio::test(start_paused = true)]
    /// Activation fetches once immediately, then on every interval tick,
    /// and deactivation stops the schedule.
    async fn schedule_refreshes_immediately_then_on_interval() {
        let harness = spawn(Some("user@example.com"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 1);

        tokio::time::sleep(record_fetching::refresh_interval()).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 2);

        harness.shutdown_sender.send(()).unwrap();
        harness.handle.await.unwrap();

        tokio::time::sleep(record_fetching::refresh_interval() * 3).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    /// A manual trigger refreshes between ticks without stopping the cadence.
    async fn manual_trigger_refreshes_between_ticks() {
        let harness = spawn(Some("user@example.com"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 1);

        harness
            .command_sender
            .send(RefreshCommand::RefreshNow)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 2);

        // The interval keeps its original period.
        tokio::time::sleep(record_fetching::refresh_interval()).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 3);

        harness.shutdown_sender.send(()).unwrap();
        harness.handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    /// Without an identity nothing is fetched; signing in starts the cycle.
    async fn identity_change_starts_a_fresh_cycle() {
        let harness = spawn(None);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 0);

        harness
            .command_sender
            .send(RefreshCommand::SetUser(Some("user@example.com".into())))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harness.fetches.load(Ordering::SeqCst), 1);

        harness.shutdown_sender.send(()).unwrap();
        harness.handle.await.unwrap();
    }
}
