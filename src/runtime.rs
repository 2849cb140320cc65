//! Runtime wiring for the record refresh worker

use crate::backend::RecordSource;
use crate::consts::cli_consts::{COMMAND_QUEUE_SIZE, EVENT_QUEUE_SIZE, UPDATE_QUEUE_SIZE};
use crate::controller::{DashboardController, DashboardSnapshot};
use crate::events::Event;
use crate::workers::core::EventSender;
use crate::workers::refresher::{RecordRefresher, RefreshCommand};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Channels connecting the refresh worker to a UI or console loop.
pub struct WorkerHandles {
    pub event_receiver: mpsc::Receiver<Event>,
    pub update_receiver: mpsc::Receiver<DashboardSnapshot>,
    pub command_sender: mpsc::Sender<RefreshCommand>,
    pub join_handles: Vec<JoinHandle<()>>,
}

/// Start the record refresh worker for the given identity.
pub fn start_record_worker(
    user: Option<String>,
    source: Arc<dyn RecordSource>,
    shutdown: broadcast::Receiver<()>,
) -> WorkerHandles {
    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let (update_sender, update_receiver) = mpsc::channel::<DashboardSnapshot>(UPDATE_QUEUE_SIZE);
    let (command_sender, command_receiver) = mpsc::channel::<RefreshCommand>(COMMAND_QUEUE_SIZE);

    let controller = DashboardController::new(user);
    let refresher = RecordRefresher::new(
        controller,
        source,
        EventSender::new(event_sender),
        update_sender,
    );
    let handle = tokio::spawn(refresher.run(command_receiver, shutdown));

    WorkerHandles {
        event_receiver,
        update_receiver,
        command_sender,
        join_handles: vec![handle],
    }
}
