//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use std::error::Error;

/// Runs the dashboard without a TUI, streaming refresh events to stdout
/// until Ctrl+C.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    // There is no login screen here, so an identity must already exist.
    if session.user.is_none() {
        return Err(Box::from(
            "No signed-in user. Run `proxydash login --email <EMAIL>` or pass --email.",
        ));
    }

    print_session_starting("headless", session.user.as_deref());

    // Ctrl+C broadcasts shutdown to the refresh worker.
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();

    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                println!("{}", event);
            }
            // Snapshots must be drained even though nothing renders them.
            Some(_) = session.update_receiver.recv() => {}
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    print_session_shutdown();
    for handle in session.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}
