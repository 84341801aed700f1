//! Control loop: the single owner of the session's lifecycle transitions.

use crate::server::session::{AccessPoint, SessionController, SessionState};
use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};

/// Inbound requests from the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    SwitchInterface,
    Shutdown,
}

/// Applies events one at a time until `Shutdown` or until every sender is
/// gone, publishing the access point after each (re)start and `None` once
/// nothing is served.
pub async fn run(
    mut controller: SessionController,
    mut events: mpsc::Receiver<ControlEvent>,
    updates: watch::Sender<Option<AccessPoint>>,
) -> Result<()> {
    let _ = updates.send(controller.access_point().cloned());

    while let Some(event) = events.recv().await {
        tracing::debug!(?event, "control event");
        match event {
            ControlEvent::SwitchInterface => match controller.switch_to_next_interface().await {
                Ok(access_point) => {
                    let _ = updates.send(Some(access_point));
                }
                Err(e) => {
                    let _ = updates.send(None);
                    return Err(e).context("Failed to switch network interface");
                }
            },
            ControlEvent::Shutdown => break,
        }
    }

    if controller.state() == SessionState::Active {
        controller
            .shutdown()
            .await
            .context("Failed to shut down session")?;
    }
    let _ = updates.send(None);
    Ok(())
}
