use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::position::PositionReader;

use super::{delivery_session::SessionView, notice::Notice};

#[derive(Debug)]
pub(crate) enum SessionCommand {
    AdvanceToNextStop,
    Restart,
    Shutdown,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("The delivery session has stopped")]
    Stopped,

    #[error("The delivery session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Control surface of a running [`DeliverySession`](super::DeliverySession).
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    view: watch::Receiver<SessionView>,
    positions: PositionReader,
    notices: mpsc::UnboundedReceiver<Notice>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<SessionCommand>,
        view: watch::Receiver<SessionView>,
        positions: PositionReader,
        notices: mpsc::UnboundedReceiver<Notice>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            commands,
            view,
            positions,
            notices,
            task,
        }
    }

    fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Stopped)
    }

    /// Asks the session to move to the next stop. Ignored, with a notice,
    /// while the previous segment fetch is still in flight.
    pub fn advance_to_next_stop(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::AdvanceToNextStop)
    }

    /// Discards the current plan and requests a new one.
    pub fn restart(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Restart)
    }

    /// Receiver notified on every state change.
    pub fn view(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    pub fn snapshot(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn positions(&self) -> PositionReader {
        self.positions.clone()
    }

    pub async fn next_notice(&mut self) -> Option<Notice> {
        self.notices.recv().await
    }

    pub fn try_next_notice(&mut self) -> Option<Notice> {
        self.notices.try_recv().ok()
    }

    /// Stops the session and its location stream. Fetches still in flight
    /// complete on their own but their results are discarded.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        // Already stopped is fine, the join below reports how it ended
        self.commands.send(SessionCommand::Shutdown).ok();
        self.task.await?;
        Ok(())
    }
}
