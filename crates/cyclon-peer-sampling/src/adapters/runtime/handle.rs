use super::Command;
use crate::domain::{BroadcastReport, CyclonError, SamplingStats};
use crate::service::NodeEvent;
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle to a running node task.
///
/// Every method fails with `CyclonError::RuntimeStopped` once the task has
/// ended.
pub struct CyclonHandle<C> {
    commands: mpsc::UnboundedSender<Command<C>>,
}

impl<C> CyclonHandle<C> {
    pub(super) fn new(commands: mpsc::UnboundedSender<Command<C>>) -> Self {
        Self { commands }
    }

    /// Deliver a transport notification (frame, connection outcome).
    pub fn notify(&self, event: NodeEvent<C>) -> Result<(), CyclonError> {
        self.send(Command::Event(event))
    }

    /// Resolve once the bootstrap connection has opened.
    pub async fn ready(&self) -> Result<(), CyclonError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Ready(reply))?;
        response.await.map_err(|_| CyclonError::RuntimeStopped)
    }

    /// Live connections from the view. See `PeerSamplingApi::get_peers`.
    pub async fn get_peers(&self, count: Option<usize>) -> Result<Vec<C>, CyclonError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::GetPeers { count, reply })?;
        response.await.map_err(|_| CyclonError::RuntimeStopped)
    }

    /// Send `payload` to every live peer in the view.
    pub async fn broadcast(
        &self,
        payload: impl Into<Vec<u8>>,
    ) -> Result<BroadcastReport, CyclonError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Broadcast {
            payload: payload.into(),
            reply,
        })?;
        response.await.map_err(|_| CyclonError::RuntimeStopped)
    }

    /// Snapshot of the node's counters.
    pub async fn stats(&self) -> Result<SamplingStats, CyclonError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Stats(reply))?;
        response.await.map_err(|_| CyclonError::RuntimeStopped)
    }

    /// Ask the task to close its connections and stop.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    /// Whether the task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    fn send(&self, command: Command<C>) -> Result<(), CyclonError> {
        self.commands
            .send(command)
            .map_err(|_| CyclonError::RuntimeStopped)
    }
}

impl<C> Clone for CyclonHandle<C> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<C> std::fmt::Debug for CyclonHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyclonHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
