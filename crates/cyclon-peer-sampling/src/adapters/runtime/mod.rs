//! # Tokio Actor Runtime
//!
//! Runs one `CyclonNode` on its own task. The task is the node's single
//! owner: the shuffle timer, the bootstrap timeout, transport notifications
//! and API calls all reach it through one `select!` loop, so no two of them
//! ever touch the node at the same time.
//!
//! ```rust,ignore
//! let node = CyclonNode::new(config, transport)?;
//! let (handle, task) = CyclonRuntime::spawn(node);
//!
//! // From the transport adapter:
//! handle.notify(NodeEvent::BootstrapOpened(connection))?;
//!
//! handle.ready().await?;
//! let peers = handle.get_peers(Some(3)).await?;
//! ```

mod handle;

pub use handle::CyclonHandle;

use crate::domain::{BroadcastReport, CyclonError, SamplingStats};
use crate::ports::{PeerSamplingApi, Transport};
use crate::service::{CyclonNode, NodeEvent};
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Mailbox messages for the node task.
pub(crate) enum Command<C> {
    Event(NodeEvent<C>),
    Ready(oneshot::Sender<()>),
    GetPeers {
        count: Option<usize>,
        reply: oneshot::Sender<Vec<C>>,
    },
    Broadcast {
        payload: Vec<u8>,
        reply: oneshot::Sender<BroadcastReport>,
    },
    Stats(oneshot::Sender<SamplingStats>),
    Shutdown,
}

/// Spawns node actors.
pub struct CyclonRuntime;

impl CyclonRuntime {
    /// Move `node` onto a new task.
    ///
    /// The task ends with `Ok(())` on `CyclonHandle::shutdown` (or when every
    /// handle is dropped) and with `Err` on a protocol violation. Either way
    /// the node's connections are closed first.
    pub fn spawn<T, R>(
        node: CyclonNode<T, R>,
    ) -> (
        CyclonHandle<T::Connection>,
        JoinHandle<Result<(), CyclonError>>,
    )
    where
        T: Transport + Send + 'static,
        R: Rng + Send + 'static,
    {
        let (commands, mailbox) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(node, mailbox));
        (CyclonHandle::new(commands), task)
    }
}

async fn run<T, R>(
    mut node: CyclonNode<T, R>,
    mut mailbox: mpsc::UnboundedReceiver<Command<T::Connection>>,
) -> Result<(), CyclonError>
where
    T: Transport,
    R: Rng,
{
    let period = node.config().shuffle_interval;
    // The first tick fires one period in, not immediately.
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let bootstrap_timeout = tokio::time::sleep(node.config().bootstrap_timeout);
    tokio::pin!(bootstrap_timeout);
    let mut awaiting_bootstrap = true;

    info!(
        address = %node.address(),
        delta_t_ms = period.as_millis() as u64,
        "Cyclon node started"
    );

    loop {
        let event = tokio::select! {
            _ = ticker.tick() => NodeEvent::Tick,
            _ = &mut bootstrap_timeout, if awaiting_bootstrap => {
                awaiting_bootstrap = false;
                NodeEvent::BootstrapTimeout
            }
            command = mailbox.recv() => match command {
                Some(Command::Event(event)) => event,
                Some(Command::Ready(reply)) => {
                    node.ready(Box::new(move || {
                        let _ = reply.send(());
                    }));
                    continue;
                }
                Some(Command::GetPeers { count, reply }) => {
                    let _ = reply.send(node.get_peers(count));
                    continue;
                }
                Some(Command::Broadcast { payload, reply }) => {
                    let _ = reply.send(node.broadcast(&payload));
                    continue;
                }
                Some(Command::Stats(reply)) => {
                    let _ = reply.send(node.stats());
                    continue;
                }
                Some(Command::Shutdown) | None => break,
            },
        };

        if let Err(e) = node.handle_event(event) {
            if e.is_fatal() {
                error!(address = %node.address(), error = %e, "Protocol violation, stopping node");
                node.shutdown();
                return Err(e);
            }
            warn!(address = %node.address(), error = %e, "Event handling failed");
        }
    }

    node.shutdown();
    Ok(())
}
