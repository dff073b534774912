//! The single serialized event entry point.

use super::CyclonNode;
use crate::domain::{Address, CyclonError, Link, Node, ProtocolMessage};
use crate::ports::{Connection, Transport};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Everything that can happen to a node.
///
/// Timer ticks, inbound frames and connection outcomes all arrive as one of
/// these, so a single owner calling `CyclonNode::handle_event` in a loop
/// never interleaves two mutations.
#[derive(Debug, Clone)]
pub enum NodeEvent<C> {
    /// The shuffle interval elapsed.
    Tick,
    /// A frame arrived on `from`.
    Message { from: C, frame: Vec<u8> },
    /// A bootstrap connection opened. The first one makes the node ready.
    BootstrapOpened(C),
    /// The outbound attempt behind this handle completed.
    ConnectionOpened(C),
    /// The outbound attempt behind this handle failed.
    ConnectionUnreachable(C),
    /// This previously open session went away.
    ConnectionClosed(C),
    /// The bootstrap window elapsed.
    BootstrapTimeout,
}

impl<T: Transport, R: Rng> CyclonNode<T, R> {
    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Only `CyclonError::OutOfOrderResponse` escapes; it signals a protocol
    /// violation by the peer (or a local bug) and is not recovered from.
    pub fn handle_event(&mut self, event: NodeEvent<T::Connection>) -> Result<(), CyclonError> {
        match event {
            NodeEvent::Tick => {
                let tick = self.shuffle();
                debug!(address = %self.address, ?tick, "Shuffle tick");
            }
            NodeEvent::Message { from, frame } => self.on_frame(&from, &frame)?,
            NodeEvent::BootstrapOpened(connection) => self.on_bootstrap_opened(connection),
            NodeEvent::ConnectionOpened(connection) => self.on_connection_opened(&connection),
            NodeEvent::ConnectionUnreachable(connection) => {
                if self.evict(&connection) {
                    warn!(
                        peer = %connection.remote_address(),
                        "Peer unreachable, removed from view"
                    );
                }
            }
            NodeEvent::ConnectionClosed(connection) => {
                if self.evict(&connection) {
                    debug!(
                        peer = %connection.remote_address(),
                        "Peer disconnected, removed from view"
                    );
                }
            }
            NodeEvent::BootstrapTimeout => {
                if !self.ready.is_fired() {
                    warn!(
                        address = %self.address,
                        timeout_ms = self.config.bootstrap_timeout.as_millis() as u64,
                        "Bootstrap connection did not open in time"
                    );
                }
            }
        }
        Ok(())
    }

    /// Decode and dispatch one inbound frame.
    fn on_frame(&mut self, from: &T::Connection, frame: &[u8]) -> Result<(), CyclonError> {
        let message = match ProtocolMessage::decode(frame) {
            Ok(message) => message,
            Err(error) => {
                debug!(peer = %from.remote_address(), %error, "Ignoring non-protocol frame");
                return Ok(());
            }
        };

        match message {
            ProtocolMessage::Shuffle { view, .. } => {
                self.on_shuffle(from, view);
                Ok(())
            }
            ProtocolMessage::ShuffleResponse { view, .. } => self.on_shuffle_response(from, view),
        }
    }

    fn on_bootstrap_opened(&mut self, connection: T::Connection) {
        let address = connection.remote_address().clone();
        self.forget_attempt(&connection);

        if address != self.address && !self.view.contains(&address) {
            if let Err(error) = self
                .view
                .push(Node::with_link(address.clone(), 0, Link::open(connection)))
            {
                debug!(peer = %address, %error, "Bootstrap peer not added to view");
            }
        }

        if !self.ready.is_fired() {
            info!(address = %self.address, peer = %address, "Bootstrap connection open");
            self.ready.fire();
        }
    }

    fn on_connection_opened(&mut self, connection: &T::Connection) {
        let address = connection.remote_address();
        self.forget_attempt(connection);
        if self
            .view
            .mark_open(address, |held| held.same_session(connection))
        {
            debug!(peer = %address, "Connection open");
        }
    }

    /// Drop the view entry whose link is `connection`. Outcomes for a session
    /// the entry no longer holds are stale and leave the view alone.
    ///
    /// Returns true if an entry was removed.
    fn evict(&mut self, connection: &T::Connection) -> bool {
        let address = connection.remote_address();
        self.forget_attempt(connection);

        let holds_session = self
            .view
            .get(address)
            .and_then(|entry| entry.link.as_ref())
            .is_some_and(|link| link.connection.same_session(connection));
        if !holds_session {
            return false;
        }
        self.view.remove(address);
        self.stats.entries_evicted += 1;
        true
    }

    /// Clear the in-flight attempt for the connection's address if it is
    /// this very attempt.
    pub(super) fn forget_attempt(&mut self, connection: &T::Connection) {
        let address = connection.remote_address();
        let current = self
            .pending_connections
            .get(address)
            .is_some_and(|pending| pending.same_session(connection));
        if current {
            self.pending_connections.remove(address);
        }
    }

    /// Cancel the outstanding round and close every connection the node holds.
    pub fn shutdown(&mut self) {
        self.cancel_round();

        // Pending links share their session with the in-flight handle.
        let mut connections: HashMap<Address, T::Connection> =
            self.pending_connections.drain().collect();
        for entry in self.view.take() {
            if let Some(link) = entry.link {
                connections.insert(entry.address, link.connection);
            }
        }

        let mut closed = 0usize;
        for (address, connection) in connections {
            match connection.close() {
                Ok(()) => closed += 1,
                Err(error) => debug!(peer = %address, %error, "Close failed on shutdown"),
            }
        }

        info!(address = %self.address, closed, "Cyclon node shut down");
    }
}
