//! # Runtime Wiring
//!
//! Several node actors exchanging frames through their own mailboxes. The
//! transport here is a thin shim: a send becomes a `Message` notification on
//! the remote node's handle.

use cyclon_peer_sampling::{
    Address, Connection, CyclonHandle, NodeEvent, Transport, TransportError,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Running nodes by address.
pub type Registry = Arc<Mutex<HashMap<Address, CyclonHandle<ChannelConnection>>>>;

/// A session delivered through the remote node's mailbox.
#[derive(Clone)]
pub struct ChannelConnection {
    local: Address,
    remote: Address,
    registry: Registry,
}

impl ChannelConnection {
    pub fn new(local: Address, remote: Address, registry: Registry) -> Self {
        Self {
            local,
            remote,
            registry,
        }
    }

    fn reversed(&self) -> Self {
        Self::new(
            self.remote.clone(),
            self.local.clone(),
            Arc::clone(&self.registry),
        )
    }
}

impl fmt::Debug for ChannelConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelConnection")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .finish()
    }
}

impl Connection for ChannelConnection {
    fn remote_address(&self) -> &Address {
        &self.remote
    }

    /// Sessions carry no state, so the two ends identify one.
    fn same_session(&self, other: &Self) -> bool {
        self.local == other.local && self.remote == other.remote
    }

    fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let handle = self.registry.lock().get(&self.remote).cloned();
        let failed = |reason: &str| TransportError::SendFailed {
            address: self.remote.clone(),
            reason: reason.to_string(),
        };
        let handle = handle.ok_or_else(|| failed("not registered"))?;
        handle
            .notify(NodeEvent::Message {
                from: self.reversed(),
                frame: frame.to_vec(),
            })
            .map_err(|_| failed("node stopped"))
    }

    fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Transport whose sessions are always instantly available.
pub struct ChannelTransport {
    address: Address,
    registry: Registry,
}

impl ChannelTransport {
    pub fn new(address: impl Into<Address>, registry: Registry) -> Self {
        Self {
            address: address.into(),
            registry,
        }
    }
}

impl Transport for ChannelTransport {
    type Connection = ChannelConnection;

    fn self_address(&self) -> Address {
        self.address.clone()
    }

    fn connect(
        &self,
        address: &Address,
        _introducer: &ChannelConnection,
    ) -> Result<ChannelConnection, TransportError> {
        let registry = self.registry.lock();
        if !registry.contains_key(address) {
            return Err(TransportError::ConnectFailed {
                address: address.clone(),
                reason: "not registered".to_string(),
            });
        }
        let connection = ChannelConnection::new(
            self.address.clone(),
            address.clone(),
            Arc::clone(&self.registry),
        );
        if let Some(own) = registry.get(&self.address) {
            own.notify(NodeEvent::ConnectionOpened(connection.clone()))
                .map_err(|_| TransportError::ConnectFailed {
                    address: address.clone(),
                    reason: "node stopped".to_string(),
                })?;
        }
        Ok(connection)
    }

    fn lookup_connection(&self, address: &Address) -> Option<ChannelConnection> {
        self.registry.lock().contains_key(address).then(|| {
            ChannelConnection::new(
                self.address.clone(),
                address.clone(),
                Arc::clone(&self.registry),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyclon_peer_sampling::{CyclonConfig, CyclonError, CyclonNode, CyclonRuntime};
    use std::time::Duration;
    use tokio::task::JoinHandle;

    type Spawned = (
        CyclonHandle<ChannelConnection>,
        JoinHandle<Result<(), CyclonError>>,
    );

    fn spawn_nodes(registry: &Registry, count: usize) -> Vec<(Address, Spawned)> {
        (0..count)
            .map(|i| {
                let address = Address::new(format!("peer-{i}"));
                let config = CyclonConfig::for_testing().with_rng_seed(100 + i as u64);
                let transport = ChannelTransport::new(address.clone(), Arc::clone(registry));
                let node = CyclonNode::new(config, transport).unwrap();
                let spawned = CyclonRuntime::spawn(node);
                registry.lock().insert(address.clone(), spawned.0.clone());
                (address, spawned)
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_actors_shuffle_with_each_other() {
        let registry: Registry = Arc::default();
        let nodes = spawn_nodes(&registry, 5);

        for pair in nodes.windows(2) {
            let (contact, (contact_handle, _)) = &pair[0];
            let (joiner, (joiner_handle, _)) = &pair[1];
            joiner_handle
                .notify(NodeEvent::BootstrapOpened(ChannelConnection::new(
                    joiner.clone(),
                    contact.clone(),
                    Arc::clone(&registry),
                )))
                .unwrap();
            contact_handle
                .notify(NodeEvent::BootstrapOpened(ChannelConnection::new(
                    contact.clone(),
                    joiner.clone(),
                    Arc::clone(&registry),
                )))
                .unwrap();
        }

        for (_, (handle, _)) in &nodes {
            handle.ready().await.unwrap();
        }

        tokio::time::sleep(Duration::from_secs(2)).await;

        for (address, (handle, _)) in &nodes {
            let peers = handle.get_peers(None).await.unwrap();
            assert!(!peers.is_empty(), "{address} has no peers");
            assert!(peers.iter().all(|peer| peer.remote_address() != address));

            let stats = handle.stats().await.unwrap();
            assert!(stats.rounds_completed > 0, "{address} never completed a round");
        }

        let (_, (broadcaster, _)) = &nodes[2];
        let report = broadcaster.broadcast(b"ping".to_vec()).await.unwrap();
        assert!(report.delivered > 0);
        assert_eq!(report.failed, 0);

        registry.lock().clear();
        for (_, (handle, task)) in nodes {
            handle.shutdown();
            task.await.unwrap().unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_peer_fails_sends() {
        let registry: Registry = Arc::default();
        let mut nodes = spawn_nodes(&registry, 2);
        let (address, (handle, task)) = nodes.remove(1);

        handle.shutdown();
        task.await.unwrap().unwrap();

        let connection =
            ChannelConnection::new(Address::from("peer-0"), address, Arc::clone(&registry));
        assert!(matches!(
            connection.send(b"late"),
            Err(TransportError::SendFailed { .. })
        ));

        let (_, (first, first_task)) = nodes.remove(0);
        first.shutdown();
        first_task.await.unwrap().unwrap();
    }
}
