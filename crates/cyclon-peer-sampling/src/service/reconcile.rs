//! Connection reconciler: turns a merge outcome into the live view.

use super::CyclonNode;
use crate::domain::{Address, Link, MergeOutcome, Node};
use crate::ports::{Connection, Transport};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

impl<T: Transport, R: Rng> CyclonNode<T, R> {
    /// Install a merge outcome as the new view.
    ///
    /// Bare entries get a link, in order of preference: the link the entry
    /// held before the merge, an existing live connection, the handle of an
    /// attempt already in flight, or a new attempt introduced by `sender`.
    /// Entries whose attempt fails synchronously are left out of the view.
    /// Links held by entries that did not survive are closed, except those
    /// whose address is still in the new view and the `sender` relay itself.
    /// A bare entry that did not survive held nothing, so nothing is closed
    /// for it.
    pub(crate) fn reconcile(
        &mut self,
        outcome: MergeOutcome<T::Connection>,
        sender: &T::Connection,
    ) {
        let MergeOutcome { result, removed } = outcome;

        let mut owned: HashMap<Address, Link<T::Connection>> = self
            .view
            .take()
            .into_iter()
            .filter_map(|entry| entry.link.map(|link| (entry.address, link)))
            .collect();

        let mut admitted = Vec::with_capacity(result.len());
        let mut unreachable = 0;
        for mut entry in result {
            if entry.link.is_some() {
                owned.remove(&entry.address);
            } else if let Some(link) = owned.remove(&entry.address) {
                entry.link = Some(link);
            } else {
                match self.link_for(&entry.address, sender) {
                    Some(link) => entry.link = Some(link),
                    None => {
                        unreachable += 1;
                        continue;
                    }
                }
            }
            admitted.push(entry);
        }

        let dropped = self.view.replace(admitted);
        self.stats.entries_evicted += (unreachable + dropped.len()) as u64;

        let mut teardown: Vec<(Address, T::Connection)> = Vec::new();
        let leftovers = owned
            .into_iter()
            .map(|(address, link)| (address, link.connection));
        let discarded = removed
            .into_iter()
            .chain(dropped)
            .filter_map(|entry: Node<T::Connection>| {
                entry.link.map(|link| (entry.address, link.connection))
            });
        for (address, connection) in leftovers.chain(discarded) {
            if !teardown.iter().any(|(_, held)| held.same_session(&connection)) {
                teardown.push((address, connection));
            }
        }

        for (address, connection) in teardown {
            if self.view.contains(&address) || &address == sender.remote_address() {
                continue;
            }
            self.forget_attempt(&connection);
            if let Err(error) = connection.close() {
                debug!(peer = %address, %error, "Failed to close removed connection");
            }
        }

        debug!(
            address = %self.address,
            view_size = self.view.len(),
            pending = self.pending_connections.len(),
            "View reconciled"
        );
    }

    /// Find or start a connection for a bare entry.
    fn link_for(
        &mut self,
        address: &Address,
        sender: &T::Connection,
    ) -> Option<Link<T::Connection>> {
        if let Some(connection) = self.transport.lookup_connection(address) {
            return Some(Link::open(connection));
        }
        if let Some(connection) = self.pending_connections.get(address) {
            return Some(Link::pending(connection.clone()));
        }

        debug!(peer = %address, via = %sender.remote_address(), "Connecting to new view entry");
        match self.transport.connect(address, sender) {
            Ok(connection) => {
                self.pending_connections
                    .insert(address.clone(), connection.clone());
                Some(Link::pending(connection))
            }
            Err(error) => {
                warn!(peer = %address, %error, "Peer unreachable, dropping from view");
                None
            }
        }
    }
}
