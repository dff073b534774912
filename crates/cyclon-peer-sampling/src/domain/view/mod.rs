//! # Partial View
//!
//! The bounded, ordered set of peers a node currently knows about.
//!
//! ## Invariants (held at every public boundary)
//!
//! - `len() <= capacity`
//! - addresses are unique
//! - the owner's own address never appears
//!
//! Merges produce whole new entry lists; `replace` is the single place where
//! such a list is admitted, and it enforces the invariants by dropping
//! offending entries rather than failing.

use crate::domain::{Address, Descriptor, LinkState, Node, ViewError};
use std::collections::HashSet;

/// A node's partial view of the overlay.
#[derive(Debug, Clone)]
pub struct View<C> {
    entries: Vec<Node<C>>,
    capacity: usize,
    own_address: Address,
}

impl<C> View<C> {
    /// Create an empty view.
    pub fn new(own_address: Address, capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            own_address,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The owner's address, never admitted as an entry.
    pub fn own_address(&self) -> &Address {
        &self.own_address
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in view order.
    pub fn entries(&self) -> &[Node<C>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node<C>> {
        self.entries.iter()
    }

    /// Look up an entry by address.
    pub fn get(&self, address: &Address) -> Option<&Node<C>> {
        self.entries.iter().find(|entry| &entry.address == address)
    }

    /// Mutable lookup by address.
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Node<C>> {
        self.entries.iter_mut().find(|entry| &entry.address == address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    /// Addresses currently in the view.
    pub fn addresses(&self) -> Vec<Address> {
        self.entries.iter().map(|entry| entry.address.clone()).collect()
    }

    /// `{address, age}` of every entry.
    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.entries.iter().map(Node::descriptor).collect()
    }

    /// Add one entry at the end.
    pub fn push(&mut self, entry: Node<C>) -> Result<(), ViewError> {
        if entry.address == self.own_address {
            return Err(ViewError::SelfEntry);
        }
        if self.contains(&entry.address) {
            return Err(ViewError::Duplicate(entry.address));
        }
        if self.entries.len() >= self.capacity {
            return Err(ViewError::Full {
                capacity: self.capacity,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove the entry for `address`, returning it.
    pub fn remove(&mut self, address: &Address) -> Option<Node<C>> {
        let index = self
            .entries
            .iter()
            .position(|entry| &entry.address == address)?;
        Some(self.entries.remove(index))
    }

    /// Take the entries out, leaving the view empty.
    pub fn take(&mut self) -> Vec<Node<C>> {
        std::mem::take(&mut self.entries)
    }

    /// Swap in a new entry list wholesale.
    ///
    /// Self entries, repeated addresses (later occurrences) and anything past
    /// capacity are dropped and returned.
    pub fn replace(&mut self, entries: Vec<Node<C>>) -> Vec<Node<C>> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut kept = Vec::with_capacity(self.capacity.min(entries.len()));
        let mut dropped = Vec::new();

        for entry in entries {
            let admissible = entry.address != self.own_address
                && kept.len() < self.capacity
                && seen.insert(entry.address.clone());
            if admissible {
                kept.push(entry);
            } else {
                dropped.push(entry);
            }
        }

        self.entries = kept;
        dropped
    }

    /// Replace entries through a transformation of the current list.
    pub fn update(&mut self, f: impl FnOnce(Vec<Node<C>>) -> Vec<Node<C>>) -> Vec<Node<C>> {
        let current = self.take();
        self.replace(f(current))
    }

    /// Open the pending link of the entry for `address`, provided its
    /// connection is the one `is_session` recognises.
    ///
    /// Returns true if the entry was upgraded.
    pub fn mark_open(&mut self, address: &Address, is_session: impl Fn(&C) -> bool) -> bool {
        let Some(link) = self.get_mut(address).and_then(|entry| entry.link.as_mut()) else {
            return false;
        };
        if link.state != LinkState::Pending || !is_session(&link.connection) {
            return false;
        }
        link.state = LinkState::Open;
        true
    }

    /// Open connections, in view order.
    pub fn live_connections(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().filter_map(Node::live_connection)
    }
}
