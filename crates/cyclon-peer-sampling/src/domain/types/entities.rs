//! Core Domain Entities for Peer Sampling
//!
//! A view entry is a `Node`: an address, an age counted in shuffle rounds,
//! and optionally the link (connection handle) the local node holds to it.
//! `Descriptor` is the same entry with the link stripped, which is the only
//! form that ever crosses the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque peer identifier as handed out by the transport.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from anything string-like.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Anything that can be matched by address.
///
/// Exclusion lists accept bare addresses and full entries alike, so the
/// algebra is written against this trait rather than a concrete type.
pub trait Addressed {
    /// The address this item refers to.
    fn address(&self) -> &Address;
}

/// A view entry carrying an age.
pub trait Aged: Addressed {
    /// Rounds since the entry was last freshly introduced.
    fn age(&self) -> u32;

    /// Mutable access for aging.
    fn age_mut(&mut self) -> &mut u32;
}

impl Addressed for Address {
    fn address(&self) -> &Address {
        self
    }
}

impl<T: Addressed> Addressed for &T {
    fn address(&self) -> &Address {
        (*self).address()
    }
}

/// Wire form of a view entry: `{address, age}` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    /// Peer identifier.
    pub address: Address,
    /// Shuffle rounds since this entry was introduced.
    pub age: u32,
}

impl Descriptor {
    /// Create a descriptor.
    pub fn new(address: impl Into<Address>, age: u32) -> Self {
        Self {
            address: address.into(),
            age,
        }
    }

    /// The entry a node advertises for itself: own address, age 0.
    pub fn fresh(address: Address) -> Self {
        Self { address, age: 0 }
    }
}

impl Addressed for Descriptor {
    fn address(&self) -> &Address {
        &self.address
    }
}

impl Aged for Descriptor {
    fn age(&self) -> u32 {
        self.age
    }

    fn age_mut(&mut self) -> &mut u32 {
        &mut self.age
    }
}

/// Lifecycle of a connection attached to a view entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Outbound attempt in flight.
    Pending,
    /// Connection open and usable.
    Open,
}

/// A connection handle owned by a view entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<C> {
    /// Transport handle.
    pub connection: C,
    /// Whether the handle is usable yet.
    pub state: LinkState,
}

impl<C> Link<C> {
    /// A link whose connection is already open.
    pub fn open(connection: C) -> Self {
        Self {
            connection,
            state: LinkState::Open,
        }
    }

    /// A link whose connection attempt is still in flight.
    pub fn pending(connection: C) -> Self {
        Self {
            connection,
            state: LinkState::Pending,
        }
    }

    /// True once the transport reported the connection open.
    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }
}

/// One entry in a partial view.
///
/// `C` is the transport's connection handle type. Entries freshly learned
/// from a shuffle are "bare" (`link == None`) until the reconciler attaches
/// an existing or pending connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<C> {
    /// Peer identifier.
    pub address: Address,
    /// Shuffle rounds since this entry was introduced.
    pub age: u32,
    /// Connection to the peer, if any.
    pub link: Option<Link<C>>,
}

impl<C> Node<C> {
    /// An entry with no connection attached.
    pub fn bare(address: impl Into<Address>, age: u32) -> Self {
        Self {
            address: address.into(),
            age,
            link: None,
        }
    }

    /// An entry carrying a connection.
    pub fn with_link(address: impl Into<Address>, age: u32, link: Link<C>) -> Self {
        Self {
            address: address.into(),
            age,
            link: Some(link),
        }
    }

    /// Strip the link, keeping `{address, age}`.
    pub fn descriptor(&self) -> Descriptor {
        Descriptor {
            address: self.address.clone(),
            age: self.age,
        }
    }

    /// True if the entry holds an open connection.
    pub fn is_live(&self) -> bool {
        self.link.as_ref().is_some_and(Link::is_open)
    }

    /// The open connection, if any.
    pub fn live_connection(&self) -> Option<&C> {
        self.link
            .as_ref()
            .filter(|link| link.is_open())
            .map(|link| &link.connection)
    }
}

impl<C> From<Descriptor> for Node<C> {
    fn from(descriptor: Descriptor) -> Self {
        Self::bare(descriptor.address, descriptor.age)
    }
}

impl<C> From<&Descriptor> for Node<C> {
    fn from(descriptor: &Descriptor) -> Self {
        Self::bare(descriptor.address.clone(), descriptor.age)
    }
}

impl<C> Addressed for Node<C> {
    fn address(&self) -> &Address {
        &self.address
    }
}

impl<C> Aged for Node<C> {
    fn age(&self) -> u32 {
        self.age
    }

    fn age_mut(&mut self) -> &mut u32 {
        &mut self.age
    }
}
