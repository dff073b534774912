//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this crate **requires** the host application to
//! implement. Session establishment (offer/answer exchange, NAT traversal,
//! framing, signaling) lives entirely behind them.
//!
//! Connection outcomes are not callbacks: the transport reports them by
//! feeding `NodeEvent`s (`ConnectionOpened`, `ConnectionUnreachable`,
//! `ConnectionClosed`, `Message`) into the node's single event entry point.

use crate::domain::{Address, CyclonConfig, TransportError};
use std::fmt::Debug;

/// A live or pending point-to-point session.
///
/// Handles are cheap to clone; clones refer to the same session.
pub trait Connection: Clone + Debug + Send + 'static {
    /// Address of the remote peer.
    fn remote_address(&self) -> &Address;

    /// True if `other` is a handle to this same session.
    ///
    /// Outcome events name the session they concern, and the node only acts
    /// on them when the session still backs a view entry or an attempt.
    fn same_session(&self, other: &Self) -> bool;

    /// Hand one frame to the session.
    fn send(&self, frame: &[u8]) -> Result<(), TransportError>;

    /// Tear the session down.
    fn close(&self) -> Result<(), TransportError>;
}

/// The point-to-point transport a node runs on.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl Transport for WebRtcTransport {
///     type Connection = DataChannel;
///
///     fn self_address(&self) -> Address { self.local_id.clone() }
///
///     fn connect(&self, address: &Address, introducer: &DataChannel)
///         -> Result<DataChannel, TransportError>
///     {
///         // relay the offer through `introducer`, report the outcome later
///         // as NodeEvent::ConnectionOpened / ConnectionUnreachable
///         todo!()
///     }
///
///     fn lookup_connection(&self, address: &Address) -> Option<DataChannel> {
///         self.open_channels.get(address).cloned()
///     }
/// }
/// ```
pub trait Transport {
    /// Session handle type.
    type Connection: Connection;

    /// The local node's own address.
    fn self_address(&self) -> Address;

    /// Start an outbound attempt to `address`.
    ///
    /// The returned handle is pending; the outcome arrives asynchronously as
    /// a node event. `introducer` is a live connection that may relay the
    /// handshake when the transport's topology needs one.
    fn connect(
        &self,
        address: &Address,
        introducer: &Self::Connection,
    ) -> Result<Self::Connection, TransportError>;

    /// An existing open connection to `address`, if any.
    fn lookup_connection(&self, address: &Address) -> Option<Self::Connection>;
}

/// Abstract interface for configuration loading.
pub trait ConfigProvider: Send + Sync {
    /// Get the Cyclon protocol parameters.
    fn cyclon_config(&self) -> CyclonConfig;
}
