//! Test utilities for peer sampling.
//!
//! In-memory `Transport` and `Connection` doubles that record everything the
//! node does with them. Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use cyclon_peer_sampling::test_utils::MockTransport;
//! use cyclon_peer_sampling::{Connection, Transport};
//!
//! let transport = MockTransport::new("me");
//! let peer = transport.add_live("peer");
//! peer.send(b"hello").unwrap();
//!
//! assert_eq!(peer.sent_frames(), vec![b"hello".to_vec()]);
//! assert!(transport.lookup_connection(&"peer".into()).is_some());
//! ```

use crate::domain::{Address, ProtocolMessage, TransportError};
use crate::ports::{Connection, Transport};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct ConnectionLog {
    sent: Vec<Vec<u8>>,
    close_calls: usize,
    closed: bool,
    fail_sends: bool,
}

/// A connection that records sent frames and closes.
///
/// Clones share the same log, like clones of a real session handle.
#[derive(Debug, Clone)]
pub struct MockConnection {
    remote: Address,
    log: Arc<Mutex<ConnectionLog>>,
}

impl MockConnection {
    /// A fresh, open connection to `remote`.
    pub fn new(remote: impl Into<Address>) -> Self {
        Self {
            remote: remote.into(),
            log: Arc::new(Mutex::new(ConnectionLog::default())),
        }
    }

    /// Every frame handed to `send`, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.log.lock().sent.clone()
    }

    /// Sent frames that decode as protocol messages.
    pub fn sent_messages(&self) -> Vec<ProtocolMessage> {
        self.log
            .lock()
            .sent
            .iter()
            .filter_map(|frame| ProtocolMessage::decode(frame).ok())
            .collect()
    }

    /// Forget recorded frames.
    pub fn clear_sent(&self) {
        self.log.lock().sent.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.log.lock().closed
    }

    /// How many times `close` was called.
    pub fn close_calls(&self) -> usize {
        self.log.lock().close_calls
    }

    /// Make every subsequent `send` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.log.lock().fail_sends = fail;
    }
}

impl Connection for MockConnection {
    fn remote_address(&self) -> &Address {
        &self.remote
    }

    fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.log, &other.log)
    }

    fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let mut log = self.log.lock();
        if log.closed {
            return Err(TransportError::Closed {
                address: self.remote.clone(),
            });
        }
        if log.fail_sends {
            return Err(TransportError::SendFailed {
                address: self.remote.clone(),
                reason: "send failure injected".to_string(),
            });
        }
        log.sent.push(frame.to_vec());
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        let mut log = self.log.lock();
        log.close_calls += 1;
        log.closed = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TransportState {
    live: HashMap<Address, MockConnection>,
    dialed: HashMap<Address, MockConnection>,
    attempts: Vec<(Address, Address)>,
    unreachable: HashSet<Address>,
}

/// A transport whose connections never leave the process.
///
/// `connect` hands out pending `MockConnection`s and records the attempt;
/// tests decide the outcome by feeding node events. Clones share state, so
/// a test can keep one while the node owns another.
#[derive(Debug, Clone)]
pub struct MockTransport {
    address: Address,
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new(address: impl Into<Address>) -> Self {
        Self {
            address: address.into(),
            state: Arc::new(Mutex::new(TransportState::default())),
        }
    }

    /// Register an already open connection to `address`, visible to
    /// `lookup_connection`.
    pub fn add_live(&self, address: impl Into<Address>) -> MockConnection {
        let address = address.into();
        let connection = MockConnection::new(address.clone());
        self.state.lock().live.insert(address, connection.clone());
        connection
    }

    /// Drop a live connection from lookups.
    pub fn remove_live(&self, address: &Address) {
        self.state.lock().live.remove(address);
    }

    /// Make `connect` to `address` fail synchronously.
    pub fn set_unreachable(&self, address: impl Into<Address>) {
        self.state.lock().unreachable.insert(address.into());
    }

    /// `(target, introducer)` for every `connect` call, in order.
    pub fn connect_attempts(&self) -> Vec<(Address, Address)> {
        self.state.lock().attempts.clone()
    }

    /// Targets of every `connect` call, in order.
    pub fn dialed_addresses(&self) -> Vec<Address> {
        self.state
            .lock()
            .attempts
            .iter()
            .map(|(target, _)| target.clone())
            .collect()
    }

    /// The handle last returned by `connect` for `address`.
    pub fn dialed(&self, address: &Address) -> Option<MockConnection> {
        self.state.lock().dialed.get(address).cloned()
    }
}

impl Transport for MockTransport {
    type Connection = MockConnection;

    fn self_address(&self) -> Address {
        self.address.clone()
    }

    fn connect(
        &self,
        address: &Address,
        introducer: &MockConnection,
    ) -> Result<MockConnection, TransportError> {
        let mut state = self.state.lock();
        state
            .attempts
            .push((address.clone(), introducer.remote_address().clone()));
        if state.unreachable.contains(address) {
            return Err(TransportError::ConnectFailed {
                address: address.clone(),
                reason: "peer unreachable".to_string(),
            });
        }
        let connection = MockConnection::new(address.clone());
        state.dialed.insert(address.clone(), connection.clone());
        Ok(connection)
    }

    fn lookup_connection(&self, address: &Address) -> Option<MockConnection> {
        self.state.lock().live.get(address).cloned()
    }
}
