//! Domain Errors for Peer Sampling

use super::entities::Address;
use thiserror::Error;

/// Invalid node configuration. Fatal at construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `l` must be at least 1: the active role sends `l - 1` sampled entries.
    #[error("shuffle length (l) must be at least 1")]
    EmptyShuffle,

    /// `l` must be strictly smaller than `c`.
    #[error("shuffle length l={l} must be smaller than view capacity c={c}")]
    ShuffleLengthTooLarge { l: usize, c: usize },

    /// Config file could not be read.
    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    /// Config file could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Wire codec failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The frame is not a valid protocol message or view payload.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}

/// Errors reported by the transport collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Outbound attempt could not be started.
    #[error("connect to {address} failed: {reason}")]
    ConnectFailed { address: Address, reason: String },

    /// A frame could not be handed to the connection.
    #[error("send to {address} failed: {reason}")]
    SendFailed { address: Address, reason: String },

    /// The connection is already closed.
    #[error("connection to {address} is closed")]
    Closed { address: Address },
}

/// Rejected direct view mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The local node may never appear in its own view.
    #[error("own address cannot be added to the view")]
    SelfEntry,

    /// Addresses are unique within a view.
    #[error("{0} is already in the view")]
    Duplicate(Address),

    /// The view is at capacity.
    #[error("view is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// Top-level error for node operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CyclonError {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Frame could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Transport failure that could not be recovered locally.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Direct view mutation rejected.
    #[error(transparent)]
    View(#[from] ViewError),

    /// A SHUFFLE_RESPONSE arrived while no shuffle round was outstanding.
    #[error("out-of-order SHUFFLE_RESPONSE from {from}: no shuffle round outstanding")]
    OutOfOrderResponse { from: Address },

    /// The runtime actor is gone.
    #[error("sampling runtime stopped")]
    RuntimeStopped,
}

impl CyclonError {
    /// Whether the error indicates a protocol violation that must stop the node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfOrderResponse { .. })
    }
}
