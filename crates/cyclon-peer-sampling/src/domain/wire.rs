//! Shuffle wire protocol.
//!
//! Two message kinds, each carrying a view subset and the sender's address.
//! Frames are JSON objects tagged by `type`:
//!
//! ```json
//! {"type":"SHUFFLE","view":[{"address":"a","age":0}],"sender":"a"}
//! ```

use crate::domain::{Address, CodecError, Descriptor};
use serde::{Deserialize, Serialize};

/// A shuffle protocol frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtocolMessage {
    /// Active-role request: the initiator's subset (own entry included).
    Shuffle {
        view: Vec<Descriptor>,
        sender: Address,
    },
    /// Passive-role answer: the responder's subset.
    ShuffleResponse {
        view: Vec<Descriptor>,
        sender: Address,
    },
}

impl ProtocolMessage {
    /// Name of the message kind as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shuffle { .. } => "SHUFFLE",
            Self::ShuffleResponse { .. } => "SHUFFLE_RESPONSE",
        }
    }

    /// The address the sender claims.
    pub fn sender(&self) -> &Address {
        match self {
            Self::Shuffle { sender, .. } | Self::ShuffleResponse { sender, .. } => sender,
        }
    }

    /// The carried view subset.
    pub fn view(&self) -> &[Descriptor] {
        match self {
            Self::Shuffle { view, .. } | Self::ShuffleResponse { view, .. } => view,
        }
    }

    /// Encode as a JSON frame.
    pub fn encode(&self) -> Vec<u8> {
        // Enum of strings and integers: serialisation cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode a JSON frame.
    pub fn decode(frame: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(frame)?)
    }
}
