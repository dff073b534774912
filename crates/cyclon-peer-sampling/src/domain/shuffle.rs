//! Active-round bookkeeping.
//!
//! At most one active round may be outstanding per node. The record of what
//! was sent lives in `ShuffleState::AwaitingResponse` until the matching
//! response arrives or the round is cancelled.

use crate::domain::{Address, Descriptor};

/// The subset sent to `target` in the outstanding round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRound {
    /// Peer the SHUFFLE went to (the oldest entry at round start).
    pub target: Address,
    /// Exactly what was sent, own entry included.
    pub sent: Vec<Descriptor>,
}

/// Per-node shuffle state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShuffleState {
    /// No active round outstanding.
    #[default]
    Idle,
    /// One active round outstanding.
    AwaitingResponse(PendingRound),
}

impl ShuffleState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Record a new outstanding round. Returns false (and changes nothing)
    /// if one is already outstanding.
    pub fn begin(&mut self, target: Address, sent: Vec<Descriptor>) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Self::AwaitingResponse(PendingRound { target, sent });
        true
    }

    /// Close the outstanding round, returning its record.
    pub fn complete(&mut self) -> Option<PendingRound> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::AwaitingResponse(round) => Some(round),
        }
    }

    /// The outstanding round, if any.
    pub fn pending(&self) -> Option<&PendingRound> {
        match self {
            Self::Idle => None,
            Self::AwaitingResponse(round) => Some(round),
        }
    }
}
