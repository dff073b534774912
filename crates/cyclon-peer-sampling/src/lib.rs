//! # Cyclon Peer Sampling
//!
//! A gossip-based peer sampling service. Every node keeps a small, bounded
//! partial view of the overlay and periodically swaps a random part of it
//! with its oldest neighbour. The views keep changing, so each one stays
//! close to a uniform random sample of the live network, which is what
//! higher layers (broadcast trees, overlay builders) consume.
//!
//! ## Pure Core
//!
//! The core library (domain, ports, service) performs no I/O. Connections
//! come from a host-provided `Transport`, and every input (timer tick,
//! frame, connection outcome) is an explicit `NodeEvent` fed to
//! `CyclonNode::handle_event`:
//!
//! - `runtime` (default) - tokio actor owning the node, tracing setup
//! - `config` - TOML config provider
//! - `test-utils` - `MockTransport` / `MockConnection`
//!
//! ## Architecture
//!
//! - **Domain Layer:** node model, bounded view, view algebra, wire codec
//! - **Ports Layer:** `PeerSamplingApi` (driving), `Transport` / `Connection`
//!   / `ConfigProvider` (driven)
//! - **Service Layer:** `CyclonNode`, the shuffle state machine and
//!   connection reconciler
//! - **Adapters Layer:** runtime, config, telemetry (feature-gated)
//!
//! ## Example
//!
//! ```rust
//! use cyclon_peer_sampling::{merge, Address, Descriptor, Node};
//!
//! let local: Vec<Node<()>> = vec![Node::bare("a", 2), Node::bare("b", 3), Node::bare("c", 1)];
//! let received = vec![
//!     Descriptor::new("a", 5),
//!     Descriptor::new("b", 11),
//!     Descriptor::new("d", 2),
//!     Descriptor::new("e", 6),
//! ];
//! let sent = vec![Descriptor::new("b", 3)];
//!
//! let outcome = merge(&local, &received, &sent, 4, &Address::from("me"));
//!
//! let kept: Vec<_> = outcome.result.iter().map(|n| n.address.as_str()).collect();
//! assert_eq!(kept, ["a", "c", "d", "e"]);
//! assert_eq!(outcome.removed, vec![Node::bare("b", 3)]);
//! ```

// =============================================================================
// CORE MODULES (No I/O)
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// ADAPTERS (runtime, config and telemetry are feature-gated inside)
// =============================================================================

pub mod adapters;

/// Test utilities (MockTransport, MockConnection)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{
    Address, Addressed, Aged, BroadcastReport, CodecError, ConfigError, CyclonConfig, CyclonError,
    Descriptor, Link, LinkState, Node, PendingRound, ProtocolMessage, SamplingStats, ShuffleState,
    TransportError, View, ViewError,
};

// View algebra
pub use domain::{
    clean, exclude, increase_age, merge, oldest, parse, sample_all, sample_excluding,
    sort_by_age, stringify, MergeOutcome,
};

// Port traits
pub use ports::{ConfigProvider, Connection, PeerSamplingApi, ReadyCallback, Transport};

// Service
pub use service::{CyclonNode, NodeEvent, ReadyCallbacks, ShuffleTick};

// =============================================================================
// ADAPTER RE-EXPORTS
// =============================================================================

pub use adapters::StaticConfigProvider;

#[cfg(feature = "config")]
pub use adapters::TomlConfigProvider;

#[cfg(feature = "runtime")]
pub use adapters::{init_tracing, CyclonHandle, CyclonRuntime, TelemetryError};
