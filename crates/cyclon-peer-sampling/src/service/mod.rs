//! # Peer Sampling Service
//!
//! `CyclonNode` owns one node's entire protocol state (view, outstanding
//! round, in-flight connection attempts, ready observers) and is the only
//! thing that mutates it. Every input (timer tick, inbound frame,
//! connection outcome) arrives through `CyclonNode::handle_event`, so a
//! single owner (an event loop, or the tokio actor in `adapters::runtime`)
//! serialises all mutations by construction.

// Semantic submodules
mod api;
mod core;
mod events;
mod ready;
mod reconcile;
mod shuffle;

// Re-export public API
pub use self::core::CyclonNode;
pub use events::NodeEvent;
pub use ready::ReadyCallbacks;
pub use shuffle::ShuffleTick;
