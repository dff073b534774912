//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the core Cyclon logic:
//! - Node model (addresses, descriptors, links, view entries)
//! - The bounded partial view and its invariants
//! - View Algebra (aging, exclusion, sampling, merge)
//! - Shuffle round state
//! - Wire protocol messages

pub mod services;
pub mod shuffle;
/// Core domain types (entities, values, errors)
pub mod types;
pub mod view;
pub mod wire;

pub use services::*;
pub use shuffle::*;
pub use types::*;
pub use view::View;
pub use wire::ProtocolMessage;
