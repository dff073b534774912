//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Port (Inbound):** the peer sampling API consumers call
//! - **Driven Ports (Outbound):** the transport and configuration the host
//!   application must provide

pub mod inbound;
pub mod outbound;

pub use inbound::{PeerSamplingApi, ReadyCallback};
pub use outbound::{ConfigProvider, Connection, Transport};
