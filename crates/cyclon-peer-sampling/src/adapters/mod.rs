//! # Adapters
//!
//! Concrete implementations around the pure core.
//!
//! ## Adapters Provided
//!
//! - `StaticConfigProvider` - Fixed parameters (always available)
//! - `TomlConfigProvider` - Config file loading (requires "config" feature)
//! - `CyclonRuntime` / `CyclonHandle` - Tokio actor (requires "runtime" feature)
//! - `init_tracing` - `fmt` subscriber with `EnvFilter` (requires "runtime" feature)

/// Configuration providers
pub mod config;

/// Tokio actor runtime
#[cfg(feature = "runtime")]
pub mod runtime;

/// Log subscriber setup
#[cfg(feature = "runtime")]
pub mod telemetry;

// Re-export public API
pub use config::StaticConfigProvider;

#[cfg(feature = "config")]
pub use config::TomlConfigProvider;

#[cfg(feature = "runtime")]
pub use runtime::{CyclonHandle, CyclonRuntime};

#[cfg(feature = "runtime")]
pub use telemetry::{init_tracing, TelemetryError};
