//! # Integration Tests
//!
//! Multi-node behaviour of the sampling service, driven through the
//! simulator or through real tokio actors.

pub mod bootstrap;
pub mod convergence;
pub mod invariants;
pub mod runtime;

/// Parameters shared by the simulated networks: `c = 6`, `l = 3`.
pub fn sim_config(seed: u64) -> cyclon_peer_sampling::CyclonConfig {
    cyclon_peer_sampling::CyclonConfig::for_testing()
        .with_view_capacity(6)
        .with_shuffle_length(3)
        .with_rng_seed(seed)
}
