//! Value Objects for Peer Sampling

use super::errors::ConfigError;
use std::time::Duration;

/// Cyclon protocol parameters.
///
/// `delta_t`, `c` and `l` are the classic Cyclon knobs: the shuffle period,
/// the view capacity and the number of entries exchanged per round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclonConfig {
    /// How often the active role fires (`delta_t`).
    pub shuffle_interval: Duration,
    /// Maximum number of entries in the partial view (`c`).
    pub view_capacity: usize,
    /// Number of entries exchanged per shuffle (`l`), own entry included.
    pub shuffle_length: usize,
    /// How long to wait for the first connection before logging a failed bootstrap.
    pub bootstrap_timeout: Duration,
    /// Fixed RNG seed for reproducible sampling. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for CyclonConfig {
    fn default() -> Self {
        Self {
            shuffle_interval: Duration::from_millis(4_000),
            view_capacity: 5,
            shuffle_length: 3,
            bootstrap_timeout: Duration::from_secs(60),
            rng_seed: None,
        }
    }
}

impl CyclonConfig {
    /// Create a config suitable for testing (fast timers, fixed seed)
    pub fn for_testing() -> Self {
        Self {
            shuffle_interval: Duration::from_millis(50),
            view_capacity: 4,
            shuffle_length: 2,
            bootstrap_timeout: Duration::from_millis(200),
            rng_seed: Some(7),
        }
    }

    /// Set `delta_t`.
    #[must_use]
    pub fn with_shuffle_interval(mut self, interval: Duration) -> Self {
        self.shuffle_interval = interval;
        self
    }

    /// Set `c`.
    #[must_use]
    pub fn with_view_capacity(mut self, capacity: usize) -> Self {
        self.view_capacity = capacity;
        self
    }

    /// Set `l`.
    #[must_use]
    pub fn with_shuffle_length(mut self, length: usize) -> Self {
        self.shuffle_length = length;
        self
    }

    /// Set the bootstrap timeout.
    #[must_use]
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    /// Pin the RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Check `0 < l < c`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shuffle_length == 0 {
            return Err(ConfigError::EmptyShuffle);
        }
        if self.shuffle_length >= self.view_capacity {
            return Err(ConfigError::ShuffleLengthTooLarge {
                l: self.shuffle_length,
                c: self.view_capacity,
            });
        }
        Ok(())
    }
}

/// Outcome of a broadcast over the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the payload was handed to.
    pub delivered: usize,
    /// Connections whose send failed.
    pub failed: usize,
}

/// Counters and gauges describing one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Entries currently in the view.
    pub view_size: usize,
    /// Configured capacity `c`.
    pub view_capacity: usize,
    /// Entries backed by an open connection.
    pub open_links: usize,
    /// Entries waiting on a connection attempt.
    pub pending_links: usize,
    /// Outbound attempts in flight.
    pub pending_connections: usize,
    /// Whether an active round is outstanding.
    pub round_in_flight: bool,
    /// Active rounds started.
    pub rounds_started: u64,
    /// Active rounds completed by a response.
    pub rounds_completed: u64,
    /// Timer ticks suppressed because a round was outstanding.
    pub rounds_skipped: u64,
    /// Rounds that could not reach their target.
    pub rounds_abandoned: u64,
    /// SHUFFLE requests answered.
    pub passive_shuffles: u64,
    /// Entries removed by merges, unreachable peers or disconnects.
    pub entries_evicted: u64,
    /// Whether the bootstrap connection has opened.
    pub bootstrapped: bool,
}
