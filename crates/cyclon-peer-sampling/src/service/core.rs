use super::ready::ReadyCallbacks;
use crate::domain::{
    Address, CyclonConfig, CyclonError, PendingRound, SamplingStats, ShuffleState, View,
};
use crate::ports::{ConfigProvider, Transport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::debug;

/// Cyclon peer sampling node.
///
/// Owns the partial view, the outstanding shuffle round, the in-flight
/// connection attempts and the ready observers of one local node. It
/// performs no I/O of its own: frames leave through the `Transport`'s
/// connections, and everything else arrives via `handle_event`.
///
/// # Example
///
/// ```rust,ignore
/// use cyclon_peer_sampling::{CyclonConfig, CyclonNode, NodeEvent};
///
/// let mut node = CyclonNode::new(CyclonConfig::default(), transport)?;
///
/// // The host's handshake completed:
/// node.handle_event(NodeEvent::BootstrapOpened(connection))?;
///
/// // Every delta_t:
/// node.handle_event(NodeEvent::Tick)?;
/// ```
pub struct CyclonNode<T: Transport, R: Rng = StdRng> {
    /// Protocol parameters (validated)
    pub(crate) config: CyclonConfig,
    /// Transport collaborator
    pub(crate) transport: T,
    /// Our own address, cached from the transport
    pub(crate) address: Address,
    /// Partial view
    pub(crate) view: View<T::Connection>,
    /// Outbound attempts in flight, with their pending handles
    pub(crate) pending_connections: HashMap<Address, T::Connection>,
    /// Outstanding active round
    pub(crate) round: ShuffleState,
    /// Readiness observers
    pub(crate) ready: ReadyCallbacks,
    /// Sampling randomness
    pub(crate) rng: R,
    /// Running counters
    pub(crate) stats: SamplingStats,
}

impl<T: Transport> CyclonNode<T, StdRng> {
    /// Create a node, seeding sampling from `config.rng_seed` or from entropy.
    ///
    /// # Errors
    ///
    /// `ConfigError` if `l == 0` or `l >= c`; the node is not created.
    pub fn new(config: CyclonConfig, transport: T) -> Result<Self, CyclonError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, transport, rng)
    }

    /// Create a node from whatever parameters `provider` supplies.
    pub fn from_provider(
        provider: &dyn ConfigProvider,
        transport: T,
    ) -> Result<Self, CyclonError> {
        Self::new(provider.cyclon_config(), transport)
    }
}

impl<T: Transport, R: Rng> CyclonNode<T, R> {
    /// Create a node with an explicit RNG.
    pub fn with_rng(config: CyclonConfig, transport: T, rng: R) -> Result<Self, CyclonError> {
        config.validate()?;
        let address = transport.self_address();
        debug!(
            address = %address,
            c = config.view_capacity,
            l = config.shuffle_length,
            delta_t_ms = config.shuffle_interval.as_millis() as u64,
            "Cyclon node created"
        );
        Ok(Self {
            view: View::new(address.clone(), config.view_capacity),
            stats: SamplingStats {
                view_capacity: config.view_capacity,
                ..SamplingStats::default()
            },
            config,
            transport,
            address,
            pending_connections: HashMap::new(),
            round: ShuffleState::default(),
            ready: ReadyCallbacks::new(),
            rng,
        })
    }

    /// Our own address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Protocol parameters.
    pub fn config(&self) -> &CyclonConfig {
        &self.config
    }

    /// The current partial view.
    pub fn view(&self) -> &View<T::Connection> {
        &self.view
    }

    /// The transport collaborator.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The outstanding active round, if any.
    pub fn pending_round(&self) -> Option<&PendingRound> {
        self.round.pending()
    }

    /// Addresses with an outbound attempt in flight.
    pub fn pending_connections(&self) -> impl Iterator<Item = &Address> {
        self.pending_connections.keys()
    }

    /// Snapshot of counters and gauges.
    pub fn stats(&self) -> SamplingStats {
        let pending_links = self
            .view
            .iter()
            .filter(|entry| entry.link.is_some() && !entry.is_live())
            .count();
        SamplingStats {
            view_size: self.view.len(),
            open_links: self.view.live_connections().count(),
            pending_links,
            pending_connections: self.pending_connections.len(),
            round_in_flight: !self.round.is_idle(),
            bootstrapped: self.ready.is_fired(),
            ..self.stats.clone()
        }
    }
}
