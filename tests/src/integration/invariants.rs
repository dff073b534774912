//! # View Invariants Across Rounds
//!
//! After every simulated round (network quiet) each live node must hold:
//!
//! - at most `c` entries, unique by address, never itself
//! - an open connection on every entry
//! - no outstanding round and no unresolved connection attempt

use crate::simulation::SimNetwork;
use std::collections::HashSet;

/// Panic if any live node violates the quiet-network view invariants.
pub fn assert_view_invariants(network: &SimNetwork) {
    for node in network.nodes() {
        let view = node.view();
        let address = node.address();

        assert!(
            view.len() <= view.capacity(),
            "{address}: view over capacity"
        );
        assert!(!view.contains(address), "{address}: view contains itself");

        let unique: HashSet<_> = view.iter().map(|entry| &entry.address).collect();
        assert_eq!(unique.len(), view.len(), "{address}: duplicate entries");

        assert!(
            view.iter().all(|entry| entry.is_live()),
            "{address}: entry without an open connection"
        );
        assert!(
            node.pending_round().is_none(),
            "{address}: round still outstanding"
        );
        assert_eq!(
            node.pending_connections().count(),
            0,
            "{address}: unresolved connection attempts"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::sim_config;

    #[test]
    fn test_invariants_hold_every_round() {
        let mut network = SimNetwork::chain(sim_config(1), 24).unwrap();
        assert_view_invariants(&network);

        network.run_with(40, assert_view_invariants).unwrap();
    }

    #[test]
    fn test_every_started_round_completes() {
        let mut network = SimNetwork::chain(sim_config(2), 16).unwrap();
        network.run(20).unwrap();

        assert!(network.frames_sent() > 0);
        for node in network.nodes() {
            let stats = node.stats();
            assert!(stats.rounds_started > 0, "{} never shuffled", node.address());
            assert_eq!(stats.rounds_started, stats.rounds_completed);
            assert_eq!(stats.rounds_skipped, 0);
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let views = |seed| {
            let mut network = SimNetwork::chain(sim_config(seed), 12).unwrap();
            network.run(15).unwrap();
            network
                .nodes()
                .map(|node| node.view().descriptors())
                .collect::<Vec<_>>()
        };

        assert_eq!(views(9), views(9));
    }
}
