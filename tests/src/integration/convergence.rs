//! # Convergence
//!
//! Starting from a chain, repeated shuffling fills every view and spreads
//! in-degree evenly while the overlay stays connected.

#[cfg(test)]
mod tests {
    use crate::integration::invariants::assert_view_invariants;
    use crate::integration::sim_config;
    use crate::simulation::SimNetwork;
    use cyclon_peer_sampling::{Address, Connection, PeerSamplingApi};

    const NODES: usize = 40;
    const CAPACITY: usize = 6;

    fn converged(seed: u64) -> SimNetwork {
        let mut network = SimNetwork::chain(sim_config(seed), NODES).unwrap();
        network
            .run_with(100, |network| {
                assert!(network.is_connected(), "overlay partitioned");
            })
            .unwrap();
        network
    }

    #[test]
    fn test_views_fill_up() {
        let network = converged(11);

        for node in network.nodes() {
            assert_eq!(node.view().len(), CAPACITY, "{} not full", node.address());
        }
        assert_view_invariants(&network);
    }

    #[test]
    fn test_in_degree_spreads() {
        let network = converged(12);
        let degrees = network.in_degrees();

        let total: usize = degrees.values().sum();
        assert_eq!(total, NODES * CAPACITY);

        let max = degrees.values().copied().max().unwrap_or(0);
        assert!(max <= 3 * CAPACITY, "max in-degree {max}");
    }

    #[test]
    fn test_get_peers_draws_from_view() {
        let mut network = converged(13);
        let address = Address::from("node-020");
        let node = network.node_mut(&address).unwrap();
        let view = node.view().addresses();

        let some = node.get_peers(Some(3));
        assert_eq!(some.len(), 3);
        for connection in &some {
            assert!(view.contains(connection.remote_address()));
        }

        let all = node.get_peers(None);
        assert_eq!(all.len(), view.len());
    }

    #[test]
    fn test_broadcast_reaches_whole_view() {
        let network = converged(14);
        let node = network.node(&Address::from("node-005")).unwrap();

        let before = network.frames_sent();
        let report = node.broadcast(b"hello");

        assert_eq!(report.delivered, CAPACITY);
        assert_eq!(report.failed, 0);
        assert_eq!(network.frames_sent(), before + CAPACITY as u64);
    }
}
