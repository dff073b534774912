//! # Bootstrap
//!
//! Nodes join through a single contact and become ready when that first
//! session opens. An isolated node stays idle.

#[cfg(test)]
mod tests {
    use crate::integration::invariants::assert_view_invariants;
    use crate::integration::sim_config;
    use crate::simulation::SimNetwork;
    use cyclon_peer_sampling::{Address, PeerSamplingApi};

    #[test]
    fn test_chain_bootstrap_makes_every_node_ready() {
        let network = SimNetwork::chain(sim_config(3), 20).unwrap();

        for node in network.nodes() {
            assert!(node.is_ready(), "{} not ready", node.address());
            assert!(!node.view().is_empty());
        }

        let first = network.node(&Address::from("node-000")).unwrap();
        assert_eq!(first.view().addresses(), vec![Address::from("node-001")]);

        let middle = network.node(&Address::from("node-010")).unwrap();
        assert_eq!(
            middle.view().addresses(),
            vec![Address::from("node-009"), Address::from("node-011")]
        );
        assert_view_invariants(&network);
    }

    #[test]
    fn test_isolated_node_stays_idle() {
        let mut network = SimNetwork::new(sim_config(4));
        network.add_node("solo").unwrap();

        network.run(5).unwrap();

        let solo = network.node(&Address::from("solo")).unwrap();
        assert!(!solo.is_ready());
        assert!(solo.view().is_empty());
        assert_eq!(solo.stats().rounds_started, 0);
        assert_eq!(network.frames_sent(), 0);
    }

    #[test]
    fn test_bootstrap_session_adds_peer_on_both_ends() {
        let mut network = SimNetwork::new(sim_config(5));
        network.add_node("a").unwrap();
        network.add_node("b").unwrap();

        let a = Address::from("a");
        let b = Address::from("b");
        assert!(network.nodes().all(|node| !node.is_ready()));

        network.bootstrap(&b, &a);
        network.deliver_all().unwrap();

        let node = network.node(&a).unwrap();
        assert!(node.is_ready());
        assert_eq!(node.view().addresses(), vec![b.clone()]);

        let node = network.node(&b).unwrap();
        assert!(node.is_ready());
        assert_eq!(node.view().addresses(), vec![a.clone()]);
    }

    #[test]
    fn test_late_joiner_is_integrated() {
        let mut network = SimNetwork::chain(sim_config(6), 15).unwrap();
        network.run(20).unwrap();

        let late = Address::from("late");
        network.add_node(late.clone()).unwrap();
        network.bootstrap(&late, &Address::from("node-007"));
        network.deliver_all().unwrap();
        network.run(30).unwrap();

        let node = network.node(&late).unwrap();
        assert!(node.is_ready());
        assert_eq!(node.view().len(), 6);
        assert!(network.in_degrees()[&late] >= 1);
        assert_view_invariants(&network);
    }
}
