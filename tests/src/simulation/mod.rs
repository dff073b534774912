//! # Network Simulator
//!
//! Drives many `CyclonNode`s over an in-memory fabric. Every frame and
//! connection outcome goes through one global FIFO queue, so a run is fully
//! determined by the node seeds.
//!
//! A simulated round ticks every live node once, in address order, then
//! delivers queued events until the network is quiet. Rounds never leave a
//! shuffle outstanding.


pub use fabric::{SimConnection, SimTransport};

use cyclon_peer_sampling::{Address, CyclonConfig, CyclonError, CyclonNode, NodeEvent};
use fabric::Fabric;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// A node running on the simulator.
pub type SimNode = CyclonNode<SimTransport>;

/// Upper bound on events delivered per `deliver_all` call.
const MAX_DELIVERIES: usize = 1_000_000;

/// A deterministic in-memory network of Cyclon nodes.
pub struct SimNetwork {
    config: CyclonConfig,
    fabric: Arc<Mutex<Fabric>>,
    nodes: BTreeMap<Address, SimNode>,
    next_seed: u64,
}

impl SimNetwork {
    /// An empty network whose nodes all use `config`. Node seeds are derived
    /// from `config.rng_seed` (or 0).
    pub fn new(config: CyclonConfig) -> Self {
        let next_seed = config.rng_seed.unwrap_or(0);
        Self {
            config,
            fabric: Arc::new(Mutex::new(Fabric::default())),
            nodes: BTreeMap::new(),
            next_seed,
        }
    }

    /// A network of `count` nodes named `node-000`, `node-001`, ..., each
    /// bootstrapped through its predecessor.
    pub fn chain(config: CyclonConfig, count: usize) -> Result<Self, CyclonError> {
        let mut network = Self::new(config);
        let addresses: Vec<Address> = (0..count)
            .map(|i| Address::new(format!("node-{i:03}")))
            .collect();
        for address in &addresses {
            network.add_node(address.clone())?;
        }
        for pair in addresses.windows(2) {
            network.bootstrap(&pair[1], &pair[0]);
        }
        network.deliver_all()?;
        Ok(network)
    }

    /// Start a node. It stays isolated until bootstrapped.
    pub fn add_node(&mut self, address: impl Into<Address>) -> Result<&mut SimNode, CyclonError> {
        let address = address.into();
        let config = self.config.clone().with_rng_seed(self.next_seed);
        self.next_seed += 1;

        let transport = SimTransport::new(address.clone(), Arc::clone(&self.fabric));
        let node = CyclonNode::new(config, transport)?;
        self.fabric.lock().alive.insert(address.clone());
        Ok(self.nodes.entry(address).or_insert(node))
    }

    /// Open a bootstrap session between `joiner` and `contact`. Both ends
    /// see `BootstrapOpened`.
    pub fn bootstrap(&mut self, joiner: &Address, contact: &Address) {
        let mut fabric = self.fabric.lock();
        let outbound = fabric.handle(&self.fabric, joiner, contact);
        let inbound = fabric.handle(&self.fabric, contact, joiner);
        fabric
            .queue
            .push_back((joiner.clone(), NodeEvent::BootstrapOpened(outbound)));
        fabric
            .queue
            .push_back((contact.clone(), NodeEvent::BootstrapOpened(inbound)));
    }

    /// Apply queued events until none are left. Returns how many were applied.
    pub fn deliver_all(&mut self) -> Result<usize, CyclonError> {
        let mut delivered = 0;
        while delivered < MAX_DELIVERIES {
            let next = {
                let mut fabric = self.fabric.lock();
                fabric
                    .queue
                    .pop_front()
                    .map(|(to, event)| {
                        let event = fabric.reopen(&self.fabric, &to, event);
                        (to, event)
                    })
            };
            let Some((to, event)) = next else {
                break;
            };
            if let Some(node) = self.nodes.get_mut(&to) {
                node.handle_event(event)?;
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    /// Tick every node once, then deliver everything.
    pub fn round(&mut self) -> Result<(), CyclonError> {
        for node in self.nodes.values_mut() {
            node.handle_event(NodeEvent::Tick)?;
        }
        self.deliver_all()?;
        Ok(())
    }

    /// Run `rounds` rounds, calling `check` on the network after each one.
    pub fn run_with(
        &mut self,
        rounds: usize,
        mut check: impl FnMut(&SimNetwork),
    ) -> Result<(), CyclonError> {
        for _ in 0..rounds {
            self.round()?;
            check(self);
        }
        Ok(())
    }

    pub fn run(&mut self, rounds: usize) -> Result<(), CyclonError> {
        self.run_with(rounds, |_| {})
    }

    /// Stop `address` abruptly. Peers holding a session to it are told the
    /// connection closed.
    pub fn kill(&mut self, address: &Address) -> Option<SimNode> {
        self.fabric.lock().kill(address);
        self.nodes.remove(address)
    }

    pub fn node(&self, address: &Address) -> Option<&SimNode> {
        self.nodes.get(address)
    }

    pub fn node_mut(&mut self, address: &Address) -> Option<&mut SimNode> {
        self.nodes.get_mut(address)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SimNode> {
        self.nodes.values()
    }

    /// Addresses of live nodes, sorted.
    pub fn addresses(&self) -> Vec<Address> {
        self.nodes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// How many views each live node appears in.
    pub fn in_degrees(&self) -> HashMap<Address, usize> {
        let mut degrees: HashMap<Address, usize> =
            self.nodes.keys().map(|address| (address.clone(), 0)).collect();
        for node in self.nodes.values() {
            for entry in node.view().iter() {
                if let Some(count) = degrees.get_mut(&entry.address) {
                    *count += 1;
                }
            }
        }
        degrees
    }

    /// Whether the overlay formed by the views, ignoring direction, links
    /// every live node.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.nodes.keys().next() else {
            return true;
        };

        let mut neighbours: HashMap<&Address, Vec<&Address>> = HashMap::new();
        for (address, node) in &self.nodes {
            for entry in node.view().iter() {
                if self.nodes.contains_key(&entry.address) {
                    neighbours.entry(address).or_default().push(&entry.address);
                    neighbours.entry(&entry.address).or_default().push(address);
                }
            }
        }

        let mut seen: HashSet<&Address> = HashSet::from([start]);
        let mut frontier = VecDeque::from([start]);
        while let Some(current) = frontier.pop_front() {
            for &next in neighbours.get(current).into_iter().flatten() {
                if seen.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        seen.len() == self.nodes.len()
    }

    /// Frames handed to the fabric so far.
    pub fn frames_sent(&self) -> u64 {
        self.fabric.lock().frames_sent
    }

    /// Handles closed so far.
    pub fn closes(&self) -> u64 {
        self.fabric.lock().closes
    }
}
