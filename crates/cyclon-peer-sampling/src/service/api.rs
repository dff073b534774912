use crate::domain::{sample_all, BroadcastReport};
use crate::ports::{Connection, PeerSamplingApi, ReadyCallback, Transport};
use crate::service::CyclonNode;
use rand::Rng;
use tracing::warn;

impl<T: Transport, R: Rng> PeerSamplingApi<T::Connection> for CyclonNode<T, R> {
    fn ready(&mut self, callback: ReadyCallback) {
        self.ready.register(callback);
    }

    fn is_ready(&self) -> bool {
        self.ready.is_fired()
    }

    fn get_peers(&mut self, count: Option<usize>) -> Vec<T::Connection> {
        if !self.ready.is_fired() {
            return Vec::new();
        }
        let live: Vec<_> = self.view.live_connections().cloned().collect();
        match count {
            Some(n) => sample_all(&mut self.rng, &live, n),
            None => live,
        }
    }

    fn broadcast(&self, payload: &[u8]) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for connection in self.view.live_connections() {
            match connection.send(payload) {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    report.failed += 1;
                    warn!(peer = %connection.remote_address(), %error, "Broadcast send failed");
                }
            }
        }
        report
    }
}
