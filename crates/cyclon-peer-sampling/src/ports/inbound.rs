//! # Driving Port (Inbound API)
//!
//! The peer sampling service as seen by higher layers (broadcast trees,
//! overlay builders).

use crate::domain::BroadcastReport;

/// Callback fired once when the node becomes ready.
pub type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

/// Primary API for consumers of the sampling service.
///
/// # Example
///
/// ```rust,ignore
/// fn fan_out<C, S: PeerSamplingApi<C>>(service: &mut S, payload: &[u8]) {
///     if service.is_ready() {
///         let report = service.broadcast(payload);
///         println!("delivered to {} peers", report.delivered);
///     }
/// }
/// ```
pub trait PeerSamplingApi<C> {
    /// Run `callback` once the node's own connection is open.
    ///
    /// Fires synchronously if already open; otherwise queued and fired in
    /// registration order when the bootstrap connection opens.
    fn ready(&mut self, callback: ReadyCallback);

    /// Whether the bootstrap connection has opened.
    fn is_ready(&self) -> bool;

    /// Live connections from the view.
    ///
    /// Empty before the node is ready. With `Some(n)`, up to `n` distinct
    /// connections drawn uniformly at random; with `None`, all of them in
    /// view order. Pending and bare entries are never returned.
    fn get_peers(&mut self, count: Option<usize>) -> Vec<C>;

    /// Send `payload` over every live connection in the view.
    ///
    /// A failing send does not stop delivery to the remaining peers.
    fn broadcast(&self, payload: &[u8]) -> BroadcastReport;
}
