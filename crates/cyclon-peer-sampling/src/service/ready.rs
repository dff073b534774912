//! Readiness observers.

use crate::ports::ReadyCallback;

/// One-shot observer registry for the node's readiness.
///
/// Callbacks registered before readiness are queued and fired once, in
/// registration order; callbacks registered afterwards fire immediately.
#[derive(Default)]
pub struct ReadyCallbacks {
    fired: bool,
    queue: Vec<ReadyCallback>,
}

impl ReadyCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether readiness has been signalled.
    pub fn is_fired(&self) -> bool {
        self.fired
    }

    /// Register a callback, running it now if already fired.
    pub fn register(&mut self, callback: ReadyCallback) {
        if self.fired {
            callback();
        } else {
            self.queue.push(callback);
        }
    }

    /// Signal readiness. Only the first call has any effect.
    pub fn fire(&mut self) {
        if self.fired {
            return;
        }
        self.fired = true;
        for callback in self.queue.drain(..) {
            callback();
        }
    }
}

impl std::fmt::Debug for ReadyCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyCallbacks")
            .field("fired", &self.fired)
            .field("queued", &self.queue.len())
            .finish()
    }
}
