//! Active and passive shuffle roles.

use super::CyclonNode;
use crate::domain::{
    exclude, increase_age, merge, oldest, sample_all, sample_excluding, Address, CyclonError,
    Descriptor, PendingRound, ProtocolMessage,
};
use crate::ports::{Connection, Transport};
use rand::Rng;
use tracing::{debug, warn};

/// What a timer tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShuffleTick {
    /// A SHUFFLE was sent to `target`; the node now awaits its response.
    Started { target: Address },
    /// A round is already outstanding; this tick was suppressed.
    SkippedInFlight,
    /// Nothing to shuffle with (isolated node).
    EmptyView,
    /// The oldest entry could not be reached; no round is outstanding.
    Abandoned { target: Address },
}

impl<T: Transport, R: Rng> CyclonNode<T, R> {
    /// Active role, run once per `delta_t`.
    ///
    /// Ages the view, picks the oldest entry `Q`, and sends it `l - 1`
    /// random other entries plus a fresh entry for ourselves.
    pub fn shuffle(&mut self) -> ShuffleTick {
        if !self.round.is_idle() {
            self.stats.rounds_skipped += 1;
            debug!(address = %self.address, "Shuffle round still outstanding, skipping tick");
            return ShuffleTick::SkippedInFlight;
        }
        if self.view.is_empty() {
            return ShuffleTick::EmptyView;
        }

        self.view.update(increase_age);

        let Some(target) = oldest(self.view.entries()).cloned() else {
            return ShuffleTick::EmptyView;
        };

        let mut subset = sample_excluding(
            &mut self.rng,
            &self.view.descriptors(),
            &[&target.address],
            self.config.shuffle_length - 1,
        );
        subset.push(Descriptor::fresh(self.address.clone()));

        let Some(link) = target.link else {
            self.stats.rounds_abandoned += 1;
            warn!(peer = %target.address, "Oldest entry has no connection, abandoning round");
            return ShuffleTick::Abandoned {
                target: target.address,
            };
        };

        let frame = ProtocolMessage::Shuffle {
            view: subset.clone(),
            sender: self.address.clone(),
        }
        .encode();
        // A still-pending target that rejects sends stays the oldest entry, so
        // every tick abandons against it until its connection outcome arrives.
        if let Err(error) = link.connection.send(&frame) {
            self.stats.rounds_abandoned += 1;
            warn!(peer = %target.address, %error, "SHUFFLE send failed, abandoning round");
            return ShuffleTick::Abandoned {
                target: target.address,
            };
        }

        debug!(
            peer = %target.address,
            age = target.age,
            sent = subset.len(),
            "Shuffle round started"
        );
        self.round.begin(target.address.clone(), subset);
        self.stats.rounds_started += 1;
        ShuffleTick::Started {
            target: target.address,
        }
    }

    /// Passive role: answer a SHUFFLE from `from` and merge its subset.
    ///
    /// Independent of any outstanding active round.
    pub fn on_shuffle(&mut self, from: &T::Connection, received: Vec<Descriptor>) {
        let response = sample_all(
            &mut self.rng,
            &self.view.descriptors(),
            self.config.shuffle_length,
        );
        let frame = ProtocolMessage::ShuffleResponse {
            view: response.clone(),
            sender: self.address.clone(),
        }
        .encode();

        // Entries only count as given away if the response actually left.
        let sent = match from.send(&frame) {
            Ok(()) => response,
            Err(error) => {
                warn!(peer = %from.remote_address(), %error, "SHUFFLE_RESPONSE send failed");
                Vec::new()
            }
        };

        self.stats.passive_shuffles += 1;
        debug!(
            peer = %from.remote_address(),
            received = received.len(),
            sent = sent.len(),
            "Answered shuffle request"
        );

        let outcome = merge(
            self.view.entries(),
            &received,
            &sent,
            self.config.view_capacity,
            &self.address,
        );
        self.reconcile(outcome, from);
    }

    /// Complete the outstanding active round with `from`'s response.
    ///
    /// # Errors
    ///
    /// `CyclonError::OutOfOrderResponse` if no round is outstanding. No
    /// recovery is attempted; the view is left untouched.
    pub fn on_shuffle_response(
        &mut self,
        from: &T::Connection,
        received: Vec<Descriptor>,
    ) -> Result<(), CyclonError> {
        let Some(round) = self.round.complete() else {
            return Err(CyclonError::OutOfOrderResponse {
                from: from.remote_address().clone(),
            });
        };

        if &round.target != from.remote_address() {
            warn!(
                expected = %round.target,
                peer = %from.remote_address(),
                "SHUFFLE_RESPONSE from a peer other than the round target"
            );
        }

        let own = [&self.address];
        let sent = exclude(&round.sent, &own);
        let received = exclude(&exclude(&received, &own), self.view.entries());

        let outcome = merge(
            self.view.entries(),
            &received,
            &sent,
            self.config.view_capacity,
            &self.address,
        );
        self.stats.rounds_completed += 1;
        debug!(
            peer = %from.remote_address(),
            received = received.len(),
            removed = outcome.removed.len(),
            "Shuffle round completed"
        );
        self.reconcile(outcome, from);
        Ok(())
    }

    /// Drop the outstanding round without waiting for its response.
    pub fn cancel_round(&mut self) -> Option<PendingRound> {
        let round = self.round.complete();
        if let Some(round) = &round {
            debug!(peer = %round.target, "Shuffle round cancelled");
        }
        round
    }
}
