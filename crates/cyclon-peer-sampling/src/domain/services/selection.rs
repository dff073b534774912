//! Exclusion and random sampling.

use crate::domain::{Address, Addressed};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Set difference by address, order preserved.
///
/// `excluded` may hold bare addresses or full entries; only their
/// addresses are compared.
pub fn exclude<T, E>(list: &[T], excluded: &[E]) -> Vec<T>
where
    T: Addressed + Clone,
    E: Addressed,
{
    let lookup: HashSet<&Address> = excluded.iter().map(Addressed::address).collect();
    list.iter()
        .filter(|entry| !lookup.contains(entry.address()))
        .cloned()
        .collect()
}

/// Up to `n` distinct entries drawn uniformly without replacement.
pub fn sample_all<T, R>(rng: &mut R, view: &[T], n: usize) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    view.choose_multiple(rng, n).cloned().collect()
}

/// Up to `n` distinct entries of `view \ excluded`, drawn uniformly.
pub fn sample_excluding<T, E, R>(rng: &mut R, view: &[T], excluded: &[E], n: usize) -> Vec<T>
where
    T: Addressed + Clone,
    E: Addressed,
    R: Rng + ?Sized,
{
    let candidates = exclude(view, excluded);
    sample_all(rng, &candidates, n)
}
