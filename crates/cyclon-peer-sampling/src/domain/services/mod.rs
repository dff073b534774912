//! Domain Services - the View Algebra
//!
//! All functions in this module are pure (no I/O, no state mutation of
//! their inputs) and, apart from the injected RNG, deterministic.

// Semantic submodules
mod aging;
mod codec;
mod merge;
mod selection;

// Re-export public API
pub use aging::{increase_age, oldest, sort_by_age};
pub use codec::{clean, parse, stringify};
pub use merge::{merge, MergeOutcome};
pub use selection::{exclude, sample_all, sample_excluding};
