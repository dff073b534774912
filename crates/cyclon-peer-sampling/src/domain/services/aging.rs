//! Age bookkeeping over view entries.

use crate::domain::Aged;

/// Increment every entry's age by one, preserving order.
///
/// Ages saturate instead of wrapping so a very long-lived entry can never
/// look freshly introduced.
pub fn increase_age<T: Aged>(view: Vec<T>) -> Vec<T> {
    view.into_iter()
        .map(|mut entry| {
            let age = entry.age_mut();
            *age = age.saturating_add(1);
            entry
        })
        .collect()
}

/// The entry with the maximum age.
///
/// Ties go to the first such entry in input order. `None` on an empty view.
pub fn oldest<T: Aged>(view: &[T]) -> Option<&T> {
    view.iter().fold(None, |best: Option<&T>, entry| match best {
        Some(current) if current.age() >= entry.age() => Some(current),
        _ => Some(entry),
    })
}

/// Stable sort by ascending age.
pub fn sort_by_age<T: Aged>(mut view: Vec<T>) -> Vec<T> {
    view.sort_by_key(|entry| entry.age());
    view
}
