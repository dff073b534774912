//! Stripping entries down to their wire form and (de)serialising views.

use crate::domain::{CodecError, Descriptor, Node};

/// Drop connection handles, keeping `{address, age}`.
pub fn clean<C>(view: &[Node<C>]) -> Vec<Descriptor> {
    view.iter().map(Node::descriptor).collect()
}

/// Serialise a view payload as a JSON array of `{address, age}`.
pub fn stringify(view: &[Descriptor]) -> String {
    // A Vec of plain structs with string keys always serialises.
    serde_json::to_string(view).unwrap_or_else(|_| String::from("[]"))
}

/// Parse a JSON view payload.
pub fn parse(payload: &str) -> Result<Vec<Descriptor>, CodecError> {
    Ok(serde_json::from_str(payload)?)
}
