#![doc = r"Virtual node tree, materializer and positional reconciler for Patchwork."]

extern crate self as patchwork_core;

pub mod collections;
pub mod host;
pub mod materialize;
pub mod memory;
pub mod node;
pub mod options;
pub mod props;
pub mod reconcile;
pub mod root;
pub mod store;

pub use host::{Host, LiveProperty, LivePropertyKind};
pub use materialize::materialize;
pub use memory::MemoryHost;
pub use node::{h, text, Child, Element, VNode};
pub use options::{InsertionMode, PatchOptions};
pub use props::{apply_prop, diff_props, on, Event, EventHandler, PropValue, Props};
pub use reconcile::{reconcile, reconcile_with};
pub use root::Root;
pub use store::{Store, Subscription};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    Missing { id: NodeId },
    MissingChild { parent: NodeId, index: usize },
    NotAnElement { id: NodeId },
    InvalidKind { kind: String },
    Backend(String),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::Missing { id } => write!(f, "node {id} missing"),
            HostError::MissingChild { parent, index } => {
                write!(f, "node {parent} has no child at index {index}")
            }
            HostError::NotAnElement { id } => write!(f, "node {id} is not an element"),
            HostError::InvalidKind { kind } => write!(f, "invalid element kind `{kind}`"),
            HostError::Backend(msg) => write!(f, "host backend error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
