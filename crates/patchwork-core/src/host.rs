//! Capability interface over a live UI tree.
//!
//! The materializer and reconciler only ever talk to the live tree through
//! [`Host`], so the same diffing code drives the browser DOM, the in-memory
//! tree used by tests and anything else that can implement these calls.

use crate::props::EventHandler;
use crate::{HostError, NodeId};

/// Live properties that bypass attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LivePropertyKind {
    /// Current text of an input-like element.
    Value,
    /// Checked state of a checkbox-like element.
    Checked,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LiveProperty<'a> {
    Value(&'a str),
    Checked(bool),
}

impl LiveProperty<'_> {
    pub fn kind(&self) -> LivePropertyKind {
        match self {
            LiveProperty::Value(_) => LivePropertyKind::Value,
            LiveProperty::Checked(_) => LivePropertyKind::Checked,
        }
    }
}

pub trait Host {
    fn create_element(&mut self, kind: &str) -> Result<NodeId, HostError>;
    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError>;
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError>;

    /// Whether `node` carries the live property `kind`.
    fn supports_property(&self, node: NodeId, kind: LivePropertyKind) -> Result<bool, HostError>;
    fn set_property(&mut self, node: NodeId, property: LiveProperty<'_>) -> Result<(), HostError>;

    /// Binding a handler that is already bound to `event` is a no-op.
    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError>;
    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    fn child_count(&self, parent: NodeId) -> Result<usize, HostError>;
    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, HostError>;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    /// Inserts before the child currently at `index`, or appends when `index`
    /// equals the child count.
    fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError>;
    /// Detaches and releases the child at `index` with its whole subtree.
    fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<(), HostError>;
    /// Swaps in `child` at `index`, releasing the node it displaces.
    fn replace_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError>;
}
