use patchwork_core::{
    EventHandler, Host, HostError, LiveProperty, LivePropertyKind, MemoryHost, NodeId,
};

/// One live-tree call observed by a [`RecordingHost`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    CreateElement { id: NodeId, kind: String },
    CreateText { id: NodeId, text: String },
    SetAttribute { node: NodeId, name: String, value: String },
    RemoveAttribute { node: NodeId, name: String },
    SetValue { node: NodeId, value: String },
    SetChecked { node: NodeId, checked: bool },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    AppendChild { parent: NodeId, child: NodeId },
    InsertChild { parent: NodeId, index: usize, child: NodeId },
    RemoveChild { parent: NodeId, index: usize },
    ReplaceChild { parent: NodeId, index: usize, child: NodeId },
}

impl Mutation {
    /// Node the mutation acts on (the parent, for child-list changes).
    pub fn target(&self) -> NodeId {
        match self {
            Mutation::CreateElement { id, .. } | Mutation::CreateText { id, .. } => *id,
            Mutation::SetAttribute { node, .. }
            | Mutation::RemoveAttribute { node, .. }
            | Mutation::SetValue { node, .. }
            | Mutation::SetChecked { node, .. }
            | Mutation::AddListener { node, .. }
            | Mutation::RemoveListener { node, .. } => *node,
            Mutation::AppendChild { parent, .. }
            | Mutation::InsertChild { parent, .. }
            | Mutation::RemoveChild { parent, .. }
            | Mutation::ReplaceChild { parent, .. } => *parent,
        }
    }

    /// Whether this changes a child list rather than a single node.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::AppendChild { .. }
                | Mutation::InsertChild { .. }
                | Mutation::RemoveChild { .. }
                | Mutation::ReplaceChild { .. }
        )
    }
}

/// [`Host`] wrapper that forwards to `inner` and logs every mutating call.
/// Calls that fail in `inner` are not logged.
#[derive(Debug, Default)]
pub struct RecordingHost<H = MemoryHost> {
    inner: H,
    log: Vec<Mutation>,
}

impl<H: Host> RecordingHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    /// Drains the recorded mutations.
    pub fn take(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.log)
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    fn record<T>(
        &mut self,
        result: Result<T, HostError>,
        mutation: Mutation,
    ) -> Result<T, HostError> {
        if result.is_ok() {
            log::trace!("recorded {mutation:?}");
            self.log.push(mutation);
        }
        result
    }
}

impl<H: Host> Host for RecordingHost<H> {
    fn create_element(&mut self, kind: &str) -> Result<NodeId, HostError> {
        let id = self.inner.create_element(kind)?;
        self.log.push(Mutation::CreateElement {
            id,
            kind: kind.to_owned(),
        });
        Ok(id)
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError> {
        let id = self.inner.create_text(text)?;
        self.log.push(Mutation::CreateText {
            id,
            text: text.to_owned(),
        });
        Ok(id)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        let result = self.inner.set_attribute(node, name, value);
        self.record(
            result,
            Mutation::SetAttribute {
                node,
                name: name.to_owned(),
                value: value.to_owned(),
            },
        )
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError> {
        let result = self.inner.remove_attribute(node, name);
        self.record(
            result,
            Mutation::RemoveAttribute {
                node,
                name: name.to_owned(),
            },
        )
    }

    fn supports_property(&self, node: NodeId, kind: LivePropertyKind) -> Result<bool, HostError> {
        self.inner.supports_property(node, kind)
    }

    fn set_property(&mut self, node: NodeId, property: LiveProperty<'_>) -> Result<(), HostError> {
        let result = self.inner.set_property(node, property);
        let mutation = match property {
            LiveProperty::Value(value) => Mutation::SetValue {
                node,
                value: value.to_owned(),
            },
            LiveProperty::Checked(checked) => Mutation::SetChecked { node, checked },
        };
        self.record(result, mutation)
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let result = self.inner.add_event_listener(node, event, handler);
        self.record(
            result,
            Mutation::AddListener {
                node,
                event: event.to_owned(),
            },
        )
    }

    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let result = self.inner.remove_event_listener(node, event, handler);
        self.record(
            result,
            Mutation::RemoveListener {
                node,
                event: event.to_owned(),
            },
        )
    }

    fn child_count(&self, parent: NodeId) -> Result<usize, HostError> {
        self.inner.child_count(parent)
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, HostError> {
        self.inner.child_at(parent, index)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let result = self.inner.append_child(parent, child);
        self.record(result, Mutation::AppendChild { parent, child })
    }

    fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError> {
        let result = self.inner.insert_child_at(parent, index, child);
        self.record(
            result,
            Mutation::InsertChild {
                parent,
                index,
                child,
            },
        )
    }

    fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<(), HostError> {
        let result = self.inner.remove_child_at(parent, index);
        self.record(result, Mutation::RemoveChild { parent, index })
    }

    fn replace_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError> {
        let result = self.inner.replace_child_at(parent, index, child);
        self.record(
            result,
            Mutation::ReplaceChild {
                parent,
                index,
                child,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_successful_calls_only() {
        let mut host = RecordingHost::new(MemoryHost::new());
        let div = host.create_element("div").unwrap();
        host.set_attribute(div, "id", "x").unwrap();
        assert!(host.remove_child_at(div, 0).is_err());

        assert_eq!(
            host.take(),
            vec![
                Mutation::CreateElement {
                    id: div,
                    kind: "div".into()
                },
                Mutation::SetAttribute {
                    node: div,
                    name: "id".into(),
                    value: "x".into()
                },
            ]
        );
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn classifies_mutations() {
        let append = Mutation::AppendChild {
            parent: 1,
            child: 2,
        };
        let attr = Mutation::RemoveAttribute {
            node: 3,
            name: "hidden".into(),
        };
        assert!(append.is_structural());
        assert_eq!(append.target(), 1);
        assert!(!attr.is_structural());
        assert_eq!(attr.target(), 3);
    }
}
