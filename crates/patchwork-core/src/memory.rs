//! In-memory live tree.
//!
//! [`MemoryHost`] stores nodes in an arena indexed by [`NodeId`]. Removing a
//! child frees its whole subtree; ids are never reused.

use indexmap::IndexMap;

use crate::collections::map::HashMap;
use crate::host::{Host, LiveProperty, LivePropertyKind};
use crate::props::{Event, EventHandler};
use crate::{HostError, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug)]
struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    value: String,
    checked: bool,
    listeners: HashMap<String, Vec<EventHandler>>,
    children: Vec<NodeId>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            attributes: IndexMap::new(),
            value: String::new(),
            checked: false,
            listeners: HashMap::new(),
            children: Vec::new(),
        }
    }

    fn supports(&self, kind: LivePropertyKind) -> bool {
        match kind {
            LivePropertyKind::Value => {
                self.tag.eq_ignore_ascii_case("input") || self.tag.eq_ignore_ascii_case("textarea")
            }
            LivePropertyKind::Checked => self.tag.eq_ignore_ascii_case("input"),
        }
    }
}

#[derive(Debug)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct HostNode {
    parent: Option<NodeId>,
    data: NodeData,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<Option<HostNode>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(Some(_)))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|node| node.parent)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|element| element.tag.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .ok()?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.element(id)
            .map(|element| {
                element
                    .attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Live `value` property, for elements that carry one.
    pub fn property_value(&self, id: NodeId) -> Option<&str> {
        let element = self.element(id).ok()?;
        element
            .supports(LivePropertyKind::Value)
            .then_some(element.value.as_str())
    }

    pub fn checked(&self, id: NodeId) -> Option<bool> {
        let element = self.element(id).ok()?;
        element
            .supports(LivePropertyKind::Checked)
            .then_some(element.checked)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.element(id)
            .ok()
            .and_then(|element| element.listeners.get(event))
            .map_or(0, Vec::len)
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.collect_text(id, &mut output);
        output
    }

    fn collect_text(&self, id: NodeId, output: &mut String) {
        match self.node(id).map(|node| &node.data) {
            Ok(NodeData::Text(text)) => output.push_str(text),
            Ok(NodeData::Element(element)) => {
                for child in &element.children {
                    self.collect_text(*child, output);
                }
            }
            Err(_) => {}
        }
    }

    /// First node in `root`'s subtree (depth first, `root` included) whose
    /// attribute `name` equals `value`.
    pub fn find_by_attribute(&self, root: NodeId, name: &str, value: &str) -> Option<NodeId> {
        if self.attribute(root, name) == Some(value) {
            return Some(root);
        }
        self.children(root)
            .iter()
            .find_map(|child| self.find_by_attribute(*child, name, value))
    }

    /// Runs the handlers bound for `event.kind` on the target and then on each
    /// ancestor. Returns how many handlers ran.
    pub fn dispatch(&self, event: &Event) -> Result<usize, HostError> {
        self.node(event.target)?;
        let mut handlers = Vec::new();
        let mut current = Some(event.target);
        while let Some(id) = current {
            let node = self.node(id)?;
            if let NodeData::Element(element) = &node.data {
                if let Some(bound) = element.listeners.get(&event.kind) {
                    handlers.extend(bound.iter().cloned());
                }
            }
            current = node.parent;
        }
        log::trace!(
            "dispatch `{}` on node {} to {} handler(s)",
            event.kind,
            event.target,
            handlers.len()
        );
        for handler in &handlers {
            handler.call(event);
        }
        Ok(handlers.len())
    }

    /// Simulates a user edit: sets the live value and fires `input`.
    pub fn type_into(&mut self, id: NodeId, text: &str) -> Result<usize, HostError> {
        self.set_property(id, LiveProperty::Value(text))?;
        self.dispatch(&Event::new("input", id).with_value(text))
    }

    /// Simulates a click on a checkbox: flips `checked` and fires `change`.
    pub fn toggle(&mut self, id: NodeId) -> Result<usize, HostError> {
        let checked = !self.checked(id).unwrap_or(false);
        self.set_property(id, LiveProperty::Checked(checked))?;
        self.dispatch(&Event::new("change", id).with_checked(checked))
    }

    /// Serializes the subtree at `id` as HTML. Live properties are not
    /// reflected, only attributes.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.write_html(id, &mut output);
        output
    }

    fn write_html(&self, id: NodeId, output: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => output.push_str(&escape_text(text)),
            NodeData::Element(element) => {
                output.push('<');
                output.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    if value.is_empty() {
                        output.push_str(&format!(" {name}"));
                    } else {
                        output.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
                    }
                }
                output.push('>');
                if VOID_ELEMENTS.contains(&element.tag.to_ascii_lowercase().as_str()) {
                    return;
                }
                for child in &element.children {
                    self.write_html(*child, output);
                }
                output.push_str(&format!("</{}>", element.tag));
            }
        }
    }

    pub fn dump_tree(&self, root: Option<NodeId>) -> String {
        let mut output = String::new();
        if let Some(root_id) = root {
            self.dump_node(&mut output, root_id, 0);
        } else {
            output.push_str("(no root)\n");
        }
        output
    }

    fn dump_node(&self, output: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.node(id).map(|node| &node.data) {
            Ok(NodeData::Text(text)) => {
                output.push_str(&format!("{indent}[{id}] {text:?}\n"));
            }
            Ok(NodeData::Element(element)) => {
                output.push_str(&format!("{indent}[{id}] <{}>", element.tag));
                for (name, value) in &element.attributes {
                    output.push_str(&format!(" {name}={value:?}"));
                }
                output.push('\n');
                for child in &element.children {
                    self.dump_node(output, *child, depth + 1);
                }
            }
            Err(_) => output.push_str(&format!("{indent}[{id}] (missing)\n")),
        }
    }

    fn node(&self, id: NodeId) -> Result<&HostNode, HostError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(HostError::Missing { id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut HostNode, HostError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(HostError::Missing { id })
    }

    fn element(&self, id: NodeId) -> Result<&ElementData, HostError> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Ok(element),
            NodeData::Text(_) => Err(HostError::NotAnElement { id }),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, HostError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => Ok(element),
            NodeData::Text(_) => Err(HostError::NotAnElement { id }),
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(HostNode { parent: None, data }));
        id
    }

    /// Detaches `child` from its current parent, if any.
    fn detach(&mut self, child: NodeId) -> Result<(), HostError> {
        let parent = self.node(child)?.parent;
        if let Some(parent) = parent {
            let element = self.element_mut(parent)?;
            element.children.retain(|id| *id != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }

    /// Checks that `child` can be placed under `parent` and unlinks it from
    /// wherever it currently lives.
    fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.element(parent)?;
        self.node(child)?;
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(HostError::Backend(format!(
                    "node {child} cannot be placed inside its own subtree"
                )));
            }
            cursor = self.node(id)?.parent;
        }
        self.detach(child)
    }

    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.nodes.get_mut(id) else {
            return;
        };
        if let Some(HostNode {
            data: NodeData::Element(element),
            ..
        }) = slot.take()
        {
            for child in element.children {
                self.release(child);
            }
        }
    }
}

impl Host for MemoryHost {
    fn create_element(&mut self, kind: &str) -> Result<NodeId, HostError> {
        let valid = !kind.is_empty()
            && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && kind.starts_with(|c: char| c.is_ascii_alphabetic());
        if !valid {
            return Err(HostError::InvalidKind {
                kind: kind.to_owned(),
            });
        }
        Ok(self.push(NodeData::Element(ElementData::new(kind))))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError> {
        Ok(self.push(NodeData::Text(text.to_owned())))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.element_mut(node)?
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError> {
        self.element_mut(node)?.attributes.shift_remove(name);
        Ok(())
    }

    fn supports_property(&self, node: NodeId, kind: LivePropertyKind) -> Result<bool, HostError> {
        Ok(self.element(node)?.supports(kind))
    }

    fn set_property(&mut self, node: NodeId, property: LiveProperty<'_>) -> Result<(), HostError> {
        let element = self.element_mut(node)?;
        if !element.supports(property.kind()) {
            return Ok(());
        }
        match property {
            LiveProperty::Value(value) => element.value = value.to_owned(),
            LiveProperty::Checked(checked) => element.checked = checked,
        }
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let bound = self
            .element_mut(node)?
            .listeners
            .entry(event.to_owned())
            .or_default();
        if !bound.iter().any(|existing| existing.ptr_eq(&handler)) {
            bound.push(handler);
        }
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let element = self.element_mut(node)?;
        if let Some(bound) = element.listeners.get_mut(event) {
            bound.retain(|existing| !existing.ptr_eq(handler));
            if bound.is_empty() {
                element.listeners.remove(event);
            }
        }
        Ok(())
    }

    fn child_count(&self, parent: NodeId) -> Result<usize, HostError> {
        Ok(self.element(parent)?.children.len())
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, HostError> {
        self.element(parent)?
            .children
            .get(index)
            .copied()
            .ok_or(HostError::MissingChild { parent, index })
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.adopt(parent, child)?;
        self.element_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError> {
        self.adopt(parent, child)?;
        let children = &mut self.element_mut(parent)?.children;
        if index > children.len() {
            return Err(HostError::MissingChild { parent, index });
        }
        children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<(), HostError> {
        let children = &mut self.element_mut(parent)?.children;
        if index >= children.len() {
            return Err(HostError::MissingChild { parent, index });
        }
        let removed = children.remove(index);
        self.release(removed);
        Ok(())
    }

    fn replace_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError> {
        self.adopt(parent, child)?;
        let children = &mut self.element_mut(parent)?.children;
        let Some(slot) = children.get_mut(index) else {
            return Err(HostError::MissingChild { parent, index });
        };
        let displaced = std::mem::replace(slot, child);
        self.node_mut(child)?.parent = Some(parent);
        self.release(displaced);
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
