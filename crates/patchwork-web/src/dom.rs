use patchwork_core::collections::map::HashMap;
use patchwork_core::{Event, EventHandler, Host, HostError, LiveProperty, LivePropertyKind, NodeId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement, Node};

use crate::error::{js_error, WebError};

struct Listener {
    handler: EventHandler,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct DomEntry {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: HashMap<String, Vec<Listener>>,
}

impl DomEntry {
    fn new(node: Node) -> Self {
        Self {
            node,
            parent: None,
            children: Vec::new(),
            listeners: HashMap::new(),
        }
    }
}

/// [`Host`] backed by the browser DOM.
///
/// Node ids index a mirror of the live tree that owns the DOM handles and the
/// JS closures bound as listeners. Releasing a node drops its closures.
pub struct DomHost {
    document: Document,
    nodes: Vec<Option<DomEntry>>,
}

impl DomHost {
    /// Creates a host for the current window's document.
    pub fn new() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document = window.document().ok_or(WebError::DomUnavailable)?;
        Ok(Self::with_document(document))
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            nodes: Vec::new(),
        }
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Registers a container and empties it.
    ///
    /// With `root_id` the container is the element with that id; otherwise a
    /// `div#patchwork-root` is appended to `<body>`.
    pub fn mount(&mut self, root_id: Option<&str>) -> Result<NodeId, WebError> {
        let element = if let Some(id) = root_id {
            self.document
                .get_element_by_id(id)
                .ok_or_else(|| WebError::RootNotFound(id.to_string()))?
        } else {
            let body = self.document.body().ok_or(WebError::DomUnavailable)?;
            let host = self.document.create_element("div")?;
            host.set_id("patchwork-root");
            body.append_child(&host)?;
            host
        };
        while let Some(child) = element.first_child() {
            element.remove_child(&child)?;
        }
        Ok(self.register(element.into()))
    }

    /// DOM node behind `id`, if it is still live.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)?.as_ref().map(|entry| &entry.node)
    }

    fn register(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(DomEntry::new(node)));
        id
    }

    fn entry(&self, id: NodeId) -> Result<&DomEntry, HostError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(HostError::Missing { id })
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut DomEntry, HostError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(HostError::Missing { id })
    }

    fn element(&self, id: NodeId) -> Result<&Element, HostError> {
        self.entry(id)?
            .node
            .dyn_ref::<Element>()
            .ok_or(HostError::NotAnElement { id })
    }

    /// Moves `child` under `parent` in the mirror; the DOM call is the
    /// caller's job.
    fn link(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let previous = self.entry(child)?.parent;
        if let Some(previous) = previous {
            self.entry_mut(previous)?.children.retain(|id| *id != child);
        }
        self.entry_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn release(&mut self, id: NodeId) {
        let Some(entry) = self.nodes.get_mut(id).and_then(Option::take) else {
            return;
        };
        for (event, listeners) in &entry.listeners {
            for listener in listeners {
                let callback = listener.closure.as_ref().unchecked_ref();
                if let Err(err) = entry.node.remove_event_listener_with_callback(event, callback) {
                    log::warn!("failed to unbind `{event}` on released node {id}: {err:?}");
                }
            }
        }
        for child in entry.children {
            self.release(child);
        }
    }
}

impl std::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomHost")
            .field("live_nodes", &self.nodes.iter().filter(|n| n.is_some()).count())
            .finish()
    }
}

fn to_event(event: &web_sys::Event, target: NodeId) -> Event {
    let mut converted = Event::new(event.type_(), target);
    if let Some(source) = event.target() {
        if let Some(input) = source.dyn_ref::<HtmlInputElement>() {
            converted.value = Some(input.value());
            converted.checked = Some(input.checked());
        } else if let Some(area) = source.dyn_ref::<HtmlTextAreaElement>() {
            converted.value = Some(area.value());
        }
    }
    converted
}

impl Host for DomHost {
    fn create_element(&mut self, kind: &str) -> Result<NodeId, HostError> {
        let element = self.document.create_element(kind).map_err(js_error)?;
        Ok(self.register(element.into()))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError> {
        let node = self.document.create_text_node(text);
        Ok(self.register(node.into()))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.element(node)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError> {
        self.element(node)?.remove_attribute(name).map_err(js_error)
    }

    fn supports_property(&self, node: NodeId, kind: LivePropertyKind) -> Result<bool, HostError> {
        let dom = &self.entry(node)?.node;
        Ok(match kind {
            LivePropertyKind::Value => {
                dom.has_type::<HtmlInputElement>() || dom.has_type::<HtmlTextAreaElement>()
            }
            LivePropertyKind::Checked => dom.has_type::<HtmlInputElement>(),
        })
    }

    fn set_property(&mut self, node: NodeId, property: LiveProperty<'_>) -> Result<(), HostError> {
        let dom = &self.entry(node)?.node;
        match property {
            LiveProperty::Value(value) => {
                if let Some(input) = dom.dyn_ref::<HtmlInputElement>() {
                    input.set_value(value);
                } else if let Some(area) = dom.dyn_ref::<HtmlTextAreaElement>() {
                    area.set_value(value);
                }
            }
            LiveProperty::Checked(checked) => {
                if let Some(input) = dom.dyn_ref::<HtmlInputElement>() {
                    input.set_checked(checked);
                }
            }
        }
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let entry = self.entry_mut(node)?;
        let bound = entry.listeners.entry(event.to_owned()).or_default();
        if bound.iter().any(|listener| listener.handler.ptr_eq(&handler)) {
            return Ok(());
        }
        let callback = handler.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            callback.call(&to_event(&event, node));
        });
        entry
            .node
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        bound.push(Listener { handler, closure });
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let entry = self.entry_mut(node)?;
        let Some(bound) = entry.listeners.get_mut(event) else {
            return Ok(());
        };
        if let Some(position) = bound
            .iter()
            .position(|listener| listener.handler.ptr_eq(handler))
        {
            let listener = bound.remove(position);
            let callback = listener.closure.as_ref().unchecked_ref();
            entry
                .node
                .remove_event_listener_with_callback(event, callback)
                .map_err(js_error)?;
        }
        if bound.is_empty() {
            entry.listeners.remove(event);
        }
        Ok(())
    }

    fn child_count(&self, parent: NodeId) -> Result<usize, HostError> {
        Ok(self.entry(parent)?.children.len())
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, HostError> {
        self.entry(parent)?
            .children
            .get(index)
            .copied()
            .ok_or(HostError::MissingChild { parent, index })
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let child_node = self.entry(child)?.node.clone();
        self.element(parent)?
            .append_child(&child_node)
            .map_err(js_error)?;
        self.link(parent, child)?;
        self.entry_mut(parent)?.children.push(child);
        Ok(())
    }

    fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError> {
        let count = self.child_count(parent)?;
        if index == count {
            return self.append_child(parent, child);
        }
        let reference = self.child_at(parent, index)?;
        let reference_node = self.entry(reference)?.node.clone();
        let child_node = self.entry(child)?.node.clone();
        self.element(parent)?
            .insert_before(&child_node, Some(&reference_node))
            .map_err(js_error)?;
        self.link(parent, child)?;
        let children = &mut self.entry_mut(parent)?.children;
        let position = children
            .iter()
            .position(|id| *id == reference)
            .unwrap_or(children.len());
        children.insert(position, child);
        Ok(())
    }

    fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<(), HostError> {
        let removed = self.child_at(parent, index)?;
        let removed_node = self.entry(removed)?.node.clone();
        self.element(parent)?
            .remove_child(&removed_node)
            .map_err(js_error)?;
        self.entry_mut(parent)?.children.remove(index);
        self.release(removed);
        Ok(())
    }

    fn replace_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), HostError> {
        let displaced = self.child_at(parent, index)?;
        let displaced_node = self.entry(displaced)?.node.clone();
        let child_node = self.entry(child)?.node.clone();
        self.element(parent)?
            .replace_child(&child_node, &displaced_node)
            .map_err(js_error)?;
        self.link(parent, child)?;
        let children = &mut self.entry_mut(parent)?.children;
        if let Some(slot) = children.iter_mut().find(|id| **id == displaced) {
            *slot = child;
        }
        self.release(displaced);
        Ok(())
    }
}
