use crate::host::Host;
use crate::node::VNode;
use crate::props::apply_prop;
use crate::{HostError, NodeId};

/// Builds a fresh live subtree for `node` and returns its root.
///
/// Props are applied before children are appended. Existing live nodes are
/// never reused.
pub fn materialize<H: Host + ?Sized>(host: &mut H, node: &VNode) -> Result<NodeId, HostError> {
    match node {
        VNode::Text(text) => host.create_text(text),
        VNode::Element(element) => {
            let id = host.create_element(element.kind())?;
            for (name, value) in element.props().iter() {
                apply_prop(host, id, name, Some(value), None)?;
            }
            for child in element.children() {
                let child_id = materialize(host, child)?;
                host.append_child(id, child_id)?;
            }
            Ok(id)
        }
    }
}
