//! Positional diff and patch.
//!
//! [`reconcile`] walks a new tree and the previously committed one side by
//! side and mutates the live tree in place. Children are matched by index
//! only; a reordered list is patched slot by slot rather than moved.
//!
//! The live child at `index` under `parent` must be the node materialized for
//! `old` by an earlier pass. Nothing checks this; a caller that loses track of
//! its committed tree gets an inconsistent live tree.

use std::fmt;

use crate::host::Host;
use crate::materialize::materialize;
use crate::node::{Element, VNode};
use crate::options::{InsertionMode, PatchOptions};
use crate::props::diff_props;
use crate::{HostError, NodeId};

/// Reconciles with the default [`PatchOptions`].
pub fn reconcile<H: Host + ?Sized>(
    host: &mut H,
    parent: NodeId,
    new: Option<&VNode>,
    old: Option<&VNode>,
    index: usize,
) -> Result<(), HostError> {
    reconcile_with(host, parent, new, old, index, &PatchOptions::default())
}

pub fn reconcile_with<H: Host + ?Sized>(
    host: &mut H,
    parent: NodeId,
    new: Option<&VNode>,
    old: Option<&VNode>,
    index: usize,
    options: &PatchOptions,
) -> Result<(), HostError> {
    let mut patcher = Patcher {
        host,
        options,
        path: TreePath::default(),
    };
    patcher.patch(parent, new, old, index)
}

struct Patcher<'h, 'o, 'v, H: Host + ?Sized> {
    host: &'h mut H,
    options: &'o PatchOptions,
    path: TreePath<'v>,
}

impl<'v, H: Host + ?Sized> Patcher<'_, '_, 'v, H> {
    fn patch(
        &mut self,
        parent: NodeId,
        new: Option<&'v VNode>,
        old: Option<&'v VNode>,
        index: usize,
    ) -> Result<(), HostError> {
        match (new, old) {
            (None, None) => Ok(()),
            (None, Some(_)) => {
                log::trace!("[{}] remove child {index}", self.path);
                self.host.remove_child_at(parent, index)
            }
            (Some(new), None) => self.insert(parent, new, index),
            (Some(new), Some(old)) => match (new, old) {
                (VNode::Element(new_element), VNode::Element(old_element))
                    if new_element.kind() == old_element.kind() =>
                {
                    self.update(parent, new_element, old_element, index)
                }
                (VNode::Element(new_element), VNode::Element(old_element)) => {
                    log::trace!(
                        "[{}] kind change <{}> -> <{}> at {index}",
                        self.path,
                        old_element.kind(),
                        new_element.kind()
                    );
                    self.replace(parent, index, new)
                }
                _ if new == old => {
                    log::trace!("[{}] text unchanged at {index}", self.path);
                    Ok(())
                }
                _ => {
                    log::trace!("[{}] text change at {index}: {old:?} -> {new:?}", self.path);
                    self.replace(parent, index, new)
                }
            },
        }
    }

    fn insert(&mut self, parent: NodeId, new: &VNode, index: usize) -> Result<(), HostError> {
        log::trace!(
            "[{}] insert <{}> at {index}",
            self.path,
            new.kind().unwrap_or("text")
        );
        let child = materialize(&mut *self.host, new)?;
        match self.options.insertion {
            InsertionMode::Append => self.host.append_child(parent, child),
            InsertionMode::Positional => {
                if index >= self.host.child_count(parent)? {
                    self.host.append_child(parent, child)
                } else {
                    self.host.insert_child_at(parent, index, child)
                }
            }
        }
    }

    fn replace(&mut self, parent: NodeId, index: usize, new: &VNode) -> Result<(), HostError> {
        let child = materialize(&mut *self.host, new)?;
        self.host.replace_child_at(parent, index, child)
    }

    fn update(
        &mut self,
        parent: NodeId,
        new: &'v Element,
        old: &'v Element,
        index: usize,
    ) -> Result<(), HostError> {
        let live = self.host.child_at(parent, index)?;
        diff_props(&mut *self.host, live, new.props(), old.props())?;

        let new_children = new.children();
        let old_children = old.children();
        let shared = new_children.len().min(old_children.len());

        for i in 0..shared {
            self.path.push(new.kind(), i);
            let result = self.patch(live, Some(&new_children[i]), Some(&old_children[i]), i);
            self.path.pop();
            result?;
        }
        for (i, child) in new_children.iter().enumerate().skip(shared) {
            self.path.push(new.kind(), i);
            let result = self.patch(live, Some(child), None, i);
            self.path.pop();
            result?;
        }
        // Trailing removals run back to front so each index is still live.
        for i in (shared..old_children.len()).rev() {
            self.path.push(new.kind(), i);
            let result = self.patch(live, None, Some(&old_children[i]), i);
            self.path.pop();
            result?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct TreePath<'v> {
    segments: Vec<(&'v str, usize)>,
}

impl<'v> TreePath<'v> {
    fn push(&mut self, kind: &'v str, index: usize) {
        self.segments.push((kind, index));
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for TreePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for (kind, index) in &self.segments {
            write!(f, " -> {kind}[{index}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
