use patchwork_core::{reconcile_with, Host, HostError, MemoryHost, NodeId, PatchOptions, VNode};

use crate::recording::{Mutation, RecordingHost};

/// Mounts trees into a recording in-memory host and hands back the mutations
/// each pass produced.
#[derive(Debug)]
pub struct PatchHarness {
    host: RecordingHost<MemoryHost>,
    container: NodeId,
    committed: Option<VNode>,
    options: PatchOptions,
}

impl Default for PatchHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchHarness {
    pub fn new() -> Self {
        Self::with_options(PatchOptions::default())
    }

    pub fn with_options(options: PatchOptions) -> Self {
        let mut host = RecordingHost::new(MemoryHost::new());
        let container = match host.create_element("div") {
            Ok(id) => id,
            Err(err) => panic!("harness container: {err}"),
        };
        host.clear();
        Self {
            host,
            container,
            committed: None,
            options,
        }
    }

    /// Reconciles `tree` against the last committed tree and returns the
    /// mutations it caused.
    pub fn patch(&mut self, tree: VNode) -> Result<Vec<Mutation>, HostError> {
        self.host.clear();
        reconcile_with(
            &mut self.host,
            self.container,
            Some(&tree),
            self.committed.as_ref(),
            0,
            &self.options,
        )?;
        self.committed = Some(tree);
        Ok(self.host.take())
    }

    /// Removes the committed tree and returns the mutations.
    pub fn clear(&mut self) -> Result<Vec<Mutation>, HostError> {
        self.host.clear();
        if let Some(old) = self.committed.take() {
            reconcile_with(
                &mut self.host,
                self.container,
                None,
                Some(&old),
                0,
                &self.options,
            )?;
        }
        Ok(self.host.take())
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn live_root(&self) -> Option<NodeId> {
        self.host.child_at(self.container, 0).ok()
    }

    pub fn host(&self) -> &MemoryHost {
        self.host.inner()
    }

    pub fn host_mut(&mut self) -> &mut MemoryHost {
        self.host.inner_mut()
    }

    /// HTML of the committed tree, or an empty string before the first patch.
    pub fn html(&self) -> String {
        self.live_root()
            .map(|root| self.host().to_html(root))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_core::{h, props};

    #[test]
    fn first_patch_builds_then_second_is_quiet() {
        let mut harness = PatchHarness::new();
        let tree = h!("p", props! { "id" => "x" }, "hi");

        let first = harness.patch(tree.clone()).unwrap();
        let container = harness.container();
        assert!(first
            .iter()
            .any(|m| matches!(m, Mutation::AppendChild { parent, .. } if *parent == container)));
        assert_eq!(harness.html(), "<p id=\"x\">hi</p>");

        assert!(harness.patch(tree).unwrap().is_empty());
    }

    #[test]
    fn clear_removes_root() {
        let mut harness = PatchHarness::new();
        harness.patch(h!("p", None)).unwrap();
        let removed = harness.clear().unwrap();
        assert_eq!(
            removed,
            vec![Mutation::RemoveChild {
                parent: harness.container(),
                index: 0
            }]
        );
        assert_eq!(harness.html(), "");
    }
}
