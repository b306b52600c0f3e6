use crate::host::Host;
use crate::node::VNode;
use crate::options::PatchOptions;
use crate::reconcile::reconcile_with;
use crate::{HostError, NodeId};

/// Owns a live container and the tree last committed into it.
///
/// Each [`Root::render`] diffs against the committed tree and, on success,
/// makes the new tree the baseline for the next pass. A failed render keeps
/// the previous baseline; the live tree may then be partially patched.
pub struct Root<H: Host> {
    host: H,
    container: NodeId,
    committed: Option<VNode>,
    options: PatchOptions,
}

impl<H: Host> Root<H> {
    pub fn new(host: H, container: NodeId) -> Self {
        Self::with_options(host, container, PatchOptions::default())
    }

    pub fn with_options(host: H, container: NodeId, options: PatchOptions) -> Self {
        Self {
            host,
            container,
            committed: None,
            options,
        }
    }

    pub fn render(&mut self, tree: VNode) -> Result<(), HostError> {
        reconcile_with(
            &mut self.host,
            self.container,
            Some(&tree),
            self.committed.as_ref(),
            0,
            &self.options,
        )?;
        log::debug!(
            "committed <{}> into container {}",
            tree.kind().unwrap_or("text"),
            self.container
        );
        self.committed = Some(tree);
        Ok(())
    }

    /// Removes the committed tree from the container.
    pub fn unmount(&mut self) -> Result<(), HostError> {
        if let Some(old) = self.committed.as_ref() {
            reconcile_with(
                &mut self.host,
                self.container,
                None,
                Some(old),
                0,
                &self.options,
            )?;
            self.committed = None;
            log::debug!("unmounted container {}", self.container);
        }
        Ok(())
    }

    pub fn committed(&self) -> Option<&VNode> {
        self.committed.as_ref()
    }

    /// Live node materialized for the committed tree.
    pub fn live_root(&self) -> Result<Option<NodeId>, HostError> {
        if self.committed.is_none() {
            return Ok(None);
        }
        self.host.child_at(self.container, 0).map(Some)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
