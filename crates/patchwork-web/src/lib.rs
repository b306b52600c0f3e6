//! Browser DOM host for Patchwork.
//!
//! [`DomHost`] implements [`patchwork_core::Host`] on top of `web-sys`, so the
//! same [`Root`] and reconciler that drive the in-memory host drive a real
//! document. Listeners are bound as JS closures and dropped together with the
//! node that owns them.

mod dom;
mod error;

pub use dom::DomHost;
pub use error::WebError;

use patchwork_core::{PatchOptions, Root};

/// Creates a [`DomHost`] for the current document and mounts a [`Root`] on the
/// element with `root_id`, or on a fresh `div#patchwork-root` when `None`.
pub fn mount(root_id: Option<&str>) -> Result<Root<DomHost>, WebError> {
    mount_with(root_id, PatchOptions::default())
}

pub fn mount_with(root_id: Option<&str>, options: PatchOptions) -> Result<Root<DomHost>, WebError> {
    let mut host = DomHost::new()?;
    let container = host.mount(root_id)?;
    log::debug!("mounted patchwork root on node {container}");
    Ok(Root::with_options(host, container, options))
}
