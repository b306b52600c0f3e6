//! Ties a [`Store`] to a view function and a [`Root`].
//!
//! The shell renders once on construction and afterwards only when the store
//! has notified since the last pass. Event handlers inside the view typically
//! hold a clone of the store and call [`Store::set`]; the embedder then calls
//! [`AppShell::update`] once the event has been delivered.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use patchwork_core::{Host, HostError, NodeId, PatchOptions, Root, Store, Subscription, VNode};

type View<S> = Box<dyn Fn(&S) -> VNode>;

pub struct AppShell<H: Host, S> {
    root: Root<H>,
    store: Store<S>,
    view: View<S>,
    dirty: Rc<Cell<bool>>,
    renders: usize,
    _subscription: Subscription,
}

impl<H: Host, S: Clone + 'static> AppShell<H, S> {
    pub fn new(
        host: H,
        container: NodeId,
        store: Store<S>,
        view: impl Fn(&S) -> VNode + 'static,
    ) -> Result<Self, HostError> {
        Self::with_options(host, container, store, PatchOptions::default(), view)
    }

    pub fn with_options(
        host: H,
        container: NodeId,
        store: Store<S>,
        options: PatchOptions,
        view: impl Fn(&S) -> VNode + 'static,
    ) -> Result<Self, HostError> {
        let dirty = Rc::new(Cell::new(false));
        let subscription = {
            let dirty = Rc::clone(&dirty);
            store.subscribe(move |_| dirty.set(true))
        };
        let mut shell = Self {
            root: Root::with_options(host, container, options),
            store,
            view: Box::new(view),
            dirty,
            renders: 0,
            _subscription: subscription,
        };
        shell.render()?;
        Ok(shell)
    }

    /// Whether the store changed since the last render.
    pub fn should_render(&self) -> bool {
        self.dirty.get()
    }

    /// Re-renders if the store changed. Returns whether a render ran.
    pub fn update(&mut self) -> Result<bool, HostError> {
        if !self.dirty.get() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Unconditionally rebuilds the view and reconciles it.
    pub fn render(&mut self) -> Result<(), HostError> {
        self.dirty.set(false);
        let state = self.store.get();
        let tree = (self.view)(&state);
        if let Err(err) = self.root.render(tree) {
            log::error!("render failed: {err}");
            return Err(err);
        }
        self.renders += 1;
        log::debug!("render #{} committed", self.renders);
        Ok(())
    }

    /// Number of successful renders so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn root(&self) -> &Root<H> {
        &self.root
    }

    pub fn host(&self) -> &H {
        self.root.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.root.host_mut()
    }

    pub fn live_root(&self) -> Result<Option<NodeId>, HostError> {
        self.root.live_root()
    }

    /// Tears the view down, leaving the container empty.
    pub fn unmount(mut self) -> Result<H, HostError> {
        self.root.unmount()?;
        Ok(self.root.into_host())
    }
}

impl<H: Host, S> fmt::Debug for AppShell<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppShell")
            .field("container", &self.root.container())
            .field("dirty", &self.dirty.get())
            .field("renders", &self.renders)
            .finish()
    }
}
