//! Observable application state.
//!
//! A [`Store`] is a cheap, cloneable handle to one state value. Every
//! [`Store::set`] notifies all subscribers synchronously, in subscription
//! order, with the state current at the time of each call. Subscribers and
//! update closures may call back into the store; nested updates notify
//! immediately.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

type Listener<S> = Rc<dyn Fn(&S)>;
type SubscriptionId = u64;

struct StoreInner<S> {
    state: RefCell<S>,
    listeners: RefCell<IndexMap<SubscriptionId, Listener<S>>>,
    next_id: Cell<SubscriptionId>,
}

pub struct Store<S> {
    inner: Rc<StoreInner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("subscribers", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<S: Default + Clone + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Clone + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(initial),
                listeners: RefCell::new(IndexMap::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> S {
        self.inner.state.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Applies `update` to a copy of the state, stores it, then notifies
    /// subscribers. The state is not borrowed while `update` runs.
    pub fn set(&self, update: impl FnOnce(&mut S)) {
        let mut next = self.get();
        update(&mut next);
        self.inner.state.replace(next);
        self.notify();
    }

    /// Swaps in a whole new state and returns the old one.
    pub fn replace(&self, state: S) -> S {
        let previous = self.inner.state.replace(state);
        self.notify();
        previous
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));
        let weak: Weak<StoreInner<S>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().shift_remove(&id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        let listeners: Vec<Listener<S>> =
            self.inner.listeners.borrow().values().cloned().collect();
        log::debug!("store notifying {} subscriber(s)", listeners.len());
        // Each listener sees the state as it is when called, including
        // updates made by listeners ahead of it.
        for listener in listeners {
            let current = self.get();
            listener(&current);
        }
    }
}

/// Handle returned by [`Store::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keeps the listener attached for the store's whole lifetime.
    pub fn forget(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Credentials {
        email: String,
        password: String,
    }

    #[test]
    fn set_merges_and_notifies_in_order() {
        let store = Store::new(Credentials::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let log = log.clone();
            store.subscribe(move |s: &Credentials| log.borrow_mut().push(format!("a:{}", s.email)))
        };
        let second = {
            let log = log.clone();
            store.subscribe(move |s: &Credentials| {
                log.borrow_mut().push(format!("b:{}", s.password.len()))
            })
        };

        store.set(|s| s.email = "me@example.com".into());
        store.set(|s| s.password = "hunter2".into());

        assert_eq!(
            store.get(),
            Credentials {
                email: "me@example.com".into(),
                password: "hunter2".into(),
            }
        );
        assert_eq!(
            *log.borrow(),
            vec![
                "a:me@example.com",
                "b:0",
                "a:me@example.com",
                "b:7"
            ]
        );
        drop((first, second));
    }

    #[test]
    fn dropping_or_unsubscribing_detaches() {
        let store = Store::new(0u32);
        let hits = Rc::new(Cell::new(0));
        let kept = {
            let hits = hits.clone();
            store.subscribe(move |_| hits.set(hits.get() + 1))
        };
        {
            let hits = hits.clone();
            let _dropped = store.subscribe(move |_| hits.set(hits.get() + 100));
        }
        assert_eq!(store.subscriber_count(), 1);

        store.set(|n| *n += 1);
        assert_eq!(hits.get(), 1);

        kept.unsubscribe();
        store.set(|n| *n += 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn forgotten_subscription_stays_attached() {
        let store = Store::new(String::new());
        let seen = Rc::new(RefCell::new(String::new()));
        {
            let seen = seen.clone();
            store
                .subscribe(move |s: &String| *seen.borrow_mut() = s.clone())
                .forget();
        }
        store.replace("posted".to_owned());
        assert_eq!(*seen.borrow(), "posted");
    }

    #[test]
    fn listeners_may_update_the_store() {
        let store = Store::new(0i32);
        let handle = store.clone();
        let sub = store.subscribe(move |n| {
            if *n < 3 {
                handle.set(|n| *n += 1);
            }
        });
        store.set(|n| *n = 1);
        assert_eq!(store.get(), 3);
        sub.unsubscribe();
    }

    #[test]
    fn later_listeners_see_updates_from_earlier_ones() {
        let store = Store::new(0i32);
        let handle = store.clone();
        let bumper = store.subscribe(move |n| {
            if *n == 1 {
                handle.set(|n| *n = 2);
            }
        });
        let last_seen = Rc::new(Cell::new(0));
        let observer = {
            let last_seen = last_seen.clone();
            store.subscribe(move |n| last_seen.set(*n))
        };

        store.set(|n| *n = 1);

        assert_eq!(store.get(), 2);
        assert_eq!(last_seen.get(), 2);
        drop((bumper, observer));
    }

    #[test]
    fn update_closure_may_read_and_write_the_store() {
        let store = Store::new(1i32);
        let handle = store.clone();
        store.set(|n| *n = handle.get() + 1);
        assert_eq!(store.get(), 2);

        let nested = store.clone();
        store.set(|n| {
            nested.set(|inner| *inner = 10);
            *n += nested.with(|inner| *inner);
        });
        assert_eq!(store.get(), 12);
    }
}
