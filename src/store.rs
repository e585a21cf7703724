//! Generic reactive store
//!
//! Holds one typed state value and a list of subscribers that are
//! notified synchronously after every mutation. Handles are cheap
//! `Rc`-backed clones, so the same store can be handed to any number
//! of UI consumers without a process-wide global.
//!
//! Single-threaded by design: there is exactly one logical writer at a
//! time, and every mutation runs to completion (replace state, then
//! notify) before the next one begins. Re-entrant mutation from inside
//! a listener is not supported.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<S> = Box<dyn FnMut(&S)>;

struct StoreInner<S> {
    state: RefCell<S>,
    listeners: RefCell<Vec<(u64, Listener<S>)>>,
    next_listener_id: Cell<u64>,
}

/// A reactive container for a single state value.
///
/// Cloning a `Store` clones the handle, not the state: all clones
/// observe and mutate the same value.
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

impl<S: Clone> Store<S> {
    /// Create a store holding `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current state. Side-effect free.
    pub fn get(&self) -> S {
        self.inner.state.borrow().clone()
    }

    /// Replace the whole state, then notify every subscriber with the
    /// new value.
    pub fn set(&self, next: S) {
        *self.inner.state.borrow_mut() = next;
        self.notify();
    }

    /// Clone the current state, apply `f` to the clone, and [`set`]
    /// the result.
    ///
    /// This is the shallow-merge primitive: a field setter mutates
    /// exactly one field of the clone, leaving the others untouched.
    ///
    /// [`set`]: Store::set
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Register `listener` to be invoked synchronously after every
    /// mutation, with the post-mutation state.
    ///
    /// The listener always observes a fully-applied state: the value it
    /// receives reflects the mutation that triggered it and all prior
    /// mutations, never a partial update. Listeners are invoked in
    /// subscription order.
    pub fn subscribe(&self, listener: impl FnMut(&S) + 'static) -> Subscription<S> {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Box::new(listener)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn notify(&self) {
        let snapshot = self.get();
        let mut listeners = self.inner.listeners.borrow_mut();
        for (_, listener) in listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

/// Handle to a registered listener.
///
/// Holds only a weak reference to the store, so an outstanding
/// subscription never keeps the store alive. Dropping the handle
/// without calling [`unsubscribe`] leaves the listener registered for
/// the lifetime of the store.
///
/// [`unsubscribe`]: Subscription::unsubscribe
pub struct Subscription<S> {
    store: Weak<StoreInner<S>>,
    id: u64,
}

impl<S> Subscription<S> {
    /// Remove the listener. No-op if the store is already gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_initial_state() {
        let store = Store::new(7u32);
        assert_eq!(store.get(), 7);
    }

    #[test]
    fn test_set_replaces_state() {
        let store = Store::new(0u32);
        store.set(42);
        assert_eq!(store.get(), 42);
    }

    #[test]
    fn test_update_mutates_clone() {
        let store = Store::new(vec![1, 2]);
        store.update(|v| v.push(3));
        assert_eq!(store.get(), vec![1, 2, 3]);
    }

    #[test]
    fn test_subscriber_sees_post_mutation_state() {
        let store = Store::new(0u32);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _sub = store.subscribe(move |s| sink.borrow_mut().push(*s));

        store.set(1);
        store.set(2);
        store.update(|s| *s += 10);

        assert_eq!(*seen.borrow(), vec![1, 2, 12]);
    }

    #[test]
    fn test_handles_share_state() {
        let store = Store::new(0u32);
        let other = store.clone();
        other.set(9);
        assert_eq!(store.get(), 9);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = Store::new(0u32);
        let count = Rc::new(Cell::new(0u32));

        let sink = Rc::clone(&count);
        let sub = store.subscribe(move |_| sink.set(sink.get() + 1));

        store.set(1);
        sub.unsubscribe();
        store.set(2);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped_is_noop() {
        let store = Store::new(0u32);
        let sub = store.subscribe(|_| {});
        drop(store);
        sub.unsubscribe();
    }

    #[test]
    fn test_multiple_subscribers_all_notified() {
        let store = Store::new(0u32);
        let a = Rc::new(Cell::new(0u32));
        let b = Rc::new(Cell::new(0u32));

        let sink_a = Rc::clone(&a);
        let sink_b = Rc::clone(&b);
        let _sub_a = store.subscribe(move |s| sink_a.set(*s));
        let _sub_b = store.subscribe(move |s| sink_b.set(*s));

        store.set(5);
        assert_eq!(a.get(), 5);
        assert_eq!(b.get(), 5);
    }
}
