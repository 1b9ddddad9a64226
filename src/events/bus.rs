//! Generic synchronous publish/subscribe channel.
//!
//! A bus fans each published event out to its current subscribers in
//! subscription order. There is no buffering: a listener added after a
//! publish never sees that event. A panicking listener is caught and logged
//! and the remaining listeners still run.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::warn;

type Listener<E> = Rc<dyn Fn(&E)>;

struct BusInner<E> {
    name: &'static str,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener<E>)>>,
}

/// A typed channel. Cloning yields another handle to the same channel.
pub struct EventBus<E> {
    inner: Rc<BusInner<E>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> EventBus<E> {
    /// Create a bus. `name` only appears in logs.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Rc::new(BusInner {
                name,
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Add a listener. Keep the returned handle to remove it later.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<BusInner<E>> = Rc::downgrade(&self.inner);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.borrow_mut().retain(|(i, _)| *i != id);
                }
            })),
        }
    }

    /// Deliver an event to every current listener.
    ///
    /// Returns how many listeners ran to completion.
    pub fn publish(&self, event: &E) -> usize {
        let listeners: Vec<Listener<E>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();

        let mut delivered = 0;
        for listener in listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(bus = self.inner.name, "listener panicked; continuing"),
            }
        }
        delivered
    }

    /// Number of current listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.inner.name)
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle keeps the listener attached; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach the listener. Safe to call after the bus is gone.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_in_order() {
        let bus: EventBus<u32> = EventBus::new("test");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        let _s1 = bus.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&seen);
        let _s2 = bus.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        assert_eq!(bus.publish(&7), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus: EventBus<u32> = EventBus::new("test");
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let sub = bus.subscribe(move |_| c.set(c.get() + 1));
        bus.publish(&1);
        sub.unsubscribe();
        bus.publish(&2);

        assert_eq!(count.get(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let bus: EventBus<u32> = EventBus::new("test");
        let count = Rc::new(Cell::new(0));

        let _bad = bus.subscribe(|_| panic!("listener bug"));
        let c = Rc::clone(&count);
        let _good = bus.subscribe(move |_| c.set(c.get() + 1));

        assert_eq!(bus.publish(&1), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscribe_during_publish_is_not_delivered() {
        let bus: EventBus<u32> = EventBus::new("test");
        let count = Rc::new(Cell::new(0));

        let handle = bus.clone();
        let c = Rc::clone(&count);
        let _s = bus.subscribe(move |_| {
            let c = Rc::clone(&c);
            let _late = handle.subscribe(move |_| c.set(c.get() + 1));
        });

        bus.publish(&1);
        assert_eq!(count.get(), 0);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped() {
        let bus: EventBus<u32> = EventBus::new("test");
        let sub = bus.subscribe(|_| {});
        drop(bus);
        sub.unsubscribe();
    }
}
