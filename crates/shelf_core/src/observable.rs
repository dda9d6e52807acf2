//! Single-threaded observable value.
//!
//! Listeners run on the thread that calls [`Observable::set`], in the order
//! they subscribed. A listener stays registered for as long as its
//! [`Subscription`] is alive.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Shared<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
}

pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.borrow())
    }

    /// Replaces the value and notifies every listener with it.
    pub fn set(&self, value: T) {
        self.shared.value.replace(value.clone());
        let snapshot: Vec<(u64, Listener<T>)> = self.shared.listeners.borrow().clone();
        for (id, listener) in snapshot {
            // A previous listener may have cancelled this one.
            if !self.is_registered(id) {
                continue;
            }
            if let Ok(mut listener) = listener.try_borrow_mut() {
                listener(&value);
            }
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        self.shared.listeners.borrow_mut().push((id, listener));

        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared
                        .listeners
                        .borrow_mut()
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    /// Drops every listener. Outstanding subscriptions become inert.
    pub fn close(&self) {
        self.shared.listeners.borrow_mut().clear();
    }

    fn is_registered(&self, id: u64) -> bool {
        self.shared
            .listeners
            .borrow()
            .iter()
            .any(|(listener_id, _)| *listener_id == id)
    }
}

impl<T: Clone + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Cancellable handle returned by [`Observable::subscribe`].
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_see_updates_in_subscription_order() {
        let observable = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let seen = seen.clone();
            observable.subscribe(move |v| seen.borrow_mut().push(("first", *v)))
        };
        let second = {
            let seen = seen.clone();
            observable.subscribe(move |v| seen.borrow_mut().push(("second", *v)))
        };

        observable.set(5);
        assert_eq!(observable.get(), 5);
        assert_eq!(*seen.borrow(), vec![("first", 5), ("second", 5)]);

        drop(first);
        observable.set(6);
        assert_eq!(seen.borrow().last(), Some(&("second", 6)));
        assert_eq!(observable.listener_count(), 1);
        second.cancel();
        assert_eq!(observable.listener_count(), 0);
    }

    #[test]
    fn listener_can_cancel_a_later_listener_mid_notification() {
        let observable = Observable::new(String::new());
        let victim_calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _killer = {
            let slot = slot.clone();
            observable.subscribe(move |_| {
                slot.borrow_mut().take();
            })
        };
        let victim = {
            let calls = victim_calls.clone();
            observable.subscribe(move |_| calls.set(calls.get() + 1))
        };
        *slot.borrow_mut() = Some(victim);

        observable.set("x".to_string());
        assert_eq!(victim_calls.get(), 0);
        assert_eq!(observable.listener_count(), 1);
    }

    #[test]
    fn listener_may_read_the_current_value() {
        let observable = Rc::new(Observable::new(1));
        let read = Rc::new(Cell::new(0));
        let _sub = {
            let observable_ref = Rc::downgrade(&observable);
            let read = read.clone();
            observable.subscribe(move |_| {
                if let Some(o) = observable_ref.upgrade() {
                    read.set(o.get());
                }
            })
        };
        observable.set(3);
        assert_eq!(read.get(), 3);
    }

    #[test]
    fn close_drops_all_listeners() {
        let observable = Observable::new(0u8);
        let _a = observable.subscribe(|_| {});
        let b = observable.subscribe(|_| {});
        observable.close();
        assert_eq!(observable.listener_count(), 0);
        drop(b);
        observable.set(1);
    }
}
