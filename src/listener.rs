// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Change notification listeners.
//!
//! Listeners are invoked synchronously on the owning execution context,
//! in subscription order, after the service state has been updated.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives feed pagination updates.
pub trait FeedListener {
    /// A page was appended; `last_loaded_page` is the page just loaded.
    fn on_feed_changed(&self, last_loaded_page: u32);
}

/// Receives avatar URL updates.
pub trait ProfileImageListener {
    fn on_profile_image_changed(&self, avatar_url: &str);
}

/// Fire-and-forget listener list.
pub struct Listeners<L: ?Sized> {
    entries: RefCell<Vec<Rc<L>>>,
}

impl<L: ?Sized> Default for Listeners<L> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<L: ?Sized> Listeners<L> {
    pub fn subscribe(&self, listener: Rc<L>) {
        self.entries.borrow_mut().push(listener);
    }

    /// Drop a previously subscribed listener (matched by identity).
    pub fn unsubscribe(&self, listener: &Rc<L>) {
        self.entries
            .borrow_mut()
            .retain(|existing| !Rc::ptr_eq(existing, listener));
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Call `f` for every listener. The list is snapshotted first so a
    /// listener may subscribe or unsubscribe from inside its callback.
    pub fn notify(&self, f: impl Fn(&L)) {
        let snapshot: Vec<Rc<L>> = self.entries.borrow().clone();
        for listener in snapshot {
            f(&listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter(Cell<u32>);

    impl FeedListener for Counter {
        fn on_feed_changed(&self, last_loaded_page: u32) {
            self.0.set(last_loaded_page);
        }
    }

    #[test]
    fn test_notify_reaches_every_listener() {
        let listeners: Listeners<dyn FeedListener> = Listeners::default();
        let a = Rc::new(Counter(Cell::new(0)));
        let b = Rc::new(Counter(Cell::new(0)));
        listeners.subscribe(a.clone());
        listeners.subscribe(b.clone());

        listeners.notify(|l| l.on_feed_changed(3));

        assert_eq!(a.0.get(), 3);
        assert_eq!(b.0.get(), 3);
    }

    #[test]
    fn test_unsubscribe_by_identity() {
        let listeners: Listeners<dyn FeedListener> = Listeners::default();
        let a = Rc::new(Counter(Cell::new(0)));
        let a_dyn: Rc<dyn FeedListener> = a.clone();
        listeners.subscribe(a_dyn.clone());
        listeners.unsubscribe(&a_dyn);

        listeners.notify(|l| l.on_feed_changed(1));

        assert!(listeners.is_empty());
        assert_eq!(a.0.get(), 0);
    }
}
