// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out of timeline events to any number of observers.
//!
//! The engine itself reports what it did through return values
//! ([`SettleReport`], [`RecenterReport`]). Hosts that need several parties to
//! react (an analytics hook, a header that tracks the visible date, a
//! scroll indicator) wrap those reports in a [`TimelineEvent`] and hand it to
//! an [`ObserverList`], which delivers it to every observer in the order they
//! were added.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_timeline::{ObserverList, TimelineEvent};
//!
//! let seen = Rc::new(Cell::new(0));
//! let mut observers = ObserverList::new();
//! let counter = Rc::clone(&seen);
//! let id = observers.add(move |_: &TimelineEvent| counter.set(counter.get() + 1));
//!
//! observers.notify(&TimelineEvent::Attached);
//! assert_eq!(seen.get(), 1);
//!
//! assert!(observers.remove(id));
//! observers.notify(&TimelineEvent::Attached);
//! assert_eq!(seen.get(), 1);
//! ```

use core::fmt;

use crate::{RecenterReport, SettleReport};

/// Something that happened to a timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// A data source was attached and the initial window requested.
    Attached,
    /// The one-time initial centering ran.
    InitiallyCentered,
    /// A scroll settled and the window was paged.
    Settled(SettleReport),
    /// The window was recentered outside of a settle.
    Recentered(RecenterReport),
    /// A single index was re-requested.
    Refreshed(i64),
    /// Asynchronous results were applied; the count of reloaded slots.
    CompletionsApplied(usize),
}

/// Receives [`TimelineEvent`]s from an [`ObserverList`].
pub trait TimelineObserver {
    /// Called once per broadcast event.
    fn on_event(&mut self, event: &TimelineEvent);
}

impl<F: FnMut(&TimelineEvent)> TimelineObserver for F {
    fn on_event(&mut self, event: &TimelineEvent) {
        self(event);
    }
}

/// Handle returned by [`ObserverList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered list of observers receiving every broadcast event.
#[derive(Default)]
pub struct ObserverList {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn TimelineObserver>)>,
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl ObserverList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `observer` after any already registered.
    pub fn add(&mut self, observer: impl TimelineObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes the observer registered as `id`. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivers `event` to every observer in registration order.
    pub fn notify(&mut self, event: &TimelineEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{ObserverList, TimelineEvent};

    #[test]
    fn events_reach_observers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = ObserverList::new();
        for name in ["header", "indicator", "analytics"] {
            let log = Rc::clone(&log);
            observers.add(move |event: &TimelineEvent| {
                log.borrow_mut().push((name, event.clone()));
            });
        }

        observers.notify(&TimelineEvent::Refreshed(4));
        let log = log.borrow();
        let names: Vec<_> = log.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["header", "indicator", "analytics"]);
        assert!(log.iter().all(|(_, e)| *e == TimelineEvent::Refreshed(4)));
    }

    #[test]
    fn removed_observers_stop_receiving() {
        let hits = Rc::new(RefCell::new(0));
        let mut observers = ObserverList::new();
        let first = {
            let hits = Rc::clone(&hits);
            observers.add(move |_: &TimelineEvent| *hits.borrow_mut() += 1)
        };
        let second = {
            let hits = Rc::clone(&hits);
            observers.add(move |_: &TimelineEvent| *hits.borrow_mut() += 10)
        };
        assert_ne!(first, second);

        assert!(observers.remove(first));
        assert!(!observers.remove(first));
        observers.notify(&TimelineEvent::InitiallyCentered);
        assert_eq!(*hits.borrow(), 10);
        assert_eq!(observers.len(), 1);
    }
}
