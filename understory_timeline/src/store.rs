// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thread-safe cache of fetched data keyed by absolute index.

use core::fmt;
use core::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

/// Identifies one request to the data source for one index.
pub(crate) type Ticket = u64;

/// Ticket carried by entries written through [`WindowStore::set`].
const UNTICKETED: Ticket = 0;

#[derive(Debug)]
struct Entry<T> {
    value: Option<T>,
    ticket: Ticket,
    /// The asynchronous result for `ticket` has landed.
    settled: bool,
}

#[derive(Debug)]
struct Inner<T> {
    entries: HashMap<i64, Entry<T>>,
    /// Bumped by [`WindowStore::clear`] so completions issued before a reset
    /// cannot write into the new cache.
    generation: u64,
    next_ticket: Ticket,
}

/// Shared cache mapping absolute index to an optional data value.
///
/// An entry that is present records that a fetch was attempted; its value may
/// still be `None` when the data source had nothing to return. An absent entry
/// means the index was never fetched.
///
/// Cloning the store clones a handle to the same cache. Every read and write
/// goes through a single mutex, so entries are never observed half-written;
/// no ordering is promised between writes to different indices.
pub struct WindowStore<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for WindowStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for WindowStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for WindowStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("WindowStore")
            .field("len", &inner.entries.len())
            .field("generation", &inner.generation)
            .finish_non_exhaustive()
    }
}

impl<T> WindowStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                generation: 0,
                next_ticket: UNTICKETED + 1,
            })),
        }
    }

    // Entries are plain values, so a writer that panicked cannot leave one torn.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if a fetch for `index` has been recorded.
    #[must_use]
    pub fn contains(&self, index: i64) -> bool {
        self.lock().entries.contains_key(&index)
    }

    /// Stores `value` for `index`, replacing whatever was there.
    pub fn set(&self, index: i64, value: Option<T>) {
        self.lock().entries.insert(
            index,
            Entry {
                value,
                ticket: UNTICKETED,
                settled: false,
            },
        );
    }

    /// Drops every entry and invalidates outstanding completions.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.generation += 1;
    }

    /// Number of recorded indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Drops entries outside `range`, returning how many were removed.
    pub fn retain_range(&self, range: RangeInclusive<i64>) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|index, _| range.contains(index));
        before - inner.entries.len()
    }

    /// Starts a request for one index, returning the generation and ticket the
    /// request's results are written under.
    pub(crate) fn begin_request(&self) -> (u64, Ticket) {
        let mut inner = self.lock();
        let ticket = inner.next_ticket;
        inner.next_ticket += 1;
        (inner.generation, ticket)
    }

    /// Records the value a data source returned directly from `fetch`.
    ///
    /// Skipped when the asynchronous result of the same request already
    /// landed, which happens when a completion is resolved before `fetch`
    /// returns.
    pub(crate) fn apply_immediate(&self, index: i64, ticket: Ticket, value: Option<T>) {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get(&index)
            && entry.ticket == ticket
            && entry.settled
        {
            return;
        }
        inner.entries.insert(
            index,
            Entry {
                value,
                ticket,
                settled: false,
            },
        );
    }

    /// Records an asynchronous result. Returns `false` when the request was
    /// issued before the last [`clear`](Self::clear) and was discarded.
    pub(crate) fn apply_async(
        &self,
        generation: u64,
        index: i64,
        ticket: Ticket,
        value: Option<T>,
    ) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        inner.entries.insert(
            index,
            Entry {
                value,
                ticket,
                settled: true,
            },
        );
        true
    }

    pub(crate) fn generation(&self) -> u64 {
        self.lock().generation
    }
}

impl<T: Clone> WindowStore<T> {
    /// Returns the cached value for `index`.
    ///
    /// `None` covers both "never fetched" and "fetched, no data"; use
    /// [`contains`](Self::contains) to tell them apart.
    #[must_use]
    pub fn get(&self, index: i64) -> Option<T> {
        self.lock()
            .entries
            .get(&index)
            .and_then(|entry| entry.value.clone())
    }
}
