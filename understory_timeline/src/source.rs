// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The data source contract and the handle used to deliver asynchronous results.

use core::fmt;
use core::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::store::{Ticket, WindowStore};

/// Callback used to wake the host's render thread after a completion lands.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Store generation and index of a landed result, queued for the render thread.
pub(crate) type Notice = (u64, i64);

/// Supplies data for absolute indices and paints it into cells.
///
/// The engine calls [`fetch`](Self::fetch) on the render thread and expects it
/// to return promptly. Data that takes longer to produce is delivered later
/// through the [`Completion`] handed to `fetch`; that result replaces whatever
/// `fetch` returned.
///
/// There is no error channel: an index without data is simply `None`.
pub trait DataSource<T> {
    /// The host's cell or view type.
    type Cell: ?Sized;

    /// Returns data for `index` now, and optionally resolves `completion` later
    /// from any thread.
    fn fetch(&mut self, index: i64, completion: Completion<T>) -> Option<T>;

    /// Paints `data` into `cell`. `None` means a placeholder should be shown.
    fn configure_cell(&mut self, cell: &mut Self::Cell, data: Option<&T>);

    /// Lowest index that exists (inclusive).
    fn lower_bound(&self) -> Option<i64> {
        None
    }

    /// One past the highest index that exists (exclusive).
    fn upper_bound(&self) -> Option<i64> {
        None
    }
}

/// Index bounds declared by a [`DataSource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    /// Inclusive lower bound.
    pub lower: Option<i64>,
    /// Exclusive upper bound.
    pub upper: Option<i64>,
}

impl Bounds {
    /// No bounds in either direction.
    pub const UNBOUNDED: Self = Self {
        lower: None,
        upper: None,
    };

    /// Reads the bounds a data source currently declares.
    #[must_use]
    pub fn of<T, D: DataSource<T> + ?Sized>(source: &D) -> Self {
        Self {
            lower: source.lower_bound(),
            upper: source.upper_bound(),
        }
    }

    /// Returns `true` if `index` may be fetched or scrolled to.
    #[must_use]
    pub fn contains(&self, index: i64) -> bool {
        self.lower.is_none_or(|lower| index >= lower) && self.upper.is_none_or(|upper| index < upper)
    }

    /// Intersects an inclusive range with the bounds.
    ///
    /// Returns `None` when nothing of `range` survives.
    #[must_use]
    pub fn clip(&self, range: RangeInclusive<i64>) -> Option<RangeInclusive<i64>> {
        let (mut start, mut end) = range.into_inner();
        if let Some(lower) = self.lower {
            start = start.max(lower);
        }
        if let Some(upper) = self.upper {
            end = end.min(upper.saturating_sub(1));
        }
        (start <= end).then_some(start..=end)
    }
}

/// One-shot handle that delivers an asynchronous result for a single index.
///
/// The handle is `Send` and may be moved to any thread. Resolving consumes it,
/// so at most one result is ever delivered; dropping it delivers nothing and
/// leaves the immediate result in place.
pub struct Completion<T> {
    index: i64,
    ticket: Ticket,
    generation: u64,
    store: WindowStore<T>,
    notify: Sender<Notice>,
    waker: Option<Waker>,
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("index", &self.index)
            .field("ticket", &self.ticket)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<T> Completion<T> {
    pub(crate) fn new(
        index: i64,
        store: WindowStore<T>,
        notify: Sender<Notice>,
        waker: Option<Waker>,
    ) -> Self {
        let (generation, ticket) = store.begin_request();
        Self {
            index,
            ticket,
            generation,
            store,
            notify,
            waker,
        }
    }

    pub(crate) const fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// The absolute index this handle resolves.
    #[must_use]
    pub const fn index(&self) -> i64 {
        self.index
    }

    /// Delivers the final value for the index.
    ///
    /// The value is written into the cache right away. Reloading the slot is
    /// left to the render thread, which picks the notice up in
    /// [`PagingEngine::process_completions`](crate::PagingEngine::process_completions).
    pub fn resolve(self, value: Option<T>) {
        if !self
            .store
            .apply_async(self.generation, self.index, self.ticket, value)
        {
            log::trace!("dropping completion for index {} from a detached source", self.index);
            return;
        }
        // The engine may already be gone; the cache write above still stands.
        if self.notify.send((self.generation, self.index)).is_ok()
            && let Some(waker) = &self.waker
        {
            waker();
        }
    }
}
