// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data sources and surfaces shared by the unit tests.

use std::sync::{Arc, Mutex};

use kurbo::Size;

use crate::{Completion, DataSource, HeadlessSurface, WindowConfig};

/// A 320×500 vertical viewport: with five visible cells each cell is 100 tall.
pub(crate) fn surface(config: &WindowConfig) -> HeadlessSurface {
    HeadlessSurface::new(config, Size::new(320.0, 500.0))
}

/// Completions a test resolves by hand.
#[derive(Clone, Default)]
pub(crate) struct Pending(Arc<Mutex<Vec<Completion<String>>>>);

impl Pending {
    fn push(&self, completion: Completion<String>) {
        self.0.lock().unwrap().push(completion);
    }

    /// Resolves the oldest outstanding completion for `index`.
    pub(crate) fn resolve(&self, index: i64, value: Option<String>) {
        let completion = {
            let mut pending = self.0.lock().unwrap();
            let at = pending
                .iter()
                .position(|c| c.index() == index)
                .expect("no pending completion for index");
            pending.remove(at)
        };
        completion.resolve(value);
    }
}

#[derive(Clone, Copy)]
enum Mode {
    Immediate,
    Deferred(fn(i64) -> Option<String>),
    Inline(fn(i64) -> (Option<String>, Option<String>)),
}

/// Records every fetch and answers with the index rendered as a string.
pub(crate) struct ListSource {
    pub(crate) calls: Vec<i64>,
    pub(crate) pending: Pending,
    mode: Mode,
    lower: Option<i64>,
    upper: Option<i64>,
}

impl ListSource {
    fn with_mode(mode: Mode) -> Self {
        Self {
            calls: Vec::new(),
            pending: Pending::default(),
            mode,
            lower: None,
            upper: None,
        }
    }

    /// Answers synchronously and drops the completion.
    pub(crate) fn immediate() -> Self {
        Self::with_mode(Mode::Immediate)
    }

    /// Answers with `immediate(index)` and parks the completion in `pending`.
    pub(crate) fn deferred(immediate: fn(i64) -> Option<String>) -> Self {
        Self::with_mode(Mode::Deferred(immediate))
    }

    /// Resolves the completion before returning the immediate value.
    pub(crate) fn inline(values: fn(i64) -> (Option<String>, Option<String>)) -> Self {
        Self::with_mode(Mode::Inline(values))
    }

    pub(crate) fn bounded(mut self, lower: Option<i64>, upper: Option<i64>) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }
}

impl DataSource<String> for ListSource {
    type Cell = String;

    fn fetch(&mut self, index: i64, completion: Completion<String>) -> Option<String> {
        self.calls.push(index);
        match self.mode {
            Mode::Immediate => Some(index.to_string()),
            Mode::Deferred(immediate) => {
                self.pending.push(completion);
                immediate(index)
            }
            Mode::Inline(values) => {
                let (immediate, later) = values(index);
                completion.resolve(later);
                immediate
            }
        }
    }

    fn configure_cell(&mut self, cell: &mut String, data: Option<&String>) {
        cell.clear();
        cell.push_str(data.map_or("<empty>", String::as_str));
    }

    fn lower_bound(&self) -> Option<i64> {
        self.lower
    }

    fn upper_bound(&self) -> Option<i64> {
        self.upper
    }
}
