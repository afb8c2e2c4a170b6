// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized scroll sequences checked against the window invariants.

use proptest::prelude::*;

use crate::test_support::ListSource;
use crate::{HeadlessSurface, HostSurface, PagingEngine, ScrollAxis, WindowConfig};

type Engine = PagingEngine<String, ListSource, HeadlessSurface>;

/// Cells are exactly 100 units so every offset stays an integer.
fn engine(visible: usize, buffer: usize, spacing: f64) -> Engine {
    engine_along(visible, buffer, spacing, ScrollAxis::Vertical)
}

fn engine_along(visible: usize, buffer: usize, spacing: f64, axis: ScrollAxis) -> Engine {
    let config = WindowConfig::builder()
        .visible_cells(visible)
        .buffer_screens(buffer)
        .cell_spacing(spacing)
        .axis(axis)
        .build()
        .unwrap();
    let main = visible as f64 * 100.0 + spacing * (visible as f64 - 1.0);
    let surface = HeadlessSurface::new(&config, axis.size(main, 200.0));
    PagingEngine::builder(config)
        .data_source(ListSource::immediate())
        .build(surface)
}

fn visible_indices(engine: &Engine) -> Vec<i64> {
    engine.visible_indices().to_vec()
}

proptest! {
    #[test]
    fn window_size_never_changes(
        visible in 1usize..12,
        buffer in 0usize..5,
        moves in proptest::collection::vec(0.0f64..1.0, 1..8),
    ) {
        let mut engine = engine(visible, buffer, 0.0);
        let slots = visible + 2 * buffer * visible;
        prop_assert_eq!(engine.config().window_cells(), slots);
        prop_assert_eq!(engine.layout().slots(), slots);

        engine.on_slot_will_display(0);
        for fraction in moves {
            let content = engine.layout().content_extent();
            engine.host_mut().scroll_to((fraction * content).floor());
            engine.on_scroll_settled();
            prop_assert_eq!(engine.layout().slots(), slots);
            prop_assert_eq!(engine.config().window_cells(), slots);
        }
    }

    #[test]
    fn slot_index_mapping_tracks_the_offset(
        visible in 1usize..8,
        buffer in 0usize..4,
        position in 0u32..40,
    ) {
        let mut engine = engine(visible, buffer, 0.0);
        engine.on_slot_will_display(0);
        engine.host_mut().scroll_to(f64::from(position) * 37.0);

        for slot in 0..engine.config().window_cells() {
            let index = engine.index_for_slot(slot);
            prop_assert_eq!(index, slot as i64 + engine.data_offset());
            prop_assert_eq!(engine.slot_for_index(index), Some(slot));
        }
        engine.recenter();
        for slot in 0..engine.config().window_cells() {
            let index = engine.index_for_slot(slot);
            prop_assert_eq!(index, slot as i64 + engine.data_offset());
        }
    }

    #[test]
    fn recentering_keeps_visible_indices_in_place(
        visible in 1usize..8,
        buffer in 0usize..4,
        spacing in 0u8..3,
        positions in proptest::collection::vec(0u32..4000, 1..6),
        horizontal in any::<bool>(),
    ) {
        let axis = if horizontal { ScrollAxis::Horizontal } else { ScrollAxis::Vertical };
        let mut engine = engine_along(visible, buffer, f64::from(spacing) * 4.0, axis);
        engine.on_slot_will_display(0);
        for position in positions {
            engine.host_mut().scroll_to(f64::from(position));
            let before = visible_indices(&engine);
            let offset_before = engine.data_offset();
            let cross_before = engine.host().content_offset() - axis.vec(axis.main(engine.host().content_offset()));

            let recenter = engine.recenter();
            prop_assert_eq!(recenter.is_some(), !before.is_empty());
            prop_assert_eq!(visible_indices(&engine), before.clone());
            let after = engine.host().content_offset();
            prop_assert_eq!(after - axis.vec(axis.main(after)), cross_before);

            if let Some(lowest) = before.first() {
                prop_assert_eq!(
                    engine.data_offset(),
                    lowest - engine.config().buffer_cells() as i64
                );
                let visible_slots = engine.host().visible_slots();
                prop_assert_eq!(
                    visible_slots.iter().min().copied(),
                    Some(engine.config().buffer_cells())
                );
            } else {
                prop_assert_eq!(engine.data_offset(), offset_before);
            }
        }
    }

    #[test]
    fn settled_windows_are_fully_fetched(
        visible in 1usize..6,
        buffer in 1usize..3,
        steps in proptest::collection::vec(-3i32..=3, 1..8),
    ) {
        let mut engine = engine(visible, buffer, 0.0);
        engine.on_slot_will_display(0);
        for step in steps {
            engine.host_mut().scroll_by(f64::from(step) * 100.0);
            engine.on_scroll_settled();
            let start = engine.data_offset();
            let end = start + engine.config().window_cells() as i64;
            for index in start..end {
                prop_assert!(engine.store().contains(index));
            }
        }
    }
}
