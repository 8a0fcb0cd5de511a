//! Property/fuzz-style invariants for the placement engine and row
//! manager.
//!
//! This suite drives random operation streams against the public
//! `EditorSession` API and asserts the committed-arrangement invariants
//! after every step: no overlapping tiles, every tile inside the
//! columns, and a derived row count that never clips content.

use gridwall::geometry::no_overlaps;
use gridwall::model::{Arrangement, Tile};
use gridwall::rows::needed_rows;
use gridwall::session::EditorSession;
use proptest::prelude::*;

fn seeded(cols: u32, n_tiles: usize) -> EditorSession {
    let tiles: Vec<Tile> = (0..n_tiles)
        .map(|i| {
            let i = i as u32;
            Tile::new(i64::from(i) + 1, i % cols, i / cols, 1, 1)
        })
        .collect();
    let floor = needed_rows(&tiles).max(1);
    EditorSession::new(Arrangement {
        cols,
        manual_floor: floor,
        tiles,
    })
}

fn assert_invariants(session: &EditorSession) -> Result<(), TestCaseError> {
    let arr = session.arrangement();
    prop_assert!(no_overlaps(&arr.tiles), "overlap in committed tiles");
    prop_assert!(
        arr.tiles.iter().all(|t| t.right() <= arr.cols),
        "tile escaped the columns"
    );
    prop_assert!(
        arr.tiles.iter().all(|t| (1..=2).contains(&t.w) && (1..=2).contains(&t.h)),
        "illegal footprint in committed tiles"
    );
    prop_assert!(session.effective_rows() >= 1);
    prop_assert!(session.effective_rows() >= needed_rows(&arr.tiles));
    Ok(())
}

proptest! {
    #[test]
    fn random_edits_preserve_spatial_invariants(
        cols in 1u32..=6,
        n_tiles in 1usize..=8,
        ops in proptest::collection::vec(
            (0u8..4, 0u32..8, 0u32..10, 1u32..=2, 1u32..=2, 0usize..8),
            1..48,
        ),
    ) {
        let mut session = seeded(cols, n_tiles);
        assert_invariants(&session)?;

        for (kind, x, y, w, h, pick) in ops {
            let id = (pick % n_tiles) as i64 + 1;
            match kind {
                0 => { let _ = session.place_tile(id, x, y, w, h); }
                1 => { let _ = session.resize_tile(id, w, h); }
                2 => { let _ = session.insert_row_after(y as i32 - 1); }
                _ => { let _ = session.remove_row(y as i32); }
            }
            assert_invariants(&session)?;
        }
    }

    #[test]
    fn moves_with_unchanged_footprint_preserve_the_footprint_multiset(
        cols in 2u32..=6,
        n_tiles in 2usize..=8,
        moves in proptest::collection::vec((0usize..8, 0u32..8, 0u32..10), 1..24),
    ) {
        let mut session = seeded(cols, n_tiles);
        let footprints = |tiles: &[Tile]| {
            let mut v: Vec<(i64, u32, u32)> =
                tiles.iter().map(|t| (t.content_id, t.w, t.h)).collect();
            v.sort_unstable();
            v
        };
        let expected = footprints(&session.arrangement().tiles);

        for (pick, x, y) in moves {
            let id = (pick % n_tiles) as i64 + 1;
            let size = session.arrangement().tile(id).map(|t| (t.w, t.h));
            let Some((w, h)) = size else { continue };
            let _ = session.place_tile(id, x, y, w, h);
            prop_assert_eq!(
                footprints(&session.arrangement().tiles),
                expected.clone(),
                "a move must never change who owns which footprint"
            );
        }
    }

    #[test]
    fn permitted_row_removal_never_clips(
        cols in 1u32..=6,
        n_tiles in 0usize..=6,
        extra_floor in 0u32..4,
        index in 0i32..12,
    ) {
        let mut session = seeded(cols, n_tiles.max(1));
        for _ in 0..extra_floor {
            session.insert_row_after(-1).unwrap();
        }
        if session.can_remove_row(index).is_ok() {
            session.remove_row(index).unwrap();
            let arr = session.arrangement();
            prop_assert!(
                needed_rows(&arr.tiles) <= arr.manual_floor.max(1),
                "removal clipped a tile below the workspace"
            );
            prop_assert!(no_overlaps(&arr.tiles));
        }
    }

    #[test]
    fn wire_round_trip_is_lossless(
        cols in 1u32..=6,
        n_tiles in 0usize..=8,
    ) {
        let session = seeded(cols, n_tiles.max(1));
        let doc = session.arrangement().to_doc();
        let json = serde_json::to_string(&doc).expect("serialize");
        let back: gridwall::model::LayoutDoc =
            serde_json::from_str(&json).expect("parse");
        let mut original = session.arrangement().tiles.clone();
        let mut returned: Vec<Tile> = back.items.into_iter().map(Tile::from).collect();
        original.sort_by_key(|t| t.content_id);
        returned.sort_by_key(|t| t.content_id);
        prop_assert_eq!(original, returned);
        prop_assert_eq!(back.grid_rows, Some(session.arrangement().manual_floor));
    }
}
