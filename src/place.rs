//! # Placement Engine
//!
//! This is the heart of Gridwall and the reason it exists.
//!
//! A placement request names a moving tile, a target origin, and a target
//! footprint. Three tiers are tried in order, first applicable wins:
//!
//! 1. **Direct move**: the target cells are free; relocate the tile.
//! 2. **Single swap**: the target overlaps exactly one other tile and
//!    that tile fits inside the cells the move vacates; exchange the two
//!    positions and keep both sizes.
//! 3. **Cascading push**: take the target anyway, then push everything
//!    in the way straight down until the grid settles.
//!
//! The whole engine is a pure function over the tile set: it never
//! mutates its input and returns a fresh `Vec<Tile>`. Commit and preview
//! both call [`place`], so the drag feedback on screen and the state
//! written on release are the same computation by construction. Keeping
//! separate preview math instead is a known source of glitches where the
//! swap/push branch choice differs under small pointer jitters.
//!
//! The cascade only ever moves tiles downward, so the sum of all `y`
//! coordinates strictly increases on every changing pass and the loop
//! terminates. The pass guard stays as a safety net regardless: on
//! exhaustion the attempt fails and nothing is committed.

use log::{debug, warn};

use crate::error::PlaceError;
use crate::geometry::{fits_bounds, overlaps};
use crate::model::Tile;

/// Upper bound on cascade passes before the attempt is abandoned.
pub const PUSH_GUARD_PASSES: usize = 200;

/// Compute the tile set after placing `moving_id` at the target rectangle.
///
/// Returns the new set on success; the input is never modified, so a
/// caller can commit by swapping the result in, or discard it to get a
/// preview. Fails with [`PlaceError::OutOfBounds`] when the target does
/// not fit the columns, [`PlaceError::UnknownTile`] when `moving_id` is
/// not present, and [`PlaceError::PushOverflow`] when the cascade guard
/// is exhausted.
pub fn place(
    tiles: &[Tile],
    cols: u32,
    moving_id: i64,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> Result<Vec<Tile>, PlaceError> {
    if !fits_bounds(x, y, w, h, cols) {
        return Err(PlaceError::OutOfBounds { x, y, w, h });
    }
    let moving = tiles
        .iter()
        .position(|t| t.content_id == moving_id)
        .ok_or(PlaceError::UnknownTile(moving_id))?;

    let mut next = tiles.to_vec();
    let old = next[moving];
    let target = Tile::new(moving_id, x, y, w, h);

    let hits: Vec<usize> = next
        .iter()
        .enumerate()
        .filter(|(i, t)| *i != moving && overlaps(t, &target))
        .map(|(i, _)| i)
        .collect();

    // Tier 1: the target cells are free.
    if hits.is_empty() {
        next[moving] = target;
        debug!(
            "place: direct move of {} to ({}, {}) {}x{}",
            moving_id, x, y, w, h
        );
        return Ok(next);
    }

    // Tier 2: exactly one occupant, and its footprint fits inside the
    // vacated cells. Fitting inside the vacated footprint is what makes
    // skipping a third-tile overlap re-check sound: those cells are known
    // free. The displaced tile must also stay clear of the target, which
    // rules the swap out for same-origin resizes.
    if let [hit] = hits[..] {
        let other = next[hit];
        let displaced = Tile::new(other.content_id, old.x, old.y, other.w, other.h);
        if other.w <= old.w && other.h <= old.h && !overlaps(&displaced, &target) {
            next[moving] = target;
            next[hit] = displaced;
            debug!(
                "place: swapped {} (now {}, {}) with {} (now {}, {})",
                moving_id, x, y, other.content_id, old.x, old.y
            );
            return Ok(next);
        }
    }

    // Tier 3: take the target and push everything else out of the way.
    next[moving] = target;
    let passes = cascade(&mut next, moving)?;
    debug!(
        "place: push cascade for {} settled after {} pass(es)",
        moving_id, passes
    );
    Ok(next)
}

/// Resolve overlaps by pushing tiles straight down until a full pass
/// changes nothing. Returns the number of passes used.
fn cascade(tiles: &mut [Tile], moving: usize) -> Result<usize, PlaceError> {
    for pass in 1..=PUSH_GUARD_PASSES {
        let mut changed = false;

        // (a) Anything under the moving tile drops to sit immediately
        // below it.
        let mover = tiles[moving];
        for i in 0..tiles.len() {
            if i != moving && overlaps(&tiles[i], &mover) {
                tiles[i].y = mover.bottom();
                changed = true;
            }
        }

        // (b) Sweep in (y, x) order; a later tile still overlapping an
        // earlier one sits down below it.
        let mut order: Vec<usize> = (0..tiles.len()).collect();
        order.sort_by_key(|&i| (tiles[i].y, tiles[i].x));
        for a in 0..order.len() {
            for b in (a + 1)..order.len() {
                let earlier = tiles[order[a]];
                if overlaps(&earlier, &tiles[order[b]]) {
                    tiles[order[b]].y = earlier.bottom();
                    changed = true;
                }
            }
        }

        if !changed {
            return Ok(pass);
        }
    }
    warn!(
        "place: push cascade did not settle within {} passes",
        PUSH_GUARD_PASSES
    );
    Err(PlaceError::PushOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::no_overlaps;

    fn tile(id: i64, x: u32, y: u32, w: u32, h: u32) -> Tile {
        Tile::new(id, x, y, w, h)
    }

    fn find(tiles: &[Tile], id: i64) -> Tile {
        *tiles.iter().find(|t| t.content_id == id).unwrap()
    }

    #[test]
    fn test_direct_move_into_free_cells() {
        let tiles = vec![tile(1, 0, 0, 1, 1)];
        let next = place(&tiles, 3, 1, 2, 4, 1, 1).unwrap();
        assert_eq!(find(&next, 1), tile(1, 2, 4, 1, 1));
    }

    #[test]
    fn test_place_at_own_position_is_identity() {
        let tiles = vec![tile(1, 0, 0, 2, 1), tile(2, 0, 1, 1, 1)];
        let next = place(&tiles, 2, 1, 0, 0, 2, 1).unwrap();
        assert_eq!(next, tiles);
    }

    #[test]
    fn test_adjacent_single_swap() {
        // 2-column grid, A(0,0) and B(1,0); moving A onto B swaps them.
        let tiles = vec![tile(1, 0, 0, 1, 1), tile(2, 1, 0, 1, 1)];
        let next = place(&tiles, 2, 1, 1, 0, 1, 1).unwrap();
        assert_eq!(find(&next, 1), tile(1, 1, 0, 1, 1));
        assert_eq!(find(&next, 2), tile(2, 0, 0, 1, 1));
        assert!(no_overlaps(&next));
    }

    #[test]
    fn test_swap_preserves_footprints_and_exchanges_origins() {
        // Two 2x2 tiles side by side; dragging one onto the other swaps
        // their origins and keeps both sizes.
        let tiles = vec![tile(1, 0, 0, 2, 2), tile(2, 2, 0, 2, 2)];
        let next = place(&tiles, 4, 1, 2, 0, 2, 2).unwrap();
        assert_eq!(find(&next, 1), tile(1, 2, 0, 2, 2));
        assert_eq!(find(&next, 2), tile(2, 0, 0, 2, 2));
        let mut footprints: Vec<(i64, u32, u32)> =
            next.iter().map(|t| (t.content_id, t.w, t.h)).collect();
        footprints.sort();
        assert_eq!(footprints, vec![(1, 2, 2), (2, 2, 2)]);
        assert!(no_overlaps(&next));
    }

    #[test]
    fn test_wide_tile_does_not_fit_vacated_slot_and_cascades() {
        // 2-column grid, A spans the whole first row, B sits below it.
        // Moving B to (0,0) cannot swap: A is 2 wide, the vacated slot is
        // 1 wide. The cascade pushes A down instead.
        let tiles = vec![tile(1, 0, 0, 2, 1), tile(2, 0, 1, 1, 1)];
        let next = place(&tiles, 2, 2, 0, 0, 1, 1).unwrap();
        assert_eq!(find(&next, 2), tile(2, 0, 0, 1, 1));
        assert_eq!(find(&next, 1), tile(1, 0, 1, 2, 1));
        assert!(no_overlaps(&next));
    }

    #[test]
    fn test_same_origin_resize_never_swaps() {
        // Growing A to 2x2 overlaps exactly B; a swap would park B on top
        // of the grown A, so the engine must push instead.
        let tiles = vec![tile(1, 0, 0, 1, 1), tile(2, 1, 1, 1, 1)];
        let next = place(&tiles, 2, 1, 0, 0, 2, 2).unwrap();
        assert_eq!(find(&next, 1), tile(1, 0, 0, 2, 2));
        assert_eq!(find(&next, 2).y, 2, "B is pushed below the grown tile");
        assert!(no_overlaps(&next));
    }

    #[test]
    fn test_cascade_chains_through_a_column() {
        // Dropping a 1x2 at the top of a full column shoves the whole
        // column down without introducing overlaps.
        let tiles = vec![
            tile(1, 0, 0, 1, 1),
            tile(2, 0, 1, 1, 1),
            tile(3, 0, 2, 1, 1),
            tile(4, 1, 0, 1, 2),
        ];
        let next = place(&tiles, 2, 4, 0, 0, 1, 2).unwrap();
        assert_eq!(find(&next, 4), tile(4, 0, 0, 1, 2));
        assert!(no_overlaps(&next));
        // Nothing escaped the column bounds.
        assert!(next.iter().all(|t| t.right() <= 2));
    }

    #[test]
    fn test_out_of_bounds_target_is_rejected() {
        let tiles = vec![tile(1, 0, 0, 1, 1)];
        let err = place(&tiles, 2, 1, 1, 0, 2, 1).unwrap_err();
        assert_eq!(err, PlaceError::OutOfBounds { x: 1, y: 0, w: 2, h: 1 });
    }

    #[test]
    fn test_unknown_tile_is_rejected() {
        let tiles = vec![tile(1, 0, 0, 1, 1)];
        let err = place(&tiles, 2, 99, 0, 0, 1, 1).unwrap_err();
        assert_eq!(err, PlaceError::UnknownTile(99));
    }

    #[test]
    fn test_input_is_never_mutated() {
        let tiles = vec![tile(1, 0, 0, 2, 1), tile(2, 0, 1, 1, 1)];
        let before = tiles.clone();
        let _ = place(&tiles, 2, 2, 0, 0, 1, 1).unwrap();
        assert_eq!(tiles, before);
    }
}
