//! # Geometry Utilities
//!
//! The three primitives everything else is built on: the half-open
//! rectangle overlap test, the per-cell occupancy map, and the bounds
//! check. The overlap invariant of a committed arrangement is exactly
//! "no two tiles contribute the same occupancy cell", so the two views
//! must always agree.

use std::collections::HashMap;

use crate::model::Tile;

/// True iff the half-open cell rectangles of `a` and `b` intersect on both
/// axes. Saturating edges keep the predicate total over raw wire values.
pub fn overlaps(a: &Tile, b: &Tile) -> bool {
    a.x < b.x.saturating_add(b.w)
        && a.x.saturating_add(a.w) > b.x
        && a.y < b.y.saturating_add(b.h)
        && a.y.saturating_add(a.h) > b.y
}

/// True iff the whole tile set is pairwise overlap-free.
pub fn no_overlaps(tiles: &[Tile]) -> bool {
    for (i, a) in tiles.iter().enumerate() {
        for b in tiles.iter().skip(i + 1) {
            if overlaps(a, b) {
                return false;
            }
        }
    }
    true
}

/// Expand every tile into its unit cells, keyed `(x, y) -> content_id`.
///
/// Used to render empty-cell affordances and to answer coverage queries.
/// For a valid arrangement no two tiles contribute the same key; the map
/// then has exactly `sum(w * h)` entries.
pub fn occupancy_map(tiles: &[Tile]) -> HashMap<(u32, u32), i64> {
    let mut cells = HashMap::new();
    for tile in tiles {
        for y in tile.y..tile.bottom() {
            for x in tile.x..tile.right() {
                cells.insert((x, y), tile.content_id);
            }
        }
    }
    cells
}

/// Bounds check for a candidate rectangle: sides in {1,2} and the right
/// edge within the column count. The vertical axis is intentionally
/// unbounded, the grid grows downward; non-negativity is carried by the
/// unsigned types.
pub fn fits_bounds(x: u32, _y: u32, w: u32, h: u32, cols: u32) -> bool {
    (1..=2).contains(&w) && (1..=2).contains(&h) && x.saturating_add(w) <= cols
}
