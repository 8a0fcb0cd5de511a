//! # Row Manager
//!
//! The row count of an arrangement is never stored as truth: it is
//! derived from the lowest tile edge and the operator's manual workspace
//! floor, whichever is larger. The operations here keep that derivation
//! honest. Insertion is always safe (it only pushes tiles down); removal
//! goes through a full simulation first and fails with a reason code when
//! any invariant would break.
//!
//! Everything in this module is pure decision logic. Row affordances in
//! an editor surface (insert/remove buttons, boundary handles) are meant
//! to be read-only consumers of [`row_is_empty`], [`can_remove_row`] and
//! [`row_boundary_is_clear`].

use log::debug;

use crate::error::RowError;
use crate::model::{Arrangement, Tile};

/// Lowest occupied row edge: `max(tile.y + tile.h)`, 0 for an empty set.
pub fn needed_rows(tiles: &[Tile]) -> u32 {
    tiles.iter().map(|t| t.bottom()).max().unwrap_or(0)
}

/// The row count actually rendered: `max(manual_floor, needed_rows, 1)`.
pub fn effective_rows(arr: &Arrangement) -> u32 {
    arr.manual_floor.max(needed_rows(&arr.tiles)).max(1)
}

/// Insert an empty row after `index`. `-1` means "before the first row".
///
/// Every tile strictly below the boundary moves down one row and the
/// workspace floor grows by one. Insertion cannot violate any spatial
/// invariant, so the only rejection is a nonsensical index.
pub fn insert_row_after(arr: &mut Arrangement, index: i32) -> Result<(), RowError> {
    if index < -1 {
        return Err(RowError::BadIndex);
    }
    for tile in &mut arr.tiles {
        if i64::from(tile.y) > i64::from(index) {
            tile.y += 1;
        }
    }
    arr.manual_floor += 1;
    debug!(
        "rows: inserted after {}, floor now {}",
        index, arr.manual_floor
    );
    Ok(())
}

/// True iff no tile's vertical span covers `index`.
pub fn row_is_empty(arr: &Arrangement, index: u32) -> bool {
    !arr.tiles.iter().any(|t| t.y <= index && index < t.bottom())
}

/// True iff no tile spans across the boundary between rows `index` and
/// `index + 1`, i.e. it is safe to offer a row-insert affordance there.
pub fn row_boundary_is_clear(arr: &Arrangement, index: u32) -> bool {
    !arr.tiles
        .iter()
        .any(|t| t.y <= index && t.bottom() >= index + 2)
}

/// Check whether row `index` can be removed without breaking invariants.
///
/// Checks, in order: the index addresses a manual row at all, the floor
/// stays above one, the row is empty, and a simulated removal leaves no
/// tile below the shrunk workspace.
pub fn can_remove_row(arr: &Arrangement, index: i32) -> Result<(), RowError> {
    if index < 0 {
        return Err(RowError::BadIndex);
    }
    let row = index as u32;
    if row >= arr.manual_floor {
        return Err(RowError::NotInManual);
    }
    if arr.manual_floor <= 1 {
        return Err(RowError::Min1);
    }
    if !row_is_empty(arr, row) {
        return Err(RowError::NotEmpty);
    }
    // Simulate: tiles below the removed row shift up, the floor shrinks.
    let shifted_needed = arr
        .tiles
        .iter()
        .map(|t| {
            let y = if t.y > row { t.y - 1 } else { t.y };
            y + t.h
        })
        .max()
        .unwrap_or(0);
    if shifted_needed > arr.manual_floor - 1 {
        return Err(RowError::WouldCut);
    }
    Ok(())
}

/// Remove row `index` after [`can_remove_row`] succeeds.
pub fn remove_row(arr: &mut Arrangement, index: i32) -> Result<(), RowError> {
    can_remove_row(arr, index)?;
    let row = index as u32;
    for tile in &mut arr.tiles {
        if tile.y > row {
            tile.y -= 1;
        }
    }
    arr.manual_floor -= 1;
    debug!("rows: removed {}, floor now {}", index, arr.manual_floor);
    Ok(())
}
