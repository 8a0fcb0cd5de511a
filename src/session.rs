//! # Editor Session
//!
//! One editing session owns one mutable [`Arrangement`] plus a dirty
//! flag. All mutation funnels through here: placement goes through the
//! engine, row edits through the row manager, and every committing path
//! is copy-then-swap, so a failed attempt leaves the committed state
//! bit-for-bit untouched. Nothing else in the crate holds a mutable
//! reference to an arrangement.

use crate::error::{PlaceError, RowError};
use crate::model::{Arrangement, Tile};
use crate::place::place;
use crate::rows;

/// Exclusive owner of the in-memory arrangement during an editing
/// session. The durable copy lives behind the layout store.
#[derive(Debug, Clone)]
pub struct EditorSession {
    arrangement: Arrangement,
    dirty: bool,
}

impl EditorSession {
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            arrangement,
            dirty: false,
        }
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Unsaved edits pending?
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the sync layer after a successful save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn effective_rows(&self) -> u32 {
        rows::effective_rows(&self.arrangement)
    }

    /// Commit a placement. On success the new tile set is swapped in and
    /// the session becomes dirty; on failure nothing changes.
    pub fn place_tile(
        &mut self,
        content_id: i64,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<(), PlaceError> {
        let next = place(
            &self.arrangement.tiles,
            self.arrangement.cols,
            content_id,
            x,
            y,
            w,
            h,
        )?;
        self.arrangement.tiles = next;
        self.dirty = true;
        Ok(())
    }

    /// Run the identical placement without committing. The returned set
    /// is what [`Self::place_tile`] would produce for the same target.
    pub fn preview(
        &self,
        content_id: i64,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<Vec<Tile>, PlaceError> {
        place(
            &self.arrangement.tiles,
            self.arrangement.cols,
            content_id,
            x,
            y,
            w,
            h,
        )
    }

    /// Change a tile's footprint in place. The origin is kept, so the
    /// placement engine resolves this as a direct move or a push, never
    /// a swap.
    pub fn resize_tile(&mut self, content_id: i64, w: u32, h: u32) -> Result<(), PlaceError> {
        let tile = self
            .arrangement
            .tile(content_id)
            .copied()
            .ok_or(PlaceError::UnknownTile(content_id))?;
        self.place_tile(content_id, tile.x, tile.y, w, h)
    }

    /// Drop a tile from the arrangement. Row count re-derives on its own;
    /// the dirty flag is untouched because removal persists immediately
    /// through the sync layer rather than being staged.
    pub fn remove_tile(&mut self, content_id: i64) -> bool {
        let before = self.arrangement.tiles.len();
        self.arrangement.tiles.retain(|t| t.content_id != content_id);
        self.arrangement.tiles.len() != before
    }

    pub fn insert_row_after(&mut self, index: i32) -> Result<(), RowError> {
        rows::insert_row_after(&mut self.arrangement, index)?;
        self.dirty = true;
        Ok(())
    }

    pub fn can_remove_row(&self, index: i32) -> Result<(), RowError> {
        rows::can_remove_row(&self.arrangement, index)
    }

    pub fn remove_row(&mut self, index: i32) -> Result<(), RowError> {
        rows::remove_row(&mut self.arrangement, index)?;
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaceError;

    fn session() -> EditorSession {
        EditorSession::new(Arrangement {
            cols: 2,
            manual_floor: 1,
            tiles: vec![Tile::new(1, 0, 0, 1, 1), Tile::new(2, 1, 0, 1, 1)],
        })
    }

    #[test]
    fn test_successful_place_marks_dirty() {
        let mut s = session();
        assert!(!s.is_dirty());
        s.place_tile(1, 0, 1, 1, 1).unwrap();
        assert!(s.is_dirty());
        assert_eq!(s.arrangement().tile(1).unwrap().y, 1);
    }

    #[test]
    fn test_failed_place_leaves_state_and_flag() {
        let mut s = session();
        let before = s.arrangement().clone();
        let err = s.place_tile(1, 1, 0, 2, 1).unwrap_err();
        assert!(matches!(err, PlaceError::OutOfBounds { .. }));
        assert_eq!(s.arrangement(), &before);
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_preview_matches_commit() {
        let mut s = session();
        let previewed = s.preview(1, 1, 0, 1, 1).unwrap();
        s.place_tile(1, 1, 0, 1, 1).unwrap();
        assert_eq!(&previewed, &s.arrangement().tiles);
    }

    #[test]
    fn test_preview_does_not_commit() {
        let s = session();
        let committed = s.arrangement().clone();
        let _ = s.preview(1, 1, 0, 1, 1).unwrap();
        assert_eq!(s.arrangement(), &committed);
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_resize_keeps_origin() {
        let mut s = EditorSession::new(Arrangement {
            cols: 2,
            manual_floor: 1,
            tiles: vec![Tile::new(1, 0, 0, 1, 1)],
        });
        s.resize_tile(1, 2, 2).unwrap();
        let t = s.arrangement().tile(1).unwrap();
        assert_eq!((t.x, t.y, t.w, t.h), (0, 0, 2, 2));
    }

    #[test]
    fn test_remove_tile_does_not_stage_dirty() {
        let mut s = session();
        assert!(s.remove_tile(2));
        assert!(!s.is_dirty());
        assert!(!s.remove_tile(2), "second removal finds nothing");
    }

    #[test]
    fn test_row_edits_mark_dirty() {
        let mut s = session();
        s.insert_row_after(-1).unwrap();
        assert!(s.is_dirty());
        assert_eq!(s.arrangement().tile(1).unwrap().y, 1);
    }
}
