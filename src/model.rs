//! # Layout Model
//!
//! The data the engine works on. An [`Arrangement`] is the in-memory
//! editing state: a fixed column count, a user-settable workspace height
//! (the "manual floor"), and the placed tiles. The wire documents
//! ([`LayoutDoc`], [`LayoutItem`]) are what crosses the client/server
//! boundary; field names are the snake_case wire names, so no renaming
//! attributes are needed.
//!
//! Content records are opaque here beyond their identifier: the engine
//! places tiles, it does not own the records they point at.

use serde::{Deserialize, Serialize};

/// A placed rectangle on the grid, bound to one content record.
///
/// Coordinates are grid cells, not pixels. `x + w <= cols` always; `y` is
/// unbounded because the grid grows downward. Sides are restricted to
/// {1,2}, giving exactly four footprints: 1x1, 2x1, 1x2, 2x2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub content_id: i64,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Tile {
    pub fn new(content_id: i64, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { content_id, x, y, w, h }
    }

    /// Exclusive right edge in cells.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge in cells.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

/// The full set of tiles plus grid dimensions at a point in time.
///
/// `manual_floor` is the minimum row count the operator has asked for,
/// independent of occupancy. The rendered row count is always derived, see
/// [`crate::rows::effective_rows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub cols: u32,
    pub manual_floor: u32,
    pub tiles: Vec<Tile>,
}

impl Arrangement {
    /// An empty arrangement with the given column count and a one-row
    /// workspace.
    pub fn empty(cols: u32) -> Self {
        Self {
            cols,
            manual_floor: 1,
            tiles: Vec::new(),
        }
    }

    pub fn tile(&self, content_id: i64) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.content_id == content_id)
    }

    /// Serialize for persistence: `{grid_cols, grid_rows, items}` where
    /// `grid_rows` carries the manual floor.
    pub fn to_doc(&self) -> LayoutDoc {
        LayoutDoc {
            grid_cols: self.cols,
            grid_rows: Some(self.manual_floor),
            items: self
                .tiles
                .iter()
                .map(|t| LayoutItem {
                    content_id: t.content_id,
                    x: t.x,
                    y: t.y,
                    w: t.w,
                    h: t.h,
                })
                .collect(),
        }
    }
}

/// The layout wire document, submitted on save and returned on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDoc {
    pub grid_cols: u32,
    /// Persisted workspace height. Optional on the wire; a missing value
    /// means "derive from the tiles".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_rows: Option<u32>,
    #[serde(default)]
    pub items: Vec<LayoutItem>,
}

/// One tile on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub content_id: i64,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl From<LayoutItem> for Tile {
    fn from(item: LayoutItem) -> Self {
        Tile::new(item.content_id, item.x, item.y, item.w, item.h)
    }
}

/// A content record as the engine sees it: an identifier plus the
/// denormalized display fields a tile preview renders. Lifecycle is owned
/// by the external content store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A tile joined with its content record, as returned from a load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedItem {
    pub content_id: i64,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The full load response: resolved dimensions, enriched items, and the
/// diagnostic counts that make a missing content record observable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedLayout {
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub items: Vec<EnrichedItem>,
    pub items_expected: usize,
    pub items_returned: usize,
}

/// Cross-view change notification. No payload beyond the key and a
/// timestamp; receivers re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeNote {
    LayoutSaved { layout_key: String, timestamp: u64 },
}

/// Wire shape of a validation verdict: `{ ok }` on success,
/// `{ ok: false, errors }` with one string per violated constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Summary of a validated layout document, for CLI and API callers.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutSummary {
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub item_count: usize,
}
