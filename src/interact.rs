//! # Interaction Controller
//!
//! Pointer-driven drag lifecycle for one grid surface. The machine is
//! `Idle -> PendingDrag -> Dragging -> Idle`: a pointer-down inside a
//! tile body claims the tile, a move past a small pixel threshold starts
//! the drag, and release either commits the last previewed target or,
//! if the threshold was never crossed, reports a plain click so the
//! caller can open the tile's editor.
//!
//! The controller never touches committed state during a drag. Every
//! move runs the engine's preview and hands the hypothetical tile set to
//! the renderer; only the release commits, through the session. Action
//! controls inside a tile (resize, remove) are expected to swallow their
//! own pointer events, so a down that reaches this controller is a grab.

use log::debug;

use crate::error::PlaceError;
use crate::model::Tile;
use crate::session::EditorSession;

/// Movement below this many pixels is a click, not a drag.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

/// Pixel frame of the grid surface: where the grid box sits and how big
/// one cell is on screen.
#[derive(Debug, Clone, Copy)]
pub struct GridMetrics {
    pub left: f64,
    pub top: f64,
    pub cell_w: f64,
    pub cell_h: f64,
}

impl GridMetrics {
    /// Convert a pointer position to the grid cell a `w x h` tile should
    /// take: offset into the grid box, scaled to cells, the footprint
    /// recentered on the pointer, rounded to the nearest cell, then
    /// clamped to `x in [0, cols-w]` and `y >= 0` (rows can grow).
    pub fn target_cell(&self, px: f64, py: f64, w: u32, h: u32, cols: u32) -> (u32, u32) {
        let gx = (px - self.left) / self.cell_w;
        let gy = (py - self.top) / self.cell_h;
        let x = (gx - f64::from(w) / 2.0).round();
        let y = (gy - f64::from(h) / 2.0).round();
        let max_x = f64::from(cols.saturating_sub(w));
        (x.clamp(0.0, max_x) as u32, y.max(0.0) as u32)
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Pending {
        tile: i64,
        start: (f64, f64),
        size: (u32, u32),
    },
    Dragging {
        tile: i64,
        size: (u32, u32),
        target: (u32, u32),
    },
}

/// What the renderer should paint after a pointer move.
#[derive(Debug, Clone, PartialEq)]
pub enum DragFrame {
    /// No drag in progress; paint the committed layout.
    Idle,
    /// Claimed but below the threshold; paint the committed layout.
    Pending,
    /// Live preview of the hypothetical tile set. Cells covered by it
    /// should hide their empty-cell affordances.
    Preview(Vec<Tile>),
    /// The previewed target was not placeable; fall back to the
    /// committed layout.
    Reverted,
}

/// What happened on pointer release.
#[derive(Debug, PartialEq)]
pub enum DragOutcome {
    /// No tile was claimed.
    Idle,
    /// The pointer never crossed the threshold: open this tile's editor,
    /// no placement occurred.
    Click(i64),
    /// A drag ended; `result` is the committing placement's verdict.
    Dropped {
        content_id: i64,
        result: Result<(), PlaceError>,
    },
}

/// Per-surface drag state machine. One controller drives one grid; a
/// drag claims its tile until the pointer is released.
#[derive(Debug)]
pub struct DragController {
    metrics: GridMetrics,
    threshold: f64,
    phase: Phase,
}

impl DragController {
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics,
            threshold: DRAG_THRESHOLD_PX,
            phase: Phase::Idle,
        }
    }

    /// The grid box moved or was resized.
    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        self.metrics = metrics;
    }

    /// The tile currently claimed by a pending or active drag.
    pub fn claimed(&self) -> Option<i64> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pending { tile, .. } | Phase::Dragging { tile, .. } => Some(tile),
        }
    }

    /// Pointer-down on a tile body. Returns false when another tile is
    /// already claimed or the id is not in the arrangement.
    pub fn pointer_down(
        &mut self,
        session: &EditorSession,
        content_id: i64,
        px: f64,
        py: f64,
    ) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            return false;
        }
        let Some(tile) = session.arrangement().tile(content_id) else {
            return false;
        };
        self.phase = Phase::Pending {
            tile: content_id,
            start: (px, py),
            size: (tile.w, tile.h),
        };
        true
    }

    /// Pointer moved. Promotes a pending claim past the threshold and
    /// refreshes the preview while dragging.
    pub fn pointer_move(&mut self, session: &EditorSession, px: f64, py: f64) -> DragFrame {
        match self.phase {
            Phase::Idle => DragFrame::Idle,
            Phase::Pending { tile, start, size } => {
                let dist = (px - start.0).hypot(py - start.1);
                if dist <= self.threshold {
                    return DragFrame::Pending;
                }
                debug!("drag: {} crossed threshold ({:.1}px)", tile, dist);
                self.phase = Phase::Dragging {
                    tile,
                    size,
                    target: (0, 0),
                };
                self.pointer_move(session, px, py)
            }
            Phase::Dragging { tile, size, .. } => {
                let cols = session.arrangement().cols;
                let (x, y) = self.metrics.target_cell(px, py, size.0, size.1, cols);
                self.phase = Phase::Dragging {
                    tile,
                    size,
                    target: (x, y),
                };
                match session.preview(tile, x, y, size.0, size.1) {
                    Ok(tiles) => DragFrame::Preview(tiles),
                    Err(_) => DragFrame::Reverted,
                }
            }
        }
    }

    /// Pointer released. Resolves the gesture and returns to idle.
    pub fn pointer_up(&mut self, session: &mut EditorSession) -> DragOutcome {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match phase {
            Phase::Idle => DragOutcome::Idle,
            Phase::Pending { tile, .. } => DragOutcome::Click(tile),
            Phase::Dragging { tile, size, target } => {
                let result = session.place_tile(tile, target.0, target.1, size.0, size.1);
                if let Err(ref e) = result {
                    debug!("drag: drop of {} rejected: {}", tile, e);
                }
                DragOutcome::Dropped {
                    content_id: tile,
                    result,
                }
            }
        }
    }

    /// Abandon the gesture without placing anything.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}
