//! # Server-Side Validator
//!
//! The client is not trusted. Whatever the editor thinks it proved, the
//! store re-derives every invariant from scratch before anything is
//! persisted: per-item bounds and footprints, duplicate assignments, and
//! the full pairwise overlap check. A submission either passes whole or
//! is rejected whole, with one message per violation so the operator
//! sees everything at once instead of fixing errors one round-trip at a
//! time.

use std::collections::HashMap;
use std::sync::Mutex;

use log::warn;

use crate::error::GridwallError;
use crate::geometry::overlaps;
use crate::model::{LayoutDoc, Tile};
use crate::sync::LayoutStore;

/// Accepted column range for a layout document.
pub const MIN_COLS: u32 = 1;
pub const MAX_COLS: u32 = 24;
/// Accepted workspace height range when one is submitted.
pub const MIN_ROWS: u32 = 1;
pub const MAX_ROWS: u32 = 3000;

/// Re-derive every invariant over a submitted document. Returns the full
/// list of violations; an empty list means the document is acceptable.
pub fn validate_layout(doc: &LayoutDoc) -> Vec<String> {
    let mut errors = Vec::new();

    if !(MIN_COLS..=MAX_COLS).contains(&doc.grid_cols) {
        errors.push(format!(
            "grid_cols out of range ({}..={}): {}",
            MIN_COLS, MAX_COLS, doc.grid_cols
        ));
    }
    if let Some(rows) = doc.grid_rows {
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            errors.push(format!(
                "grid_rows out of range ({}..={}): {}",
                MIN_ROWS, MAX_ROWS, rows
            ));
        }
    }

    for (i, item) in doc.items.iter().enumerate() {
        if item.content_id <= 0 {
            errors.push(format!(
                "Item #{}: content_id must be positive (got {})",
                i, item.content_id
            ));
        }
        if !(1..=2).contains(&item.w) || !(1..=2).contains(&item.h) {
            errors.push(format!(
                "Item #{}: invalid footprint {}x{} (sides must be 1 or 2)",
                i, item.w, item.h
            ));
        } else if item.x.saturating_add(item.w) > doc.grid_cols {
            errors.push(format!("Item #{}: out of bounds (x+w > grid_cols)", i));
        }
    }

    let mut seen: HashMap<i64, usize> = HashMap::new();
    for item in &doc.items {
        *seen.entry(item.content_id).or_insert(0) += 1;
    }
    let mut duplicates: Vec<i64> = seen
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(id, _)| id)
        .collect();
    duplicates.sort_unstable();
    for id in duplicates {
        errors.push(format!("Duplicate content_id in layout: {}", id));
    }

    let tiles: Vec<Tile> = doc.items.iter().copied().map(Tile::from).collect();
    for i in 0..tiles.len() {
        for j in (i + 1)..tiles.len() {
            if overlaps(&tiles[i], &tiles[j]) {
                errors.push(format!(
                    "Overlap between items {} (content {}) and {} (content {})",
                    i, tiles[i].content_id, j, tiles[j].content_id
                ));
            }
        }
    }

    errors
}

/// In-memory layout store with the same contract a database-backed one
/// has: validate first, then replace the stored tile set atomically.
#[derive(Debug, Default)]
pub struct InMemoryLayoutStore {
    layouts: Mutex<HashMap<String, LayoutDoc>>,
}

impl InMemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for InMemoryLayoutStore {
    fn load(&self, key: &str) -> Result<Option<LayoutDoc>, GridwallError> {
        let layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        Ok(layouts.get(key).cloned())
    }

    fn save(&self, key: &str, doc: &LayoutDoc) -> Result<(), GridwallError> {
        let errors = validate_layout(doc);
        if !errors.is_empty() {
            warn!(
                "validator: rejected '{}' with {} violation(s)",
                key,
                errors.len()
            );
            return Err(GridwallError::ValidationError(errors));
        }
        // Full replace: the previous tile set is discarded, not diffed.
        let mut layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        layouts.insert(key.to_string(), doc.clone());
        Ok(())
    }

    fn delete_item(&self, key: &str, content_id: i64) -> Result<(), GridwallError> {
        let mut layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(doc) = layouts.get_mut(key) {
            doc.items.retain(|item| item.content_id != content_id);
        }
        Ok(())
    }
}
