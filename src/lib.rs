//! # Gridwall
//!
//! A tile grid engine for content layouts.
//!
//! Most CMS grid editors validate placement only in the client and trust
//! whatever layout the browser posts back. That produces overlapping
//! tiles after a race, orphaned rows after a bad drag, and content
//! records pinned to two cells at once.
//!
//! Gridwall does the opposite: **the server re-proves every invariant.**
//! The client-side engine and the server-side validator derive the same
//! predicates independently. The editor gets fast previews; the store
//! gets layouts that are overlap-free, in-bounds, and duplicate-free no
//! matter what was submitted.
//!
//! ## Architecture
//!
//! ```text
//! Pointer events
//!       |
//!  [interact]   - drag lifecycle, px -> cell conversion
//!       |
//!  [place]      - direct / swap / push placement, shared by
//!  [rows]         preview and commit; row derivation and edits
//!       |
//!  [session]    - one owned Arrangement + dirty flag
//!       |
//!  [sync]       - load/seed/save, cross-view change notes
//!       |
//!  [validator]  - independent re-validation, atomic replace
//! ```

pub mod error;
pub mod geometry;
pub mod interact;
pub mod model;
pub mod place;
pub mod rows;
pub mod session;
pub mod sync;
pub mod validator;

pub use error::GridwallError;

use model::{LayoutDoc, LayoutSummary};

/// Validate a layout wire document.
///
/// This is the primary server entry point: parse, then re-derive every
/// invariant. Returns the full violation list on rejection.
pub fn validate_doc(doc: &LayoutDoc) -> Result<(), GridwallError> {
    let errors = validator::validate_layout(doc);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GridwallError::ValidationError(errors))
    }
}

/// Validate a layout document given as JSON.
pub fn validate_json(json: &str) -> Result<(), GridwallError> {
    let doc: LayoutDoc = serde_json::from_str(json)?;
    validate_doc(&doc)
}

/// Validate a JSON document and shape the verdict the way the save
/// endpoint replies: `{ ok: true }` or `{ ok: false, errors: [...] }`.
/// Anything that is not a validation verdict (a parse failure, say)
/// collapses into a single readable message.
pub fn validate_json_reply(json: &str) -> model::ValidationReply {
    match validate_json(json) {
        Ok(()) => model::ValidationReply {
            ok: true,
            errors: Vec::new(),
        },
        Err(GridwallError::ValidationError(errors)) => model::ValidationReply { ok: false, errors },
        Err(other) => model::ValidationReply {
            ok: false,
            errors: vec![other.to_string()],
        },
    }
}

/// Parse, validate, and summarize a layout document given as JSON.
pub fn summarize_json(json: &str) -> Result<LayoutSummary, GridwallError> {
    let doc: LayoutDoc = serde_json::from_str(json)?;
    validate_doc(&doc)?;
    let tiles: Vec<model::Tile> = doc.items.iter().copied().map(model::Tile::from).collect();
    let rows = doc
        .grid_rows
        .unwrap_or(0)
        .max(rows::needed_rows(&tiles))
        .max(1);
    Ok(LayoutSummary {
        grid_cols: doc.grid_cols,
        grid_rows: rows,
        item_count: doc.items.len(),
    })
}
