//! # Layout Synchronization
//!
//! Glue between the editing session and the outside world: load content
//! records and the persisted arrangement, synthesize a default layout
//! when none exists, serialize for persistence, and broadcast a change
//! note after a successful save so other open views can re-fetch.
//!
//! The stores are trait seams. The engine does not care whether they are
//! HTTP calls or tables; the in-memory implementations in this crate and
//! in [`crate::validator`] are enough to exercise every path.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};

use crate::error::GridwallError;
use crate::model::{
    Arrangement, ChangeNote, ContentRecord, EnrichedItem, LayoutDoc, LoadedLayout, Tile,
};
use crate::rows::needed_rows;
use crate::session::EditorSession;

/// Source of content records. Owned by the external content CRUD, which
/// is out of scope here beyond this interface.
pub trait ContentStore {
    fn load_records(&self) -> Result<Vec<ContentRecord>, GridwallError>;
}

/// Durable home of layout documents. `save` is expected to validate and
/// reject with [`GridwallError::ValidationError`]; `delete_item` is the
/// immediate per-tile removal path.
pub trait LayoutStore {
    fn load(&self, key: &str) -> Result<Option<LayoutDoc>, GridwallError>;
    fn save(&self, key: &str, doc: &LayoutDoc) -> Result<(), GridwallError>;
    fn delete_item(&self, key: &str, content_id: i64) -> Result<(), GridwallError>;
}

/// A fixed list of content records; the test and CLI stand-in for the
/// real content store.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    records: Vec<ContentRecord>,
}

impl InMemoryContentStore {
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self { records }
    }
}

impl ContentStore for InMemoryContentStore {
    fn load_records(&self) -> Result<Vec<ContentRecord>, GridwallError> {
        Ok(self.records.clone())
    }
}

/// Fire-and-forget fan-out of [`ChangeNote`]s. Receivers that went away
/// are skipped; there is no delivery guarantee and no payload beyond the
/// key and a timestamp, so a missed note only costs a refresh.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<ChangeNote>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register another view. The returned receiver yields one note per
    /// successful save until the notifier is dropped.
    pub fn subscribe(&self) -> Receiver<ChangeNote> {
        let (tx, rx) = unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// Broadcast a saved-layout note. Disconnected subscribers are
    /// pruned on the way through.
    pub fn notify_saved(&self, layout_key: &str) {
        let note = ChangeNote::LayoutSaved {
            layout_key: layout_key.to_string(),
            timestamp: unix_now(),
        };
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| tx.send(note.clone()).is_ok());
        debug!(
            "sync: notified {} view(s) of save for '{}'",
            subs.len(),
            layout_key
        );
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Load a layout and its content into a fresh editing session.
///
/// When no arrangement is persisted, each record gets a 1x1 tile filling
/// across the columns in record order. The manual floor is always
/// re-derived as `max(persisted_floor, needed_rows, 1)` so a layout saved
/// with trailing empty rows never comes back with tiles clipped.
pub fn load_session(
    content: &dyn ContentStore,
    layouts: &dyn LayoutStore,
    key: &str,
    default_cols: u32,
) -> Result<(EditorSession, LoadedLayout), GridwallError> {
    let records = content.load_records()?;
    let persisted = layouts.load(key)?;

    let arrangement = match persisted {
        Some(doc) => {
            let tiles: Vec<Tile> = doc.items.into_iter().map(Tile::from).collect();
            let floor = doc
                .grid_rows
                .unwrap_or(0)
                .max(needed_rows(&tiles))
                .max(1);
            Arrangement {
                cols: doc.grid_cols,
                manual_floor: floor,
                tiles,
            }
        }
        None => seed_default(&records, default_cols),
    };

    let loaded = enrich(&arrangement, &records);
    info!(
        "sync: loaded '{}': {} of {} item(s) resolved on a {}x{} grid",
        key, loaded.items_returned, loaded.items_expected, loaded.grid_cols, loaded.grid_rows
    );
    Ok((EditorSession::new(arrangement), loaded))
}

/// Default arrangement for first use: one 1x1 tile per record, filling
/// across the columns left to right before opening a new row.
fn seed_default(records: &[ContentRecord], cols: u32) -> Arrangement {
    let cols = cols.max(1);
    let tiles: Vec<Tile> = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let i = i as u32;
            Tile::new(rec.id, i % cols, i / cols, 1, 1)
        })
        .collect();
    let floor = needed_rows(&tiles).max(1);
    Arrangement {
        cols,
        manual_floor: floor,
        tiles,
    }
}

/// Join tiles with their records. Tiles whose record has gone missing
/// stay in the arrangement but are absent from the enriched items; the
/// diagnostic counts make that visible.
fn enrich(arrangement: &Arrangement, records: &[ContentRecord]) -> LoadedLayout {
    let items: Vec<EnrichedItem> = arrangement
        .tiles
        .iter()
        .filter_map(|t| {
            let rec = records.iter().find(|r| r.id == t.content_id)?;
            Some(EnrichedItem {
                content_id: t.content_id,
                x: t.x,
                y: t.y,
                w: t.w,
                h: t.h,
                badge: rec.badge.clone(),
                title: rec.title.clone(),
                excerpt: rec.excerpt.clone(),
                body: rec.body.clone(),
                date: rec.date.clone(),
                image: rec.image.clone(),
            })
        })
        .collect();
    LoadedLayout {
        grid_cols: arrangement.cols,
        grid_rows: crate::rows::effective_rows(arrangement),
        items_expected: arrangement.tiles.len(),
        items_returned: items.len(),
        items,
    }
}

/// Serialize the session and submit it. On success the dirty flag clears
/// and other views are notified; on rejection the session stays dirty so
/// the operator can fix and retry.
pub fn save_session(
    session: &mut EditorSession,
    layouts: &dyn LayoutStore,
    notifier: &ChangeNotifier,
    key: &str,
) -> Result<(), GridwallError> {
    let doc = session.arrangement().to_doc();
    layouts.save(key, &doc)?;
    session.mark_clean();
    notifier.notify_saved(key);
    info!("sync: saved '{}' ({} item(s))", key, doc.items.len());
    Ok(())
}

/// Remove a tile and persist the removal immediately. Unlike placements,
/// removal is not staged as dirty: it is destructive and cross-record,
/// so it writes through right away.
pub fn remove_and_persist(
    session: &mut EditorSession,
    layouts: &dyn LayoutStore,
    key: &str,
    content_id: i64,
) -> Result<bool, GridwallError> {
    if !session.remove_tile(content_id) {
        return Ok(false);
    }
    layouts.delete_item(key, content_id)?;
    info!("sync: removed content {} from '{}'", content_id, key);
    Ok(true)
}
