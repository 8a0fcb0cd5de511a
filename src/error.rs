//! Structured error types for the Gridwall engine.
//!
//! Three families cover the real failure sources: wire parsing, local
//! geometry failures during an editing gesture, and server-side rejection
//! of a submitted layout. Geometry failures never touch committed state;
//! validation failures block the save and carry every violation, not just
//! the first.

use std::fmt;

/// The unified error type returned by the public Gridwall API.
#[derive(Debug)]
pub enum GridwallError {
    /// JSON input failed to parse as a layout document.
    ParseError {
        source: serde_json::Error,
        hint: String,
    },
    /// A placement attempt failed; the committed arrangement is unchanged.
    PlaceError(PlaceError),
    /// A row operation was rejected; the arrangement is unchanged.
    RowError(RowError),
    /// The validator rejected a submitted layout. Carries the full list of
    /// violations so the operator can fix all of them in one pass.
    ValidationError(Vec<String>),
    /// A store call failed outside the validation path (malformed response,
    /// missing layout, poisoned backend).
    TransportError(String),
}

impl fmt::Display for GridwallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridwallError::ParseError { source, hint } => {
                write!(f, "Failed to parse layout: {}", source)?;
                if !hint.is_empty() {
                    write!(f, "\n  Hint: {}", hint)?;
                }
                Ok(())
            }
            GridwallError::PlaceError(e) => write!(f, "Placement error: {}", e),
            GridwallError::RowError(e) => write!(f, "Row error: {}", e),
            GridwallError::ValidationError(errors) => {
                write!(f, "Layout rejected with {} violation(s):", errors.len())?;
                for err in errors {
                    write!(f, "\n  - {}", err)?;
                }
                Ok(())
            }
            GridwallError::TransportError(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for GridwallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridwallError::ParseError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GridwallError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the layout schema. Coordinates and sizes must be non-negative integers.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input — is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        GridwallError::ParseError { source: e, hint }
    }
}

impl From<PlaceError> for GridwallError {
    fn from(e: PlaceError) -> Self {
        GridwallError::PlaceError(e)
    }
}

impl From<RowError> for GridwallError {
    fn from(e: RowError) -> Self {
        GridwallError::RowError(e)
    }
}

/// Why a single placement attempt was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    /// The target rectangle fails the bounds check (`x + w > cols`, or a
    /// side outside {1,2}).
    OutOfBounds { x: u32, y: u32, w: u32, h: u32 },
    /// The push-cascade did not settle within the guard limit.
    PushOverflow,
    /// The moving `content_id` is not part of the arrangement.
    UnknownTile(i64),
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceError::OutOfBounds { x, y, w, h } => {
                write!(f, "target ({}, {}) {}x{} is out of bounds", x, y, w, h)
            }
            PlaceError::PushOverflow => write!(f, "push cascade did not settle"),
            PlaceError::UnknownTile(id) => write!(f, "no tile with content_id {}", id),
        }
    }
}

impl std::error::Error for PlaceError {}

/// Why a row operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    /// The workspace height is already at its minimum of one row.
    Min1,
    /// The row is covered by at least one tile.
    NotEmpty,
    /// Removing the row would leave a tile below the new workspace height.
    WouldCut,
    /// The index is outside the manually controlled row range.
    NotInManual,
    /// The index is not a usable row index at all.
    BadIndex,
}

impl RowError {
    /// Stable reason code, as reported to editor surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            RowError::Min1 => "min_1",
            RowError::NotEmpty => "not_empty",
            RowError::WouldCut => "would_cut",
            RowError::NotInManual => "not_in_manual",
            RowError::BadIndex => "bad_index",
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::Min1 => write!(f, "workspace cannot shrink below one row"),
            RowError::NotEmpty => write!(f, "row is not empty"),
            RowError::WouldCut => write!(f, "removal would cut off a tile"),
            RowError::NotInManual => write!(f, "row is outside the workspace height"),
            RowError::BadIndex => write!(f, "bad row index"),
        }
    }
}

impl std::error::Error for RowError {}
