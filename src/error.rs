use uuid::Uuid;

/// Errors surfaced by the editing core.
///
/// Out-of-bounds drawing, history boundaries and malformed palette imports are
/// not represented here. They are clipped, ignored or reported as `None`.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("ragged grid: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("layer {0} not found")]
    LayerNotFound(Uuid),

    #[error("layer {0} is locked")]
    LayerLocked(Uuid),

    #[error("cannot delete the last remaining layer")]
    LastLayer,

    #[error("layer {0} has no layer below it")]
    NoLayerBelow(Uuid),

    #[error("palette {0} not found")]
    PaletteNotFound(Uuid),

    /// The storage collaborator ran out of room; the caller should warn the user.
    #[error("storage quota exceeded: need {needed} bytes, limit is {limit}")]
    StorageQuotaExceeded { needed: usize, limit: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
