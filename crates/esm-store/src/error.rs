use std::path::PathBuf;

use esm::Tag;

use crate::reclist::CellKey;

/// Errors raised by the record store and cell resolution.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} record not found: {id:?}")]
    NotFound { kind: Tag, id: String },

    #[error("cell not found: {0}")]
    CellNotFound(CellKey),

    #[error("no cell has been selected")]
    NoCell,

    #[error(transparent)]
    Esm(#[from] esm::Error),

    #[error("load order error in {path}: {message}")]
    LoadOrder { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
