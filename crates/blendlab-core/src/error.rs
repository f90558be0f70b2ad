use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BlendError {
    #[error("the blend is empty. Add at least one oil before analyzing")]
    EmptyBlend,

    #[error("no API key configured. Run `blendlab key set <KEY>` or set BLENDLAB_API_KEY")]
    MissingCredential,

    #[error("analysis service failed: {0}")]
    Service(String),

    #[error("{0}")]
    Validation(String),

    #[error("saved blend '{0}' not found")]
    NotFound(String),

    #[error("unknown oil '{0}'. Run `blendlab oils list` to see available oils")]
    UnknownOil(String),

    #[error("composition of '{0}' is out of numeric range. Check the catalog percentages and drop counts")]
    Overflow(String),

    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("storage error for '{key}': {reason}")]
    Storage { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BlendError {
    /// Whether the caller should prompt for credential entry.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, BlendError::MissingCredential)
    }
}
