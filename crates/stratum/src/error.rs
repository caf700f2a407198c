//! Error types for the Stratum library.

use thiserror::Error;

use crate::model::{LayerId, RecordId};

/// Main error type for Stratum operations.
#[derive(Debug, Error)]
pub enum StratumError {
    /// A record identifier could not be resolved to any current version.
    ///
    /// Pipelines treat this as locally recoverable: the affected entity is
    /// skipped and recorded in the stage report.
    #[error("Unable to resolve record '{id}' to a current version")]
    Resolution { id: RecordId },

    /// A required plugin layer is absent from the load order. Fatal.
    #[error("Missing required layer '{layer}'")]
    MissingDependency { layer: LayerId },

    /// The one-time search for the canonical annotation found nothing. Fatal.
    #[error("Unable to find the canonical annotation in the canonical layer")]
    CanonicalAnnotationNotFound,

    /// The shared set record named by the engine config is not declared in
    /// the canonical layer. Fatal.
    #[error("Unable to find canonical set record labeled '{label}'")]
    CanonicalSourceNotFound { label: String },

    /// Error saving or loading a dataset or layer file.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Stratum operations.
pub type Result<T> = std::result::Result<T, StratumError>;
