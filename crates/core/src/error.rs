use crate::dedup::DedupError;
use crate::document::DocumentError;
use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Dedup(#[from] DedupError),
}
