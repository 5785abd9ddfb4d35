#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {path}")]
    NotFound { path: String },

    #[error("Batch of {ops} operations exceeds the store limit of {max}")]
    BatchTooLarge { ops: usize, max: usize },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}
