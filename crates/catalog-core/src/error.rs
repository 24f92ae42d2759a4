use thiserror::Error;

/// Errors surfaced by catalog operations.
///
/// Each variant maps onto one transport-level outcome: `Validation` and
/// `InvalidPath` are caller mistakes, `NotFound` is a missing item, the rest
/// are server-side failures.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    NotFound(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image path: {0}")]
    InvalidPath(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl CatalogError {
    /// True for errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_) | CatalogError::NotFound(_) | CatalogError::InvalidPath(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
