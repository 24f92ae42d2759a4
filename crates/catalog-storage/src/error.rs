//! Error types for catalog-storage

use catalog_core::CatalogError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    BlobNotFound(String),

    #[error("Refusing to store an empty blob")]
    EmptyInput,

    #[error("Category name must not be blank")]
    NameEmpty,

    #[error("Invalid image path: {0}")]
    InvalidPath(String),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                CatalogError::Conflict(db.to_string())
            }
            StorageError::Database(e) => CatalogError::StoreUnavailable(e.to_string()),
            StorageError::Io(e) => CatalogError::Io(e),
            StorageError::BlobNotFound(name) => CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("blob {name} is missing"),
            )),
            StorageError::EmptyInput => CatalogError::Validation("image is empty".to_string()),
            StorageError::NameEmpty => {
                CatalogError::Validation("category is required".to_string())
            }
            StorageError::InvalidPath(path) => CatalogError::InvalidPath(path),
            StorageError::ItemNotFound(id) => CatalogError::NotFound(id),
            StorageError::Other(e) => CatalogError::Other(e),
        }
    }
}
