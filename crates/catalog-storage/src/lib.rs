//! Storage layer for the catalog
//!
//! This crate provides:
//! - SQLite database operations (category registry, item store)
//! - Blob storage (content-addressable, SHA-256)
//! - Migrations

pub mod blob;
pub mod categories;
pub mod db;
pub mod error;
pub mod items;
mod models;

pub use blob::{BlobStore, ResolvedBlob};
pub use categories::CategoryRegistry;
pub use db::Storage;
pub use error::{Result, StorageError};
pub use items::ItemStore;
