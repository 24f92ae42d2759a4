//! Core domain models for the catalog
//!
//! This crate contains:
//! - Domain models (Item, Category, ImageRef)
//! - Input validation for new items
//! - The error type surfaced to callers of the catalog

pub mod category;
pub mod error;
pub mod image;
pub mod item;

pub use category::{Category, CategoryId};
pub use error::{CatalogError, Result};
pub use image::{IMAGE_EXTENSION, ImageRef, ImageRefError};
pub use item::{Item, ItemId, NewItem};
