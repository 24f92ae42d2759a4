//! Item domain model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CatalogError;

/// Store-assigned item identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = CatalogError;

    /// Parse an externally supplied id. Anything that is not a positive
    /// integer is a validation error, distinct from a missing item.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(ItemId(id)),
            _ => Err(CatalogError::Validation(format!("invalid item id: {s:?}"))),
        }
    }
}

/// An item as seen by readers: the category is projected by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub image_name: String,
}

/// Input for adding an item
#[derive(Debug, Clone, Copy)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub image: Option<&'a [u8]>,
}

impl<'a> NewItem<'a> {
    pub fn new(name: &'a str, category: &'a str, image: &'a [u8]) -> Self {
        Self {
            name,
            category,
            image: Some(image),
        }
    }

    /// Reject blank fields and missing or empty images before anything is written.
    pub fn validate(&self) -> Result<&'a [u8], CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation("name is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(CatalogError::Validation("category is required".to_string()));
        }
        match self.image {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(CatalogError::Validation("image is required".to_string())),
        }
    }
}
