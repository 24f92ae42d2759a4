//! Catalog facade: composes the blob store, category registry and item store
//! into the operations the transport shell calls.

use catalog_core::{CatalogError, Category, Item, ItemId, NewItem, Result};
use catalog_storage::{BlobStore, Storage, StorageError};
use tracing::{debug, info, warn};

/// Image bytes returned by [`Catalog::fetch_image`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// True when the placeholder was served instead of the item's own image
    pub placeholder: bool,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    storage: Storage,
    blobs: BlobStore,
}

impl Catalog {
    pub fn new(storage: Storage, blobs: BlobStore) -> Self {
        Self { storage, blobs }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Validate, store the photo, then record the item under its category.
    ///
    /// Nothing is written when validation fails. The category and item rows
    /// are committed together; a blob stored before a failed commit stays on
    /// disk unreferenced.
    pub async fn add_item(&self, new_item: NewItem<'_>) -> Result<ItemId> {
        let image_bytes = new_item.validate()?;

        let image = self.blobs.put(image_bytes).await?;
        let (item_id, category_id) = self
            .storage
            .add_item(new_item.name, new_item.category, &image)
            .await?;

        info!(
            %item_id,
            %category_id,
            name = new_item.name,
            category = new_item.category,
            image = %image,
            "item added"
        );
        Ok(item_id)
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Item> {
        Ok(self.storage.items().get_by_id(id).await?)
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self.storage.items().list_all().await?)
    }

    pub async fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        Ok(self.storage.items().search_by_name(keyword).await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.storage.categories().list().await?)
    }

    /// Return the item's image, or the placeholder when the item or its blob
    /// is missing. A stored name that is not one of our blob identifiers is
    /// rejected with `InvalidPath` rather than served.
    pub async fn fetch_image(&self, id: ItemId) -> Result<FetchedImage> {
        let item = match self.storage.items().get_by_id(id).await {
            Ok(item) => item,
            Err(StorageError::ItemNotFound(_)) => {
                debug!(item_id = %id, "item not found, serving placeholder");
                return self.placeholder().await;
            }
            Err(e) => return Err(e.into()),
        };

        let (image, resolved) = self.blobs.locate(&item.image_name).await.map_err(|e| {
            warn!(item_id = %id, image = %item.image_name, "rejected image path");
            CatalogError::from(e)
        })?;

        if !resolved.exists {
            debug!(item_id = %id, image = %image, "image not found, serving placeholder");
            return self.placeholder().await;
        }

        match self.blobs.read(&image).await {
            Ok(bytes) => Ok(FetchedImage {
                bytes,
                placeholder: false,
            }),
            Err(StorageError::BlobNotFound(_)) => self.placeholder().await,
            Err(e) => Err(e.into()),
        }
    }

    async fn placeholder(&self) -> Result<FetchedImage> {
        let bytes = self.blobs.placeholder().await.map_err(|e| {
            warn!(
                path = %self.blobs.placeholder_path().display(),
                "placeholder image unavailable"
            );
            CatalogError::from(e)
        })?;

        Ok(FetchedImage {
            bytes,
            placeholder: true,
        })
    }
}
