//! Database operations

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use catalog_core::{CategoryId, ImageRef, ItemId};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{debug, info};

use crate::{CategoryRegistry, ItemStore, Result};

/// How long a writer waits for the SQLite write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Main storage interface. Cheap to clone: all handles share one pool.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: SqlitePool,
    categories: CategoryRegistry,
    items: ItemStore,
}

impl Storage {
    /// Open (or create) the database at `db_path`, defaulting to the
    /// platform data directory, and run migrations.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.unwrap_or_else(Self::default_db_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "opened catalog database");
        Self::from_pool(pool).await
    }

    /// Private in-memory database; a single connection so every query sees it.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let storage = Self {
            categories: CategoryRegistry::new(pool.clone()),
            items: ItemStore::new(pool.clone()),
            pool,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                image_name TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    /// Resolve-or-create the category and insert the item in one transaction.
    ///
    /// Either both rows become visible or neither does.
    pub async fn add_item(
        &self,
        name: &str,
        category: &str,
        image: &ImageRef,
    ) -> Result<(ItemId, CategoryId)> {
        let mut tx = self.pool.begin().await?;

        let category_id = CategoryRegistry::resolve_in(&mut tx, category).await?;
        let item_id = ItemStore::insert_in(&mut tx, name, category_id, image).await?;

        tx.commit().await?;
        debug!(%item_id, %category_id, "committed item");

        Ok((item_id, category_id))
    }

    /// Default database location: `<data dir>/catalog.sqlite3`
    pub fn default_db_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "catalog", "catalog") {
            dirs.data_dir().join("catalog.sqlite3")
        } else {
            PathBuf::from("catalog.sqlite3")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(seed: u8) -> ImageRef {
        ImageRef::from_hex_digest(&format!("{:02x}", seed).repeat(32)).unwrap()
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.sqlite3");

        let first = Storage::new(Some(path.clone())).await.unwrap();
        first.add_item("Book", "Books", &image(1)).await.unwrap();
        drop(first);

        let reopened = Storage::new(Some(path)).await.unwrap();
        assert_eq!(reopened.items().list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_opens_paths_with_url_characters() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["b%20c", "a?mode=ro"] {
            let path = dir.path().join(name).join("catalog.sqlite3");
            let storage = Storage::new(Some(path.clone())).await.unwrap();
            storage.add_item("Book", "Books", &image(1)).await.unwrap();
            assert!(path.exists(), "database not created at {}", path.display());
        }
    }

    #[tokio::test]
    async fn test_add_item_reuses_category() {
        let storage = Storage::in_memory().await.unwrap();

        let (first_item, books) = storage.add_item("Book", "Books", &image(1)).await.unwrap();
        let (second_item, again) = storage.add_item("Novel", "Books", &image(2)).await.unwrap();
        let (_, kitchen) = storage.add_item("Spoon", "Kitchen", &image(3)).await.unwrap();

        assert_eq!(books, again);
        assert_ne!(books, kitchen);
        assert_ne!(first_item, second_item);
        assert_eq!(storage.categories().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_item_rolls_back_on_blank_category() {
        let storage = Storage::in_memory().await.unwrap();

        let result = storage.add_item("Book", "   ", &image(1)).await;
        assert!(matches!(result, Err(crate::StorageError::NameEmpty)));
        assert!(storage.items().list_all().await.unwrap().is_empty());
        assert!(storage.categories().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_requires_existing_category() {
        let storage = Storage::in_memory().await.unwrap();

        let result = storage
            .items()
            .insert("Orphan", CategoryId(999), &image(4))
            .await;
        assert!(result.is_err());
    }
}
