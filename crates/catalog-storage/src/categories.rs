//! Category registry: get-or-create of category names

use catalog_core::{Category, CategoryId};
use sqlx::SqliteConnection;
use sqlx::sqlite::SqlitePool;

use crate::models::CategoryRow;
use crate::{Result, StorageError};

/// Maps category names to stable ids.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    pool: SqlitePool,
}

impl CategoryRegistry {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Return the id for `name`, creating the category on first use.
    pub async fn resolve(&self, name: &str) -> Result<CategoryId> {
        let mut tx = self.pool.begin().await?;
        let id = Self::resolve_in(&mut tx, name).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Get-or-create on an existing connection or transaction.
    ///
    /// The insert runs first and is a no-op when the name already exists, so
    /// the write lock is taken before the read and concurrent callers always
    /// read back the single row guarded by `UNIQUE(name)`.
    pub async fn resolve_in(conn: &mut SqliteConnection, name: &str) -> Result<CategoryId> {
        if name.trim().is_empty() {
            return Err(StorageError::NameEmpty);
        }

        let inserted =
            sqlx::query("INSERT INTO categories (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(&mut *conn)
                .await?;

        let id: i64 = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;

        if inserted.rows_affected() > 0 {
            tracing::info!(category = name, id, "created category");
        }

        Ok(CategoryId(id))
    }

    /// Look up a category without creating it.
    pub async fn find(&self, name: &str) -> Result<Option<CategoryId>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.map(CategoryId))
    }

    /// All categories in creation order.
    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Storage, StorageError};

    #[tokio::test]
    async fn test_resolve_creates_once() {
        let storage = Storage::in_memory().await.unwrap();
        let registry = storage.categories();

        let books = registry.resolve("Books").await.unwrap();
        assert_eq!(registry.resolve("Books").await.unwrap(), books);
        assert_eq!(registry.find("Books").await.unwrap(), Some(books));
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let storage = Storage::in_memory().await.unwrap();
        let registry = storage.categories();

        let lower = registry.resolve("books").await.unwrap();
        let upper = registry.resolve("Books").await.unwrap();
        assert_ne!(lower, upper);

        let names: Vec<String> = registry
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["books", "Books"]);
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_name() {
        let storage = Storage::in_memory().await.unwrap();

        for name in ["", "  ", "\t"] {
            assert!(matches!(
                storage.categories().resolve(name).await,
                Err(StorageError::NameEmpty)
            ));
        }
        assert!(storage.categories().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_unknown() {
        let storage = Storage::in_memory().await.unwrap();
        assert_eq!(storage.categories().find("Toys").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolve_yields_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("race.sqlite3")))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = storage.categories().clone();
            handles.push(tokio::spawn(async move {
                registry.resolve("Garden").await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(storage.categories().list().await.unwrap().len(), 1);
    }
}
