//! Item store: durable item records joined with their category name

use catalog_core::{CategoryId, ImageRef, Item, ItemId};
use sqlx::SqliteConnection;
use sqlx::sqlite::SqlitePool;

use crate::models::ItemRow;
use crate::{Result, StorageError};

const SELECT_ITEMS: &str = r#"
    SELECT items.id, items.name, categories.name AS category, items.image_name
    FROM items
    JOIN categories ON items.category_id = categories.id
"#;

#[derive(Debug, Clone)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an item whose category already exists.
    pub async fn insert(
        &self,
        name: &str,
        category_id: CategoryId,
        image: &ImageRef,
    ) -> Result<ItemId> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, name, category_id, image).await
    }

    pub async fn insert_in(
        conn: &mut SqliteConnection,
        name: &str,
        category_id: CategoryId,
        image: &ImageRef,
    ) -> Result<ItemId> {
        let result =
            sqlx::query("INSERT INTO items (name, category_id, image_name) VALUES (?1, ?2, ?3)")
                .bind(name)
                .bind(category_id.0)
                .bind(image.as_str())
                .execute(&mut *conn)
                .await?;

        Ok(ItemId(result.last_insert_rowid()))
    }

    pub async fn get_by_id(&self, id: ItemId) -> Result<Item> {
        let row: Option<ItemRow> = sqlx::query_as(&format!("{SELECT_ITEMS} WHERE items.id = ?1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Item::from).ok_or(StorageError::ItemNotFound(id.0))
    }

    /// Every item, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!("{SELECT_ITEMS} ORDER BY items.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Items whose name contains `substring` (case-sensitive, no wildcards).
    pub async fn search_by_name(&self, substring: &str) -> Result<Vec<Item>> {
        if substring.is_empty() {
            return self.list_all().await;
        }

        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "{SELECT_ITEMS} WHERE instr(items.name, ?1) > 0 ORDER BY items.id"
        ))
        .bind(substring)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }
}
