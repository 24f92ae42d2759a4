use catalog_core::{Category, CategoryId, Item, ItemId};

/// Row shape of the items ⋈ categories projection
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_name: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId(row.id),
            name: row.name,
            category: row.category,
            image_name: row.image_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId(row.id),
            name: row.name,
        }
    }
}
