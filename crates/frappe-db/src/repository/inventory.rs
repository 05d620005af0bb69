//! # Inventory Repository
//!
//! Database operations for inventory items.
//!
//! ## Key Operations
//! - CRUD operations
//! - Delta quantity updates (restocking, consumption)
//! - Paginated leftovers report
//!
//! ## Leftovers Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Leftovers Page Is Built                      │
//! │                                                                         │
//! │  LeftoverSort::Name, PageRequest { page: 2, page_size: 3 }             │
//! │       │                                                                 │
//! │       ├──► BEGIN                                                       │
//! │       ├──► SELECT COUNT(*) FROM inventory           → 7 rows           │
//! │       ├──► SELECT name, quantity FROM inventory                        │
//! │       │    ORDER BY name DESC, id ASC                                  │
//! │       │    LIMIT 3 OFFSET 3                          → rows 4..6       │
//! │       └──► COMMIT                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Page { currentPage: 2, pageSize: 3, totalPages: 3,                    │
//! │         hasNextPage: true, data: [...] }                               │
//! │                                                                         │
//! │  The column name comes from the LeftoverSort whitelist, never from     │
//! │  caller text.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use frappe_core::{
    InventoryDraft, InventoryItem, LeftoverItem, LeftoverPage, LeftoverSort, Page, PageRequest,
    Unit,
};

const ENTITY: &str = "Inventory item";

/// Row shape of the `inventory` table.
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i64,
    name: String,
    quantity: i64,
    unit: Unit,
    categories: Json<Vec<String>>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            categories: row.categories.0,
        }
    }
}

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let item = repo.insert(&draft).await?;
/// let leftovers = repo.get_leftovers(LeftoverSort::Quantity, PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Inserts a new inventory item.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Stored item with its assigned id
    /// * `Err(DbError::Duplicate)` - Name already exists
    /// * `Err(DbError::NegativeQuantity)` - Quantity below zero
    /// * `Err(DbError::InvalidEnum)` - Unit text outside the allowed set
    pub async fn insert(&self, draft: &InventoryDraft) -> DbResult<InventoryItem> {
        debug!(name = %draft.name, quantity = draft.quantity, "Inserting inventory item");

        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            INSERT INTO inventory (name, quantity, unit, categories)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, quantity, unit, categories
            "#,
        )
        .bind(&draft.name)
        .bind(draft.quantity)
        .bind(&draft.unit)
        .bind(Json(&draft.categories))
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, "Inventory item inserted");
        Ok(row.into())
    }

    /// Gets an inventory item by its ID.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Item found
    /// * `Err(DbError::NotFound)` - No row with this id
    pub async fn retrieve_by_id(&self, id: i64) -> DbResult<InventoryItem> {
        debug!(id, "Retrieving inventory item");

        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, name, quantity, unit, categories
            FROM inventory
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(InventoryItem::from)
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Lists every inventory item ordered by id.
    pub async fn retrieve_all(&self) -> DbResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, name, quantity, unit, categories
            FROM inventory
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Retrieved inventory items");
        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Replaces every field of an existing inventory item.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - The item as now stored
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::Duplicate)` / `NegativeQuantity` / `InvalidEnum` - as for insert
    pub async fn update(&self, id: i64, draft: &InventoryDraft) -> DbResult<InventoryItem> {
        debug!(id, name = %draft.name, "Updating inventory item");

        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            UPDATE inventory SET
                name = ?2,
                quantity = ?3,
                unit = ?4,
                categories = ?5
            WHERE id = ?1
            RETURNING id, name, quantity, unit, categories
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.quantity)
        .bind(&draft.unit)
        .bind(Json(&draft.categories))
        .fetch_optional(&self.pool)
        .await?;

        row.map(InventoryItem::from)
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Deletes an inventory item.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - A menu item still uses it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }

    /// Adds `delta` to the stored quantity and returns the new quantity.
    ///
    /// ## Delta Update
    /// ```text
    /// UPDATE inventory SET quantity = quantity + ?   (not "= 7")
    /// ```
    /// Two concurrent adjustments both land; the CHECK constraint rejects
    /// any result below zero. SQLite turns an overflowing integer sum into a
    /// REAL, so the WHERE clause refuses any delta that would pass `i64::MAX`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::NegativeQuantity)` - Result would be below zero
    /// * `Err(DbError::QuantityOverflow)` - Result would exceed `i64::MAX`
    pub async fn adjust_quantity(&self, id: i64, delta: i64) -> DbResult<i64> {
        debug!(id, delta, "Adjusting inventory quantity");

        let mut tx = self.pool.begin().await?;

        let quantity = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE inventory
            SET quantity = quantity + ?2
            WHERE id = ?1
              AND (?2 <= 0 OR quantity <= 9223372036854775807 - ?2)
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?;

        let quantity = match quantity {
            Some(quantity) => quantity,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inventory WHERE id = ?1)")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;

                return Err(if exists {
                    DbError::QuantityOverflow
                } else {
                    DbError::not_found(ENTITY, id)
                });
            }
        };

        tx.commit().await?;
        Ok(quantity)
    }

    /// Returns one page of remaining quantities, sorted descending.
    ///
    /// Ties are broken by ascending id so pages never overlap. The count and
    /// the page are read in one transaction, so `totalPages` always matches
    /// the rows returned.
    pub async fn get_leftovers(
        &self,
        sort: LeftoverSort,
        page: PageRequest,
    ) -> DbResult<LeftoverPage> {
        debug!(
            sort = sort.column(),
            page = page.page(),
            page_size = page.page_size(),
            "Fetching leftovers"
        );

        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!(
            "SELECT name, quantity FROM inventory ORDER BY {} DESC, id ASC LIMIT ?1 OFFSET ?2",
            sort.column()
        );

        let rows = sqlx::query_as::<_, (String, i64)>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let data = rows
            .into_iter()
            .map(|(name, quantity)| LeftoverItem { name, quantity })
            .collect();

        Ok(Page::new(page, total, data))
    }

    /// Counts inventory items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> (Database, InventoryRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();
        (db, repo)
    }

    fn draft(name: &str, quantity: i64) -> InventoryDraft {
        InventoryDraft {
            name: name.to_string(),
            quantity,
            unit: "g".to_string(),
            categories: vec!["dairy".to_string()],
        }
    }

    #[tokio::test]
    async fn test_insert_and_retrieve() {
        let (_db, repo) = setup().await;

        let inserted = repo.insert(&draft("Milk", 500)).await.unwrap();
        let fetched = repo.retrieve_by_id(inserted.id).await.unwrap();

        assert_eq!(fetched, inserted);
        assert_eq!(fetched.categories, vec!["dairy".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let (_db, repo) = setup().await;
        repo.insert(&draft("Milk", 500)).await.unwrap();

        let err = repo.insert(&draft("Milk", 10)).await.unwrap_err();
        assert!(err.is_duplicate(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_negative_quantity() {
        let (_db, repo) = setup().await;

        let err = repo.insert(&draft("Milk", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::NegativeQuantity), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unknown_unit_text_is_invalid_enum() {
        let (db, repo) = setup().await;

        let err = sqlx::query("INSERT INTO inventory (name, quantity, unit) VALUES ('Sugar', 1, 'bucket')")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidEnum(_)), "got {err:?}");

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let (_db, repo) = setup().await;

        assert!(repo.retrieve_by_id(42).await.unwrap_err().is_not_found());
        assert!(repo.update(42, &draft("Milk", 1)).await.unwrap_err().is_not_found());
        assert!(repo.delete(42).await.unwrap_err().is_not_found());
        assert!(repo.adjust_quantity(42, 5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (_db, repo) = setup().await;
        let item = repo.insert(&draft("Milk", 500)).await.unwrap();

        let changed = InventoryDraft {
            name: "Oat Milk".to_string(),
            quantity: 2,
            unit: "l".to_string(),
            categories: vec![],
        };
        let updated = repo.update(item.id, &changed).await.unwrap();
        assert_eq!(updated.unit, Unit::Liters);

        let fetched = repo.retrieve_by_id(item.id).await.unwrap();
        assert_eq!(fetched.name, "Oat Milk");
        assert_eq!(fetched.unit, Unit::Liters);
        assert!(fetched.categories.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_unit_in_draft_is_invalid_enum() {
        let (_db, repo) = setup().await;

        let mut sugar = draft("Sugar", 1);
        sugar.unit = "bucket".to_string();

        let err = repo.insert(&sugar).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidEnum(_)), "got {err:?}");
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_error_translation() {
        let (_db, repo) = setup().await;
        repo.insert(&draft("Milk", 500)).await.unwrap();
        let beans = repo.insert(&draft("Beans", 10)).await.unwrap();

        let err = repo.update(beans.id, &draft("Milk", 10)).await.unwrap_err();
        assert!(err.is_duplicate(), "got {err:?}");

        let err = repo.update(beans.id, &draft("Beans", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::NegativeQuantity), "got {err:?}");

        let mut bucket = draft("Beans", 10);
        bucket.unit = "bucket".to_string();
        let err = repo.update(beans.id, &bucket).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidEnum(_)), "got {err:?}");

        assert_eq!(repo.retrieve_by_id(beans.id).await.unwrap(), beans);
    }

    #[tokio::test]
    async fn test_overflowing_delta_is_rejected() {
        let (_db, repo) = setup().await;
        let item = repo.insert(&draft("Beans", 10)).await.unwrap();

        let err = repo.adjust_quantity(item.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::QuantityOverflow), "got {err:?}");

        assert_eq!(repo.retrieve_all().await.unwrap(), vec![item.clone()]);
        let page = repo
            .get_leftovers(LeftoverSort::Quantity, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.data[0].quantity, 10);

        assert_eq!(repo.adjust_quantity(item.id, i64::MAX - 10).await.unwrap(), i64::MAX);
        assert!(matches!(
            repo.adjust_quantity(item.id, 1).await.unwrap_err(),
            DbError::QuantityOverflow
        ));
    }

    #[tokio::test]
    async fn test_adjust_quantity_is_a_delta() {
        let (_db, repo) = setup().await;
        let item = repo.insert(&draft("Beans", 10)).await.unwrap();

        assert_eq!(repo.adjust_quantity(item.id, 5).await.unwrap(), 15);
        assert_eq!(repo.adjust_quantity(item.id, -15).await.unwrap(), 0);

        let err = repo.adjust_quantity(item.id, -1).await.unwrap_err();
        assert!(matches!(err, DbError::NegativeQuantity));
        assert_eq!(repo.retrieve_by_id(item.id).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_retrieve_all_in_id_order() {
        let (_db, repo) = setup().await;
        repo.insert(&draft("B", 1)).await.unwrap();
        repo.insert(&draft("A", 2)).await.unwrap();

        let names: Vec<_> = repo
            .retrieve_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_leftovers_sorted_desc_and_paged() {
        let (_db, repo) = setup().await;
        for (name, qty) in [("Milk", 5), ("Beans", 50), ("Sugar", 20), ("Cups", 20), ("Lids", 1)] {
            repo.insert(&draft(name, qty)).await.unwrap();
        }

        let first = repo
            .get_leftovers(LeftoverSort::Quantity, PageRequest::new(1, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next_page);
        assert_eq!(
            first.data,
            vec![
                LeftoverItem { name: "Beans".into(), quantity: 50 },
                LeftoverItem { name: "Sugar".into(), quantity: 20 },
            ]
        );

        let last = repo
            .get_leftovers(LeftoverSort::Quantity, PageRequest::new(3, 2).unwrap())
            .await
            .unwrap();
        assert!(!last.has_next_page);
        assert_eq!(last.data.len(), 1);
        assert_eq!(last.data[0].name, "Lids");

        let by_name = repo
            .get_leftovers(LeftoverSort::Name, PageRequest::new(1, 10).unwrap())
            .await
            .unwrap();
        let names: Vec<_> = by_name.data.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Sugar", "Milk", "Lids", "Cups", "Beans"]);
    }

    #[tokio::test]
    async fn test_leftovers_on_empty_table() {
        let (_db, repo) = setup().await;

        let page = repo
            .get_leftovers(LeftoverSort::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
        assert!(page.data.is_empty());
    }
}
