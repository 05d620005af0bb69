//! # Menu Repository
//!
//! Database operations for menu items and their ingredient lines.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  menu_items                       menu_item_ingredients                 │
//! │  ┌────┬──────────┬───────┐        ┌──────────────┬──────────────┬─────┐ │
//! │  │ id │ name     │ price │        │ menu_item_id │ inventory_id │ qty │ │
//! │  ├────┼──────────┼───────┤        ├──────────────┼──────────────┼─────┤ │
//! │  │  1 │ Latte    │  450  │◄───────│      1       │   2 (Milk)   │ 200 │ │
//! │  │    │          │       │◄───────│      1       │   1 (Beans)  │  18 │ │
//! │  └────┴──────────┴───────┘        └──────────────┴──────┬───────┴─────┘ │
//! │          ON DELETE CASCADE ▲                            │               │
//! │                                                         ▼               │
//! │                                          inventory (ON DELETE RESTRICT) │
//! │                                                                         │
//! │  Insert / update write both tables in ONE transaction.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use frappe_core::{MenuIngredient, MenuItem, MenuItemDraft};

const ENTITY: &str = "Menu item";

#[derive(Debug, sqlx::FromRow)]
struct MenuRow {
    id: i64,
    name: String,
    description: String,
    price_cents: i64,
    categories: Json<Vec<String>>,
    allergens: Json<Vec<String>>,
}

impl MenuRow {
    fn into_item(self, ingredients: Vec<MenuIngredient>) -> MenuItem {
        MenuItem {
            id: self.id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            categories: self.categories.0,
            allergens: self.allergens.0,
            ingredients,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    menu_item_id: i64,
    inventory_id: i64,
    quantity: i64,
}

/// Repository for menu database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MenuRepository::new(pool);
///
/// let latte = repo.insert(&draft).await?;
/// let menu = repo.retrieve_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Inserts a menu item together with its ingredients.
    ///
    /// ## Returns
    /// * `Ok(MenuItem)` - Stored item with its assigned id
    /// * `Err(DbError::Duplicate)` - Name already exists
    /// * `Err(DbError::ForeignKeyViolation)` - An ingredient references a
    ///   missing inventory item; nothing is written
    pub async fn insert(&self, draft: &MenuItemDraft) -> DbResult<MenuItem> {
        debug!(
            name = %draft.name,
            ingredients = draft.ingredients.len(),
            "Inserting menu item"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (name, description, price_cents, categories, allergens)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price_cents)
        .bind(Json(&draft.categories))
        .bind(Json(&draft.allergens))
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        insert_ingredients(&mut tx, id, &draft.ingredients).await?;

        tx.commit().await?;

        debug!(id, "Menu item inserted");
        Ok(draft.clone().into_item(id))
    }

    /// Gets a menu item and its ingredients by id.
    ///
    /// Both reads share one transaction, so a concurrent update is seen
    /// entirely or not at all.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No row with this id
    pub async fn retrieve_by_id(&self, id: i64) -> DbResult<MenuItem> {
        debug!(id, "Retrieving menu item");

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, name, description, price_cents, categories, allergens
            FROM menu_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        let ingredients = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT menu_item_id, inventory_id, quantity
            FROM menu_item_ingredients
            WHERE menu_item_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|r| MenuIngredient {
            inventory_id: r.inventory_id,
            quantity: r.quantity,
        })
        .collect();

        tx.commit().await?;

        Ok(row.into_item(ingredients))
    }

    /// Lists every menu item ordered by id.
    ///
    /// Two queries in one transaction regardless of menu size: the items,
    /// then all ingredient lines grouped in memory.
    pub async fn retrieve_all(&self) -> DbResult<Vec<MenuItem>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, name, description, price_cents, categories, allergens
            FROM menu_items
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let ingredient_rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT menu_item_id, inventory_id, quantity
            FROM menu_item_ingredients
            ORDER BY menu_item_id, rowid
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut by_item: HashMap<i64, Vec<MenuIngredient>> = HashMap::new();
        for r in ingredient_rows {
            by_item.entry(r.menu_item_id).or_default().push(MenuIngredient {
                inventory_id: r.inventory_id,
                quantity: r.quantity,
            });
        }

        debug!(count = rows.len(), "Retrieved menu items");

        Ok(rows
            .into_iter()
            .map(|row| {
                let ingredients = by_item.remove(&row.id).unwrap_or_default();
                row.into_item(ingredients)
            })
            .collect())
    }

    /// Replaces a menu item and its full ingredient list.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist; nothing is written
    /// * `Err(DbError::Duplicate)` - Renamed onto another item's name
    pub async fn update(&self, id: i64, draft: &MenuItemDraft) -> DbResult<MenuItem> {
        debug!(id, name = %draft.name, "Updating menu item");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                categories = ?5,
                allergens = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price_cents)
        .bind(Json(&draft.categories))
        .bind(Json(&draft.allergens))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping `tx` rolls back
            return Err(DbError::not_found(ENTITY, id));
        }

        sqlx::query("DELETE FROM menu_item_ingredients WHERE menu_item_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_ingredients(&mut tx, id, &draft.ingredients).await?;

        tx.commit().await?;

        Ok(draft.clone().into_item(id))
    }

    /// Deletes a menu item. Its ingredient lines go with it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }

    /// Counts menu items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn insert_ingredients(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    ingredients: &[MenuIngredient],
) -> DbResult<()> {
    for ingredient in ingredients {
        sqlx::query(
            r#"
            INSERT INTO menu_item_ingredients (menu_item_id, inventory_id, quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(menu_item_id)
        .bind(ingredient.inventory_id)
        .bind(ingredient.quantity)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use frappe_core::InventoryDraft;

    struct Fixture {
        db: Database,
        beans: i64,
        milk: i64,
    }

    async fn setup() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let inventory = db.inventory();

        let stock = |name: &str, unit: &str| InventoryDraft {
            name: name.to_string(),
            quantity: 1000,
            unit: unit.to_string(),
            categories: vec![],
        };
        let beans = inventory.insert(&stock("Espresso Beans", "g")).await.unwrap().id;
        let milk = inventory.insert(&stock("Whole Milk", "ml")).await.unwrap().id;

        Fixture { db, beans, milk }
    }

    fn latte(beans: i64, milk: i64) -> MenuItemDraft {
        MenuItemDraft {
            name: "Latte".to_string(),
            description: "Espresso with steamed milk".to_string(),
            price_cents: 450,
            categories: vec!["coffee".to_string()],
            allergens: vec!["milk".to_string()],
            ingredients: vec![
                MenuIngredient { inventory_id: milk, quantity: 200 },
                MenuIngredient { inventory_id: beans, quantity: 18 },
            ],
        }
    }

    async fn ingredient_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM menu_item_ingredients")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_retrieve_keeps_ingredient_order() {
        let f = setup().await;
        let repo = f.db.menu();

        let inserted = repo.insert(&latte(f.beans, f.milk)).await.unwrap();
        let fetched = repo.retrieve_by_id(inserted.id).await.unwrap();

        assert_eq!(fetched, inserted);
        assert_eq!(fetched.ingredients[0].inventory_id, f.milk);
        assert_eq!(fetched.ingredients[1].inventory_id, f.beans);
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let f = setup().await;
        let repo = f.db.menu();
        repo.insert(&latte(f.beans, f.milk)).await.unwrap();

        let err = repo.insert(&latte(f.beans, f.milk)).await.unwrap_err();
        assert!(err.is_duplicate(), "got {err:?}");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ingredient_rolls_back_insert() {
        let f = setup().await;
        let repo = f.db.menu();

        let err = repo.insert(&latte(f.beans, 999)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "got {err:?}");

        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(ingredient_rows(&f.db).await, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_ingredients() {
        let f = setup().await;
        let repo = f.db.menu();
        let item = repo.insert(&latte(f.beans, f.milk)).await.unwrap();

        let espresso = MenuItemDraft {
            name: "Espresso".to_string(),
            description: "A single shot".to_string(),
            price_cents: 250,
            categories: vec!["coffee".to_string()],
            allergens: vec![],
            ingredients: vec![MenuIngredient { inventory_id: f.beans, quantity: 9 }],
        };
        repo.update(item.id, &espresso).await.unwrap();

        let fetched = repo.retrieve_by_id(item.id).await.unwrap();
        assert_eq!(fetched.name, "Espresso");
        assert_eq!(fetched.ingredients, espresso.ingredients);
        assert_eq!(ingredient_rows(&f.db).await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_id_writes_nothing() {
        let f = setup().await;
        let repo = f.db.menu();
        repo.insert(&latte(f.beans, f.milk)).await.unwrap();

        let err = repo.update(999, &latte(f.beans, f.milk)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ingredient_rows(&f.db).await, 2);
    }

    #[tokio::test]
    async fn test_update_onto_existing_name_is_duplicate() {
        let f = setup().await;
        let repo = f.db.menu();
        let latte_item = repo.insert(&latte(f.beans, f.milk)).await.unwrap();
        let mut flat_white = latte(f.beans, f.milk);
        flat_white.name = "Flat White".to_string();
        flat_white.ingredients.truncate(1);
        let flat_white = repo.insert(&flat_white).await.unwrap();

        let err = repo
            .update(flat_white.id, &latte(f.beans, f.milk))
            .await
            .unwrap_err();
        assert!(err.is_duplicate(), "got {err:?}");

        assert_eq!(repo.retrieve_by_id(flat_white.id).await.unwrap(), flat_white);
        assert_eq!(repo.retrieve_by_id(latte_item.id).await.unwrap(), latte_item);
        assert_eq!(ingredient_rows(&f.db).await, 3);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let f = setup().await;
        let repo = f.db.menu();

        assert!(repo.retrieve_by_id(7).await.unwrap_err().is_not_found());
        assert!(repo.delete(7).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_ingredients() {
        let f = setup().await;
        let repo = f.db.menu();
        let item = repo.insert(&latte(f.beans, f.milk)).await.unwrap();

        repo.delete(item.id).await.unwrap();

        assert_eq!(ingredient_rows(&f.db).await, 0);
        // Inventory is untouched and now deletable
        f.db.inventory().delete(f.milk).await.unwrap();
    }

    #[tokio::test]
    async fn test_inventory_in_use_cannot_be_deleted() {
        let f = setup().await;
        f.db.menu().insert(&latte(f.beans, f.milk)).await.unwrap();

        let err = f.db.inventory().delete(f.beans).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_retrieve_all_groups_ingredients() {
        let f = setup().await;
        let repo = f.db.menu();
        repo.insert(&latte(f.beans, f.milk)).await.unwrap();
        let mut americano = latte(f.beans, f.milk);
        americano.name = "Americano".to_string();
        americano.ingredients = vec![MenuIngredient { inventory_id: f.beans, quantity: 18 }];
        repo.insert(&americano).await.unwrap();

        let all = repo.retrieve_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Latte");
        assert_eq!(all[0].ingredients.len(), 2);
        assert_eq!(all[1].ingredients.len(), 1);
    }
}
