//! # Menu Service
//!
//! Input checks in front of [`MenuRepository`]. Same order as the
//! inventory service: id, then body, then SQL.

use tracing::info;

use frappe_core::validation::{parse_id, MenuItemValidator};
use frappe_core::{MenuItem, NewMenuItem};
use frappe_db::MenuRepository;

use crate::error::ServiceResult;

#[derive(Debug, Clone)]
pub struct MenuService {
    repo: MenuRepository,
}

impl MenuService {
    pub fn new(repo: MenuRepository) -> Self {
        MenuService { repo }
    }

    /// Creates a menu item.
    ///
    /// ## Returns
    /// * `Err(ServiceError::MissingFields)` - Every failing field, keyed by
    ///   name (`ingredients[1].quantity` for ingredient lines)
    /// * `Err(ServiceError::Db(DbError::ForeignKeyViolation))` - An
    ///   ingredient names an inventory item that doesn't exist
    pub async fn insert_menu(&self, input: &NewMenuItem) -> ServiceResult<MenuItem> {
        let draft = MenuItemValidator::new(input).validate()?;

        let item = self.repo.insert(&draft).await?;
        info!(
            id = item.id,
            name = %item.name,
            ingredients = item.ingredients.len(),
            "Menu item created"
        );
        Ok(item)
    }

    pub async fn retrieve_all(&self) -> ServiceResult<Vec<MenuItem>> {
        Ok(self.repo.retrieve_all().await?)
    }

    pub async fn retrieve_by_id(&self, id: &str) -> ServiceResult<MenuItem> {
        let id = parse_id(id)?;
        Ok(self.repo.retrieve_by_id(id).await?)
    }

    pub async fn update(&self, id: &str, input: &NewMenuItem) -> ServiceResult<MenuItem> {
        let id = parse_id(id)?;
        let draft = MenuItemValidator::new(input).validate()?;

        let item = self.repo.update(id, &draft).await?;
        info!(id, "Menu item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;

        self.repo.delete(id).await?;
        info!(id, "Menu item deleted");
        Ok(())
    }
}
