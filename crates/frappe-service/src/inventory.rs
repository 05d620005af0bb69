//! # Inventory Service
//!
//! Input checks in front of [`InventoryRepository`].
//!
//! ## Check Order
//! ```text
//! update("12", input)
//!    │
//!    ├─ 1. parse_id("12")            → ServiceError::InvalidId
//!    ├─ 2. InventoryValidator        → ServiceError::MissingFields(all fields)
//!    └─ 3. repository.update(12, ..) → ServiceError::Db(..)
//! ```
//! Steps 1 and 2 never touch the database.

use tracing::{debug, info};

use frappe_core::pagination::DEFAULT_PAGE_SIZE;
use frappe_core::validation::{parse_id, validate_positive, InventoryValidator};
use frappe_core::{
    FieldErrors, InventoryItem, LeftoverPage, LeftoverSort, NewInventoryItem, PageRequest,
};
use frappe_db::InventoryRepository;

use crate::error::ServiceResult;

#[derive(Debug, Clone)]
pub struct InventoryService {
    repo: InventoryRepository,
    default_page_size: u32,
}

impl InventoryService {
    pub fn new(repo: InventoryRepository) -> Self {
        InventoryService {
            repo,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used by [`get_leftovers`](Self::get_leftovers) when the
    /// caller gives none.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub async fn insert(&self, input: &NewInventoryItem) -> ServiceResult<InventoryItem> {
        let draft = InventoryValidator::new(input).validate()?;

        let item = self.repo.insert(&draft).await?;
        info!(id = item.id, name = %item.name, "Inventory item created");
        Ok(item)
    }

    pub async fn retrieve_by_id(&self, id: &str) -> ServiceResult<InventoryItem> {
        let id = parse_id(id)?;
        Ok(self.repo.retrieve_by_id(id).await?)
    }

    pub async fn retrieve_all(&self) -> ServiceResult<Vec<InventoryItem>> {
        Ok(self.repo.retrieve_all().await?)
    }

    /// Replaces an item. The id is checked before the body.
    pub async fn update(&self, id: &str, input: &NewInventoryItem) -> ServiceResult<InventoryItem> {
        let id = parse_id(id)?;
        let draft = InventoryValidator::new(input).validate()?;

        let item = self.repo.update(id, &draft).await?;
        info!(id, "Inventory item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;

        self.repo.delete(id).await?;
        info!(id, "Inventory item deleted");
        Ok(())
    }

    /// Adds a positive `amount` to an item's stock and returns the new
    /// quantity.
    pub async fn restock(&self, id: &str, amount: i64) -> ServiceResult<i64> {
        let id = parse_id(id)?;

        let mut errors = FieldErrors::new();
        let amount = match errors.check(validate_positive("quantity", Some(amount))) {
            Some(amount) => amount,
            None => return Err(errors.into()),
        };

        let quantity = self.repo.adjust_quantity(id, amount).await?;
        info!(id, amount, quantity, "Inventory item restocked");
        Ok(quantity)
    }

    /// Paginated leftovers report.
    ///
    /// All three parameters are raw query-string values; `None` or blank
    /// selects the default (`quantity`, page 1, the configured page size).
    pub async fn get_leftovers(
        &self,
        sort_by: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> ServiceResult<LeftoverPage> {
        let sort = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<LeftoverSort>()?,
            None => LeftoverSort::default(),
        };
        let request = PageRequest::parse(page, page_size, self.default_page_size)?;

        debug!(sort = sort.column(), page = request.page(), "Leftovers requested");

        Ok(self.repo.get_leftovers(sort, request).await?)
    }
}
