//! # frappe-service: Service Layer for Frappuccino
//!
//! Services turn loosely-typed caller input into validated calls on the
//! repositories in `frappe-db`.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller ("12", NewMenuItem { .. })                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MenuService / InventoryService   ← THIS CRATE                         │
//! │       │  parse_id ─► validator ─► repository                           │
//! │       ▼                                                                 │
//! │  frappe-db repositories ─► SQLite                                      │
//! │                                                                         │
//! │  Failures at any step come back as ServiceError (with an ErrorCode).   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`inventory`] - Inventory CRUD, restocking and the leftovers report
//! - [`menu`] - Menu item CRUD
//! - [`config`] - `FRAPPE_*` environment configuration
//! - [`telemetry`] - `tracing` subscriber setup
//! - [`error`] - Service errors and error codes
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = AppConfig::load()?;
//! telemetry::init_tracing(&config)?;
//!
//! let services = Services::connect(&config).await?;
//! let page = services.inventory.get_leftovers(Some("quantity"), Some("1"), None).await?;
//! ```

pub mod config;
pub mod error;
pub mod inventory;
pub mod menu;
pub mod telemetry;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use error::{ErrorBody, ErrorCode, ServiceError, ServiceResult};
pub use inventory::InventoryService;
pub use menu::MenuService;

use frappe_db::{Database, DbResult};

/// Both services over one shared pool.
#[derive(Debug, Clone)]
pub struct Services {
    pub db: Database,
    pub inventory: InventoryService,
    pub menu: MenuService,
}

impl Services {
    /// Opens the configured database (running migrations) and builds the
    /// services on top of it.
    pub async fn connect(config: &AppConfig) -> DbResult<Self> {
        let db = Database::new(config.to_db_config()).await?;
        Ok(Services::from_database(db, config.default_page_size))
    }

    pub fn from_database(db: Database, default_page_size: u32) -> Self {
        Services {
            inventory: InventoryService::new(db.inventory()).with_default_page_size(default_page_size),
            menu: MenuService::new(db.menu()),
            db,
        }
    }
}
