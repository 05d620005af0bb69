//! # frappe-db: Database Layer for Frappuccino
//!
//! Database access for the coffee-shop backend: a SQLite pool managed by
//! sqlx, embedded migrations, and one repository per table group.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  frappe-service (InventoryService, MenuService)                        │
//! │       │  validated drafts, integer ids                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                ★ frappe-db (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   Database ──► InventoryRepository    MenuRepository            │   │
//! │  │      │                 │                     │                  │   │
//! │  │      │                 └──────── SQL ────────┘                  │   │
//! │  │      ▼                                                          │   │
//! │  │   SqlitePool + migrations        sqlx::Error ──► DbError        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (inventory, menu_items, menu_item_ingredients)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and constraint translation
//! - [`repository`] - Inventory and menu repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frappe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("frappuccino.db")).await?;
//!
//! let milk = db.inventory().retrieve_by_id(1).await?;
//! let menu = db.menu().retrieve_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::menu::MenuRepository;
