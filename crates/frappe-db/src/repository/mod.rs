//! # Repository Module
//!
//! Database repository implementations for Frappuccino.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Service                                                               │
//! │       │                                                                 │
//! │       │  db.inventory().get_leftovers(LeftoverSort::Name, page)        │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── insert / retrieve_by_id / retrieve_all                            │
//! │  ├── update / delete                                                   │
//! │  ├── adjust_quantity                                                   │
//! │  └── get_leftovers / count                                             │
//! │       │                                                                 │
//! │       │  SQL (one statement per call)                                  │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Repositories accept validated drafts and integer ids only.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stock CRUD and leftovers
//! - [`MenuRepository`](menu::MenuRepository) - Menu items with ingredient lines

pub mod inventory;
pub mod menu;
