//! # frappe-core: Pure Domain Logic for Frappuccino
//!
//! Domain types, input validation and pagination math for the coffee-shop
//! backend. Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Frappuccino Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    frappe-service                               │   │
//! │  │    InventoryService, MenuService: coerce ids, validate input    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ frappe-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │ validation │  │ pagination │  │  error   │  │   │
//! │  │   │ Inventory │  │ Validators │  │ PageRequest│  │CoreError │  │   │
//! │  │   │ MenuItem  │  │ FieldErrors│  │ Page<T>    │  │          │  │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    frappe-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Inventory and menu types, input and validated forms
//! - [`validation`] - Required-field checks and identifier parsing
//! - [`pagination`] - Offset and page-count arithmetic
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use frappe_core::pagination::{total_pages, PageRequest};
//!
//! let page = PageRequest::new(3, 10).unwrap();
//! assert_eq!(page.offset(), 20);
//! assert_eq!(total_pages(21, 10), 3);
//! ```

pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{Page, PageRequest};
pub use types::*;
pub use validation::FieldErrors;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an inventory or menu item name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a menu item description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Maximum length of a single category or allergen label.
pub const MAX_LABEL_LEN: usize = 50;
