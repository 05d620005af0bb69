//! # Domain Types
//!
//! Core domain types used throughout Frappuccino.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │    MenuItem     │   │ MenuIngredient  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  inventory_id   │       │
//! │  │  name (unique)  │   │  name (unique)  │   │  quantity       │       │
//! │  │  quantity >= 0  │   │  description    │   └─────────────────┘       │
//! │  │  unit           │   │  price_cents    │                              │
//! │  │  categories     │   │  ingredients ───┼──► [MenuIngredient]         │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Input (loose)          Validated (typed)       Stored (with id)       │
//! │  NewInventoryItem  ──►  InventoryDraft     ──►  InventoryItem          │
//! │  NewMenuItem       ──►  MenuItemDraft      ──►  MenuItem               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `New*` types mirror what a client sends: every field may be absent.
//! Validators in [`crate::validation`] turn them into `*Draft` values, which
//! are the only thing repositories accept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};
use crate::pagination::Page;

// =============================================================================
// Unit
// =============================================================================

/// Unit of measure for an inventory item.
///
/// Stored as lowercase text; the `inventory_unit_valid` CHECK constraint
/// mirrors [`Unit::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Unit {
    #[serde(rename = "g")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "g"))]
    Grams,
    #[serde(rename = "kg")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "kg"))]
    Kilograms,
    #[serde(rename = "ml")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ml"))]
    Milliliters,
    #[serde(rename = "l")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "l"))]
    Liters,
    #[serde(rename = "shots")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "shots"))]
    Shots,
    #[serde(rename = "pcs")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "pcs"))]
    Pieces,
}

impl Unit {
    /// Every unit, in the order they are listed to users.
    pub const ALL: [Unit; 6] = [
        Unit::Grams,
        Unit::Kilograms,
        Unit::Milliliters,
        Unit::Liters,
        Unit::Shots,
        Unit::Pieces,
    ];

    /// The stored text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Milliliters => "ml",
            Unit::Liters => "l",
            Unit::Shots => "shots",
            Unit::Pieces => "pcs",
        }
    }

    /// Text forms of all units, for error messages.
    pub fn allowed() -> Vec<String> {
        Unit::ALL.iter().map(|u| u.as_str().to_string()).collect()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "unit".to_string(),
                allowed: Unit::allowed(),
            })
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// A stocked ingredient or material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: Unit,
    pub categories: Vec<String>,
}

/// Validated inventory fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDraft {
    pub name: String,
    /// Sign is not checked here; `inventory_quantity_non_negative` rejects
    /// negative values at write time.
    pub quantity: i64,
    /// Lowercased unit text; `inventory_unit_valid` rejects anything outside
    /// [`Unit::ALL`].
    pub unit: String,
    pub categories: Vec<String>,
}

/// Inventory item as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: Option<i64>,
    pub unit: String,
    pub categories: Vec<String>,
}

// =============================================================================
// Leftovers
// =============================================================================

/// Remaining quantity of one inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftoverItem {
    pub name: String,
    pub quantity: i64,
}

/// One page of the leftovers report.
pub type LeftoverPage = Page<LeftoverItem>;

/// Column the leftovers listing is ordered by (always descending).
///
/// Only these columns can reach the `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftoverSort {
    #[default]
    Quantity,
    Name,
}

impl LeftoverSort {
    pub const ALL: [LeftoverSort; 2] = [LeftoverSort::Quantity, LeftoverSort::Name];

    /// The SQL column name.
    pub const fn column(&self) -> &'static str {
        match self {
            LeftoverSort::Quantity => "quantity",
            LeftoverSort::Name => "name",
        }
    }
}

impl FromStr for LeftoverSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LeftoverSort::ALL
            .iter()
            .copied()
            .find(|c| c.column().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidSortColumn {
                value: s.to_string(),
                allowed: LeftoverSort::ALL
                    .iter()
                    .map(|c| c.column().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Amount of one inventory item consumed by a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuIngredient {
    pub inventory_id: i64,
    pub quantity: i64,
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price in cents (smallest currency unit).
    pub price_cents: i64,
    pub categories: Vec<String>,
    pub allergens: Vec<String>,
    pub ingredients: Vec<MenuIngredient>,
}

/// Validated menu item fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub categories: Vec<String>,
    pub allergens: Vec<String>,
    pub ingredients: Vec<MenuIngredient>,
}

impl MenuItemDraft {
    /// Attaches a database id.
    pub fn into_item(self, id: i64) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            categories: self.categories,
            allergens: self.allergens,
            ingredients: self.ingredients,
        }
    }
}

/// Ingredient line as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMenuIngredient {
    pub inventory_id: Option<i64>,
    pub quantity: Option<i64>,
}

/// Menu item as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price_cents: Option<i64>,
    pub categories: Vec<String>,
    pub allergens: Vec<String>,
    pub ingredients: Vec<NewMenuIngredient>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("g".parse::<Unit>().unwrap(), Unit::Grams);
        assert_eq!(" ML ".parse::<Unit>().unwrap(), Unit::Milliliters);
        assert_eq!("shots".parse::<Unit>().unwrap(), Unit::Shots);

        let err = "bucket".parse::<Unit>().unwrap_err();
        assert_eq!(err.field(), "unit");
    }

    #[test]
    fn test_unit_serde_uses_stored_text() {
        let json = serde_json::to_string(&Unit::Kilograms).unwrap();
        assert_eq!(json, "\"kg\"");

        let unit: Unit = serde_json::from_str("\"pcs\"").unwrap();
        assert_eq!(unit, Unit::Pieces);
    }

    #[test]
    fn test_leftover_sort_whitelist() {
        assert_eq!("quantity".parse::<LeftoverSort>().unwrap(), LeftoverSort::Quantity);
        assert_eq!("Name".parse::<LeftoverSort>().unwrap(), LeftoverSort::Name);
        assert_eq!(LeftoverSort::default().column(), "quantity");

        let err = "quantity; DROP TABLE inventory".parse::<LeftoverSort>();
        assert!(matches!(err, Err(CoreError::InvalidSortColumn { .. })));
    }

    #[test]
    fn test_new_inventory_item_tolerates_missing_fields() {
        let input: NewInventoryItem = serde_json::from_str(r#"{"name": "Milk"}"#).unwrap();
        assert_eq!(input.name, "Milk");
        assert_eq!(input.quantity, None);
        assert!(input.unit.is_empty());
        assert!(input.categories.is_empty());
    }
}
