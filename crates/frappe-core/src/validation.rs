//! # Validation Module
//!
//! Input validation run by the services before anything touches the database.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service (Rust)                                               │
//! │  ├── Identifier coercion: "42" → 42, "abc" → InvalidId                 │
//! │  └── THIS MODULE: required fields, positive amounts                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── UNIQUE (name)              → Duplicate                            │
//! │  ├── CHECK (quantity >= 0)      → NegativeQuantity                     │
//! │  ├── CHECK (unit IN (...))      → InvalidEnum                          │
//! │  └── FOREIGN KEY (inventory_id) → ForeignKeyViolation                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators never stop at the first problem: every failing field ends up
//! in the returned [`FieldErrors`] map.
//!
//! ## Usage
//! ```rust
//! use frappe_core::types::NewInventoryItem;
//! use frappe_core::validation::InventoryValidator;
//!
//! let input = NewInventoryItem {
//!     name: "Espresso beans".to_string(),
//!     quantity: Some(1200),
//!     unit: "g".to_string(),
//!     categories: vec!["coffee".to_string()],
//! };
//! let draft = InventoryValidator::new(&input).validate().unwrap();
//! assert_eq!(draft.quantity, 1200);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{
    InventoryDraft, MenuIngredient, MenuItemDraft, NewInventoryItem, NewMenuItem,
};
use crate::{MAX_DESCRIPTION_LEN, MAX_LABEL_LEN, MAX_NAME_LEN};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Errors
// =============================================================================

/// Field name → message map returned alongside a missing-fields error.
///
/// Ordered by field name so messages are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records an error. The first message for a field wins.
    pub fn push(&mut self, err: ValidationError) {
        self.0
            .entry(err.field().to_string())
            .or_insert_with(|| err.to_string());
    }

    /// Runs `check`, recording its error and returning the value on success.
    pub fn check<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::MissingFields(errors)
    }
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Parses a record identifier supplied as text.
///
/// ## Example
/// ```rust
/// use frappe_core::validation::parse_id;
///
/// assert_eq!(parse_id("42").unwrap(), 42);
/// assert!(parse_id("forty-two").is_err());
/// ```
pub fn parse_id(raw: &str) -> CoreResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| CoreError::InvalidId(raw.to_string()))
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required free-text field and returns it trimmed.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Requires a unit and returns it trimmed and lowercased.
///
/// Membership in [`Unit::ALL`](crate::Unit::ALL) is left to the `inventory_unit_valid`
/// constraint, which reports unknown text as an invalid enum value.
pub fn validate_unit(value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "unit".to_string(),
        });
    }
    Ok(value.to_ascii_lowercase())
}

/// Validates a required, strictly positive integer.
pub fn validate_positive(field: &str, value: Option<i64>) -> ValidationResult<i64> {
    match value {
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(v) if v <= 0 => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

/// Validates a list of labels (categories, allergens).
///
/// Labels are trimmed; blank or oversized labels are rejected and repeated
/// labels are collapsed.
pub fn validate_labels(field: &str, labels: &[String]) -> ValidationResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(labels.len());

    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "labels must not be blank".to_string(),
            });
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_LABEL_LEN,
            });
        }
        if seen.insert(label.to_string()) {
            out.push(label.to_string());
        }
    }

    Ok(out)
}

// =============================================================================
// Inventory Validator
// =============================================================================

/// Checks a [`NewInventoryItem`] and produces an [`InventoryDraft`].
#[derive(Debug)]
pub struct InventoryValidator<'a> {
    input: &'a NewInventoryItem,
}

impl<'a> InventoryValidator<'a> {
    pub fn new(input: &'a NewInventoryItem) -> Self {
        InventoryValidator { input }
    }

    /// ## Rules
    /// - `name`: required, at most [`MAX_NAME_LEN`] characters
    /// - `quantity`: required
    /// - `unit`: required (stored lowercase)
    /// - `categories`: optional, no blank labels
    pub fn validate(&self) -> Result<InventoryDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.check(validate_required_text("name", &self.input.name, MAX_NAME_LEN));
        let quantity = errors.check(self.input.quantity.ok_or_else(|| {
            ValidationError::Required {
                field: "quantity".to_string(),
            }
        }));
        let unit = errors.check(validate_unit(&self.input.unit));
        let categories = errors.check(validate_labels("categories", &self.input.categories));

        match (name, quantity, unit, categories) {
            (Some(name), Some(quantity), Some(unit), Some(categories)) if errors.is_empty() => {
                Ok(InventoryDraft {
                    name,
                    quantity,
                    unit,
                    categories,
                })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Menu Item Validator
// =============================================================================

/// Checks a [`NewMenuItem`] and produces a [`MenuItemDraft`].
#[derive(Debug)]
pub struct MenuItemValidator<'a> {
    input: &'a NewMenuItem,
}

impl<'a> MenuItemValidator<'a> {
    pub fn new(input: &'a NewMenuItem) -> Self {
        MenuItemValidator { input }
    }

    /// ## Rules
    /// - `name`: required, at most [`MAX_NAME_LEN`] characters
    /// - `description`: required, at most [`MAX_DESCRIPTION_LEN`] characters
    /// - `price_cents`: required, positive
    /// - `ingredients`: at least one; each line needs a positive
    ///   `inventory_id` and `quantity`, and an inventory item may appear once
    /// - `categories`, `allergens`: optional, no blank labels
    ///
    /// Ingredient errors are keyed `ingredients[<index>].<field>`.
    pub fn validate(&self) -> Result<MenuItemDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.check(validate_required_text("name", &self.input.name, MAX_NAME_LEN));
        let description = errors.check(validate_required_text(
            "description",
            &self.input.description,
            MAX_DESCRIPTION_LEN,
        ));
        let price_cents = errors.check(validate_positive("price_cents", self.input.price_cents));
        let categories = errors.check(validate_labels("categories", &self.input.categories));
        let allergens = errors.check(validate_labels("allergens", &self.input.allergens));
        let ingredients = self.validate_ingredients(&mut errors);

        match (name, description, price_cents, categories, allergens) {
            (Some(name), Some(description), Some(price_cents), Some(categories), Some(allergens))
                if errors.is_empty() =>
            {
                Ok(MenuItemDraft {
                    name,
                    description,
                    price_cents,
                    categories,
                    allergens,
                    ingredients,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_ingredients(&self, errors: &mut FieldErrors) -> Vec<MenuIngredient> {
        if self.input.ingredients.is_empty() {
            errors.push(ValidationError::Required {
                field: "ingredients".to_string(),
            });
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(self.input.ingredients.len());

        for (i, line) in self.input.ingredients.iter().enumerate() {
            let id_field = format!("ingredients[{}].inventory_id", i);
            let qty_field = format!("ingredients[{}].quantity", i);

            let inventory_id = errors.check(validate_positive(&id_field, line.inventory_id));
            let quantity = errors.check(validate_positive(&qty_field, line.quantity));

            if let Some(id) = inventory_id {
                if !seen.insert(id) {
                    errors.push(ValidationError::Duplicate {
                        field: id_field,
                        value: id.to_string(),
                    });
                    continue;
                }
            }

            if let (Some(inventory_id), Some(quantity)) = (inventory_id, quantity) {
                out.push(MenuIngredient {
                    inventory_id,
                    quantity,
                });
            }
        }

        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
