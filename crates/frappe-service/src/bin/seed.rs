//! # Development Seed
//!
//! Fills a database with a small coffee-shop inventory and menu.
//!
//! ```bash
//! FRAPPE_DATABASE_PATH=./frappuccino.db cargo run -p frappe-service --bin seed
//! ```
//!
//! Existing data is left alone: the seed only runs on an empty inventory.

use frappe_core::{NewInventoryItem, NewMenuIngredient, NewMenuItem};
use frappe_service::{telemetry, AppConfig, Services};
use tracing::{info, warn};

/// (name, quantity, unit, categories)
const INVENTORY: &[(&str, i64, &str, &[&str])] = &[
    ("Espresso Beans", 5000, "g", &["coffee"]),
    ("Whole Milk", 20000, "ml", &["dairy"]),
    ("Oat Milk", 8000, "ml", &["dairy-free"]),
    ("Vanilla Syrup", 1500, "ml", &["syrup"]),
    ("Caramel Syrup", 1200, "ml", &["syrup"]),
    ("Cocoa Powder", 900, "g", &["chocolate"]),
    ("Ice", 30, "kg", &[]),
    ("Cups", 400, "pcs", &["packaging"]),
];

/// (name, description, price_cents, allergens, [(inventory name, quantity)])
type MenuSeed = (&'static str, &'static str, i64, &'static [&'static str], &'static [(&'static str, i64)]);

const MENU: &[MenuSeed] = &[
    ("Espresso", "A single shot", 250, &[], &[("Espresso Beans", 9), ("Cups", 1)]),
    (
        "Latte",
        "Espresso with steamed milk",
        450,
        &["milk"],
        &[("Espresso Beans", 18), ("Whole Milk", 200), ("Cups", 1)],
    ),
    (
        "Vanilla Oat Latte",
        "Oat milk latte with vanilla",
        520,
        &["oats"],
        &[("Espresso Beans", 18), ("Oat Milk", 200), ("Vanilla Syrup", 20), ("Cups", 1)],
    ),
    (
        "Mocha",
        "Espresso, chocolate and milk",
        500,
        &["milk"],
        &[("Espresso Beans", 18), ("Cocoa Powder", 15), ("Whole Milk", 180), ("Cups", 1)],
    ),
    (
        "Caramel Frappuccino",
        "Blended iced coffee with caramel",
        580,
        &["milk"],
        &[("Espresso Beans", 18), ("Whole Milk", 150), ("Caramel Syrup", 30), ("Ice", 1), ("Cups", 1)],
    ),
];

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config)?;

    info!(path = %config.database_path.display(), "Seeding database");

    let services = Services::connect(&config).await?;

    if !services.inventory.retrieve_all().await?.is_empty() {
        warn!("Inventory is not empty, skipping seed");
        return Ok(());
    }

    let mut ids = std::collections::HashMap::new();
    for (name, quantity, unit, categories) in INVENTORY {
        let item = services
            .inventory
            .insert(&NewInventoryItem {
                name: name.to_string(),
                quantity: Some(*quantity),
                unit: unit.to_string(),
                categories: labels(categories),
            })
            .await?;
        ids.insert(*name, item.id);
    }
    info!(count = ids.len(), "Inventory seeded");

    for (name, description, price_cents, allergens, recipe) in MENU {
        let ingredients = recipe
            .iter()
            .map(|(stock, quantity)| NewMenuIngredient {
                inventory_id: ids.get(stock).copied(),
                quantity: Some(*quantity),
            })
            .collect();

        services
            .menu
            .insert_menu(&NewMenuItem {
                name: name.to_string(),
                description: description.to_string(),
                price_cents: Some(*price_cents),
                categories: labels(&["coffee"]),
                allergens: labels(allergens),
                ingredients,
            })
            .await?;
    }
    info!(count = MENU.len(), "Menu seeded");

    let leftovers = services
        .inventory
        .get_leftovers(Some("quantity"), None, None)
        .await?;
    println!("{}", serde_json::to_string_pretty(&leftovers)?);

    services.db.close().await;
    Ok(())
}
