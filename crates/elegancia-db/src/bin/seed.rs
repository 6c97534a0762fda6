//! # Seed Data Generator
//!
//! Populates the database with a fashion catalog and customers for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p elegancia-db --bin seed
//!
//! # Specify database path
//! cargo run -p elegancia-db --bin seed -- --db ./data/elegancia.db
//! ```
//!
//! ## Generated Data
//! - One collection per season, each with a handful of products
//! - Every product in every color × size combination
//!   (SKU `{PRODUCT}-{COLOR}-{SIZE}`), stock 0 - 14, minimum 3
//! - A few active customers with valid CPFs and sample preferences

use elegancia_core::Preferences;
use elegancia_db::{Database, DbConfig, NewCustomer, NewProduct, NewVariant};
use serde_json::json;
use std::env;

/// (collection, [(sku prefix, product name, base price in cents)])
const CATALOG: &[(&str, &[(&str, &str, i64)])] = &[
    (
        "Verão 2026",
        &[
            ("VST", "Vestido Seda", 38990),
            ("BLS", "Blusa Linho", 18990),
            ("SAI", "Saia Midi Plissada", 24990),
        ],
    ),
    (
        "Inverno 2026",
        &[
            ("CAS", "Casaco Lã Merino", 89990),
            ("TRI", "Tricô Gola Alta", 32990),
        ],
    ),
    (
        "Alfaiataria",
        &[
            ("BLZ", "Blazer Acinturado", 69990),
            ("CAL", "Calça Pantalona", 34990),
        ],
    ),
];

const COLORS: &[(&str, &str)] = &[("PT", "Preto"), ("AZ", "Azul Marinho"), ("OW", "Off-White")];

const SIZES: &[&str] = &["P", "M", "G"];

/// (name, CPF, email)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Ana Souza", "52998224725", "ana.souza@example.com"),
    ("Beatriz Lima", "11144477735", "beatriz.lima@example.com"),
    ("Carla Mendes", "12345678909", "carla.mendes@example.com"),
    ("Daniela Rocha", "98765432100", "daniela.rocha@example.com"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./elegancia_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Elegância Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./elegancia_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Elegância Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (embedded, applied) = elegancia_db::migrations::migration_status(db.pool()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, embedded);

    let existing = db.catalog().list_collections().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} collections", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating catalog...");

    let start = std::time::Instant::now();
    let catalog = db.catalog();
    let mut variants = 0;
    let mut seed = 0_i64;

    for (collection_name, products) in CATALOG {
        let collection = catalog.create_collection(collection_name).await?;

        for (prefix, name, price_cents) in products.iter() {
            let product = catalog
                .create_product(NewProduct {
                    collection_id: collection.id.clone(),
                    name: name.to_string(),
                    description: None,
                    base_price_cents: *price_cents,
                })
                .await?;

            for (color_code, color) in COLORS {
                for size in SIZES {
                    seed += 1;
                    let sku = format!("{}-{}-{}", prefix, color_code, size);
                    let new = NewVariant {
                        sku: sku.clone(),
                        color: color.to_string(),
                        size: size.to_string(),
                        stock_quantity: (seed * 7) % 15,
                        min_stock_quantity: 3,
                    };

                    if let Err(e) = catalog.create_variant(&product.id, new).await {
                        eprintln!("Failed to insert {}: {}", sku, e);
                        continue;
                    }
                    variants += 1;
                }
            }
        }

        println!("  {} ✓", collection_name);
    }

    println!();
    println!("Generating customers...");

    let mut customers = 0;
    for (idx, (name, national_id, email)) in CUSTOMERS.iter().enumerate() {
        let preferences = Preferences::from_value(json!({
            "size": SIZES[idx % SIZES.len()],
            "favoriteColor": COLORS[idx % COLORS.len()].1,
        }))
        .unwrap_or_default();

        let new = NewCustomer {
            name: name.to_string(),
            national_id: national_id.to_string(),
            email: Some(email.to_string()),
            phone: None,
            address: None,
            preferences,
        };

        if let Err(e) = db.customers().create(new).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        customers += 1;
    }

    println!();
    println!(
        "✓ Generated {} variants and {} customers in {:?}",
        variants,
        customers,
        start.elapsed()
    );

    let low_stock = db.inventory().count_low_stock().await?;
    println!("  Low-stock variants: {}", low_stock);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
