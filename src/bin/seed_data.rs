//! Seed data script - populates the reference tables batches point at
//!
//! Run with: cargo run --bin seed-data
//!
//! Sections and products have no HTTP surface of their own, so a fresh
//! database needs them before any product batch can be registered.

use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    Set,
};
use std::time::Duration;
use tracing::info;

use mercado_fresco_api::{
    db::run_migrations,
    entities::{product, section},
};

const SECTION_NUMBERS: [i32; 5] = [22, 483, 7843, 12, 301];

const PRODUCTS: [(&str, &str); 4] = [
    ("FRU-001", "Bananas"),
    ("VEG-014", "Lettuce"),
    ("DAI-102", "Whole milk"),
    ("MEA-033", "Chicken breast"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://mercado_fresco.db?mode=rwc".to_string());

    let mut options = ConnectOptions::new(database_url.clone());
    options
        .max_connections(2)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10));

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(options).await?;
    run_migrations(&db).await?;

    info!("Creating sections...");
    match create_sections(&db).await? {
        0 => info!("  Sections already present, skipping"),
        created => info!("  Created {} sections", created),
    }

    info!("Creating products...");
    match create_products(&db).await? {
        0 => info!("  Products already present, skipping"),
        created => info!("  Created {} products", created),
    }

    info!("Try these API calls:");
    info!("  curl http://localhost:8080/api/v1/sections/reportProducts");
    info!("  curl -X POST http://localhost:8080/api/v1/productBatches -d '{{\"batch_number\":111,\"product_id\":1,\"section_id\":1}}' -H 'content-type: application/json'");

    Ok(())
}

/// Inserts the reference sections unless the table already has rows.
async fn create_sections(db: &DatabaseConnection) -> anyhow::Result<usize> {
    if section::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }
    for number in SECTION_NUMBERS {
        section::ActiveModel {
            section_number: Set(number),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(SECTION_NUMBERS.len())
}

async fn create_products(db: &DatabaseConnection) -> anyhow::Result<usize> {
    if product::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }
    for (code, description) in PRODUCTS {
        product::ActiveModel {
            product_code: Set(code.to_string()),
            description: Set(Some(description.to_string())),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(PRODUCTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await.unwrap();
        run_migrations(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn seeding_twice_keeps_one_copy_of_reference_data() {
        let db = memory_db().await;

        assert_eq!(create_sections(&db).await.unwrap(), SECTION_NUMBERS.len());
        assert_eq!(create_products(&db).await.unwrap(), PRODUCTS.len());

        assert_eq!(create_sections(&db).await.unwrap(), 0);
        assert_eq!(create_products(&db).await.unwrap(), 0);

        assert_eq!(
            section::Entity::find().count(&db).await.unwrap(),
            SECTION_NUMBERS.len() as u64
        );
        assert_eq!(
            product::Entity::find().count(&db).await.unwrap(),
            PRODUCTS.len() as u64
        );
    }
}
