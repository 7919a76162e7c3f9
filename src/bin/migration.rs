use mercado_fresco_api::migrator::run_migration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting database migration");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://mercado_fresco.db?mode=rwc".to_string());

    run_migration(&database_url).await?;

    info!("Migration completed successfully");
    Ok(())
}
