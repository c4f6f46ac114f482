use std::sync::Arc;

use anyhow::anyhow;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use ferry_booking_system::build_rocket;
use ferry_booking_system::config::{AppConfig, StorageBackend};
use ferry_booking_system::db::Database;
use ferry_booking_system::store::seed::seed_catalog;
use ferry_booking_system::store::{BookingStore, MemoryStore, MySqlStore};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn BookingStore> = match config.storage {
        StorageBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

            // Connect to the database
            let database = Database::new(url, config.database_max_connections).await?;
            if config.run_migrations {
                database.migrate().await?;
                tracing::info!("database migrations applied");
            }

            let store = MySqlStore::new(database.get_pool().clone());
            if config.seed_catalog && store.count_routes().await? == 0 {
                seed_catalog(&store).await?;
            }
            Arc::new(store)
        }
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            seed_catalog(&store).await?;
            Arc::new(store)
        }
    };

    tracing::info!(
        storage = %config.storage,
        reservation_mode = %config.booking.reservation_mode,
        "starting ferry booking service"
    );

    build_rocket(store, config.booking, config.auth)
        .launch()
        .await
        .map_err(|e| anyhow!("server error: {}", e))?;

    Ok(())
}
