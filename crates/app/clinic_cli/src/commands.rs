//! Subcommand bodies.

use clinic_core::auth::password::hash_password_with_cost;
use clinic_core::migrate::migrate as run_migrations;
use clinic_core::seed::{ensure_admin, seed_catalog};
use clinic_core::store::PgStore;
use sqlx::postgres::PgPoolOptions;

use crate::Result;

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(hash_password_with_cost(password, cost)?)
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(database_url: &str) -> Result<()> {
    let pool = connect(database_url).await?;
    run_migrations(&pool).await?;
    log::info!("migrations applied");
    Ok(())
}

pub async fn seed(database_url: &str, admin: Option<(String, String)>, cost: u32) -> Result<()> {
    let pool = connect(database_url).await?;
    run_migrations(&pool).await?;

    let store = PgStore::new(pool);
    let report = seed_catalog(&store).await?;
    log::info!(
        "catalog seeded: {} treatment options, {} medications inserted",
        report.treatment_options,
        report.medications
    );

    if let Some((email, password)) = admin {
        if ensure_admin(&store, &email, &password, cost).await? {
            log::info!("admin account {} created", email);
        } else {
            log::info!("admin account {} already present", email);
        }
    }
    Ok(())
}
