//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! SHOPDESK_STORE=postgres SHOPDESK_DATABASE_URL=postgres://... shopdesk migrate
//! ```
//!
//! Migrations live in `crates/admin/migrations/` and are embedded into the
//! binary at build time.

use shopdesk_admin::config::{AdminConfig, StoreBackend};
use shopdesk_admin::db;
use tracing::info;

/// Run the document store migrations.
///
/// # Errors
///
/// Returns an error if the store is not `PostgreSQL`, the database is
/// unreachable or a migration fails.
pub async fn run(config: &AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    let StoreBackend::Postgres { database_url } = &config.store else {
        return Err("migrations need SHOPDESK_STORE=postgres".into());
    };

    info!("Connecting to database...");
    let pool = db::create_pool(database_url).await?;

    info!("Running migrations...");
    db::run_migrations(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
