//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at compile
//! time. They are never run by the server itself.

use tracing::info;

use catalog_server::db;

use super::{CliError, database_url};

/// Run the catalog migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails or a
/// migration fails.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;

    info!("Connecting to catalog database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running catalog migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Catalog migrations complete!");
    Ok(())
}
