/// Database migration runner
///
/// Migrations live in the workspace-root `migrations/` directory and are
/// embedded at compile time via `sqlx::migrate!`. The schema carries the
/// store-level constraints the Consistency Coordinator relies on (unique
/// membership pairs, the singleton-admin partial index, CITEXT name
/// uniqueness), so running migrations is a precondition for every binary
/// and integration test.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a migration fails to
/// execute, or the connection is lost mid-run. Failed migrations are rolled
/// back by sqlx where the statements allow it.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("Database migrations complete");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
