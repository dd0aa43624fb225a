/// Database access layer
///
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: schema migration runner

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, health_check, DatabaseConfig};
