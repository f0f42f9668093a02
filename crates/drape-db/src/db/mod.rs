//! PostgreSQL repositories
//!
//! Queries are built at runtime with `sqlx::query` so no `DATABASE_URL` is
//! needed at compile time.

pub mod file_record;
pub mod garment;
pub mod owner;

pub use file_record::FileRecordRepository;
pub use garment::GarmentRepository;
pub use owner::OwnerRepository;

use sqlx::PgPool;

/// Apply the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
