//! Drape Database Layer
//!
//! Repository traits for owners, garment completion state and file records,
//! with a PostgreSQL implementation and an in-memory one.

// Module declarations
pub mod db;
pub mod memory;
pub mod traits;

// Re-exports: PostgreSQL repositories
pub use db::{run_migrations, FileRecordRepository, GarmentRepository, OwnerRepository};

// Re-exports: In-memory repositories
pub use memory::{InMemoryFileRecordStore, InMemoryGarmentStateStore, InMemoryOwnerDirectory};

// Re-exports: Repository traits
pub use traits::{FileRecordStore, GarmentStateStore, OwnerDirectory, SlotUpdate};
