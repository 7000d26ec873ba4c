//! SQLite Persistence

mod database;
mod user_repo;

pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use user_repo::SqliteUserRepository;
