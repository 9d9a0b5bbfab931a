// storage/mod.rs
// Cache database module

pub mod cache;
pub mod pool;

// Re-export commonly used items
pub use cache::{run_migrations, CachedAddress, GeocodeCache};
pub use pool::init_db_pool_with_path;
