use std::sync::Arc;

use tempfile::TempDir;

use paperfolio_core::db::{self, DbPool};

/// Creates a migrated database in a temp directory and returns a pool on
/// it. Keep the TempDir alive for the duration of the test.
pub fn setup_db() -> (TempDir, Arc<DbPool>) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let db_path = db::init(temp_dir.path().to_str().unwrap()).expect("failed to init db");
    let pool = db::create_pool(&db_path).expect("failed to create pool");
    db::run_migrations(&pool).expect("failed to run migrations");
    (temp_dir, pool)
}
