use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use playtime_core::db::Database;
use playtime_core::error::Error as CoreError;
use tracing::debug;

const USERS_SUBDIR: &str = "users";
const STORAGE_DB_FILENAME: &str = "storage.db";

pub static DB_CACHE: LazyLock<Mutex<HashMap<PathBuf, Arc<Database>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Location of one user's store below the plugin data directory
pub fn user_db_path(data_dir: &str, user_id: &str) -> PathBuf {
    Path::new(data_dir)
        .join(USERS_SUBDIR)
        .join(user_id)
        .join(STORAGE_DB_FILENAME)
}

/// Get or create a database connection
///
/// If the database already exists in the cache, returns the cached instance.
/// Otherwise, opens it (running migrations) and caches it.
pub fn get_or_create_database<P: AsRef<Path>>(db_path: P) -> Result<Arc<Database>, CoreError> {
    let db_path = db_path.as_ref();
    let mut cache = DB_CACHE.lock();

    if let Some(db) = cache.get(db_path) {
        debug!(path = %db_path.display(), "reusing cached database");
        return Ok(Arc::clone(db));
    }

    let db = Arc::new(Database::open(db_path)?);
    cache.insert(db_path.to_path_buf(), Arc::clone(&db));

    Ok(db)
}

/// Clear the database cache (useful for testing)
pub fn clear_cache() {
    DB_CACHE.lock().clear();
}
