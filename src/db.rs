//! Database pool setup shared by the application and integration tests.

use diesel::SqliteConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// Connection pool over the SQLite database.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
/// A single pooled connection.
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Build an `r2d2` pool for the given SQLite database URL.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().build(manager)
}
