use deadpool_postgres::{Object, Pool, PoolError};

use crate::static_vars::get_sql_pool;

#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    /// The pool registered by `connect_postgres_db`, if any.
    pub fn from_global() -> Option<Self> {
        get_sql_pool().cloned().map(Self::new)
    }

    /// Connection for read operations. Returned to the pool on drop.
    pub async fn get_read_client(&self) -> Result<Object, PoolError> {
        self.pool.get().await
    }

    /// Get pool statistics for monitoring
    pub fn get_pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }
}
