pub mod assert;

use crate::{error::BookingResult, schema::INIT_SQL};
use actix_web::web;
use anyhow::Context;
use diesel::{
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection},
    SqliteConnection,
};
use r2d2::PooledConnection;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .context("Failed to create pool")?;

    let mut conn = pool.get().context("DB connection")?;
    conn.batch_execute("PRAGMA journal_mode = WAL;")
        .context("Failed to enable WAL")?;
    init_schema(&mut conn)?;

    Ok(pool)
}

pub fn init_schema(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    conn.batch_execute(INIT_SQL).context("Failed to create schema")
}

/// A single-connection in-memory pool; the database lives as long as the connection.
#[cfg(test)]
pub fn memory_pool() -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .expect("in-memory pool");
    let mut conn = pool.get().expect("in-memory connection");
    init_schema(&mut conn).expect("schema");
    pool
}

pub fn get_db_conn(
    pool: &DbPool,
) -> BookingResult<PooledConnection<ConnectionManager<SqliteConnection>>> {
    Ok(pool.get()?)
}

/// Runs blocking database work on the actix blocking pool.
pub async fn with_conn<F, T>(pool: &DbPool, f: F) -> BookingResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> BookingResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = get_db_conn(&pool)?;
        f(&mut *conn)
    })
    .await?
}
