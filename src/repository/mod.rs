use std::path::Path;

use rusqlite::{Connection, OpenFlags, Result};

pub mod land_repository;

/// opens a new connection to the database with foreign keys enforced.
/// Callers own the connection and are responsible for closing it
#[cfg(not(test))]
pub fn open_connection() -> Result<Connection> {
    use crate::config::TAG_EXPLORER_CONFIG;

    let db_config = &TAG_EXPLORER_CONFIG.database;
    configure(
        Connection::open_with_flags(Path::new(db_config.location.as_str()), OpenFlags::default())?,
        db_config.busy_timeout(),
    )
}

#[cfg(test)]
pub fn open_connection() -> Result<Connection> {
    let db_name = format!("{}.sqlite", crate::test::current_thread_name());
    configure(
        Connection::open_with_flags(Path::new(db_name.as_str()), OpenFlags::default())?,
        std::time::Duration::from_secs(5),
    )
}

fn configure(con: Connection, busy_timeout: std::time::Duration) -> Result<Connection> {
    // sqlite leaves foreign keys off unless asked, per connection
    con.pragma_update(None, "foreign_keys", true)?;
    con.busy_timeout(busy_timeout)?;
    Ok(con)
}

/// creates any missing tables and indexes. Safe to run against an already-populated database
pub fn initialize_db() -> Result<()> {
    let con = open_connection()?;
    con.execute_batch(include_str!("../assets/init.sql"))?;
    con.close().map_err(|(_, e)| e)?;
    Ok(())
}
