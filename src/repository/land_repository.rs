use rusqlite::{Connection, OptionalExtension};

/// lands are populated by the crawler; this service only ever needs to know that one is there
pub fn land_exists(land_id: u32, con: &Connection) -> Result<bool, rusqlite::Error> {
    con.query_row(
        "select 1 from Land where id = ?1",
        rusqlite::params![land_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

pub fn expression_exists(expression_id: u32, con: &Connection) -> Result<bool, rusqlite::Error> {
    con.query_row(
        "select 1 from Expression where id = ?1",
        rusqlite::params![expression_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}
