use rusqlite::Connection;

use crate::tags::TagRow;

/// the persistence operations tree reconciliation needs. Implemented for [`Connection`],
/// which also covers [`rusqlite::Transaction`] through deref
pub trait TagStore {
    /// every tag of the land, in no guaranteed tree order
    fn list_by_land(&self, land_id: u32) -> Result<Vec<TagRow>, rusqlite::Error>;
    /// saves a new tag and returns the id the store assigned it. `row.id` is ignored
    fn insert(&self, row: &TagRow) -> Result<u32, rusqlite::Error>;
    /// overwrites parent, name, sorting and color of the tag with `row.id`.
    /// Updating a tag that doesn't exist changes nothing and is not an error
    fn update(&self, row: &TagRow) -> Result<(), rusqlite::Error>;
    /// removes the tag, its descendants and their tagged content. Missing ids are ignored
    fn delete(&self, id: u32) -> Result<(), rusqlite::Error>;
}

impl TagStore for Connection {
    fn list_by_land(&self, land_id: u32) -> Result<Vec<TagRow>, rusqlite::Error> {
        get_tags_for_land(land_id, self)
    }

    fn insert(&self, row: &TagRow) -> Result<u32, rusqlite::Error> {
        create_tag(row, self)
    }

    fn update(&self, row: &TagRow) -> Result<(), rusqlite::Error> {
        update_tag(row, self).map(|_| ())
    }

    fn delete(&self, id: u32) -> Result<(), rusqlite::Error> {
        delete_tag(id, self)
    }
}

pub fn get_tags_for_land(land_id: u32, con: &Connection) -> Result<Vec<TagRow>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_tags_for_land.sql"))?;
    let rows = pst.query_map(rusqlite::params![land_id], tag_mapper)?;
    rows.collect::<Result<Vec<TagRow>, rusqlite::Error>>()
}

/// retrieves a tag from the database with the passed `id`
///
/// # Returns
/// - `Ok(TagRow)`: the tag with the specified ID if the tag exists
/// - `Err(rusqlite::Error)`: if there was an error during the database operation, including
///   [`rusqlite::Error::QueryReturnedNoRows`] if no tag with the specified ID exists
pub fn get_tag(id: u32, con: &Connection) -> Result<TagRow, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], tag_mapper)
}

/// creates a new tag in the database and returns its id. The id on `tag` is ignored
pub fn create_tag(tag: &TagRow, con: &Connection) -> Result<u32, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/create_tag.sql"))?;
    let id = pst.insert(rusqlite::params![
        tag.land_id,
        tag.parent_id,
        tag.name,
        tag.sorting,
        tag.color
    ])? as u32;
    Ok(id)
}

/// updates the tag with `tag.id` and returns how many rows changed (0 or 1).
/// The land of a tag never changes, so `tag.land_id` is ignored
pub fn update_tag(tag: &TagRow, con: &Connection) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/update_tag.sql"))?;
    pst.execute(rusqlite::params![
        tag.parent_id,
        tag.name,
        tag.sorting,
        tag.color,
        tag.id
    ])
}

pub fn delete_tag(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/delete_tag.sql"))?;
    pst.execute(rusqlite::params![id])?;
    Ok(())
}

/// 1. id
/// 2. landId
/// 3. parentId
/// 4. name
/// 5. sorting
/// 6. color
fn tag_mapper(row: &rusqlite::Row) -> Result<TagRow, rusqlite::Error> {
    Ok(TagRow {
        id: row.get(0)?,
        land_id: row.get(1)?,
        parent_id: row.get(2)?,
        name: row.get(3)?,
        sorting: row.get(4)?,
        color: row.get(5)?,
    })
}
