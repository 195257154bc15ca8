use rusqlite::{Connection, OptionalExtension};

use crate::tagged_content::{CreateTaggedContentRequest, TaggedContent, TaggedContentFilter};

pub fn get_tagged_contents(
    filter: TaggedContentFilter,
    con: &Connection,
) -> Result<Vec<TaggedContent>, rusqlite::Error> {
    let (query, id) = match filter {
        TaggedContentFilter::Expression(id) => (
            include_str!("../assets/queries/tagged_content/get_for_expression.sql"),
            id,
        ),
        TaggedContentFilter::Land(id) => (
            include_str!("../assets/queries/tagged_content/get_for_land.sql"),
            id,
        ),
    };
    let mut pst = con.prepare(query)?;
    let rows = pst.query_map(rusqlite::params![id], tagged_content_mapper)?;
    rows.collect::<Result<Vec<TaggedContent>, rusqlite::Error>>()
}

/// if `None` is returned, that means no excerpt has that id
pub fn get_tagged_content(
    id: u32,
    con: &Connection,
) -> Result<Option<TaggedContent>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/tagged_content/get_by_id.sql"
    ))?;
    pst.query_row(rusqlite::params![id], tagged_content_mapper)
        .optional()
}

/// the caller needs to make sure the tag and expression exist
pub fn create_tagged_content(
    request: &CreateTaggedContentRequest,
    con: &Connection,
) -> Result<u32, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/tagged_content/create_tagged_content.sql"
    ))?;
    let id = pst.insert(rusqlite::params![
        request.tag_id,
        request.expression_id,
        request.text,
        request.from_char,
        request.to_char
    ])? as u32;
    Ok(id)
}

/// returns how many rows changed; 0 if no excerpt has that id
pub fn update_tagged_content(
    id: u32,
    tag_id: u32,
    text: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/tagged_content/update_tagged_content.sql"
    ))?;
    pst.execute(rusqlite::params![tag_id, text, id])
}

pub fn delete_tagged_content(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/tagged_content/delete_tagged_content.sql"
    ))?;
    pst.execute(rusqlite::params![id])?;
    Ok(())
}

/// 1. id
/// 2. tagId
/// 3. expressionId
/// 4. text
/// 5. fromChar
/// 6. toChar
fn tagged_content_mapper(row: &rusqlite::Row) -> Result<TaggedContent, rusqlite::Error> {
    Ok(TaggedContent {
        id: row.get(0)?,
        tag_id: row.get(1)?,
        expression_id: row.get(2)?,
        text: row.get(3)?,
        from_char: row.get(4)?,
        to_char: row.get(5)?,
    })
}
