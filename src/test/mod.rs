use std::fs::remove_file;
use std::path::Path;

use crate::repository::{initialize_db, open_connection};
use crate::tags::repository as tag_repository;
use crate::tags::TagRow;

/// starts the current test with a fresh database of its own
pub fn refresh_db() {
    cleanup();
    initialize_db().unwrap();
}

pub fn cleanup() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
}

/// each test runs on its own named thread, so the name keeps test databases apart
pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

pub fn create_land_db_entry(name: &str) -> u32 {
    let con = open_connection().unwrap();
    con.execute("insert into Land(name) values (?1)", rusqlite::params![name])
        .unwrap();
    let id = con.last_insert_rowid() as u32;
    con.close().unwrap();
    id
}

pub fn create_expression_db_entry(land_id: u32, url: &str) -> u32 {
    let con = open_connection().unwrap();
    con.execute(
        "insert into Expression(landId, url) values (?1, ?2)",
        rusqlite::params![land_id, url],
    )
    .unwrap();
    let id = con.last_insert_rowid() as u32;
    con.close().unwrap();
    id
}

pub fn create_tag_db_entry(land_id: u32, parent_id: Option<u32>, name: &str, sorting: u32) -> u32 {
    let con = open_connection().unwrap();
    let id = tag_repository::create_tag(
        &TagRow {
            id: 0,
            land_id,
            parent_id,
            name: name.to_string(),
            sorting,
            color: String::new(),
        },
        &con,
    )
    .unwrap();
    con.close().unwrap();
    id
}

pub fn get_all_tag_rows(land_id: u32) -> Vec<TagRow> {
    let con = open_connection().unwrap();
    let mut rows = tag_repository::get_tags_for_land(land_id, &con).unwrap();
    con.close().unwrap();
    rows.sort_by_key(|row| row.id);
    rows
}
