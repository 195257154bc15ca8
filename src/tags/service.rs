use std::backtrace::Backtrace;

use rusqlite::{Connection, TransactionBehavior};

use crate::model::error::tag_errors::TagTreeError;
use crate::repository::{land_repository, open_connection};
use crate::tags::repository::TagStore;
use crate::tags::tree::{build_tree, reconcile};
use crate::tags::TagNode;

/// returns the tag tree of the land. A land without tags, or one that doesn't exist, has an empty tree
pub fn get_tag_tree(land_id: u32) -> Result<Vec<TagNode>, TagTreeError> {
    let con = connect()?;
    let rows = match con.list_by_land(land_id) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!(
                "Failed to retrieve tags for land {land_id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            close(con);
            return Err(TagTreeError::StoreUnavailable);
        }
    };
    close(con);
    Ok(build_tree(rows))
}

/// replaces the whole tag tree of the land with `tags`, and returns the saved tree with ids filled in.
///
/// This all happens in one transaction: if anything fails, the land's tags are left as they were.
/// Tags left out of `tags` are deleted along with their tagged content, so an empty list clears the land
pub fn save_tag_tree(land_id: u32, mut tags: Vec<TagNode>) -> Result<Vec<TagNode>, TagTreeError> {
    let mut con = connect()?;
    match land_repository::land_exists(land_id, &con) {
        Ok(true) => { /* no op */ }
        Ok(false) => {
            log::warn!("Cannot save tags for land {land_id}, because that land does not exist!");
            close(con);
            return Err(TagTreeError::DataIntegrityError(format!(
                "Land {land_id} does not exist"
            )));
        }
        Err(e) => {
            log::error!(
                "Failed to check if land {land_id} exists! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            close(con);
            return Err(TagTreeError::StoreUnavailable);
        }
    };
    // immediate takes the write lock up front, so two saves can't interleave their rows
    let tx = match con.transaction_with_behavior(TransactionBehavior::Immediate) {
        Ok(tx) => tx,
        Err(e) => {
            log::error!(
                "Failed to start a transaction to save tags for land {land_id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(TagTreeError::StoreUnavailable);
        }
    };
    // dropping the transaction on error rolls it back
    let summary = reconcile(land_id, &mut tags, &*tx)?;
    if let Err(e) = tx.commit() {
        log::error!(
            "Failed to commit the tag tree for land {land_id}! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(TagTreeError::StoreUnavailable);
    }
    close(con);
    log::info!(
        "Saved tag tree for land {land_id}: {} inserted, {} updated, {} deleted",
        summary.inserted,
        summary.updated,
        summary.deleted
    );
    Ok(tags)
}

fn connect() -> Result<Connection, TagTreeError> {
    open_connection().map_err(|e| {
        log::error!(
            "Failed to open a connection to the database! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        TagTreeError::StoreUnavailable
    })
}

fn close(con: Connection) {
    if let Err((_, e)) = con.close() {
        log::warn!("Failed to close database connection: {e:?}");
    }
}
