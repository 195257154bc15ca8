use std::backtrace::Backtrace;
use std::collections::HashMap;

use rusqlite::{Connection, TransactionBehavior};

use crate::model::error::tagged_content_errors::TaggedContentError;
use crate::repository::{land_repository, open_connection};
use crate::tagged_content::categorizer::categorize;
use crate::tagged_content::repository as tagged_content_repository;
use crate::tagged_content::{
    CreateTaggedContentRequest, TagGroup, TaggedContent, TaggedContentFilter,
    UpdateTaggedContentRequest,
};
use crate::tags::repository as tag_repository;

/// lists excerpts of one expression or one land. Unknown expressions and lands just have no excerpts
pub fn get_tagged_contents(
    filter: TaggedContentFilter,
) -> Result<Vec<TaggedContent>, TaggedContentError> {
    let con = connect()?;
    let res = tagged_content_repository::get_tagged_contents(filter, &con)
        .map_err(|e| db_failure(&format!("retrieve tagged content for {filter:?}"), e));
    close(con);
    res
}

/// `None` if no excerpt has that id
pub fn get_tagged_content(id: u32) -> Result<Option<TaggedContent>, TaggedContentError> {
    let con = connect()?;
    let res = tagged_content_repository::get_tagged_content(id, &con)
        .map_err(|e| db_failure(&format!("retrieve tagged content with id {id}"), e));
    close(con);
    res
}

/// every excerpt of the land, grouped under its tag. See [`categorize`] for the ordering
pub fn get_categorized_contents(land_id: u32) -> Result<Vec<TagGroup>, TaggedContentError> {
    let con = connect()?;
    let tags = match tag_repository::get_tags_for_land(land_id, &con) {
        Ok(tags) => tags,
        Err(e) => {
            close(con);
            return Err(db_failure(&format!("retrieve tags for land {land_id}"), e));
        }
    };
    let contents = match tagged_content_repository::get_tagged_contents(
        TaggedContentFilter::Land(land_id),
        &con,
    ) {
        Ok(contents) => contents,
        Err(e) => {
            close(con);
            return Err(db_failure(
                &format!("retrieve tagged content for land {land_id}"),
                e,
            ));
        }
    };
    close(con);
    let tags_by_id: HashMap<u32, _> = tags.into_iter().map(|tag| (tag.id, tag)).collect();
    Ok(categorize(contents, &tags_by_id))
}

/// saves a new excerpt and returns it with its id
pub fn create_tagged_content(
    request: CreateTaggedContentRequest,
) -> Result<TaggedContent, TaggedContentError> {
    if request.from_char > request.to_char {
        return Err(TaggedContentError::DataIntegrityError(format!(
            "fromChar ({}) cannot be after toChar ({})",
            request.from_char, request.to_char
        )));
    }
    let mut con = connect()?;
    let tx = con
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| db_failure("start a transaction for new tagged content", e))?;
    check_tag_exists(request.tag_id, &tx)?;
    match land_repository::expression_exists(request.expression_id, &tx) {
        Ok(true) => { /* no op */ }
        Ok(false) => {
            return Err(TaggedContentError::DataIntegrityError(format!(
                "Expression {} does not exist",
                request.expression_id
            )));
        }
        Err(e) => {
            return Err(db_failure(
                &format!("check if expression {} exists", request.expression_id),
                e,
            ));
        }
    };
    let id = tagged_content_repository::create_tagged_content(&request, &tx)
        .map_err(|e| db_failure("create tagged content", e))?;
    tx.commit()
        .map_err(|e| db_failure("commit new tagged content", e))?;
    close(con);
    Ok(TaggedContent {
        id,
        tag_id: request.tag_id,
        expression_id: request.expression_id,
        text: request.text,
        from_char: request.from_char,
        to_char: request.to_char,
    })
}

/// moves an excerpt to another tag and/or replaces its text. Updating an excerpt that doesn't exist does nothing
pub fn update_tagged_content(
    id: u32,
    request: UpdateTaggedContentRequest,
) -> Result<(), TaggedContentError> {
    let mut con = connect()?;
    let tx = con
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| db_failure("start a transaction to update tagged content", e))?;
    check_tag_exists(request.tag_id, &tx)?;
    let changed = tagged_content_repository::update_tagged_content(
        id,
        request.tag_id,
        &request.text,
        &tx,
    )
    .map_err(|e| db_failure(&format!("update tagged content with id {id}"), e))?;
    tx.commit()
        .map_err(|e| db_failure(&format!("commit tagged content with id {id}"), e))?;
    close(con);
    if changed == 0 {
        log::debug!("No tagged content with id {id} to update");
    }
    Ok(())
}

/// deletes the excerpt with the passed id. Does nothing if that excerpt doesn't exist
pub fn delete_tagged_content(id: u32) -> Result<(), TaggedContentError> {
    let con = connect()?;
    let res = tagged_content_repository::delete_tagged_content(id, &con)
        .map_err(|e| db_failure(&format!("delete tagged content with id {id}"), e));
    close(con);
    res
}

fn check_tag_exists(tag_id: u32, con: &Connection) -> Result<(), TaggedContentError> {
    match tag_repository::get_tag(tag_id, con) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(TaggedContentError::DataIntegrityError(
            format!("Tag {tag_id} does not exist"),
        )),
        Err(e) => Err(db_failure(&format!("check if tag {tag_id} exists"), e)),
    }
}

fn db_failure(action: &str, e: rusqlite::Error) -> TaggedContentError {
    log::error!(
        "Failed to {action}! Error is {e:?}\n{}",
        Backtrace::force_capture()
    );
    TaggedContentError::StoreUnavailable
}

fn connect() -> Result<Connection, TaggedContentError> {
    open_connection().map_err(|e| db_failure("open a connection to the database", e))
}

fn close(con: Connection) {
    if let Err((_, e)) = con.close() {
        log::warn!("Failed to close database connection: {e:?}");
    }
}
