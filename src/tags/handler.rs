use rocket::serde::json::Json;

use crate::model::error::tag_errors::TagTreeError;
use crate::model::response::tag_responses::{GetTagTreeResponse, SaveTagTreeResponse};
use crate::model::response::BasicMessage;
use crate::tags::service;
use crate::tags::SaveTagTreeRequest;

#[get("/land/<land_id>")]
pub fn get_tag_tree(land_id: u32) -> GetTagTreeResponse {
    log::debug!("get_tag_tree handler, land {land_id}");
    match service::get_tag_tree(land_id) {
        Ok(tree) => GetTagTreeResponse::Success(Json::from(tree)),
        Err(_) => GetTagTreeResponse::TagDbError(BasicMessage::new(
            "Failed to pull tags from database. Check server logs for details",
        )),
    }
}

/// replaces every tag of the land with the submitted tree. Tags missing from `tags` are deleted,
/// so submitting an empty list removes all of the land's tags
#[post("/", data = "<request>")]
pub fn save_tag_tree(request: Json<SaveTagTreeRequest>) -> SaveTagTreeResponse {
    let request = request.into_inner();
    log::debug!("save_tag_tree handler, land {}", request.land_id);
    match service::save_tag_tree(request.land_id, request.tags) {
        Ok(_) => SaveTagTreeResponse::Success(Json::from(true)),
        Err(TagTreeError::DataIntegrityError(message)) => {
            SaveTagTreeResponse::InvalidTree(Json::from(BasicMessage::from(message)))
        }
        Err(TagTreeError::StoreUnavailable) => SaveTagTreeResponse::TagDbError(BasicMessage::new(
            "Failed to save tags to database. Check server logs for details",
        )),
    }
}
