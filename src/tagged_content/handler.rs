use rocket::serde::json::Json;

use crate::model::error::tagged_content_errors::TaggedContentError;
use crate::model::response::tagged_content_responses::{
    CategorizedContentResponse, CreateTaggedContentResponse, GetTaggedContentResponse,
    ListTaggedContentResponse, ModifyTaggedContentResponse,
};
use crate::model::response::BasicMessage;
use crate::tagged_content::{
    service, CreateTaggedContentRequest, TaggedContentFilter, UpdateTaggedContentRequest,
};

static DB_ERROR_MESSAGE: &str =
    "Failed to access tagged content in database. Check server logs for details";

#[get("/<id>")]
pub fn get_tagged_content(id: u32) -> GetTaggedContentResponse {
    match service::get_tagged_content(id) {
        Ok(content) => GetTaggedContentResponse::Success(Json::from(content)),
        Err(_) => GetTaggedContentResponse::TaggedContentDbError(BasicMessage::new(DB_ERROR_MESSAGE)),
    }
}

#[get("/expression/<expression_id>")]
pub fn get_expression_tagged_content(expression_id: u32) -> ListTaggedContentResponse {
    list(TaggedContentFilter::Expression(expression_id))
}

#[get("/land/<land_id>")]
pub fn get_land_tagged_content(land_id: u32) -> ListTaggedContentResponse {
    list(TaggedContentFilter::Land(land_id))
}

#[get("/land/<land_id>/categorized")]
pub fn get_categorized_tagged_content(land_id: u32) -> CategorizedContentResponse {
    match service::get_categorized_contents(land_id) {
        Ok(groups) => CategorizedContentResponse::Success(Json::from(groups)),
        Err(_) => {
            CategorizedContentResponse::TaggedContentDbError(BasicMessage::new(DB_ERROR_MESSAGE))
        }
    }
}

#[post("/", data = "<request>")]
pub fn create_tagged_content(
    request: Json<CreateTaggedContentRequest>,
) -> CreateTaggedContentResponse {
    match service::create_tagged_content(request.into_inner()) {
        Ok(content) => CreateTaggedContentResponse::Success(Json::from(content)),
        Err(TaggedContentError::DataIntegrityError(message)) => {
            CreateTaggedContentResponse::InvalidTaggedContent(Json::from(BasicMessage::from(
                message,
            )))
        }
        Err(TaggedContentError::StoreUnavailable) => {
            CreateTaggedContentResponse::TaggedContentDbError(BasicMessage::new(DB_ERROR_MESSAGE))
        }
    }
}

#[put("/<id>", data = "<request>")]
pub fn update_tagged_content(
    id: u32,
    request: Json<UpdateTaggedContentRequest>,
) -> ModifyTaggedContentResponse {
    modified(service::update_tagged_content(id, request.into_inner()))
}

#[delete("/<id>")]
pub fn delete_tagged_content(id: u32) -> ModifyTaggedContentResponse {
    modified(service::delete_tagged_content(id))
}

fn list(filter: TaggedContentFilter) -> ListTaggedContentResponse {
    match service::get_tagged_contents(filter) {
        Ok(contents) => ListTaggedContentResponse::Success(Json::from(contents)),
        Err(_) => {
            ListTaggedContentResponse::TaggedContentDbError(BasicMessage::new(DB_ERROR_MESSAGE))
        }
    }
}

fn modified(res: Result<(), TaggedContentError>) -> ModifyTaggedContentResponse {
    match res {
        Ok(()) => ModifyTaggedContentResponse::Success(Json::from(true)),
        Err(TaggedContentError::DataIntegrityError(message)) => {
            ModifyTaggedContentResponse::InvalidTaggedContent(Json::from(BasicMessage::from(
                message,
            )))
        }
        Err(TaggedContentError::StoreUnavailable) => {
            ModifyTaggedContentResponse::TaggedContentDbError(BasicMessage::new(DB_ERROR_MESSAGE))
        }
    }
}
