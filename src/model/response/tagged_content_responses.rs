use rocket::serde::json::Json;

use crate::model::response::BasicMessage;
use crate::tagged_content::{TagGroup, TaggedContent};

#[derive(Responder)]
pub enum GetTaggedContentResponse {
    #[response(status = 500, content_type = "json")]
    TaggedContentDbError(Json<BasicMessage>),
    /// `null` when no excerpt has the requested id
    #[response(status = 200)]
    Success(Json<Option<TaggedContent>>),
}

#[derive(Responder)]
pub enum ListTaggedContentResponse {
    #[response(status = 500, content_type = "json")]
    TaggedContentDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<TaggedContent>>),
}

#[derive(Responder)]
pub enum CategorizedContentResponse {
    #[response(status = 500, content_type = "json")]
    TaggedContentDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<TagGroup>>),
}

#[derive(Responder)]
pub enum CreateTaggedContentResponse {
    #[response(status = 400, content_type = "json")]
    InvalidTaggedContent(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TaggedContentDbError(Json<BasicMessage>),
    #[response(status = 201, content_type = "json")]
    Success(Json<TaggedContent>),
}

/// shared by update and delete, which both answer with a plain `true`
#[derive(Responder)]
pub enum ModifyTaggedContentResponse {
    #[response(status = 400, content_type = "json")]
    InvalidTaggedContent(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TaggedContentDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<bool>),
}
