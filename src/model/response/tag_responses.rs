use rocket::serde::json::Json;

use crate::model::response::BasicMessage;
use crate::tags::TagNode;

#[derive(Responder)]
pub enum GetTagTreeResponse {
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<TagNode>>),
}

#[derive(Responder)]
pub enum SaveTagTreeResponse {
    #[response(status = 400, content_type = "json")]
    InvalidTree(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<bool>),
}
