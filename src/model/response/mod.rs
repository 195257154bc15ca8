use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

pub mod tag_responses;
pub mod tagged_content_responses;

/// represents a basic json message
#[derive(Responder, Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct BasicMessage {
    pub message: String,
}

impl BasicMessage {
    pub fn new(message: &str) -> Json<BasicMessage> {
        Json::from(BasicMessage {
            message: message.to_string(),
        })
    }
}

impl From<String> for BasicMessage {
    fn from(value: String) -> Self {
        Self { message: value }
    }
}
