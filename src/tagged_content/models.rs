use rocket::serde::{Deserialize, Serialize};

/// a highlighted excerpt of an expression's text, filed under one tag
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct TaggedContent {
    pub id: u32,
    pub tag_id: u32,
    pub expression_id: u32,
    pub text: String,
    /// offset of the first highlighted character in the expression's readable text
    pub from_char: u32,
    /// offset just past the last highlighted character
    pub to_char: u32,
}

/// which excerpts to list
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TaggedContentFilter {
    /// excerpts taken from one expression
    Expression(u32),
    /// excerpts filed under any tag of one land
    Land(u32),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CreateTaggedContentRequest {
    pub tag_id: u32,
    pub expression_id: u32,
    pub text: String,
    pub from_char: u32,
    pub to_char: u32,
}

/// moving an excerpt to another tag, or editing its text. The character range never changes
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UpdateTaggedContentRequest {
    pub tag_id: u32,
    pub text: String,
}

/// all the excerpts filed under one tag, labelled with that tag's name and color
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct TagGroup {
    pub tag_id: u32,
    pub name: String,
    pub color: String,
    pub contents: Vec<TaggedContent>,
}
