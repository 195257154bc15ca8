pub mod tag_errors;
pub mod tagged_content_errors;
