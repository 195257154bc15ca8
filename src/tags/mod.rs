pub mod handler;
pub mod models;
pub mod repository;
pub mod service;
pub mod tree;

#[cfg(test)]
mod tests;

// make it easier to just use models
pub use models::*;
