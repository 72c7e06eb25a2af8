//! Storage documents.

pub mod user;
