//! Data Transfer Objects (DTOs).

mod article_dto;
mod auth_dto;
mod photo_dto;

pub use article_dto::*;
pub use auth_dto::*;
pub use photo_dto::*;
