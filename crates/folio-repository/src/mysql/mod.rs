//! MySQL repository implementations.

mod article_repository;
mod photo_repository;
mod revision_repository;
mod user_repository;

pub use article_repository::MySqlArticleRepository;
pub use photo_repository::MySqlPhotoRepository;
pub use revision_repository::MySqlRevisionRepository;
pub use user_repository::MySqlUserRepository;
