//! Domain entities for the photo gallery, the wiki and user accounts.
//!
//! Entities are immutable snapshots once persisted: a write produces a new
//! version rather than mutating a cached copy in place.

pub mod article;
pub mod photo;
pub mod user;

pub use article::*;
pub use photo::*;
pub use user::*;
