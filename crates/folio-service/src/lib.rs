//! # Folio Service
//!
//! Application services for the photo gallery, the wiki and authentication.
//!
//! Read paths go through [`folio_cache::ReadThrough`] accessors; write paths
//! invalidate the affected keys after the backing store accepts the write.
//! [`di`] wires the services to either MySQL and Redis or in-process stores.

pub mod auth_service;
pub mod di;
pub mod dto;
pub mod editor_service;
pub mod gallery_service;
pub mod reader_service;
pub mod settings;
pub mod upload_service;

pub use auth_service::*;
pub use di::{build_folio_module, build_local_module, FolioModule, LocalModule, Services};
pub use dto::*;
pub use editor_service::*;
pub use gallery_service::*;
pub use reader_service::*;
pub use settings::CacheSettings;
pub use upload_service::*;
