mod action_dispatcher;
mod catalog_service;
mod errors;
mod media_factory;

pub use action_dispatcher::{borrow_media, download_media, perform_action};
pub use catalog_service::{
    MediaCatalog, MediaDetail, ServiceDependencies, get_media_detail, list_media,
};
pub use errors::{CatalogError, Result};
pub use media_factory::{create_media, get_media_class};
