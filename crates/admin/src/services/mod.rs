//! External service clients and cached domain services.

pub mod catalog;
pub mod google;
pub mod storage;

pub use catalog::CatalogService;
pub use google::GoogleAuthClient;
pub use storage::ObjectStorageClient;
