mod catalog;
mod error;
mod keeptrack;
mod source;

use std::future::Future;

use crate::predict::ElementSet;

pub use catalog::TleCatalog;
pub use error::FetchError;
pub use keeptrack::{KeepTrackClient, DEFAULT_BASE_URL};
pub use source::ElementSource;

/// What a fetch collaborator hands back for one identifier.
#[derive(Debug, Clone)]
pub struct FetchedElements {
    pub display_name: String,
    pub elements: ElementSet,
}

/// Retrieves orbital elements for an identifier. One attempt, no retry.
pub trait ElementFetcher {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<FetchedElements, FetchError>> + Send;
}

pub fn default_display_name(id: &str) -> String {
    format!("Satellite {}", id)
}
