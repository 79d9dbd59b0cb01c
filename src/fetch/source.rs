use crate::fetch::{ElementFetcher, FetchError, FetchedElements, KeepTrackClient, TleCatalog};
use crate::web::config::SourceConfig;

/// The configured element source.
#[derive(Debug)]
pub enum ElementSource {
    KeepTrack(KeepTrackClient),
    Catalog(TleCatalog),
}

impl ElementSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        match config {
            SourceConfig::Keeptrack { base_url, timeout } => {
                Ok(Self::KeepTrack(KeepTrackClient::new(base_url, *timeout)?))
            }
            SourceConfig::TleFolder { path } => Ok(Self::Catalog(TleCatalog::load_dir(path)?)),
        }
    }
}

impl ElementFetcher for ElementSource {
    async fn fetch(&self, id: &str) -> Result<FetchedElements, FetchError> {
        match self {
            Self::KeepTrack(client) => client.fetch(id).await,
            Self::Catalog(catalog) => catalog.fetch(id).await,
        }
    }
}
