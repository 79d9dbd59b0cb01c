use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::fetch::{default_display_name, ElementFetcher, FetchError, FetchedElements};
use crate::predict::ElementSet;

pub const DEFAULT_BASE_URL: &str = "https://api.keeptrack.space";

/// Satellite record as served by `GET /v1/sat/{id}`. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct SatelliteRecord {
    #[serde(default)]
    name: Option<String>,
    tle1: Option<String>,
    tle2: Option<String>,
}

/// HTTP client for the KeepTrack satellite API.
#[derive(Debug, Clone)]
pub struct KeepTrackClient {
    client: Client,
    base_url: Url,
}

impl KeepTrackClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn satellite_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "sat", id]);
        Ok(url)
    }

    async fn fetch_record(&self, id: &str) -> Result<FetchedElements, FetchError> {
        let url = self.satellite_url(id)?;
        log::debug!("Fetching elements for {} from {}", id, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_record(id, &body)
    }
}

impl ElementFetcher for KeepTrackClient {
    async fn fetch(&self, id: &str) -> Result<FetchedElements, FetchError> {
        let result = self.fetch_record(id).await;
        if let Err(e) = &result {
            log::error!("Error fetching satellite {} TLE data: {}", id, e);
        }
        result
    }
}

fn parse_record(id: &str, body: &str) -> Result<FetchedElements, FetchError> {
    let record: SatelliteRecord =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let tle1 = record
        .tle1
        .ok_or_else(|| FetchError::Malformed("missing tle1".into()))?;
    let tle2 = record
        .tle2
        .ok_or_else(|| FetchError::Malformed("missing tle2".into()))?;

    let display_name = record
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_display_name(id));
    let elements = ElementSet::from_lines(Some(display_name.clone()), &tle1, &tle2)?;

    Ok(FetchedElements {
        display_name,
        elements,
    })
}
