use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetch::{default_display_name, ElementFetcher, FetchError, FetchedElements};
use crate::predict::{parse_multi_tle, ElementSet};

/// Offline element source backed by a folder of `.tle`/`.txt` files,
/// keyed by NORAD catalog number.
#[derive(Debug, Default)]
pub struct TleCatalog {
    satellites: HashMap<u64, FetchedElements>,
}

impl TleCatalog {
    pub fn load_dir(tle_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let tle_dir = tle_dir.into();
        let mut catalog = Self::default();

        for entry in fs::read_dir(&tle_dir)? {
            let path = entry?.path();
            if !is_tle_path(&path) {
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(content) => {
                    let loaded = catalog.insert_content(&content);
                    log::info!("Loaded {} satellites from {}", loaded, path.display());
                }
                Err(e) => log::warn!("Failed to read TLE file {}: {}", path.display(), e),
            }
        }

        log::info!(
            "TLE catalog {} holds {} satellites",
            tle_dir.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    #[cfg(test)]
    pub fn from_content(content: &str) -> Self {
        let mut catalog = Self::default();
        catalog.insert_content(content);
        catalog
    }

    /// Adds every parsable record; returns how many were added.
    fn insert_content(&mut self, content: &str) -> usize {
        let mut added = 0;
        for record in parse_multi_tle(content) {
            let name = record.name.map(String::from);
            let elements = match ElementSet::from_lines(name.clone(), record.line1, record.line2) {
                Ok(e) => e,
                Err(e) => {
                    log::warn!(
                        "Skipping invalid TLE {}: {}",
                        record.name.unwrap_or(record.line1),
                        e
                    );
                    continue;
                }
            };
            let norad_id = elements.norad_id();
            let display_name = name.unwrap_or_else(|| default_display_name(&norad_id.to_string()));

            self.satellites.insert(
                norad_id,
                FetchedElements {
                    display_name,
                    elements,
                },
            );
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn lookup(&self, id: &str) -> Result<FetchedElements, FetchError> {
        id.trim()
            .parse::<u64>()
            .ok()
            .and_then(|norad_id| self.satellites.get(&norad_id))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }
}

impl ElementFetcher for TleCatalog {
    async fn fetch(&self, id: &str) -> Result<FetchedElements, FetchError> {
        self.lookup(id)
    }
}

fn is_tle_path(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "tle" || ext == "txt")
}
