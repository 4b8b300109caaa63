//! Where session items come from.
//!
//! The primary source is the cataas HTTP API. [`FallbackItems`] is a local,
//! deterministic generator used whenever the primary cannot deliver a full
//! batch.

use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::Item, error::SupplyError, protocol::CatRecord};
use tracing::{info, warn};
use url::Url;

use crate::config::Settings;

pub const FALLBACK_TAGS: [&str; 3] = ["cute", "kitten", "cat"];

const FALLBACK_CATALOGUE: [&str; 20] = [
    "cat",
    "cat/cute",
    "cat/says/hello",
    "cat/gif",
    "cat/small",
    "cat/young",
    "cat/sleepy",
    "cat/playful",
    "cat/curious",
    "cat/funny",
    "cat/hat",
    "cat/glasses",
    "cat/box",
    "cat/blanket",
    "cat/window",
    "cat/garden",
    "cat/black",
    "cat/white",
    "cat/tabby",
    "cat/siamese",
];

#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Returns exactly `count` items or a [`SupplyError`].
    async fn fetch_all(&self, count: usize) -> Result<Vec<Item>, SupplyError>;
}

pub struct CataasItemSource {
    http: Client,
    api_base: Url,
    image_width: u32,
    image_height: u32,
}

impl CataasItemSource {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.fetch_timeout())
            .build()
            .context("failed to build item supply HTTP client")?;
        Self::with_client(http, settings)
    }

    pub fn with_client(http: Client, settings: &Settings) -> Result<Self> {
        let api_base = Url::parse(settings.cat_api_base())
            .with_context(|| format!("invalid cat API url '{}'", settings.cat_api_url))?;
        Ok(Self {
            http,
            api_base,
            image_width: settings.image_width,
            image_height: settings.image_height,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn item_from_record(&self, record: CatRecord) -> Item {
        let mut image_ref = self.endpoint(&["cat", record.id.as_str()]);
        image_ref
            .query_pairs_mut()
            .append_pair("width", &self.image_width.to_string())
            .append_pair("height", &self.image_height.to_string());
        Item::new(record.id, image_ref, record.tags)
    }
}

#[async_trait]
impl ItemSource for CataasItemSource {
    async fn fetch_all(&self, count: usize) -> Result<Vec<Item>, SupplyError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let url = self.endpoint(&["api", "cats"]);
        let response = self
            .http
            .get(url)
            .query(&[("limit", count)])
            .send()
            .await
            .map_err(|err| SupplyError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupplyError::Status {
                status: status.as_u16(),
            });
        }

        let records: Vec<CatRecord> = response
            .json()
            .await
            .map_err(|err| SupplyError::Decode(err.to_string()))?;

        // Cards, textures and gallery thumbnails are keyed by id.
        let mut seen = HashSet::new();
        let received = records.len();
        let records: Vec<CatRecord> = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect();
        if records.len() < received {
            warn!(
                received,
                unique = records.len(),
                "cat API repeated item ids; keeping first occurrences"
            );
        }

        if records.len() < count {
            return Err(SupplyError::Short {
                expected: count,
                actual: records.len(),
            });
        }

        Ok(records
            .into_iter()
            .take(count)
            .map(|record| self.item_from_record(record))
            .collect())
    }
}

/// Local stand-in items: distinct URIs cycled from a fixed catalogue.
pub struct FallbackItems {
    base: Url,
    image_width: u32,
    image_height: u32,
}

impl FallbackItems {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base = Url::parse(settings.cat_api_base())
            .with_context(|| format!("invalid cat API url '{}'", settings.cat_api_url))?;
        Ok(Self {
            base,
            image_width: settings.image_width,
            image_height: settings.image_height,
        })
    }

    pub fn generate(&self, count: usize) -> Vec<Item> {
        (0..count)
            .map(|index| {
                let path = FALLBACK_CATALOGUE[index % FALLBACK_CATALOGUE.len()];
                let mut image_ref = self.base.clone();
                if let Ok(mut segments) = image_ref.path_segments_mut() {
                    segments.pop_if_empty().extend(path.split('/'));
                }
                image_ref
                    .query_pairs_mut()
                    .append_pair("width", &self.image_width.to_string())
                    .append_pair("height", &self.image_height.to_string())
                    .append_pair("seq", &index.to_string());
                Item::new(format!("fallback-{index}"), image_ref, FALLBACK_TAGS)
            })
            .collect()
    }
}

#[async_trait]
impl ItemSource for FallbackItems {
    async fn fetch_all(&self, count: usize) -> Result<Vec<Item>, SupplyError> {
        Ok(self.generate(count))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyOrigin {
    Primary,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct SuppliedItems {
    pub items: Vec<Item>,
    pub origin: SupplyOrigin,
}

/// Fetches `count` items, substituting the fallback batch wholesale when the
/// primary fails. Only a fallback that cannot produce `count` items is fatal.
pub async fn fetch_with_fallback(
    primary: &dyn ItemSource,
    fallback: &dyn ItemSource,
    count: usize,
) -> Result<SuppliedItems, SupplyError> {
    let primary_result = primary.fetch_all(count).await.and_then(|items| {
        if items.len() < count {
            Err(SupplyError::Short {
                expected: count,
                actual: items.len(),
            })
        } else {
            Ok(items)
        }
    });

    match primary_result {
        Ok(mut items) => {
            items.truncate(count);
            info!(count, "item supply delivered full batch");
            Ok(SuppliedItems {
                items,
                origin: SupplyOrigin::Primary,
            })
        }
        Err(err) => {
            warn!(count, "primary item supply failed, using fallback batch: {err}");
            let items = fallback.fetch_all(count).await?;
            if items.len() != count {
                return Err(SupplyError::Short {
                    expected: count,
                    actual: items.len(),
                });
            }
            Ok(SuppliedItems {
                items,
                origin: SupplyOrigin::Fallback,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/item_source_tests.rs"]
mod tests;
