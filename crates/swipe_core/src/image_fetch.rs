//! Card and gallery image downloads with a per-image placeholder fallback.

use anyhow::Context;
use reqwest::Client;
use shared::{domain::Item, error::ImageRenderError};
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;

const THUMBNAIL_EDGE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImagePurpose {
    Card,
    Thumbnail,
}

/// Placeholder picture for the item at `position` (0-based).
pub fn placeholder_image_ref(
    settings: &Settings,
    position: usize,
    purpose: ImagePurpose,
) -> Result<Url, ImageRenderError> {
    let (width, height) = match purpose {
        ImagePurpose::Card => (settings.image_width, settings.image_height),
        ImagePurpose::Thumbnail => (THUMBNAIL_EDGE, THUMBNAIL_EDGE),
    };
    let raw = format!(
        "{}/{width}/{height}?image={position}",
        settings.placeholder_base()
    );
    Url::parse(&raw).map_err(|err| ImageRenderError::new(raw, err.to_string()))
}

#[derive(Debug, Clone)]
pub struct LoadedImage<T> {
    pub image: T,
    pub source_url: Url,
    pub substituted: bool,
}

pub struct ImageFetcher {
    http: Client,
    settings: Settings,
}

impl ImageFetcher {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.fetch_timeout())
            .build()
            .context("failed to build image HTTP client")?;
        Ok(Self {
            http,
            settings: settings.clone(),
        })
    }

    /// Downloads and decodes the item's picture, falling back once to the
    /// placeholder for its position. A failure here never ends the session.
    pub async fn load<T>(
        &self,
        item: &Item,
        position: usize,
        purpose: ImagePurpose,
        decode: impl Fn(&[u8]) -> Result<T, String>,
    ) -> Result<LoadedImage<T>, ImageRenderError> {
        match self.download_and_decode(&item.image_ref, &decode).await {
            Ok(image) => {
                return Ok(LoadedImage {
                    image,
                    source_url: item.image_ref.clone(),
                    substituted: false,
                })
            }
            Err(err) => {
                warn!(item_id = %item.id, position, "image failed to load, using placeholder: {err}");
            }
        }

        let placeholder = placeholder_image_ref(&self.settings, position, purpose)?;
        let image = self.download_and_decode(&placeholder, &decode).await?;
        Ok(LoadedImage {
            image,
            source_url: placeholder,
            substituted: true,
        })
    }

    async fn download_and_decode<T>(
        &self,
        url: &Url,
        decode: &impl Fn(&[u8]) -> Result<T, String>,
    ) -> Result<T, ImageRenderError> {
        debug!(%url, "downloading image");
        let fail = |reason: String| ImageRenderError::new(url.as_str(), reason);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| fail(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP status {}", status.as_u16())));
        }
        let bytes = response.bytes().await.map_err(|err| fail(err.to_string()))?;
        decode(&bytes).map_err(fail)
    }
}

#[cfg(test)]
#[path = "tests/image_fetch_tests.rs"]
mod tests;
