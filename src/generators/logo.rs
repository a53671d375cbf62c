use std::io::Cursor;
use std::time::Duration;

use anyhow::{bail, Context};
use image::{GenericImageView, ImageFormat};

use crate::core::{DocumentError, DocumentResult};

/// Logo normalizado a PNG con sus dimensiones en píxeles
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl LogoImage {
    /// Decodifica cualquier formato soportado y lo re-codifica como PNG
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let image = image::load_from_memory(bytes).context("unreadable logo image")?;
        let (width, height) = image.dimensions();

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .context("logo re-encoding failed")?;

        Ok(LogoImage {
            png: png.into_inner(),
            width,
            height,
        })
    }
}

/// Descarga logos remotos; cualquier fallo se registra y se ignora
pub struct LogoFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl LogoFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> DocumentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocumentError::Render(format!("http client: {}", e)))?;

        Ok(LogoFetcher { client, max_bytes })
    }

    pub async fn fetch(&self, url: &str) -> Option<LogoImage> {
        match self.try_fetch(url).await {
            Ok(logo) => {
                tracing::debug!(url, width = logo.width, height = logo.height, "logo loaded");
                Some(logo)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "logo unavailable, rendering without it");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> anyhow::Result<LogoImage> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                bail!("logo too large: {} bytes (max {})", length, self.max_bytes);
            }
        }

        // Sin Content-Length fiable: cortar al superar el límite
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                bail!("logo too large: more than {} bytes", self.max_bytes);
            }
            bytes.extend_from_slice(&chunk);
        }

        LogoImage::from_bytes(&bytes)
    }
}
