//! Writes bulletin artifacts to the output directory.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::report::redirect_page;
use crate::{BulletinError, Result};

pub const HTML_FILENAME: &str = "weather-report.html";
pub const PNG_FILENAME: &str = "weather-alert.png";
pub const INDEX_FILENAME: &str = "index.html";

/// Plain write-file sink rooted at one directory.
#[derive(Debug, Clone)]
pub struct Publisher {
    directory: PathBuf,
}

impl Publisher {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the output directory if it does not exist yet.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| BulletinError::io(&self.directory, e))
    }

    pub async fn write_report(&self, html: &str) -> Result<PathBuf> {
        self.write(HTML_FILENAME, html.as_bytes()).await
    }

    pub async fn write_image(&self, png: &[u8]) -> Result<PathBuf> {
        self.write(PNG_FILENAME, png).await
    }

    /// Write the page that forwards viewers to the image.
    pub async fn write_redirect(&self) -> Result<PathBuf> {
        self.write(INDEX_FILENAME, redirect_page(PNG_FILENAME).as_bytes())
            .await
    }

    async fn write(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.directory.join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| BulletinError::io(&path, e))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}
