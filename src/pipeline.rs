//! One bulletin run, stage by stage.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::Result;
use crate::dates::DateContext;
use crate::prompt::ForecastRequest;
use crate::provider::ForecastProvider;
use crate::publish::Publisher;
use crate::render::Rasterizer;
use crate::report::{ParsedSections, assemble_document, parse_response};

/// Outputs of a completed run.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub html: String,
    pub png: Vec<u8>,
    pub sections: ParsedSections,
    pub html_path: PathBuf,
    pub png_path: PathBuf,
    pub index_path: PathBuf,
}

/// Sequential pipeline: request, parse, assemble, publish, render.
pub struct BulletinPipeline<P, R> {
    provider: P,
    rasterizer: R,
    publisher: Publisher,
}

impl<P: ForecastProvider, R: Rasterizer> BulletinPipeline<P, R> {
    pub fn new(provider: P, rasterizer: R, publisher: Publisher) -> Self {
        Self {
            provider,
            rasterizer,
            publisher,
        }
    }

    /// Give back the provider and rasterizer.
    pub fn into_parts(self) -> (P, R) {
        (self.provider, self.rasterizer)
    }

    /// Run every stage once. Any error aborts the run; nothing is retried.
    #[instrument(skip_all, fields(today = %dates.today))]
    pub async fn run(&self, dates: &DateContext) -> Result<RenderedArtifact> {
        info!("Report date range: {}", dates.header_range);
        self.publisher.prepare().await?;

        let request = ForecastRequest::for_context(dates);
        let raw = self.provider.generate(&request).await?;
        debug!("Raw provider response:\n{}", raw);

        let sections = parse_response(&raw, dates);
        let html = assemble_document(&dates.header_range, &sections);
        let html_path = self.publisher.write_report(&html).await?;

        let png = self.rasterizer.capture(&html).await?;
        let png_path = self.publisher.write_image(&png).await?;

        let index_path = self.publisher.write_redirect().await?;
        info!("Weather bulletin generated in {}", self.publisher.directory().display());

        Ok(RenderedArtifact {
            html,
            png,
            sections,
            html_path,
            png_path,
            index_path,
        })
    }
}
