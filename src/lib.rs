//! `wxbulletin` - daily severe weather risk bulletin generator
//!
//! Requests a structured outlook from a text-generation provider, styles the
//! reply into an HTML bulletin, renders the report container to PNG and
//! publishes a redirect page pointing at the image.

pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod publish;
pub mod render;
pub mod report;

// Re-export core types for public API
pub use config::BulletinConfig;
pub use dates::DateContext;
pub use error::BulletinError;
pub use pipeline::{BulletinPipeline, RenderedArtifact};
pub use prompt::ForecastRequest;
pub use provider::{ForecastProvider, OpenAiProvider};
pub use publish::Publisher;
pub use render::{ChromiumRasterizer, Rasterizer};
pub use report::ParsedSections;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, BulletinError>;
