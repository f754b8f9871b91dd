//! Text-generation provider boundary.

pub mod openai;

pub use openai::OpenAiProvider;

use crate::Result;
use crate::prompt::ForecastRequest;

/// Something that turns a forecast request into raw free text.
pub trait ForecastProvider {
    async fn generate(&self, request: &ForecastRequest) -> Result<String>;
}
