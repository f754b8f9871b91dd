//! Report module
//!
//! Turns the provider's free-text reply into the bulletin document:
//! - Section extraction and list segmentation (`parser`)
//! - Hazard and risk-level emphasis (`styling`)
//! - Document and redirect page templates (`html`)

pub mod html;
pub mod parser;
pub mod styling;

pub use html::{REPORT_CONTAINER_ID, assemble_document, redirect_page};
pub use parser::parse_response;
pub use styling::style_text;

/// Heading that opens the forecast section of the reply.
pub const FORECAST_LABEL: &str = "REPORT_FORECAST";
/// Heading that opens the immediate-actions list.
pub const IMMEDIATE_LABEL: &str = "RECOMMENDATIONS_IMMEDIATE_ACTIONS";
/// Heading that opens the 5-day monitoring list.
pub const MONITORING_LABEL: &str = "RECOMMENDATIONS_5_DAY_MONITORING";

pub const FALLBACK_FORECAST: &str = "No forecast data extracted.";
pub const FALLBACK_IMMEDIATE: &str = "No immediate actions extracted.";
pub const FALLBACK_MONITORING: &str = "No 5-day monitoring actions extracted.";

/// Styled report content. Every field is always populated, with fallback
/// text when the matching section could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSections {
    pub forecast_html: String,
    pub immediate_items_html: Vec<String>,
    pub monitoring_items_html: Vec<String>,
}

impl Default for ParsedSections {
    fn default() -> Self {
        Self {
            forecast_html: FALLBACK_FORECAST.to_string(),
            immediate_items_html: vec![FALLBACK_IMMEDIATE.to_string()],
            monitoring_items_html: vec![FALLBACK_MONITORING.to_string()],
        }
    }
}
