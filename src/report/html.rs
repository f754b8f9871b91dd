//! Document templates.

use std::fmt::Write;

use super::ParsedSections;

/// Element id of the report container; its bounds define the screenshot crop.
pub const REPORT_CONTAINER_ID: &str = "weatherReportContainer";

const ATTRIBUTION: &str = "Sources: Information synthesized based on official forecast agency \
outlooks (NWS Storm Prediction Center, NOAA, FEMA, and state emergency management agencies).";

const STYLESHEET: &str = "
    body { margin: 0; padding: 0; }
    #weatherReportContainer { background-color:#ffffff; font-family:Arial, Helvetica, sans-serif; color:#333333; font-size:16px; line-height:1.6; padding:24px; margin:0 auto; width: 700px; border: 1px solid #ccc; }
    #weatherReportContainer h2 { color:#990000; font-weight:bold; margin-top:0; padding-bottom: 5px; border-bottom: 2px solid #990000; }
    #weatherReportContainer h3 { color:#990000; font-weight:bold; margin-top: 20px; margin-bottom: 10px; border-bottom: 1px solid #eee; padding-bottom: 5px; }
    #weatherReportContainer h4 { color:#990000; font-weight:bold; margin-top: 15px; margin-bottom: 5px; }
    #weatherReportContainer ul { margin-top: 0; padding-left: 20px; }
    #weatherReportContainer li { margin-bottom: 5px; }
    #weatherReportContainer p { margin-top: 0; margin-bottom: 10px; }
    #weatherReportContainer .forecast-section p { margin-bottom: 1em; }
";

/// Embed the styled sections in the full bulletin document.
#[must_use]
pub fn assemble_document(header_range: &str, sections: &ParsedSections) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="UTF-8"><meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Weather Risk Report | {header_range}</title>
<style>{STYLESHEET}</style></head><body>
    <div id="{REPORT_CONTAINER_ID}">
        <h2>{header_range}</h2>
        <h3>Severe Weather Threats (5-Day Outlook)</h3>
        <div class="forecast-section">{forecast}</div>
        <h3>Recommendations</h3>
        <h4>Immediate Actions</h4>
        <ul>{immediate}</ul>
        <h4>5-Day Monitoring</h4>
        <ul>{monitoring}</ul>
        <br/>
        <p style="font-size:14px; color:#666;">{ATTRIBUTION}</p>
    </div>
</body></html>
"#,
        forecast = sections.forecast_html,
        immediate = list_items(&sections.immediate_items_html),
        monitoring = list_items(&sections.monitoring_items_html),
    )
}

fn list_items(items: &[String]) -> String {
    items.iter().fold(String::new(), |mut out, item| {
        let _ = write!(out, "<li>{item}</li>");
        out
    })
}

/// Page that forwards a viewer straight to the rendered image.
#[must_use]
pub fn redirect_page(image_file: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Weather Alert</title><meta http-equiv="refresh" content="0; url={image_file}"><style> body {{ margin: 20px; font-family: Arial, sans-serif; text-align: center;}} img {{ max-width: 100%; height: auto; border: 1px solid #ccc; }} </style></head><body><h1>Weather Alert</h1><p>If you are not redirected, <a href="{image_file}">click here to view the weather alert image</a>.</p><img src="{image_file}" alt="Daily Weather Alert"></body></html>"#
    )
}
