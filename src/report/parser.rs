//! Splits the provider's free-text reply into styled report sections.
//!
//! Parsing never fails. Every field of [`ParsedSections`] starts out as its
//! fallback and is replaced only when the matching region is found.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::dates::{DateContext, short_date};
use crate::report::styling::style_text;
use crate::report::{FORECAST_LABEL, IMMEDIATE_LABEL, MONITORING_LABEL, ParsedSections};

static LABEL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [FORECAST_LABEL, IMMEDIATE_LABEL, MONITORING_LABEL].map(|label| {
        // Tolerates "**LABEL:**" and "LABEL" without a colon.
        Regex::new(&format!(r"(?:\*\*)?{label}(?:\*\*)?:?(?:\*\*)?"))
            .expect("section label pattern compiles")
    })
});

static DAY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDay\s*(\d+)").expect("day token pattern compiles")
});

static LIST_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*]|\d+\.(?:\s|$))\s*").expect("list delimiter pattern compiles")
});

const NO_THREATS_PHRASE: &str = "no significant weather threats";

/// Byte range of the text governed by one section label.
#[derive(Debug, Clone, Copy)]
struct Region {
    body_start: usize,
    body_end: usize,
}

/// Parse a raw reply into the three report sections.
#[must_use]
pub fn parse_response(raw: &str, dates: &DateContext) -> ParsedSections {
    let text = raw.replace("\r\n", "\n");
    let [forecast, immediate, monitoring] = locate_regions(&text);
    let mut sections = ParsedSections::default();

    match forecast.map(|region| region_text(&text, region)) {
        Some(body) if !body.is_empty() => sections.forecast_html = forecast_html(body, dates),
        Some(_) => warn!("{FORECAST_LABEL} section is empty, using fallback forecast"),
        None => warn!("{FORECAST_LABEL} not found, using fallback forecast"),
    }
    match immediate {
        Some(region) => {
            if let Some(items) = styled_items(region_text(&text, region)) {
                sections.immediate_items_html = items;
            } else {
                warn!("{IMMEDIATE_LABEL} section is empty, using fallback list");
            }
        }
        None => warn!("{IMMEDIATE_LABEL} not found, using fallback list"),
    }
    match monitoring {
        Some(region) => {
            if let Some(items) = styled_items(region_text(&text, region)) {
                sections.monitoring_items_html = items;
            } else {
                warn!("{MONITORING_LABEL} section is empty, using fallback list");
            }
        }
        None => warn!("{MONITORING_LABEL} not found, using fallback list"),
    }

    debug!(
        immediate = sections.immediate_items_html.len(),
        monitoring = sections.monitoring_items_html.len(),
        "Parsed provider response"
    );
    sections
}

/// Find the labels in fixed order; each region runs to the next label found,
/// or to the end of the text.
fn locate_regions(text: &str) -> [Option<Region>; 3] {
    let mut labels: [Option<(usize, usize)>; 3] = [None; 3];
    let mut cursor = 0;
    for (slot, pattern) in labels.iter_mut().zip(LABEL_PATTERNS.iter()) {
        if let Some(m) = pattern.find_at(text, cursor) {
            *slot = Some((m.start(), m.end()));
            cursor = m.end();
        }
    }

    let mut regions = [None; 3];
    for (i, label) in labels.iter().enumerate() {
        let Some((_, body_start)) = *label else {
            continue;
        };
        let body_end = labels[i + 1..]
            .iter()
            .flatten()
            .map(|(start, _)| *start)
            .next()
            .unwrap_or(text.len());
        regions[i] = Some(Region {
            body_start,
            body_end,
        });
    }
    regions
}

fn region_text(text: &str, region: Region) -> &str {
    text[region.body_start..region.body_end].trim()
}

fn forecast_html(region: &str, dates: &DateContext) -> String {
    let rewritten = rewrite_day_references(region, dates);
    if region.to_lowercase().contains(NO_THREATS_PHRASE) {
        format!("<p>{}</p>", style_text(&rewritten))
    } else {
        style_text(&rewritten)
    }
}

/// Rewrite "Day N" to "Day N (Sat, Mar 2)" anchored on day 1 = today.
///
/// N is not bounded; "Day 47" resolves to a date 46 days out. Tokens whose
/// number or date cannot be represented are left untouched.
#[must_use]
pub fn rewrite_day_references(text: &str, dates: &DateContext) -> String {
    DAY_TOKEN
        .replace_all(text, |caps: &Captures| {
            let resolved = caps[1]
                .parse::<u64>()
                .ok()
                .and_then(|n| dates.outlook_day(n).map(|date| (n, date)));
            match resolved {
                Some((n, date)) => format!("<strong>Day {n} ({})</strong>", short_date(date)),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Split a recommendations region into list items. A line starting with
/// `-`, `*` or `N.` opens a new item; other lines continue the current one.
#[must_use]
pub fn split_list_items(region: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in region.trim().lines() {
        if let Some(m) = LIST_DELIMITER.find(line) {
            if let Some(done) = current.take() {
                items.push(done);
            }
            current = Some(line[m.end()..].to_string());
        } else {
            match current.as_mut() {
                Some(item) => {
                    item.push('\n');
                    item.push_str(line);
                }
                None => current = Some(line.to_string()),
            }
        }
    }
    items.extend(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn styled_items(region: &str) -> Option<Vec<String>> {
    let items: Vec<String> = split_list_items(region)
        .iter()
        .map(|item| style_text(item))
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FALLBACK_FORECAST, FALLBACK_IMMEDIATE, FALLBACK_MONITORING};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn dates() -> DateContext {
        DateContext::for_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    const FULL_REPLY: &str = "REPORT_FORECAST:\n\
SPC Day 2 Convective Outlook\n\
Risk: SLIGHT\n\
\n\
RECOMMENDATIONS_IMMEDIATE_ACTIONS:\n\
- Review shelter plans\n\
- Charge radios\n\
\n\
RECOMMENDATIONS_5_DAY_MONITORING:\n\
1. Watch SPC updates\n\
2. Check river gauges\n\
3. Track the tropics\n";

    #[test]
    fn test_all_sections_parse() {
        let sections = parse_response(FULL_REPLY, &dates());
        assert_ne!(sections.forecast_html, FALLBACK_FORECAST);
        assert!(sections.forecast_html.contains("<strong>Day 2 (Sat, Mar 2)</strong>"));
        assert!(sections.forecast_html.contains("font-weight:bold;\">SLIGHT</span>"));
        assert_eq!(
            sections.immediate_items_html,
            vec!["Review shelter plans", "Charge radios"]
        );
        assert_eq!(
            sections.monitoring_items_html,
            vec!["Watch SPC updates", "Check river gauges", "Track the tropics"]
        );
    }

    #[test]
    fn test_missing_immediate_label_only_that_field_falls_back() {
        let reply = FULL_REPLY.replace("RECOMMENDATIONS_IMMEDIATE_ACTIONS:", "");
        let sections = parse_response(&reply, &dates());
        assert_eq!(sections.immediate_items_html, vec![FALLBACK_IMMEDIATE]);
        assert_ne!(sections.forecast_html, FALLBACK_FORECAST);
        assert_eq!(sections.monitoring_items_html.len(), 3);
    }

    #[test]
    fn test_missing_forecast_label_only_that_field_falls_back() {
        let reply = FULL_REPLY.replace("REPORT_FORECAST:", "");
        let sections = parse_response(&reply, &dates());
        assert_eq!(sections.forecast_html, FALLBACK_FORECAST);
        assert_eq!(sections.immediate_items_html.len(), 2);
        assert_eq!(sections.monitoring_items_html.len(), 3);
    }

    #[test]
    fn test_missing_monitoring_label_only_that_field_falls_back() {
        let reply = FULL_REPLY.replace("RECOMMENDATIONS_5_DAY_MONITORING:", "");
        let sections = parse_response(&reply, &dates());
        assert_eq!(sections.monitoring_items_html, vec![FALLBACK_MONITORING]);
        assert_ne!(sections.forecast_html, FALLBACK_FORECAST);
        assert!(!sections.immediate_items_html.is_empty());
    }

    #[test]
    fn test_empty_sections_fall_back() {
        let reply = "REPORT_FORECAST:\n\nRECOMMENDATIONS_IMMEDIATE_ACTIONS:\n-\nRECOMMENDATIONS_5_DAY_MONITORING:";
        assert_eq!(parse_response(reply, &dates()), ParsedSections::default());
    }

    #[test]
    fn test_unstructured_reply_yields_all_fallbacks() {
        let sections = parse_response("I cannot help with that.", &dates());
        assert_eq!(sections, ParsedSections::default());
    }

    #[test]
    fn test_markdown_bold_labels_and_crlf() {
        let reply = "**REPORT_FORECAST:**\r\nQuiet.\r\n**RECOMMENDATIONS_IMMEDIATE_ACTIONS:**\r\n- A\r\n**RECOMMENDATIONS_5_DAY_MONITORING:**\r\n- B\r\n";
        let sections = parse_response(reply, &dates());
        assert_eq!(sections.forecast_html, "Quiet.");
        assert_eq!(sections.immediate_items_html, vec!["A"]);
        assert_eq!(sections.monitoring_items_html, vec!["B"]);
    }

    #[test]
    fn test_no_threats_forecast_is_single_paragraph() {
        let reply = "REPORT_FORECAST:\nNo significant weather threats are currently forecast.\nRECOMMENDATIONS_IMMEDIATE_ACTIONS:\n- Stay prepared";
        let sections = parse_response(reply, &dates());
        assert_eq!(
            sections.forecast_html,
            "<p>No significant weather threats are currently forecast.</p>"
        );
    }

    #[rstest]
    #[case("Day 1", "<strong>Day 1 (Fri, Mar 1)</strong>")]
    #[case("Day 2", "<strong>Day 2 (Sat, Mar 2)</strong>")]
    #[case("day3", "<strong>Day 3 (Sun, Mar 3)</strong>")]
    #[case("Day 47", "<strong>Day 47 (Tue, Apr 16)</strong>")]
    #[case("Today", "Today")]
    #[case("Day 99999999999999999999999", "Day 99999999999999999999999")]
    fn test_rewrite_day_references(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rewrite_day_references(input, &dates()), expected);
    }

    #[test]
    fn test_split_list_items_dashes() {
        assert_eq!(
            split_list_items("- First item\n- Second item\n- Third"),
            vec!["First item", "Second item", "Third"]
        );
    }

    #[rstest]
    #[case("* One\n* Two", vec!["One", "Two"])]
    #[case("1. One\n2. Two\n10. Ten", vec!["One", "Two", "Ten"])]
    #[case("- One\n  continued\n- Two", vec!["One\n  continued", "Two"])]
    #[case("-\n- Real", vec!["Real"])]
    #[case("Intro line\n- One", vec!["Intro line", "One"])]
    #[case("2.5 inches expected", vec!["2.5 inches expected"])]
    fn test_split_list_items_variants(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_list_items(input), expected);
    }

    #[test]
    fn test_list_items_are_styled() {
        let reply = "RECOMMENDATIONS_IMMEDIATE_ACTIONS:\n- Prepare for flash flooding\nRECOMMENDATIONS_5_DAY_MONITORING:\n- Monitor MODERATE risk";
        let sections = parse_response(reply, &dates());
        assert_eq!(
            sections.immediate_items_html,
            vec![r#"Prepare for <span style="font-weight:bold;">flash flooding</span>"#]
        );
        assert!(sections.monitoring_items_html[0].contains(">MODERATE</span>"));
    }
}
