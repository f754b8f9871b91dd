//! Inline emphasis for hazard phrases and categorical risk levels.
//!
//! Input text is not HTML-escaped. Markup already present in a fragment passes
//! through unchanged and ends up in the document verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Hazard phrases wrapped in bold, matched case-insensitively on word
/// boundaries. Entries are regex fragments and are applied in order, so a
/// shorter phrase listed after a longer one re-wraps the inner span.
pub const HAZARD_PATTERNS: &[&str] = &[
    r"damaging winds(?: \(58\+\s*mph\)|\b)",
    r"damaging wind gusts",
    r"severe wind gusts",
    r"58\+\s*mph winds",
    r"60\+\s*mph winds",
    r"70\+\s*mph winds",
    r"large hail",
    r"hail up to",
    r"hail \(up to",
    r"significant hail",
    r"golf ball sized hail",
    r"baseball sized hail",
    r"small hail",
    r"pea sized hail",
    r"tornadoes possible",
    r"a few tornadoes",
    r"isolated tornadoes",
    r"tornado risk",
    r"potential for tornadoes",
    r"tornadoes",
    r"tornado watch",
    r"tornado warning",
    r"flooding possible",
    r"localized flooding",
    r"flash flooding",
    r"flash flood warning",
    r"flash flood watch",
    r"river flooding",
    r"coastal flooding",
    r"urban flooding",
    r"significant flooding",
    r"moderate flooding",
    r"major flooding",
    r"heavy rainfall",
    r"heavy rain",
    r"excessive rainfall",
    r"torrential rain",
    r"inches of rain",
    r"strong thunderstorms",
    r"severe thunderstorms",
    r"scattered thunderstorms",
    r"isolated thunderstorms",
    r"thunderstorm risk",
    r"high winds",
    r"strong winds",
    r"gusty winds",
    r"wind advisory",
    r"high wind warning",
    r"critical fire weather",
    r"extreme fire weather",
    r"elevated fire weather",
    r"red flag warning",
    r"fire weather watch",
    r"tropical storm conditions",
    r"tropical storm warning",
    r"tropical storm watch",
    r"hurricane conditions",
    r"hurricane warning",
    r"hurricane watch",
    r"storm surge warning",
    r"storm surge watch",
    r"storm surge",
    r"life-threatening storm surge",
    r"tropical depression",
    r"tropical storm",
    r"hurricane",
    r"major hurricane",
    r"tropical disturbance",
    r"area of interest",
    r"potential tropical cyclone",
    r"dangerous surf",
    r"rip currents",
    r"high surf advisory",
    r"dense fog",
    r"visibility near zero",
    r"dense fog advisory",
    r"winter storm",
    r"blizzard",
    r"heavy snow",
    r"ice storm",
    r"freezing rain",
    r"sleet",
];

/// Categorical risk words and their display colours. Matched case-sensitively.
pub const RISK_LEVELS: &[(&str, &str)] = &[
    ("ENHANCED", "#cc0000"),
    ("SLIGHT", "#e67300"),
    ("MARGINAL", "#ffcc00"),
    ("HIGH", "#FF00FF"),
    ("MODERATE", "#DC143C"),
    ("CRITICAL", "#FF4500"),
    ("EXTREME", "#8B0000"),
];

const BOLD_OPEN: &str = r#"<span style="font-weight:bold;">"#;
const SPAN_CLOSE: &str = "</span>";
const LINE_BREAK: &str = "<br />";

struct RiskRule {
    pattern: Regex,
    open: String,
}

static HAZARD_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    HAZARD_PATTERNS
        .iter()
        .copied()
        .map(hazard_rule)
        .collect()
});

// A trailing `\b` only holds when the match ends on a word character, so
// entries ending in punctuation carry their own boundary.
fn hazard_rule(pattern: &str) -> Regex {
    let tail = if pattern.ends_with(|c: char| c.is_alphanumeric() || c == '_') {
        r"\b"
    } else {
        ""
    };
    Regex::new(&format!(r"(?i)\b(?:{pattern}){tail}")).expect("hazard pattern compiles")
}

// The regex crate has no lookahead, so the character after the word is
// captured and written back.
static RISK_RULES: LazyLock<Vec<RiskRule>> = LazyLock::new(|| {
    RISK_LEVELS
        .iter()
        .map(|(level, color)| RiskRule {
            pattern: Regex::new(&format!(r"\b({level})([^\w-]|$)"))
                .expect("risk level pattern compiles"),
            open: format!(r#"<span style="color:{color}; font-weight:bold;">"#),
        })
        .collect()
});

/// Apply hazard emphasis, then risk-level emphasis, then convert newlines.
#[must_use]
pub fn style_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let styled = emphasize_risk_levels(&emphasize_hazards(text));
    styled.replace('\n', LINE_BREAK)
}

#[must_use]
pub fn emphasize_hazards(text: &str) -> String {
    HAZARD_RULES.iter().fold(text.to_string(), |acc, rule| {
        rule.replace_all(&acc, |caps: &Captures| {
            format!("{BOLD_OPEN}{}{SPAN_CLOSE}", &caps[0])
        })
        .into_owned()
    })
}

#[must_use]
pub fn emphasize_risk_levels(text: &str) -> String {
    RISK_RULES.iter().fold(text.to_string(), |acc, rule| {
        rule.pattern
            .replace_all(&acc, |caps: &Captures| {
                format!("{}{}{SPAN_CLOSE}{}", rule.open, &caps[1], &caps[2])
            })
            .into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strip_markers(html: &str) -> String {
        let tags = Regex::new(r"<span[^>]*>|</span>").unwrap();
        tags.replace_all(html, "").into_owned()
    }

    #[test]
    fn test_catalogs_compile() {
        assert_eq!(HAZARD_RULES.len(), HAZARD_PATTERNS.len());
        assert_eq!(RISK_RULES.len(), RISK_LEVELS.len());
    }

    #[test]
    fn test_hazard_is_bolded_case_insensitively() {
        let out = emphasize_hazards("Expect Large Hail this evening.");
        assert_eq!(
            out,
            r#"Expect <span style="font-weight:bold;">Large Hail</span> this evening."#
        );
    }

    #[test]
    fn test_hazard_requires_word_boundary() {
        assert_eq!(emphasize_hazards("sleety roads"), "sleety roads");
    }

    #[test]
    fn test_overlapping_patterns_double_wrap() {
        let out = emphasize_hazards("hurricane warning");
        assert_eq!(
            out,
            concat!(
                r#"<span style="font-weight:bold;">"#,
                r#"<span style="font-weight:bold;">hurricane</span> warning</span>"#
            )
        );
    }

    #[rstest]
    #[case("Damaging winds and large hail are possible, with isolated tornadoes.")]
    #[case("A hurricane watch and storm surge warning are in effect for the coast.")]
    #[case("Flash flooding from 2-4 inches of rain.\nHeavy snow and freezing rain north.")]
    #[case("Nothing notable here.")]
    fn test_hazard_wrapping_preserves_visible_text(#[case] input: &str) {
        assert_eq!(strip_markers(&emphasize_hazards(input)), input);
    }

    #[test]
    fn test_risk_level_colored() {
        let out = emphasize_risk_levels("Risk: SLIGHT");
        assert_eq!(
            out,
            r#"Risk: <span style="color:#e67300; font-weight:bold;">SLIGHT</span>"#
        );
    }

    #[rstest]
    #[case("MARGINALLY better")]
    #[case("MODERATELY wet")]
    #[case("HIGH-END event")]
    #[case("slight chance")]
    #[case("HIGHLANDS")]
    fn test_risk_level_ignores_longer_words(#[case] input: &str) {
        assert_eq!(emphasize_risk_levels(input), input);
    }

    #[test]
    fn test_adjacent_risk_levels_both_wrapped() {
        let out = emphasize_risk_levels("MARGINAL/SLIGHT");
        assert!(out.contains(r#"color:#ffcc00; font-weight:bold;">MARGINAL</span>/"#));
        assert!(out.contains(r#"color:#e67300; font-weight:bold;">SLIGHT</span>"#));
    }

    #[test]
    fn test_style_text_converts_newlines_last() {
        let out = style_text("Large hail\nRisk: ENHANCED");
        assert_eq!(
            out,
            concat!(
                r#"<span style="font-weight:bold;">Large hail</span><br />"#,
                r#"Risk: <span style="color:#cc0000; font-weight:bold;">ENHANCED</span>"#
            )
        );
    }

    #[rstest]
    #[case(
        "Damaging winds (58+ mph), large hail",
        concat!(
            r#"<span style="font-weight:bold;">Damaging winds (58+ mph)</span>, "#,
            r#"<span style="font-weight:bold;">large hail</span>"#
        )
    )]
    #[case(
        "Damaging winds, then clearing",
        r#"<span style="font-weight:bold;">Damaging winds</span>, then clearing"#
    )]
    #[case(
        "Expect damaging winds.",
        r#"Expect <span style="font-weight:bold;">damaging winds</span>."#
    )]
    #[case(
        "damaging winds and small hail",
        concat!(
            r#"<span style="font-weight:bold;">damaging winds</span> and "#,
            r#"<span style="font-weight:bold;">small hail</span>"#
        )
    )]
    fn test_damaging_winds_matches_at_phrase_edges(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(emphasize_hazards(input), expected);
    }

    #[test]
    fn test_damaging_winds_requires_word_boundary() {
        assert_eq!(emphasize_hazards("damaging windsor"), "damaging windsor");
    }

    #[test]
    fn test_embedded_markup_passes_through() {
        assert_eq!(style_text("<em>note</em>"), "<em>note</em>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(style_text(""), "");
    }
}
