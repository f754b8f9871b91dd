//! Instruction text sent to the text-generation provider.

use crate::dates::DateContext;
use crate::report::{FORECAST_LABEL, IMMEDIATE_LABEL, MONITORING_LABEL};

/// States the outlook always covers.
pub const COVERED_STATES: [&str; 7] = ["TN", "MS", "GA", "AL", "FL", "NC", "SC"];

/// Categorical risk labels the model is allowed to use.
pub const ALLOWED_RISK_LABELS: [&str; 3] = ["ENHANCED", "SLIGHT", "MARGINAL"];

/// A system + user prompt pair for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub system: String,
    pub user: String,
}

impl ForecastRequest {
    #[must_use]
    pub fn for_context(dates: &DateContext) -> Self {
        Self {
            system: system_prompt(&dates.context_label),
            user: user_prompt(&dates.context_label),
        }
    }
}

fn system_prompt(today: &str) -> String {
    let states = COVERED_STATES.join(", ");
    let risk_labels = ALLOWED_RISK_LABELS.join(", ");

    format!(
        "You are an expert weather forecaster preparing a concise 5-day severe weather risk report \
for emergency management in the southeastern US. Today is {today}.
Focus ONLY on official-source-style information (NWS, SPC, WPC, NHC type outlooks).
Do NOT include seasonal commentary, historical context, speculation, or third-party sources.
Cover potential threats from SPC Day 1-3 Convective Outlooks, Day 4-8 Fire Weather Outlooks (if significant), \
WPC excessive rainfall, and NHC tropical outlooks.
States to cover: {states}. Include USVI ONLY if a significant tropical threat exists.

Output Structure (Use these exact headings and then provide the information as plain text):
{FORECAST_LABEL}:
[For each identified threat over the next 5 days (today is Day 1), provide:
1.  A descriptive title (e.g., \"SPC Day 1 Convective Outlook\", \"WPC Day 2 Excessive Rainfall Risk\", \"NHC Tropical Update - Area 1\").
2.  The specific Day number (e.g., \"Day 1\", \"Day 2\").
3.  Timing (e.g., \"Afternoon and Evening\", \"All Day\").
4.  Affected Areas (list specific regions/states).
5.  Primary Hazards (e.g., \"Damaging winds (58+ mph), large hail (up to 1.5 inches), a few tornadoes possible\").
6.  Categorical Risk Level (Use ONLY: {risk_labels}. For tropical/other, describe threat level if these don't apply).
Format each distinct threat clearly. If no threats, state within this section: \"No significant weather threats are currently forecast...\"]

{IMMEDIATE_LABEL}:
[Based on the forecast above, list 3-5 bulleted immediate action recommendations. \
If no significant threats, provide general preparedness advice.]

{MONITORING_LABEL}:
[Based on the forecast above, list 3-5 bulleted 5-day monitoring recommendations. \
If no significant threats, provide general monitoring advice.]

Ensure Day 1 corresponds to today's date ({today}). Output as plain text only, respecting the heading structure."
    )
}

fn user_prompt(today: &str) -> String {
    format!(
        "Provide the 5-day weather risk report for today, {today}, following all instructions and \
the specified output structure ({FORECAST_LABEL}, {IMMEDIATE_LABEL}, {MONITORING_LABEL})."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> ForecastRequest {
        let dates = DateContext::for_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        ForecastRequest::for_context(&dates)
    }

    #[test]
    fn test_system_prompt_names_sections_and_anchor_date() {
        let req = request();
        assert!(req.system.contains("REPORT_FORECAST:"));
        assert!(req.system.contains("RECOMMENDATIONS_IMMEDIATE_ACTIONS:"));
        assert!(req.system.contains("RECOMMENDATIONS_5_DAY_MONITORING:"));
        assert!(req.system.contains("Ensure Day 1 corresponds to today's date (Friday, March 1, 2024)"));
    }

    #[test]
    fn test_system_prompt_scope() {
        let req = request();
        assert!(req.system.contains("TN, MS, GA, AL, FL, NC, SC"));
        assert!(req.system.contains("USVI ONLY if a significant tropical threat"));
        assert!(req.system.contains("Use ONLY: ENHANCED, SLIGHT, MARGINAL"));
    }

    #[test]
    fn test_user_prompt_repeats_date_and_structure() {
        let req = request();
        assert!(req.user.contains("Friday, March 1, 2024"));
        assert!(req.user.contains(
            "(REPORT_FORECAST, RECOMMENDATIONS_IMMEDIATE_ACTIONS, RECOMMENDATIONS_5_DAY_MONITORING)"
        ));
    }
}
