//! Fact-check prompt with an explicit temporal anchor
use chrono::{Datelike, NaiveDate};

pub fn build_prompt(article: &str, today: NaiveDate) -> String {
    let year = today.year();
    format!(
        r#"You are a professional Fact Checker specializing in Vietnamese content.

ESSENTIAL CONTEXT: Today is {today}.
- Events from {past_from}-{past_to} are HISTORICAL FACTS - evaluate them normally
- Events dated {year} are CURRENT or FUTURE - do NOT automatically flag them as fake
- Accept {year} events as potentially legitimate unless they contradict known facts

ARTICLE TO ANALYZE:
"{article}"

TASK:
1. Assess if this content is reliable, opinionated, or misinformation
2. Consider the {year} date context - do not penalize future-dated claims
3. Provide a 1-sentence summary

RESPONSE (VALID JSON ONLY, NO MARKDOWN):
{{
    "risk_score": (1-10 integer, 1=Safe, 10=Definitely Fake),
    "verdict": ("Reliable", "Opinion Piece", or "Likely Fake"),
    "summary": "One sentence assessment"
}}"#,
        today = today.format("%B %-d, %Y"),
        past_from = year - 2,
        past_to = year - 1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_states_reference_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let prompt = build_prompt("Tin mới", date);
        assert!(prompt.contains("Today is January 15, 2026."));
        assert!(prompt.contains("Events from 2024-2025 are HISTORICAL FACTS"));
        assert!(prompt.contains("\"Tin mới\""));
    }
}
