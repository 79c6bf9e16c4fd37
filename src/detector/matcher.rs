//! Fast first-layer matcher over the compiled pattern table
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::compiler::PatternTable;

/// A rule hit: category of the first matching rule plus the matched text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchHit {
    pub category: String,
    pub group: String,
    pub token: String,
}

/// Applies a [`PatternTable`] to single texts. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FastMatcher {
    table: Arc<PatternTable>,
}

impl FastMatcher {
    pub fn new(table: Arc<PatternTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Evaluate rules strictly in table order and stop at the first hit.
    pub fn match_text(&self, text: &str) -> Option<MatchHit> {
        let lowered = text.to_lowercase();

        for rule in self.table.rules() {
            if let Some(token) = rule.find(&lowered) {
                debug!(category = %rule.category, token, "pattern rule matched");
                return Some(MatchHit {
                    category: rule.category.clone(),
                    group: rule.group.clone(),
                    token: token.to_string(),
                });
            }
        }

        None
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.match_text(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::builtin_matcher;

    #[test]
    fn test_insult_hits_intelligence_rule() {
        let matcher = builtin_matcher().unwrap();
        let hit = matcher.match_text("Đồ NGU mất dạy").unwrap();
        assert_eq!(hit.category, "Insult: Ableism/Intelligence");
        assert_eq!(hit.group, "profanity_insult");
        assert_eq!(hit.token, "ngu");
    }

    #[test]
    fn test_first_rule_in_table_order_wins() {
        // "giết" (violence) precedes "tao giết" (threat) in the table
        let matcher = builtin_matcher().unwrap();
        let hit = matcher.match_text("tao giết mày").unwrap();
        assert_eq!(hit.category, "Violence: Murder/Torture");
        assert_eq!(hit.token, "giết");
    }

    #[test]
    fn test_clean_text_has_no_hit() {
        let matcher = builtin_matcher().unwrap();
        assert_eq!(matcher.match_text("Bài viết hay quá"), None);
        assert_eq!(matcher.match_text("Thông tin hữu ích"), None);
    }

    #[test]
    fn test_short_token_does_not_fire_inside_words() {
        let matcher = builtin_matcher().unwrap();
        // "cc" / "cu" / "ons" are rules; none may fire inside longer words
        assert!(!matcher.is_match("I accept the accuracy of the lessons"));
        assert!(matcher.is_match("cc gì vậy"));
    }

    #[test]
    fn test_torture_phrase_matches() {
        let matcher = builtin_matcher().unwrap();
        let hit = matcher.match_text("Nó bị k cha đạp suốt").unwrap();
        assert_eq!(hit.category, "Violence: Torture");
        assert_eq!(hit.token, "k cha đạp");
    }

    #[test]
    fn test_raw_pattern_rule_matches() {
        let matcher = builtin_matcher().unwrap();
        let hit = matcher.match_text("có link ngon không").unwrap();
        assert_eq!(hit.category, "Sexual: Evasion/Teencode");
    }
}
