//! Rule loading
//! Embedded JSON by default, or a rule file named in the configuration

use std::path::Path;

use tracing::{debug, warn};

use super::model::{RuleLibrary, SentimentLexicon};
use crate::config::GuardConfig;
use crate::error::{GuardError, GuardResult};

static EMBEDDED_RULES: &str = include_str!("../../data/toxicity_rules.json");
static EMBEDDED_LEXICON: &str = include_str!("../../data/sentiment_lexicon.json");

/// Rule loading entry points
pub struct RuleLoader;

impl RuleLoader {
    /// Load the rule table named by `config`, falling back to the embedded one.
    pub async fn load(config: &GuardConfig) -> GuardResult<RuleLibrary> {
        match &config.rules_path {
            Some(path) => Self::load_from_file(path).await,
            None => Self::embedded(),
        }
    }

    /// Built-in toxicity table shipped with the crate.
    pub fn embedded() -> GuardResult<RuleLibrary> {
        let lib = Self::parse(EMBEDDED_RULES)?;
        debug!(groups = lib.groups.len(), rules = lib.rule_count(), "embedded rule table parsed");
        Ok(lib)
    }

    pub async fn load_from_file(path: &Path) -> GuardResult<RuleLibrary> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            GuardError::RuleLoadError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let lib = Self::parse(&raw)?;
        debug!(path = %path.display(), rules = lib.rule_count(), "rule table loaded from file");
        Ok(lib)
    }

    /// Parse and sanity-check a rule document.
    pub fn parse(raw: &str) -> GuardResult<RuleLibrary> {
        let lib: RuleLibrary = serde_json::from_str(raw)
            .map_err(|e| GuardError::RuleParseError(format!("malformed rule document: {}", e)))?;

        if lib.rule_count() == 0 {
            return Err(GuardError::RuleParseError("rule table is empty".to_string()));
        }

        for (group, rule) in lib.ordered_rules() {
            match (rule.terms.is_empty(), rule.pattern.is_some()) {
                (true, false) => {
                    return Err(GuardError::RuleParseError(format!(
                        "rule '{}' in group '{}' has neither terms nor pattern",
                        rule.category, group
                    )));
                }
                (false, true) => {
                    warn!(group, category = %rule.category, "rule has both terms and pattern, both are used");
                }
                _ => {}
            }
        }

        Ok(lib)
    }

    pub fn embedded_lexicon() -> GuardResult<SentimentLexicon> {
        Ok(serde_json::from_str(EMBEDDED_LEXICON)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_has_required_groups() {
        let lib = RuleLoader::embedded().unwrap();
        let names: Vec<&str> = lib.groups.iter().map(|g| g.name.as_str()).collect();
        for required in [
            "violence",
            "self_harm",
            "hate",
            "sexual",
            "profanity_insult",
            "scam_spam",
            "threat",
        ] {
            assert!(names.contains(&required), "missing group {}", required);
        }
    }

    #[test]
    fn test_rule_without_terms_or_pattern_is_rejected() {
        let raw = r#"{"groups":[{"name":"x","rules":[{"category":"Empty"}]}]}"#;
        assert!(matches!(RuleLoader::parse(raw), Err(GuardError::RuleParseError(_))));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let raw = r#"{"groups":[]}"#;
        assert!(RuleLoader::parse(raw).is_err());
    }

    #[tokio::test]
    async fn test_missing_rule_file_is_load_error() {
        let config = crate::config::ConfigManager::custom()
            .rules_path("/nonexistent/vncontentguard/rules.json".into())
            .build();
        let result = RuleLoader::load(&config).await;
        assert!(matches!(result, Err(GuardError::RuleLoadError(_))));
    }
}
