//! Rule compiler
//! Turns authored rules into case-insensitive, word-bounded regexes

use std::time::Instant;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::pattern::{CompiledRule, PatternTable};
use crate::error::{GuardError, GuardResult};
use crate::rule::{RawPatternRule, RuleLibrary};

// Upper bound for a single compiled rule; the largest alternations stay far below it
const RULE_SIZE_LIMIT: usize = 16 * 1024 * 1024;

/// Rule compiler
pub struct RuleCompiler;

impl RuleCompiler {
    /// Compile the whole library, preserving rule order.
    pub fn compile(rule_lib: &RuleLibrary) -> GuardResult<PatternTable> {
        let start = Instant::now();
        let mut rules = Vec::with_capacity(rule_lib.rule_count());
        let mut stats = CompileStats::default();

        for (group, raw_rule) in rule_lib.ordered_rules() {
            let regex = Self::compile_rule(raw_rule).map_err(|e| {
                GuardError::RuleParseError(format!(
                    "rule '{}' in group '{}' failed to compile: {}",
                    raw_rule.category, group, e
                ))
            })?;
            stats.term_count += raw_rule.terms.len();
            stats.pattern_count += usize::from(raw_rule.pattern.is_some());

            rules.push(CompiledRule {
                group: group.to_string(),
                category: raw_rule.category.clone(),
                regex,
            });
        }

        debug!(
            rules = rules.len(),
            terms = stats.term_count,
            raw_patterns = stats.pattern_count,
            elapsed = ?start.elapsed(),
            "rule table compiled"
        );

        Ok(PatternTable::new(rules))
    }

    /// Compile a single rule into `\b(?:alt1|alt2|...)\b`.
    fn compile_rule(raw_rule: &RawPatternRule) -> GuardResult<Regex> {
        let mut alternatives: Vec<String> = raw_rule
            .terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| Self::escape_term(t))
            .collect();

        if let Some(pattern) = raw_rule.pattern.as_deref() {
            let pattern = pattern.trim();
            if !pattern.is_empty() {
                alternatives.push(pattern.to_string());
            }
        }

        if alternatives.is_empty() {
            return Err(GuardError::InvalidInput("rule has no usable alternatives".to_string()));
        }

        Self::build_bounded(&alternatives.join("|"))
    }

    /// One word-bounded regex per literal term (used by keyword scoring).
    pub fn compile_terms(terms: &[String]) -> GuardResult<Vec<Regex>> {
        terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| Self::build_bounded(&Self::escape_term(t)))
            .collect()
    }

    /// Escape a literal, letting any run of whitespace match one or more spaces.
    fn escape_term(term: &str) -> String {
        term.split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+")
    }

    fn build_bounded(body: &str) -> GuardResult<Regex> {
        let regex = RegexBuilder::new(&format!(r"\b(?:{})\b", body))
            .case_insensitive(true)
            .unicode(true)
            .size_limit(RULE_SIZE_LIMIT)
            .build()?;
        Ok(regex)
    }
}

#[derive(Debug, Clone, Default)]
struct CompileStats {
    term_count: usize,
    pattern_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleLoader;

    fn single_rule_lib(rule: RawPatternRule) -> RuleLibrary {
        RuleLibrary {
            version: 1,
            groups: vec![crate::rule::RuleGroup {
                name: "test".to_string(),
                rules: vec![rule],
            }],
        }
    }

    #[test]
    fn test_embedded_table_compiles_in_order() {
        let lib = RuleLoader::embedded().unwrap();
        let table = RuleCompiler::compile(&lib).unwrap();
        assert_eq!(table.len(), lib.rule_count());
        assert_eq!(table.rules()[0].group, "violence");
        assert_eq!(table.groups().last(), Some(&"threat"));
    }

    #[test]
    fn test_terms_are_escaped_and_word_bounded() {
        let lib = single_rule_lib(RawPatternRule {
            category: "Test".to_string(),
            terms: vec!["a.b".to_string(), "cc".to_string()],
            pattern: None,
        });
        let table = RuleCompiler::compile(&lib).unwrap();
        let rule = &table.rules()[0];

        assert_eq!(rule.find("x a.b y"), Some("a.b"));
        // '.' is literal, not a wildcard
        assert_eq!(rule.find("axb"), None);
        // no hit inside a longer word
        assert_eq!(rule.find("accept"), None);
        assert_eq!(rule.find("CC nhé"), Some("CC"));
    }

    #[test]
    fn test_vietnamese_word_boundaries() {
        let lib = single_rule_lib(RawPatternRule {
            category: "Test".to_string(),
            terms: vec!["ngu".to_string()],
            pattern: None,
        });
        let table = RuleCompiler::compile(&lib).unwrap();
        let rule = &table.rules()[0];

        assert_eq!(rule.find("đồ ngu"), Some("ngu"));
        // "nguyễn" and "ngủ" must not fire
        assert_eq!(rule.find("anh nguyễn"), None);
        assert_eq!(rule.find("đi ngủ"), None);
    }

    #[test]
    fn test_invalid_raw_pattern_fails_compilation() {
        let lib = single_rule_lib(RawPatternRule {
            category: "Broken".to_string(),
            terms: vec![],
            pattern: Some("(unclosed".to_string()),
        });
        assert!(matches!(RuleCompiler::compile(&lib), Err(GuardError::RuleParseError(_))));
    }

    #[test]
    fn test_multiword_term_tolerates_extra_spaces() {
        let regexes = RuleCompiler::compile_terms(&["tuyệt vời".to_string()]).unwrap();
        assert!(regexes[0].is_match("thật tuyệt   vời"));
    }
}
