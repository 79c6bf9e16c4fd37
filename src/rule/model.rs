//! Rule authoring model
//! Pure data, deserialized from JSON; matching lives in `compiler` and `detector`

use serde::{Deserialize, Serialize};

/// One authored rule. Exactly one of `terms` / `pattern` is expected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawPatternRule {
    pub category: String,
    /// Literal words or phrases, escaped before compilation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
    /// Raw regex body for rules literals can't express
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Named group of rules (violence, hate, ...). Groups keep file order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleGroup {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RawPatternRule>,
}

/// Whole rule document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleLibrary {
    #[serde(default)]
    pub version: u32,
    pub groups: Vec<RuleGroup>,
}

impl RuleLibrary {
    /// Rules flattened in priority order, each tagged with its group name.
    pub fn ordered_rules(&self) -> impl Iterator<Item = (&str, &RawPatternRule)> {
        self.groups
            .iter()
            .flat_map(|group| group.rules.iter().map(move |rule| (group.name.as_str(), rule)))
    }

    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }
}

/// Keyword lists for sentiment scoring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}
