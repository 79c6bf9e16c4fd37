//! Compiled rule model
//! Immutable once built; shared across tasks behind an `Arc`

use regex::Regex;

/// One executable rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub group: String,
    pub category: String,
    pub regex: Regex,
}

impl CompiledRule {
    /// First match in `text`, as the literal matched substring.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }

    pub fn describe(&self) -> &str {
        self.regex.as_str()
    }
}

/// Ordered rule table. Index order is priority order: first match wins.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    rules: Vec<CompiledRule>,
}

impl PatternTable {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct group names in table order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !groups.contains(&rule.group.as_str()) {
                groups.push(&rule.group);
            }
        }
        groups
    }
}
