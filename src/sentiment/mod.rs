//! Keyword sentiment over the embedded Vietnamese lexicon
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compiler::RuleCompiler;
use crate::error::GuardResult;
use crate::rule::{RuleLoader, SentimentLexicon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
}

impl SentimentResult {
    pub fn neutral(score: f64) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score,
        }
    }
}

/// Counts distinct lexicon terms present in a text.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: &SentimentLexicon) -> GuardResult<Self> {
        Ok(Self {
            positive: RuleCompiler::compile_terms(&lexicon.positive)?,
            negative: RuleCompiler::compile_terms(&lexicon.negative)?,
        })
    }

    /// Analyzer over the lexicon shipped with the crate.
    pub fn embedded() -> GuardResult<Self> {
        Self::new(&RuleLoader::embedded_lexicon()?)
    }

    pub fn analyze(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral(0.0);
        }

        let lowered = text.to_lowercase();
        let positive = Self::count_hits(&self.positive, &lowered);
        let negative = Self::count_hits(&self.negative, &lowered);
        let total = positive + negative;
        debug!(positive, negative, "sentiment keyword hits");

        // A single keyword is too weak a signal to lean either way
        match total {
            0 => return SentimentResult::neutral(0.0),
            1 => return SentimentResult::neutral(0.3),
            _ => {}
        }

        if positive > negative {
            SentimentResult {
                label: SentimentLabel::Positive,
                score: round2(positive as f64 / total as f64),
            }
        } else if negative > positive {
            SentimentResult {
                label: SentimentLabel::Negative,
                score: round2(negative as f64 / total as f64),
            }
        } else {
            SentimentResult::neutral(0.5)
        }
    }

    fn count_hits(terms: &[Regex], text: &str) -> usize {
        terms.iter().filter(|re| re.is_match(text)).count()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
