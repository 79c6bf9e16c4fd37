//! Moderation data model: per-comment verdicts and the batch output contract
use serde::{Deserialize, Deserializer, Serialize};

use crate::detector::MatchHit;
use crate::repair::RepairSchema;

pub const CLEAN_CATEGORY: &str = "Clean";
pub const SAFETY_BLOCK_CATEGORY: &str = "BLOCKED: Safety Violation";
const DEFAULT_AI_CATEGORY: &str = "General Toxicity";
const DEFAULT_AI_CONFIDENCE: f32 = 0.8;

/// Which layer produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictSource {
    Regex,
    #[serde(rename = "AI")]
    Ai,
    SafetyBlock,
    /// No layer could assess the text (AI unavailable after a regex miss).
    None,
}

/// Outcome of moderating one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationVerdict {
    pub is_toxic: bool,
    pub category: String,
    pub confidence: f32,
    pub source: VerdictSource,
    /// Literal text that fired a pattern rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_token: Option<String>,
}

impl ModerationVerdict {
    pub fn clean(source: VerdictSource) -> Self {
        Self {
            is_toxic: false,
            category: CLEAN_CATEGORY.to_string(),
            confidence: 0.0,
            source,
            matched_token: None,
        }
    }

    pub fn from_hit(hit: MatchHit) -> Self {
        Self {
            is_toxic: true,
            category: hit.category,
            confidence: 1.0,
            source: VerdictSource::Regex,
            matched_token: Some(hit.token),
        }
    }

    pub fn safety_block() -> Self {
        Self {
            is_toxic: true,
            category: SAFETY_BLOCK_CATEGORY.to_string(),
            confidence: 1.0,
            source: VerdictSource::SafetyBlock,
            matched_token: None,
        }
    }

    /// Category as shown to end users, annotated with the deciding layer.
    pub fn display_category(&self) -> String {
        match (self.source, self.is_toxic, self.matched_token.as_deref()) {
            (VerdictSource::Regex, true, Some(token)) => format!("{} (Keyword: '{}')", self.category, token),
            (VerdictSource::Ai, true, _) => format!("{} (AI Detected)", self.category),
            _ => self.category.clone(),
        }
    }
}

/// Shape the arbitration model is asked to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiToxicityVerdict {
    #[serde(default, deserialize_with = "loose_bool")]
    pub is_toxic: bool,
    #[serde(default = "default_ai_category")]
    pub category: String,
    #[serde(default, deserialize_with = "loose_confidence")]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

fn default_ai_category() -> String {
    DEFAULT_AI_CATEGORY.to_string()
}

// Models sometimes quote booleans and numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseValue>::deserialize(deserializer)? {
        None => Ok(false),
        Some(LooseValue::Bool(b)) => Ok(b),
        Some(LooseValue::Number(n)) => Ok(n != 0.0),
        Some(LooseValue::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("is_toxic is not a boolean: '{}'", other))),
        },
    }
}

/// Unparseable confidence falls back to the default instead of rejecting the answer.
fn loose_confidence<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<LooseValue>::deserialize(deserializer)? {
        Some(LooseValue::Number(n)) => Some(n),
        Some(LooseValue::Text(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        Some(LooseValue::Bool(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()).map(|v| v as f32))
}

impl RepairSchema for AiToxicityVerdict {
    fn validate(mut self) -> Option<Self> {
        let confidence = self.confidence.unwrap_or(DEFAULT_AI_CONFIDENCE);
        if !confidence.is_finite() {
            return None;
        }
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        if self.category.trim().is_empty() {
            self.category = default_ai_category();
        }
        Some(self)
    }

    fn safe_default() -> Self {
        Self {
            is_toxic: false,
            category: CLEAN_CATEGORY.to_string(),
            confidence: Some(0.0),
            reasoning: None,
        }
    }
}

impl AiToxicityVerdict {
    /// Only a toxic answer overrides the clean baseline.
    pub fn into_verdict(self) -> ModerationVerdict {
        if !self.is_toxic {
            return ModerationVerdict::clean(VerdictSource::Ai);
        }
        ModerationVerdict {
            is_toxic: true,
            category: self.category,
            confidence: self.confidence.unwrap_or(DEFAULT_AI_CONFIDENCE),
            source: VerdictSource::Ai,
            matched_token: None,
        }
    }
}

/// Per-comment entry of the batch output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResult {
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Is_Toxic")]
    pub is_toxic: bool,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Confidence")]
    pub confidence: f32,
    #[serde(rename = "Source")]
    pub source: VerdictSource,
}

impl CommentResult {
    pub fn new(comment: &str, verdict: &ModerationVerdict) -> Self {
        Self {
            comment: comment.to_string(),
            is_toxic: verdict.is_toxic,
            category: verdict.display_category(),
            confidence: verdict.confidence,
            source: verdict.source,
        }
    }
}

/// Batch output: every evaluated comment plus the toxic count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Comments submitted, blank ones included
    pub total: usize,
    pub toxic_count: usize,
    pub results: Vec<CommentResult>,
}

impl BatchSummary {
    pub fn from_results(submitted: usize, results: Vec<CommentResult>) -> Self {
        Self {
            total: submitted,
            toxic_count: results.iter().filter(|r| r.is_toxic).count(),
            results,
        }
    }
}
