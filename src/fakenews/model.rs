//! Fact-check verdict model and its repair schema
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::repair::RepairSchema;

pub const MIN_RISK_SCORE: i64 = 1;
pub const MAX_RISK_SCORE: i64 = 10;

/// Verdict labels. The first three are the only ones a model may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsVerdict {
    Reliable,
    #[serde(rename = "Opinion Piece")]
    OpinionPiece,
    #[serde(rename = "Likely Fake")]
    LikelyFake,
    Unavailable,
    #[serde(rename = "Parse Error")]
    ParseError,
    #[serde(rename = "Insufficient Content")]
    InsufficientContent,
}

impl NewsVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsVerdict::Reliable => "Reliable",
            NewsVerdict::OpinionPiece => "Opinion Piece",
            NewsVerdict::LikelyFake => "Likely Fake",
            NewsVerdict::Unavailable => "Unavailable",
            NewsVerdict::ParseError => "Parse Error",
            NewsVerdict::InsufficientContent => "Insufficient Content",
        }
    }

    /// Map a model-supplied label; anything outside the answerable set is rejected.
    pub fn from_model_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "reliable" => Some(NewsVerdict::Reliable),
            "opinionpiece" | "opinion" => Some(NewsVerdict::OpinionPiece),
            "likelyfake" => Some(NewsVerdict::LikelyFake),
            _ => None,
        }
    }

    /// True when the verdict came from a model answer rather than a fallback.
    pub fn is_assessed(&self) -> bool {
        matches!(
            self,
            NewsVerdict::Reliable | NewsVerdict::OpinionPiece | NewsVerdict::LikelyFake
        )
    }
}

impl fmt::Display for NewsVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fact-check result. `risk_score` is 1..=10 for assessed verdicts, 0 for fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FakeNewsVerdict {
    pub risk_score: i64,
    pub verdict: NewsVerdict,
    pub summary: String,
}

impl FakeNewsVerdict {
    pub fn insufficient_content() -> Self {
        Self::fallback(NewsVerdict::InsufficientContent, "Post is too short to analyze.")
    }

    pub fn unavailable() -> Self {
        Self::fallback(NewsVerdict::Unavailable, "AI service is temporarily unavailable.")
    }

    pub fn parse_error() -> Self {
        Self::fallback(NewsVerdict::ParseError, "Could not parse AI response.")
    }

    fn fallback(verdict: NewsVerdict, summary: &str) -> Self {
        Self {
            risk_score: 0,
            verdict,
            summary: summary.to_string(),
        }
    }
}

// Accepts the loose shapes models return: float or quoted scores, any label case.
#[derive(Deserialize)]
struct WireVerdict {
    risk_score: WireScore,
    verdict: String,
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireScore {
    Int(i64),
    Float(f64),
    Text(String),
}

impl WireScore {
    fn value(&self) -> Option<i64> {
        match self {
            WireScore::Int(v) => Some(*v),
            WireScore::Float(v) if v.is_finite() => Some(v.round() as i64),
            WireScore::Float(_) => None,
            WireScore::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.round() as i64),
        }
    }
}

impl<'de> Deserialize<'de> for FakeNewsVerdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = WireVerdict::deserialize(deserializer)?;
        let risk_score = wire
            .risk_score
            .value()
            .ok_or_else(|| serde::de::Error::custom("risk_score is not a number"))?;
        let verdict = NewsVerdict::from_model_label(&wire.verdict)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown verdict '{}'", wire.verdict)))?;
        Ok(Self {
            risk_score,
            verdict,
            summary: wire.summary.trim().to_string(),
        })
    }
}

impl RepairSchema for FakeNewsVerdict {
    fn validate(mut self) -> Option<Self> {
        if !self.verdict.is_assessed() {
            return None;
        }
        self.risk_score = self.risk_score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE);
        Some(self)
    }

    fn safe_default() -> Self {
        Self::parse_error()
    }
}
