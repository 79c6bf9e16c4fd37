//! Two-layer comment moderation
//! Pattern table first; the generation service only sees texts the table lets through.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use super::model::{AiToxicityVerdict, BatchSummary, CommentResult, ModerationVerdict, VerdictSource};
use crate::HISTORY_TARGET;
use crate::config::GuardConfig;
use crate::detector::FastMatcher;
use crate::gateway::{GatewayResult, RequestGateway};
use crate::repair::ResponseRepair;

/// Regex screening with AI arbitration for the remainder.
#[derive(Clone)]
pub struct ModerationPipeline {
    matcher: FastMatcher,
    gateway: RequestGateway,
    model: String,
    max_concurrency: usize,
}

impl ModerationPipeline {
    pub fn new(matcher: FastMatcher, gateway: RequestGateway, config: &GuardConfig) -> Self {
        Self {
            matcher,
            gateway,
            model: config.moderation_model.clone(),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    pub fn matcher(&self) -> &FastMatcher {
        &self.matcher
    }

    /// Moderate one text. Always yields a verdict.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn evaluate(&self, text: &str) -> ModerationVerdict {
        // 1. Pattern table: a hit is final, no AI call
        if let Some(hit) = self.matcher.match_text(text) {
            return ModerationVerdict::from_hit(hit);
        }

        // 2. AI arbitration
        match self.gateway.generate(&build_prompt(text), &self.model).await {
            GatewayResult::RawText(raw) => ResponseRepair::parse_verdict::<AiToxicityVerdict>(&raw)
                .into_inner()
                .into_verdict(),
            GatewayResult::SafetyBlocked(reason) => {
                debug!(%reason, "arbitration refused by safety filter");
                ModerationVerdict::safety_block()
            }
            GatewayResult::Unavailable(reason) | GatewayResult::TransientFailure(reason) => {
                warn!(%reason, "arbitration unavailable, keeping regex result");
                ModerationVerdict::clean(VerdictSource::None)
            }
        }
    }

    /// Moderate a batch. Blank comments are skipped; output keeps input order.
    pub async fn evaluate_batch<S: AsRef<str>>(&self, comments: &[S]) -> BatchSummary {
        let valid: Vec<&str> = comments
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !c.trim().is_empty())
            .collect();

        debug!(
            submitted = comments.len(),
            evaluated = valid.len(),
            "moderating comment batch"
        );

        let results: Vec<CommentResult> = stream::iter(valid)
            .map(move |comment| async move {
                let verdict = self.evaluate(comment).await;
                info!(
                    target: HISTORY_TARGET,
                    is_toxic = verdict.is_toxic,
                    category = %verdict.category,
                    source = ?verdict.source,
                    confidence = verdict.confidence,
                    "comment moderated"
                );
                CommentResult::new(comment, &verdict)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        BatchSummary::from_results(comments.len(), results)
    }
}

fn build_prompt(comment: &str) -> String {
    format!(
        r#"You are a Content Safety Analyst. Analyze this Vietnamese comment for toxicity.

Comment: "{comment}"

Categories: ["Violence", "Hate Speech", "Sexual Harassment", "Regional Discrimination", "Scam", "Insult", "Clean"]

Check for:
- Hidden meanings or slang
- Regional discrimination (North/South/Central Vietnam)
- Subtle sexual harassment or grooming
- Scams or fraud

Return ONLY valid JSON (no markdown):
{{
    "is_toxic": true or false,
    "category": "one of the above",
    "confidence": 0.0-1.0,
    "reasoning": "brief explanation"
}}"#
    )
}
