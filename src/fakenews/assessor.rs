//! Article fact-check risk scoring
use chrono::NaiveDate;
use tracing::{debug, error, info, instrument, warn};

use super::model::FakeNewsVerdict;
use super::prompt::build_prompt;
use crate::config::GuardConfig;
use crate::gateway::{GatewayResult, RequestGateway};
use crate::repair::ResponseRepair;
use crate::utils::truncate_chars;

/// Scores one article's misinformation risk through the gateway.
#[derive(Clone)]
pub struct FakeNewsAssessor {
    gateway: RequestGateway,
    model: String,
    min_chars: usize,
    max_chars: usize,
    reference_date: Option<NaiveDate>,
}

impl FakeNewsAssessor {
    pub fn new(gateway: RequestGateway, config: &GuardConfig) -> Self {
        Self {
            gateway,
            model: config.fake_news_model.clone(),
            min_chars: config.min_article_chars,
            max_chars: config.max_article_chars,
            reference_date: config.reference_date,
        }
    }

    /// Date the prompt presents as "today".
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| self.gateway.pool().today_utc())
    }

    /// Assess an article. Always yields a verdict.
    #[instrument(level = "debug", skip_all)]
    pub async fn assess(&self, article_text: &str) -> FakeNewsVerdict {
        let length = article_text.chars().count();
        if length <= self.min_chars {
            debug!(length, min = self.min_chars, "article too short for fact-check");
            return FakeNewsVerdict::insufficient_content();
        }

        let article = truncate_chars(article_text, self.max_chars);
        let prompt = build_prompt(article, self.reference_date());

        match self.gateway.generate(&prompt, &self.model).await {
            GatewayResult::RawText(raw) => {
                let verdict = ResponseRepair::parse_verdict::<FakeNewsVerdict>(&raw).into_inner();
                info!(risk_score = verdict.risk_score, verdict = %verdict.verdict, "fact-check complete");
                verdict
            }
            GatewayResult::Unavailable(reason) => {
                error!(%reason, "fact-check skipped, no credential available");
                FakeNewsVerdict::unavailable()
            }
            GatewayResult::TransientFailure(reason) => {
                warn!(%reason, "fact-check call failed");
                FakeNewsVerdict::unavailable()
            }
            GatewayResult::SafetyBlocked(reason) => {
                // A refused article is not a fact-check answer
                warn!(%reason, "fact-check refused by safety filter");
                FakeNewsVerdict::unavailable()
            }
        }
    }
}
