//! Full page scan: fact-check, sentiment and comment moderation in one call
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::HISTORY_TARGET;
use crate::compiler::{PatternTable, RuleCompiler};
use crate::config::GuardConfig;
use crate::credential::CredentialPool;
use crate::detector::{FastMatcher, builtin_table};
use crate::error::GuardResult;
use crate::fakenews::{FakeNewsAssessor, FakeNewsVerdict};
use crate::gateway::{GeminiClient, GenerativeClient, RequestGateway};
use crate::moderation::{BatchSummary, ModerationPipeline};
use crate::rule::RuleLoader;
use crate::sentiment::{SentimentAnalyzer, SentimentResult};
use crate::utils::truncate_chars;

/// What a page scan submits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub article_text: String,
    #[serde(default)]
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullScanReport {
    pub fake_check: FakeNewsVerdict,
    pub sentiment: SentimentResult,
    pub toxicity: BatchSummary,
}

/// Fully wired content-safety core sharing one credential pool.
#[derive(Clone)]
pub struct ContentGuard {
    config: GuardConfig,
    pool: Arc<CredentialPool>,
    moderation: ModerationPipeline,
    fake_news: FakeNewsAssessor,
    sentiment: Arc<SentimentAnalyzer>,
}

impl ContentGuard {
    /// Wire everything against the Gemini REST service on the system clock.
    pub async fn new<I, S>(config: GuardConfig, secrets: I) -> GuardResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pool = Arc::new(CredentialPool::new(secrets)?);
        let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(&config)?);
        Self::with_client(config, pool, client).await
    }

    /// Wire everything against a caller-supplied pool and generation client.
    pub async fn with_client(
        config: GuardConfig,
        pool: Arc<CredentialPool>,
        client: Arc<dyn GenerativeClient>,
    ) -> GuardResult<Self> {
        let table = Self::load_table(&config).await?;
        let gateway = RequestGateway::new(pool.clone(), client, config.http_timeout());

        Ok(Self {
            moderation: ModerationPipeline::new(FastMatcher::new(table), gateway.clone(), &config),
            fake_news: FakeNewsAssessor::new(gateway, &config),
            sentiment: Arc::new(SentimentAnalyzer::embedded()?),
            pool,
            config,
        })
    }

    // The embedded table is compiled once per process; custom tables per instance
    async fn load_table(config: &GuardConfig) -> GuardResult<Arc<PatternTable>> {
        if config.rules_path.is_none() {
            return builtin_table();
        }
        let lib = RuleLoader::load(config).await?;
        Ok(Arc::new(RuleCompiler::compile(&lib)?))
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn moderation(&self) -> &ModerationPipeline {
        &self.moderation
    }

    pub fn fake_news(&self) -> &FakeNewsAssessor {
        &self.fake_news
    }

    pub fn sentiment(&self) -> &SentimentAnalyzer {
        &self.sentiment
    }

    /// Keyword sentiment on the article head; short articles are neutral.
    pub fn article_sentiment(&self, article_text: &str) -> SentimentResult {
        if article_text.chars().count() <= self.config.sentiment_min_chars {
            debug!("article too short for sentiment");
            return SentimentResult::neutral(0.0);
        }
        self.sentiment
            .analyze(truncate_chars(article_text, self.config.sentiment_max_chars))
    }

    /// Run every check for one page. Never fails.
    #[instrument(level = "debug", skip_all, fields(url = %request.url))]
    pub async fn full_scan(&self, request: &ScanRequest) -> FullScanReport {
        let (fake_check, toxicity) = tokio::join!(
            self.fake_news.assess(&request.article_text),
            self.moderation.evaluate_batch(&request.comments),
        );
        let sentiment = self.article_sentiment(&request.article_text);

        info!(
            target: HISTORY_TARGET,
            url = %request.url,
            risk_score = fake_check.risk_score,
            verdict = %fake_check.verdict,
            sentiment = %sentiment.label,
            toxic_count = toxicity.toxic_count,
            total = toxicity.total,
            "full scan complete"
        );

        FullScanReport {
            fake_check,
            sentiment,
            toxicity,
        }
    }
}
