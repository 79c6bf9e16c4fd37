//! Runtime configuration, passed explicitly into every component

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GuardResult;

/// Immutable configuration shared by the gateway and the pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    // Generation service root URL
    pub api_base_url: String,
    // Model used for comment arbitration
    pub moderation_model: String,
    // Model used for fact-checking
    pub fake_news_model: String,
    // Per-call timeout (seconds)
    pub http_timeout_secs: u64,
    // Articles of at most this many characters are not sent for fact-checking
    pub min_article_chars: usize,
    // Articles are cut to this many characters before prompting
    pub max_article_chars: usize,
    // Sentiment runs only on articles longer than this
    pub sentiment_min_chars: usize,
    pub sentiment_max_chars: usize,
    // Upper bound on in-flight comment evaluations per batch
    pub max_concurrency: usize,
    // Date stated to the model as "today"; None means the pool clock's UTC date
    pub reference_date: Option<NaiveDate>,
    // Custom rule table; None means the embedded one
    pub rules_path: Option<PathBuf>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            moderation_model: "gemini-2.0-flash".to_string(),
            fake_news_model: "gemini-2.0-flash".to_string(),
            http_timeout_secs: 30,
            min_article_chars: 20,
            max_article_chars: 2000,
            sentiment_min_chars: 5,
            sentiment_max_chars: 512,
            max_concurrency: 8,
            reference_date: None,
            rules_path: None,
        }
    }
}

impl GuardConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Parse a JSON document; missing fields fall back to defaults.
    pub fn from_json_str(raw: &str) -> GuardResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Entry points for obtaining a configuration.
pub struct ConfigManager;

impl ConfigManager {
    pub fn get_default() -> GuardConfig {
        GuardConfig::default()
    }

    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// Chained builder over [`GuardConfig`].
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GuardConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GuardConfig::default(),
        }
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn moderation_model(mut self, model: impl Into<String>) -> Self {
        self.config.moderation_model = model.into();
        self
    }

    pub fn fake_news_model(mut self, model: impl Into<String>) -> Self {
        self.config.fake_news_model = model.into();
        self
    }

    pub fn http_timeout(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    pub fn min_article_chars(mut self, chars: usize) -> Self {
        self.config.min_article_chars = chars;
        self
    }

    pub fn max_article_chars(mut self, chars: usize) -> Self {
        self.config.max_article_chars = chars;
        self
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = limit.max(1);
        self
    }

    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.config.reference_date = Some(date);
        self
    }

    pub fn rules_path(mut self, path: PathBuf) -> Self {
        self.config.rules_path = Some(path);
        self
    }

    pub fn build(self) -> GuardConfig {
        self.config
    }
}
