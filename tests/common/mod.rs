//! Shared fixtures: a scripted generation client and guard wiring helpers
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use vncontentguard::{
    ContentGuard, CredentialPool, GenerativeClient, GuardConfig, ManualClock, ServiceError,
};

/// Replays queued outcomes; secrets marked over-quota always fail with 429.
pub struct FakeClient {
    queue: Mutex<VecDeque<Result<String, ServiceError>>>,
    fallback: Result<String, ServiceError>,
    fact_check_answer: Mutex<Option<String>>,
    over_quota: Mutex<HashSet<String>>,
    prompts: Mutex<Vec<String>>,
    secrets: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeClient {
    /// Answers every call with `text` unless something is queued.
    pub fn answering(text: &str) -> Arc<Self> {
        Self::build(Ok(text.to_string()))
    }

    pub fn failing(err: ServiceError) -> Arc<Self> {
        Self::build(Err(err))
    }

    fn build(fallback: Result<String, ServiceError>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            fact_check_answer: Mutex::new(None),
            over_quota: Mutex::new(HashSet::new()),
            prompts: Mutex::new(Vec::new()),
            secrets: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn push(&self, outcome: Result<String, ServiceError>) {
        self.queue.lock().unwrap().push_back(outcome);
    }

    /// Fixed answer for fact-check prompts, leaving the queue to moderation calls.
    pub fn answer_fact_checks(&self, text: &str) {
        *self.fact_check_answer.lock().unwrap() = Some(text.to_string());
    }

    pub fn exhaust_secret(&self, secret: &str) {
        self.over_quota.lock().unwrap().insert(secret.to_string());
    }

    pub fn restore_all(&self) {
        self.over_quota.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.secrets.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for FakeClient {
    async fn generate(&self, _model: &str, prompt: &str, secret: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.secrets.lock().unwrap().push(secret.to_string());

        if self.over_quota.lock().unwrap().contains(secret) {
            return Err(quota_error());
        }
        if prompt.contains("Fact Checker") {
            if let Some(answer) = self.fact_check_answer.lock().unwrap().clone() {
                return Ok(answer);
            }
        }
        match self.queue.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => self.fallback.clone(),
        }
    }
}

pub fn quota_error() -> ServiceError {
    ServiceError::Status {
        code: 429,
        message: "Resource has been exhausted (e.g. check quota).".to_string(),
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Guard over `keys` with a manual clock starting at 2026-01-15.
pub async fn guard(
    config: GuardConfig,
    keys: &[&str],
    client: Arc<FakeClient>,
) -> (ContentGuard, Arc<ManualClock>) {
    init_tracing();
    let clock = Arc::new(ManualClock::new(day(2026, 1, 15)));
    let pool = Arc::new(CredentialPool::with_clock(keys.iter().copied(), clock.clone()).unwrap());
    let guard = ContentGuard::with_client(config, pool, client).await.unwrap();
    (guard, clock)
}

pub const CLEAN_AI_ANSWER: &str = r#"{"is_toxic": false, "category": "Clean", "confidence": 0.1, "reasoning": "friendly"}"#;

pub const LONG_ARTICLE: &str = "Ngày 10/1/2026, Bộ Giáo dục công bố lịch thi tốt nghiệp THPT năm nay sẽ diễn ra vào cuối tháng sáu.";
