//! Multi-credential request gateway
//! One logical generation; rotates credentials on quota errors, bounded by pool size

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::classifier::{FailureKind, classify_failure};
use super::client::GenerativeClient;
use crate::credential::CredentialPool;
use crate::error::ServiceError;

/// Outcome of one logical generate call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResult {
    RawText(String),
    /// The service refused the input; carries the block reason.
    SafetyBlocked(String),
    Unavailable(String),
    TransientFailure(String),
}

impl GatewayResult {
    pub fn is_text(&self) -> bool {
        matches!(self, GatewayResult::RawText(_))
    }
}

pub const ALL_EXHAUSTED: &str = "all credentials exhausted";
pub const QUOTA_EXHAUSTED: &str = "quota exhausted across all credentials";

/// Routes generation calls through the credential pool.
#[derive(Clone)]
pub struct RequestGateway {
    pool: Arc<CredentialPool>,
    client: Arc<dyn GenerativeClient>,
    call_timeout: Duration,
}

impl RequestGateway {
    pub fn new(pool: Arc<CredentialPool>, client: Arc<dyn GenerativeClient>, call_timeout: Duration) -> Self {
        Self {
            pool,
            client,
            call_timeout,
        }
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Generate text for `prompt` with `model`.
    ///
    /// Tries at most one call per credential. The pool lock is never held across
    /// the network call.
    #[instrument(level = "debug", skip_all, fields(model = %model))]
    pub async fn generate(&self, prompt: &str, model: &str) -> GatewayResult {
        let max_attempts = self.pool.len();

        for attempt in 1..=max_attempts {
            let Some(credential) = self.pool.current_credential() else {
                warn!("no credential available, skipping call");
                return GatewayResult::Unavailable(ALL_EXHAUSTED.to_string());
            };

            let outcome = match tokio::time::timeout(
                self.call_timeout,
                self.client.generate(model, prompt, credential.secret()),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ServiceError::Timeout(self.call_timeout)),
            };

            let err = match outcome {
                Ok(text) => {
                    self.pool.increment_usage(credential.id);
                    debug!(credential = credential.id, attempt, "generation succeeded");
                    return GatewayResult::RawText(text);
                }
                Err(err) => err,
            };

            match classify_failure(&err) {
                FailureKind::QuotaExceeded => {
                    warn!(credential = credential.id, attempt, error = %err, "quota exceeded, rotating");
                    if !self.pool.mark_exhausted(credential.id) {
                        return GatewayResult::Unavailable(QUOTA_EXHAUSTED.to_string());
                    }
                }
                FailureKind::SafetyBlocked => {
                    debug!(credential = credential.id, error = %err, "generation blocked by safety filter");
                    return GatewayResult::SafetyBlocked(err.to_string());
                }
                kind @ (FailureKind::Transient | FailureKind::Other) => {
                    warn!(credential = credential.id, ?kind, error = %err, "generation failed");
                    return GatewayResult::TransientFailure(err.to_string());
                }
            }
        }

        warn!(max_attempts, "attempt budget spent without a usable response");
        GatewayResult::Unavailable(QUOTA_EXHAUSTED.to_string())
    }
}
