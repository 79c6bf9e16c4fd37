//! Failure classification
//! The only place that looks at service error text

use serde::Serialize;

use crate::error::ServiceError;

/// What a failed call means for rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Credential allowance used up; rotate.
    QuotaExceeded,
    /// Service refused the content; a toxicity signal, not an outage.
    SafetyBlocked,
    /// Network, timeout or server-side hiccup; not the credential's fault.
    Transient,
    Other,
}

const QUOTA_MARKERS: [&str; 5] = [
    "quota",
    "resource_exhausted",
    "resource exhausted",
    "rate limit",
    "too many requests",
];

const SAFETY_MARKERS: [&str; 2] = ["safety", "blocked"];

pub fn classify_failure(err: &ServiceError) -> FailureKind {
    match err {
        ServiceError::Blocked { .. } => FailureKind::SafetyBlocked,
        ServiceError::Transport { .. } | ServiceError::Timeout(_) => FailureKind::Transient,
        ServiceError::Decode(_) => FailureKind::Other,
        ServiceError::Status { code, message } => {
            let lowered = message.to_lowercase();
            if *code == 429 || contains_any(&lowered, &QUOTA_MARKERS) {
                FailureKind::QuotaExceeded
            } else if *code == 400 && contains_any(&lowered, &SAFETY_MARKERS) {
                FailureKind::SafetyBlocked
            } else if *code == 408 || (500..600).contains(code) {
                FailureKind::Transient
            } else {
                FailureKind::Other
            }
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
