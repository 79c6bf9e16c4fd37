//! Crate-wide error types

use std::io::Error as IoError;
use std::time::Duration;

use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Construction-time failures.
///
/// Runtime paths (moderation, fact-checking, scans) never surface these: they
/// degrade to a typed verdict instead.
#[derive(Error, Debug)]
pub enum GuardError {
    // ===================== credentials =====================
    #[error("no usable credentials supplied")]
    NoCredentials,

    // ===================== rule table =====================
    #[error("rule load failed: {0}")]
    RuleLoadError(String),
    #[error("rule parse failed: {0}")]
    RuleParseError(String),
    #[error("regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // ===================== io / serialization =====================
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("IO failed: {0}")]
    IoError(#[from] IoError),
    #[error("HTTP client setup failed: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type GuardResult<T> = Result<T, GuardError>;

/// Raw failure reported by a generation client for a single call.
///
/// Carries whatever the transport saw; turning it into a retry decision is the
/// job of [`crate::gateway::classify_failure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Non-success HTTP status with the response body.
    #[error("service returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// The service refused to generate for this input.
    #[error("generation blocked: {reason}")]
    Blocked { reason: String },

    /// Connection, TLS or body read failure.
    #[error("transport failure: {message}")]
    Transport { message: String, timeout: bool },

    /// 2xx response whose body could not be understood.
    #[error("undecodable response: {0}")]
    Decode(String),

    /// The call did not finish within the configured bound.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ServiceError::Decode(err.to_string());
        }
        ServiceError::Transport {
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}
