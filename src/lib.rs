//! vncontentguard - content-safety core for Vietnamese web pages
//!
//! Regex-first comment moderation with AI arbitration, fake-news risk scoring and
//! keyword sentiment, all routed through a rotating multi-credential gateway.

// Export error types
pub use self::error::{GuardError, GuardResult, ServiceError};

// Export configuration
pub use self::config::{ConfigManager, CustomConfigBuilder, GuardConfig};

// Export rule authoring and loading
pub use self::rule::{RawPatternRule, RuleGroup, RuleLibrary, RuleLoader, SentimentLexicon};

// Export compiled pattern table
pub use self::compiler::{CompiledRule, PatternTable, RuleCompiler};

// Export first-layer matcher
pub use self::detector::{FastMatcher, MatchHit, builtin_matcher, builtin_table};

// Export credential rotation
pub use self::credential::{Clock, Credential, CredentialPool, ManualClock, PoolStatus, SystemClock};

// Export generation gateway
pub use self::gateway::{
    ALL_EXHAUSTED, FailureKind, GatewayResult, GeminiClient, GenerativeClient, QUOTA_EXHAUSTED, RequestGateway,
    classify_failure,
};

// Export response repair
pub use self::repair::{RepairSchema, Repaired, ResponseRepair};

// Export pipelines
pub use self::fakenews::{FakeNewsAssessor, FakeNewsVerdict, NewsVerdict};
pub use self::moderation::{BatchSummary, CommentResult, ModerationPipeline, ModerationVerdict, VerdictSource};
pub use self::sentiment::{SentimentAnalyzer, SentimentLabel, SentimentResult};
pub use self::scan::{ContentGuard, FullScanReport, ScanRequest};

/// Tracing target for per-comment and per-scan history events.
pub const HISTORY_TARGET: &str = "vncontentguard::history";

// Declare all submodules
pub mod compiler;
pub mod config;
pub mod credential;
pub mod detector;
pub mod error;
pub mod fakenews;
pub mod gateway;
pub mod moderation;
pub mod repair;
pub mod rule;
pub mod scan;
pub mod sentiment;
pub mod utils;
