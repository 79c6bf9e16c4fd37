//! Gateway module: the external generation boundary and credential-rotating calls
pub mod classifier;
pub mod client;
pub mod gateway;

pub use self::classifier::{FailureKind, classify_failure};
pub use self::client::{GeminiClient, GenerativeClient};
pub use self::gateway::{ALL_EXHAUSTED, GatewayResult, QUOTA_EXHAUSTED, RequestGateway};
