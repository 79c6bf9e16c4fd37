//! Fake-news module: article risk scoring
pub mod assessor;
pub mod model;
pub mod prompt;

pub use self::assessor::FakeNewsAssessor;
pub use self::model::{FakeNewsVerdict, MAX_RISK_SCORE, MIN_RISK_SCORE, NewsVerdict};
