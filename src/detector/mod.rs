//! Detector module: first-layer pattern matching
pub mod global;
pub mod matcher;

pub use self::global::{builtin_matcher, builtin_table};
pub use self::matcher::{FastMatcher, MatchHit};
