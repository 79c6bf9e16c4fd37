//! Rule module: authoring model and loading of the pattern table
pub mod model;
pub mod loader;

pub use self::model::{RawPatternRule, RuleGroup, RuleLibrary, SentimentLexicon};
pub use self::loader::RuleLoader;
