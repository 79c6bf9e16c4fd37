//! Compiler module: turns authored rules into executable regex rules
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledRule, PatternTable};
pub use self::compiler::RuleCompiler;
