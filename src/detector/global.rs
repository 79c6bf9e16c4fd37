//! Shared built-in pattern table
//! Compiled once per process on first use; immutable afterwards
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::matcher::FastMatcher;
use crate::compiler::{PatternTable, RuleCompiler};
use crate::error::GuardResult;
use crate::rule::RuleLoader;

static BUILTIN_TABLE: OnceCell<Arc<PatternTable>> = OnceCell::new();

/// The embedded rule table, compiled on first call.
pub fn builtin_table() -> GuardResult<Arc<PatternTable>> {
    BUILTIN_TABLE
        .get_or_try_init(|| {
            let lib = RuleLoader::embedded()?;
            Ok(Arc::new(RuleCompiler::compile(&lib)?))
        })
        .cloned()
}

/// Matcher over the embedded rule table.
pub fn builtin_matcher() -> GuardResult<FastMatcher> {
    Ok(FastMatcher::new(builtin_table()?))
}
