//! Utility module: small shared helpers
pub mod text;

pub use self::text::{strip_code_fences, truncate_chars};
