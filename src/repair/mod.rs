//! Response repair
//! Best-effort extraction of a typed verdict from free-form model output.
//! Never fails: anything unusable becomes the schema's safe default.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::utils::{strip_code_fences, truncate_chars};

/// A JSON shape the model is asked to produce.
pub trait RepairSchema: DeserializeOwned + Sized {
    /// Range and enum checks after a successful decode. `None` rejects the value.
    fn validate(self) -> Option<Self>;

    /// Value used whenever the response cannot be trusted.
    fn safe_default() -> Self;
}

/// Result of a repair attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Repaired<T> {
    /// Decoded and validated.
    Structured(T),
    /// Fell back to [`RepairSchema::safe_default`].
    Default(T),
}

impl<T> Repaired<T> {
    pub fn into_inner(self) -> T {
        match self {
            Repaired::Structured(v) | Repaired::Default(v) => v,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Repaired::Default(_))
    }
}

/// Repair entry point
pub struct ResponseRepair;

impl ResponseRepair {
    pub fn parse_verdict<T: RepairSchema>(raw_text: &str) -> Repaired<T> {
        // 1. Drop code fences
        let cleaned = strip_code_fences(raw_text);

        // 2. Direct decode
        match serde_json::from_str::<T>(&cleaned) {
            Ok(value) => return Self::finish(value, raw_text),
            Err(e) => debug!(error = %e, "direct decode failed, trying object extraction"),
        }

        // 3. Outermost {...} span
        if let Some(span) = Self::object_span(&cleaned) {
            match serde_json::from_str::<T>(span) {
                Ok(value) => return Self::finish(value, raw_text),
                Err(e) => debug!(error = %e, "extracted object did not decode"),
            }
        }

        // 4. Safe default
        warn!(preview = truncate_chars(raw_text, 120), "unparseable model response, using safe default");
        Repaired::Default(T::safe_default())
    }

    fn finish<T: RepairSchema>(value: T, raw_text: &str) -> Repaired<T> {
        match value.validate() {
            Some(valid) => Repaired::Structured(valid),
            None => {
                warn!(preview = truncate_chars(raw_text, 120), "model response failed validation, using safe default");
                Repaired::Default(T::safe_default())
            }
        }
    }

    /// Text from the first `{` to the last `}`, if that is a non-empty span.
    fn object_span(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        (end > start).then(|| &text[start..=end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Score {
        value: i64,
    }

    impl RepairSchema for Score {
        fn validate(self) -> Option<Self> {
            (self.value >= 0).then_some(Score {
                value: self.value.min(10),
            })
        }

        fn safe_default() -> Self {
            Score { value: -1 }
        }
    }

    #[test]
    fn test_plain_json() {
        assert_eq!(
            ResponseRepair::parse_verdict::<Score>(r#"{"value": 3}"#),
            Repaired::Structured(Score { value: 3 })
        );
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"value\": 4}\n```";
        assert_eq!(ResponseRepair::parse_verdict::<Score>(raw).into_inner(), Score { value: 4 });
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let raw = "Sure! Here is the result: {\"value\": 5} Hope that helps.";
        assert_eq!(
            ResponseRepair::parse_verdict::<Score>(raw),
            Repaired::Structured(Score { value: 5 })
        );
    }

    #[test]
    fn test_validation_clamps() {
        assert_eq!(
            ResponseRepair::parse_verdict::<Score>(r#"{"value": 99}"#).into_inner(),
            Score { value: 10 }
        );
    }

    #[test]
    fn test_rejected_value_becomes_default() {
        let repaired = ResponseRepair::parse_verdict::<Score>(r#"{"value": -3}"#);
        assert!(repaired.is_default());
        assert_eq!(repaired.into_inner(), Score { value: -1 });
    }

    #[test]
    fn test_malformed_inputs_never_panic() {
        for raw in ["", "not json", "{", "}{", "{\"value\":", "```", "{\"other\": 1}", "ừ thì {{{"] {
            let repaired = ResponseRepair::parse_verdict::<Score>(raw);
            assert!(repaired.is_default(), "expected default for {:?}", raw);
        }
    }
}
