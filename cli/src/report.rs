//! JSON reports printed on stdout.

use command_match_core::{Mismatch, Value};
use serde::Serialize;

/// A command whose grammar matched and whose handler ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matched {
    pub index: usize,
    pub command: String,
    pub values: Vec<Value>,
}

/// The command that consumed the most tokens when none matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearMiss {
    pub index: usize,
    pub command: String,
    pub consumed: usize,
    pub error: String,
}

/// Result of a dispatch run.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub tokens: Vec<String>,
    pub matches: Vec<Matched>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest: Option<NearMiss>,
}

/// Per-command line of a `--check` report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckEntry {
    pub index: usize,
    pub command: String,
    pub matched: bool,
    pub consumed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckEntry {
    pub fn new(index: usize, command: &str, result: Result<usize, Mismatch>) -> Self {
        let (consumed, error) = match result {
            Ok(consumed) => (consumed, None),
            Err(miss) => (miss.consumed, Some(miss.error.to_string())),
        };
        Self {
            index,
            command: command.to_string(),
            matched: error.is_none(),
            consumed,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use command_match_core::MatchError;

    use super::*;

    #[test]
    fn test_check_entry_from_match() {
        let entry = CheckEntry::new(2, "sum", Ok(3));
        assert!(entry.matched);
        assert_eq!(entry.consumed, 3);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"index": 2, "command": "sum", "matched": true, "consumed": 3})
        );
    }

    #[test]
    fn test_check_entry_from_mismatch() {
        let miss = Mismatch {
            consumed: 1,
            error: MatchError::ArgNotFound,
        };
        let entry = CheckEntry::new(0, "greet", Err(miss));
        assert!(!entry.matched);
        assert_eq!(entry.consumed, 1);
        assert_eq!(entry.error.as_deref(), Some(MatchError::ArgNotFound.to_string().as_str()));
    }

    #[test]
    fn test_outcome_values_serialize_untagged() {
        let outcome = Outcome {
            tokens: vec!["add".into(), "2".into()],
            matches: vec![Matched {
                index: 0,
                command: "add".into(),
                values: vec![Value::Int(2), Value::Bool(true), Value::from("x")],
            }],
            closest: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["matches"][0]["values"], serde_json::json!([2, true, "x"]));
        assert!(json.get("closest").is_none());
    }
}
