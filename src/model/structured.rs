//! Tagged parse result for AI-originated structured payloads.
//!
//! Model output that is supposed to be JSON is frequently wrapped in a code
//! fence, truncated, or not JSON at all. Callers get
//! `{"parsed": [...]}` when the payload is an object or an array of objects,
//! and `{"raw": "..."}` otherwise. Parsing never fails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One structured record: a JSON object.
pub type Record = Map<String, Value>;

/// Outcome of interpreting a structured payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredPayload {
    /// The payload decoded into one or more records.
    Parsed(Vec<Record>),
    /// The payload was kept verbatim.
    Raw(String),
}

impl StructuredPayload {
    /// Parsed records, `None` for raw text.
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            StructuredPayload::Parsed(records) => Some(records),
            StructuredPayload::Raw(_) => None,
        }
    }
}

/// Interpret `input` as structured records.
///
/// A surrounding Markdown code fence (with or without a `json` info string) is
/// stripped first.
pub fn parse_records(input: &str) -> StructuredPayload {
    let body = strip_code_fence(input);
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(record)) => StructuredPayload::Parsed(vec![record]),
        Ok(Value::Array(items)) => {
            let records: Option<Vec<Record>> = items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect();
            match records {
                Some(records) => StructuredPayload::Parsed(records),
                None => StructuredPayload::Raw(input.to_string()),
            }
        }
        Ok(_) | Err(_) => {
            tracing::debug!(len = input.len(), "structured payload kept raw");
            StructuredPayload::Raw(input.to_string())
        }
    }
}

fn strip_code_fence(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Skip the info string line.
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim(),
        None => rest.trim(),
    }
}
