//! One record per line: compact JSON in, record or parse error out.
//!
//! Callers decide what a parse error means; the repositories skip the line.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a record to a single line. Compact JSON escapes control
/// characters, so the output never contains a raw newline.
pub fn encode<T: Serialize>(record: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

pub fn decode<T: DeserializeOwned>(line: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(line)
}
