//! Newline-delimited JSON framing for worker messages.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::{WorkerRequest, WorkerResponse};

const REQUEST_TYPES: &[&str] = &["DRAW_IMAGE"];
const RESPONSE_TYPES: &[&str] = &["PROGRESS", "DRAWING_RESULT"];

/// Longest excerpt of an offending message kept in an error.
const EXCERPT_CHARS: usize = 80;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unrecognized message: {0}")]
    UnrecognizedMessage(String),
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encodes one message as a single line of JSON, without the trailing newline.
pub fn encode<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode_request(line: &str) -> Result<WorkerRequest, ProtocolError> {
    decode_tagged(line, REQUEST_TYPES)
}

pub fn decode_response(line: &str) -> Result<WorkerResponse, ProtocolError> {
    decode_tagged(line, RESPONSE_TYPES)
}

fn decode_tagged<T: DeserializeOwned>(line: &str, known: &[&str]) -> Result<T, ProtocolError> {
    let value: Value = serde_json::from_str(line)?;

    match value.get("type").and_then(Value::as_str) {
        Some(tag) if known.contains(&tag) => Ok(serde_json::from_value(value)?),
        _ => Err(ProtocolError::UnrecognizedMessage(excerpt(line))),
    }
}

fn excerpt(line: &str) -> String {
    let mut chars = line.trim().chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();

    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
