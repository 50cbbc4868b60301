//! Response-shape contract for the analytics MCP protocol.
//!
//! These are data checks, not engine logic: a parsed response either carries
//! exactly one of `result` / `error`, a tool list is a non-empty sequence of
//! descriptors with non-empty fields, and a tool-call success carries at
//! least one content block with text. Violations are reported as values so
//! the scenario driver can record a failure and keep going — nothing here
//! panics or aborts the run.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A parsed response failed a shape expectation.
#[derive(Debug, Error)]
pub enum ContractViolation {
    #[error("response carries neither result nor error")]
    NeitherResultNorError,
    #[error("response carries both result and error")]
    BothResultAndError,
    #[error("error object lacks an integer code or a string message")]
    MalformedError,
    #[error("expected success but got error {code}: {excerpt}")]
    UnexpectedError { code: i64, excerpt: String },
    #[error("expected an error response but got a result")]
    UnexpectedSuccess,
    #[error("result has no tools array")]
    MissingToolList,
    #[error("tool list is empty")]
    EmptyToolList,
    #[error("tool descriptor {index} is malformed: {reason}")]
    MalformedDescriptor { index: usize, reason: String },
    #[error("tool descriptor {index} ({name:?}) has an empty {field}")]
    BlankDescriptorField {
        index: usize,
        name: String,
        field: &'static str,
    },
    #[error("tool-call result has no content blocks")]
    MissingContent,
    #[error("first content block has no text field")]
    MissingText,
    #[error("first content block text is empty")]
    EmptyText,
    #[error("error message does not mention `{metric}`")]
    MissingMetricName { metric: String },
    #[error("error message lacks the {marker:?} marker")]
    MissingMarker { marker: &'static str },
    #[error("suggestion list is empty")]
    NoSuggestions,
}

/// Either half of a well-formed response.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// The `result` payload.
    Success(&'a Value),
    /// The `error` payload, decomposed.
    Failure { code: i64, message: &'a str },
}

/// Split a parsed response into its result or error half.
///
/// # Errors
///
/// Returns a violation when neither or both of `result` / `error` are
/// present, or when the error object is missing `code` / `message`.
pub fn split_outcome(response: &Value) -> Result<Outcome<'_>, ContractViolation> {
    match (response.get("result"), response.get("error")) {
        (Some(_), Some(_)) => Err(ContractViolation::BothResultAndError),
        (None, None) => Err(ContractViolation::NeitherResultNorError),
        (Some(result), None) => Ok(Outcome::Success(result)),
        (None, Some(error)) => {
            let code = error
                .get("code")
                .and_then(Value::as_i64)
                .ok_or(ContractViolation::MalformedError)?;
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .ok_or(ContractViolation::MalformedError)?;
            Ok(Outcome::Failure { code, message })
        }
    }
}

/// One entry of a `tools/list` response.
///
/// Extra fields (`inputSchema` and friends) are accepted and ignored; the
/// contract only binds `name` and `description`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

/// Extract the tool descriptors from a `tools/list` result.
///
/// # Errors
///
/// Returns a violation when the `tools` array is missing or empty, or when
/// any descriptor lacks a non-empty `name` or `description`.
pub fn tool_descriptors(result: &Value) -> Result<Vec<ToolDescriptor>, ContractViolation> {
    let tools = result
        .get("tools")
        .and_then(Value::as_array)
        .ok_or(ContractViolation::MissingToolList)?;
    if tools.is_empty() {
        return Err(ContractViolation::EmptyToolList);
    }

    let mut descriptors = Vec::with_capacity(tools.len());
    for (index, entry) in tools.iter().enumerate() {
        let descriptor: ToolDescriptor = serde_json::from_value(entry.clone()).map_err(|e| {
            ContractViolation::MalformedDescriptor {
                index,
                reason: e.to_string(),
            }
        })?;
        if descriptor.name.trim().is_empty() {
            return Err(ContractViolation::BlankDescriptorField {
                index,
                name: descriptor.name,
                field: "name",
            });
        }
        if descriptor.description.trim().is_empty() {
            return Err(ContractViolation::BlankDescriptorField {
                index,
                name: descriptor.name,
                field: "description",
            });
        }
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

/// The text of block zero of a tool-call success payload.
///
/// # Errors
///
/// Returns a violation when `content` is missing or empty, or when block
/// zero has no text or only empty text.
pub fn first_text_block(result: &Value) -> Result<&str, ContractViolation> {
    let blocks = result
        .get("content")
        .and_then(Value::as_array)
        .filter(|blocks| !blocks.is_empty())
        .ok_or(ContractViolation::MissingContent)?;
    let text = blocks[0]
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ContractViolation::MissingText)?;
    if text.trim().is_empty() {
        return Err(ContractViolation::EmptyText);
    }
    Ok(text)
}

/// The first `max_lines` non-blank lines of a payload, for operator review.
pub fn excerpt_lines(text: &str, max_lines: usize) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The head of an error message, clipped to roughly `max_chars` characters.
pub fn excerpt_prefix(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let clipped: String = message.chars().take(max_chars).collect();
    format!("{clipped}…")
}
