//! Tool-call extraction from free-form model text.
//!
//! Models are asked to answer with a JSON object of the form
//! `{"thought": "...", "tool": "<name>", "parameters": {...}}`, but they
//! wrap it in prose, markdown fences, or emit stray braces around it.
//! [`extract_tool_call`] walks the text with a balanced-brace scanner that
//! understands JSON string literals and escapes, decodes each candidate
//! object in order of its opening brace, and returns the first one that is
//! structurally a tool call.
//!
//! Extraction never fails: when nothing usable is found the caller gets a
//! [`NoCallReason`] and keeps the raw model text.

use super::entities::{Provenance, ToolCall};
use super::value_objects::ToolError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Upper bound on brace candidates examined per text
pub const MAX_CANDIDATES: usize = 64;

/// Outcome of scanning model text for a tool call
#[derive(Debug, Clone)]
pub enum Extraction {
    /// A structurally valid call was found
    Call(ToolCall),
    /// No call; the text should be shown to the user as-is
    NoCall(NoCallReason),
}

/// Why no call was extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoCallReason {
    /// The text contains no `{` at all
    NoBraces,
    /// Braces were present but never closed
    Unbalanced,
    /// JSON objects were found but none had `tool` and `parameters`
    NotAToolCall,
    /// At least one brace span failed to decode and no valid call was found
    Ambiguous { candidates: usize, error: String },
}

impl Extraction {
    pub fn is_call(&self) -> bool {
        matches!(self, Extraction::Call(_))
    }

    pub fn call(&self) -> Option<&ToolCall> {
        match self {
            Extraction::Call(call) => Some(call),
            Extraction::NoCall(_) => None,
        }
    }

    pub fn into_call(self) -> Option<ToolCall> {
        match self {
            Extraction::Call(call) => Some(call),
            Extraction::NoCall(_) => None,
        }
    }
}

impl NoCallReason {
    pub fn as_str(&self) -> &str {
        match self {
            NoCallReason::NoBraces => "no_braces",
            NoCallReason::Unbalanced => "unbalanced",
            NoCallReason::NotAToolCall => "not_a_tool_call",
            NoCallReason::Ambiguous { .. } => "ambiguous",
        }
    }

    /// Diagnostic error for the ambiguous case, `None` otherwise
    pub fn to_tool_error(&self) -> Option<ToolError> {
        match self {
            NoCallReason::Ambiguous { candidates, error } => Some(
                ToolError::parse_ambiguous(format!(
                    "No tool call decoded from {} brace candidate(s)",
                    candidates
                ))
                .with_details(error.clone()),
            ),
            _ => None,
        }
    }
}

impl std::fmt::Display for NoCallReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoCallReason::Ambiguous { candidates, error } => {
                write!(f, "ambiguous ({} candidates, last error: {})", candidates, error)
            }
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Scan `text` for an embedded tool call.
///
/// Candidates are tried by start offset. An object that decodes but is not
/// a call is skipped whole, so objects nested inside it are treated as data.
/// A span that fails to decode is skipped by one character, so a call nested
/// inside non-JSON braces is still found.
pub fn extract_tool_call(text: &str) -> Extraction {
    if !text.contains('{') {
        return Extraction::NoCall(NoCallReason::NoBraces);
    }

    let mut cursor = 0;
    let mut examined = 0;
    let mut decoded_object = false;
    let mut unbalanced = false;
    let mut last_error: Option<String> = None;

    while let Some(offset) = text[cursor..].find('{') {
        if examined >= MAX_CANDIDATES {
            break;
        }
        examined += 1;
        let start = cursor + offset;

        let Some(end) = balanced_end(text, start) else {
            unbalanced = true;
            cursor = start + 1;
            continue;
        };

        let raw = &text[start..end];
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => {
                decoded_object = true;
                if let Some(call) = call_from_object(object, start, end, raw) {
                    return Extraction::Call(call);
                }
                cursor = end;
            }
            Ok(_) => cursor = end,
            Err(e) => {
                last_error = Some(e.to_string());
                cursor = start + 1;
            }
        }
    }

    let reason = match last_error {
        Some(error) => NoCallReason::Ambiguous {
            candidates: examined,
            error,
        },
        None if decoded_object => NoCallReason::NotAToolCall,
        None if unbalanced => NoCallReason::Unbalanced,
        None => NoCallReason::NotAToolCall,
    };
    Extraction::NoCall(reason)
}

/// Byte offset one past the `}` matching the `{` at `start`.
///
/// Braces inside JSON string literals are ignored. Scanning bytes is safe
/// for UTF-8 text because the structural characters are all ASCII.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn call_from_object(
    mut object: Map<String, Value>,
    start: usize,
    end: usize,
    raw: &str,
) -> Option<ToolCall> {
    let name = match object.get("tool") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        _ => return None,
    };
    let parameters = match object.remove("parameters") {
        Some(Value::Object(parameters)) => parameters,
        _ => return None,
    };

    let mut call = ToolCall::new(name)
        .with_arguments(parameters)
        .with_provenance(Provenance {
            start,
            end,
            raw: raw.to_string(),
        });
    if let Some(Value::String(thought)) = object.get("thought") {
        call = call.with_reasoning(thought.clone());
    }
    Some(call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expect_call(text: &str) -> ToolCall {
        match extract_tool_call(text) {
            Extraction::Call(call) => call,
            Extraction::NoCall(reason) => panic!("expected a call, got {reason}"),
        }
    }

    fn expect_no_call(text: &str) -> NoCallReason {
        match extract_tool_call(text) {
            Extraction::NoCall(reason) => reason,
            Extraction::Call(call) => panic!("expected no call, got {}", call.tool_name),
        }
    }

    #[test]
    fn test_plain_text_has_no_call() {
        assert_eq!(
            expect_no_call("The capital of France is Paris."),
            NoCallReason::NoBraces
        );
        assert_eq!(expect_no_call(""), NoCallReason::NoBraces);
    }

    #[test]
    fn test_call_embedded_in_prose() {
        let text = r#"Sure, let me add those. {"tool": "add_numbers", "parameters": {"a": 2, "b": 3}} Done."#;
        let call = expect_call(text);

        assert_eq!(call.tool_name, "add_numbers");
        assert_eq!(call.get("a"), Some(&json!(2)));
        assert_eq!(call.get("b"), Some(&json!(3)));

        let provenance = call.provenance.unwrap();
        assert_eq!(&text[provenance.start..provenance.end], provenance.raw);
        assert!(provenance.raw.starts_with("{\"tool\""));
    }

    #[test]
    fn test_thought_becomes_reasoning() {
        let call = expect_call(
            r#"{"thought": "need the time", "tool": "get_current_time", "parameters": {}}"#,
        );
        assert_eq!(call.reasoning.as_deref(), Some("need the time"));
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_call_inside_markdown_fence() {
        let text = "Here you go:\n```json\n{\n  \"tool\": \"read_file\",\n  \"parameters\": {\"path\": \"/data/a.txt\"}\n}\n```";
        let call = expect_call(text);
        assert_eq!(call.get_string("path"), Some("/data/a.txt"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let call = expect_call(
            r#"{"tool": "run_python", "parameters": {"code": "print('}{')\nd = {\"k\": 1}"}}"#,
        );
        assert_eq!(call.tool_name, "run_python");
        assert_eq!(
            call.get_string("code"),
            Some("print('}{')\nd = {\"k\": 1}")
        );
    }

    #[test]
    fn test_non_json_braces_before_call_are_skipped() {
        let call = expect_call(
            r#"Use a set like {1, 2}. Then: {"tool": "multiply_numbers", "parameters": {"a": 4, "b": 5}}"#,
        );
        assert_eq!(call.tool_name, "multiply_numbers");
    }

    #[test]
    fn test_call_nested_in_non_json_braces_is_found() {
        let call = expect_call(r#"{call: {"tool": "add_numbers", "parameters": {"a": 1, "b": 1}}}"#);
        assert_eq!(call.tool_name, "add_numbers");
    }

    #[test]
    fn test_call_nested_in_data_object_is_not_a_call() {
        let reason = expect_no_call(
            r#"{"example": {"tool": "add_numbers", "parameters": {"a": 1, "b": 1}}}"#,
        );
        assert_eq!(reason, NoCallReason::NotAToolCall);
    }

    #[test]
    fn test_first_valid_candidate_wins() {
        let call = expect_call(
            r#"{"tool": "add_numbers", "parameters": {"a": 1, "b": 2}} or {"tool": "multiply_numbers", "parameters": {"a": 1, "b": 2}}"#,
        );
        assert_eq!(call.tool_name, "add_numbers");
    }

    #[test]
    fn test_missing_fields_are_not_calls() {
        assert_eq!(
            expect_no_call(r#"{"tool": "add_numbers"}"#),
            NoCallReason::NotAToolCall
        );
        assert_eq!(
            expect_no_call(r#"{"tool": "", "parameters": {}}"#),
            NoCallReason::NotAToolCall
        );
        assert_eq!(
            expect_no_call(r#"{"tool": "add_numbers", "parameters": [1, 2]}"#),
            NoCallReason::NotAToolCall
        );
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(
            expect_no_call(r#"{"tool": "add_numbers", "parameters": {"a": 1"#),
            NoCallReason::Unbalanced
        );
    }

    #[test]
    fn test_undecodable_span_is_ambiguous() {
        let reason = expect_no_call("I would call {tool: add_numbers} here");
        match &reason {
            NoCallReason::Ambiguous { candidates, .. } => assert_eq!(*candidates, 1),
            other => panic!("unexpected reason {other}"),
        }
        let err = reason.to_tool_error().unwrap();
        assert_eq!(err.code(), "PARSE_AMBIGUOUS");
        assert!(NoCallReason::NoBraces.to_tool_error().is_none());
    }

    #[test]
    fn test_candidate_cap() {
        let mut text = "{x} ".repeat(MAX_CANDIDATES + 10);
        text.push_str(r#"{"tool": "add_numbers", "parameters": {"a": 1, "b": 1}}"#);

        match expect_no_call(&text) {
            NoCallReason::Ambiguous { candidates, .. } => assert_eq!(candidates, MAX_CANDIDATES),
            other => panic!("unexpected reason {other}"),
        }
    }

    #[test]
    fn test_multibyte_prose() {
        let text = "計算します → {\"tool\": \"add_numbers\", \"parameters\": {\"a\": 2, \"b\": 3}} ✓";
        let call = expect_call(text);
        let provenance = call.provenance.unwrap();
        assert_eq!(&text[provenance.start..provenance.end], provenance.raw);
    }
}
