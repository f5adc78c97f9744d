//! Field-level normalization of parsed payloads.
//!
//! Total over arbitrary input shapes: every field either passes through
//! validated or is substituted with its documented default. Nothing is
//! ever dropped or raised as an error here — anomalies in individual
//! fields are a normalization concern, not a failure mode.

use serde_json::Value;

use crate::constants::{DEFAULT_SCORE, DEFAULT_SUMMARY};
use crate::models::{Issue, IssueType, Review, Severity};

/// Key spellings accepted for the code example field, in lookup order.
/// The first spelling is canonical; the second appeared in older model
/// outputs and is kept for compatibility.
const CODE_EXAMPLE_ALIASES: &[&str] = &["code_example", "codeExample"];

/// Normalize one raw issue object into an [`Issue`].
///
/// - `line` passes through only if numeric, else `None`;
/// - `severity` / `type` pass through only as exact enum members, else
///   the documented defaults (`medium` / `general`);
/// - string fields pass through or become `""`;
/// - `code_example` is looked up through the alias table.
pub fn normalize_issue(raw: &Value) -> Issue {
    Issue {
        line: raw
            .get("line")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok()),
        severity: enum_or_default(raw.get("severity"), Severity::FALLBACK),
        issue_type: enum_or_default(raw.get("type"), IssueType::FALLBACK),
        title: string_or_empty(raw.get("title")),
        description: string_or_empty(raw.get("description")),
        suggestion: string_or_empty(raw.get("suggestion")),
        code_example: CODE_EXAMPLE_ALIASES
            .iter()
            .find_map(|key| raw.get(*key))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Normalize a whole payload into a [`Review`].
///
/// Issue order is preserved exactly as the model emitted it — the prompt
/// asks for importance ranking and no reordering is imposed here.
pub fn normalize_review(payload: &Value) -> Review {
    let issues = payload
        .get("issues")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(normalize_issue).collect())
        .unwrap_or_default();

    let positive_feedback = payload
        .get("positive_feedback")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Review {
        summary: payload
            .get("summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string(),
        issues,
        positive_feedback,
        overall_score: payload
            .get("overall_score")
            .and_then(Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
            .map(|n| n.clamp(1, 10))
            .unwrap_or(DEFAULT_SCORE),
    }
}

/// Parse an enum field from a JSON string value, substituting `default`
/// for anything that is not an exact member.
fn enum_or_default<T>(value: Option<&Value>, default: T) -> T
where
    T: std::str::FromStr,
{
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn string_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
