//! Locating a JSON-shaped payload inside free-form model output.
//!
//! LLM responses are not guaranteed to respect fencing or to avoid
//! leading/trailing prose, so extraction layers three strategies and
//! returns the first usable hit. Only when no `{`/`}` pairing exists at
//! all does extraction fail — everything else is left to the strict parse
//! and the repair cascade.

use std::sync::LazyLock;

use regex::Regex;

/// Content inside markdown code fences, optionally tagged `json`.
///
/// The closing ``` must start a line so triple-backticks embedded inside
/// JSON string values (e.g. code_example fields) don't end the match early.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n```").unwrap());

/// Non-greedy brace-delimited spans, matched globally.
static BRACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

/// Extract the best candidate JSON payload from raw model output.
///
/// Strategies, in order:
/// 1. fenced code block, inner text;
/// 2. all non-greedy brace-delimited matches, longest one wins
///    (longer usually means more complete);
/// 3. substring from the first `{` to the last `}`.
///
/// A candidate that already parses as strict JSON wins immediately. When
/// none does (the payload needs repair), the first candidate located is
/// returned so the repairer works on the least-mangled text. The
/// non-greedy matcher stops at the first closing brace, so for nested
/// objects outside fences strategy 3 is the one that captures the whole
/// payload.
///
/// Returns `None` only when the text contains no `{` followed by a `}`.
pub fn extract(raw: &str) -> Option<String> {
    let fenced = FENCE_RE.captures(raw).and_then(|cap| {
        let inner = cap[1].trim();
        (!inner.is_empty()).then(|| inner.to_string())
    });

    let longest_brace = BRACE_RE
        .find_iter(raw)
        .max_by_key(|m| m.as_str().len())
        .map(|m| m.as_str().to_string());

    let first_to_last = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(raw[start..=end].to_string()),
        _ => None,
    };

    let candidates = [fenced, longest_brace, first_to_last];

    for candidate in candidates.iter().flatten() {
        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
            return Some(candidate.clone());
        }
    }

    candidates.into_iter().flatten().next()
}
