//! Character-level scanning used by the repair passes.
//!
//! Truncation recovery and brace balancing both need to know where
//! strings begin and end, so every scan here tracks string and escape
//! state explicitly instead of relying on regex substitution.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::constants::{DEFAULT_SCORE, DEFAULT_SUMMARY};

static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""summary"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap());

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""overall_score"\s*:\s*(\d+)"#).unwrap());

/// Trailing `"key":` fragment left dangling after an unterminated value
/// was cut off.
static DANGLING_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?\s*"[^"\n]*"\s*:\s*$"#).unwrap());

/// Reconstruct a minimal payload from a truncated candidate.
///
/// Scans the raw text of the `issues` array character by character,
/// tracking brace depth and string/escape state, and keeps only the
/// leading run of *complete* issue objects — objects whose braces balance
/// before the truncation point. A trailing incomplete object is
/// discarded. `summary` and `overall_score` are pulled out with targeted
/// field matches and defaulted when absent.
///
/// Returns `None` when the candidate has no recognisable `issues` array,
/// which routes the cascade on to brace balancing.
pub fn recover_truncated(text: &str) -> Option<Value> {
    let issues = recover_complete_issues(text)?;

    let summary = SUMMARY_RE
        .captures(text)
        .and_then(|cap| unescape(&cap[1]))
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    let overall_score = SCORE_RE
        .captures(text)
        .and_then(|cap| cap[1].parse::<u8>().ok())
        .map(|score| score.clamp(1, 10))
        .unwrap_or(DEFAULT_SCORE);

    Some(json!({
        "summary": summary,
        "issues": issues,
        "positive_feedback": [],
        "overall_score": overall_score,
    }))
}

/// Isolate the complete objects of the `issues` array.
fn recover_complete_issues(text: &str) -> Option<Vec<Value>> {
    let key_pos = text.find("\"issues\"")?;
    let rel_open = text[key_pos..].find('[')?;
    let array = &text[key_pos + rel_open + 1..];

    let mut issues = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut object_start: Option<usize> = None;

    for (i, c) in array.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    object_start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = object_start.take() {
                        match serde_json::from_str::<Value>(&array[start..=i]) {
                            Ok(issue) => issues.push(issue),
                            // A balanced-looking object that still fails
                            // strict parse marks the corrupted tail; stop.
                            Err(_) => break,
                        }
                    }
                }
            }
            // End of the issues array at array level.
            ']' if depth == 0 => break,
            _ => {}
        }
    }

    Some(issues)
}

/// Maximum object/array nesting depth outside of strings.
///
/// Used to bound the quoting pass: its regex heuristics are unsafe on
/// deeply nested structures.
pub fn max_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Balance a truncated candidate by cutting any trailing incomplete
/// fragment and appending the closers the open brackets still need.
pub fn balance(text: &str) -> String {
    let mut out = text.to_string();

    // Cut an unterminated trailing string back to its opening quote.
    if let ScanState::InString { start } = scan_state(&out) {
        out.truncate(start);
    }

    // Drop a now-dangling `"key":` and any trailing comma.
    let trimmed = out.trim_end();
    let cut = DANGLING_KEY_RE
        .find(trimmed)
        .map(|m| m.start())
        .unwrap_or(trimmed.len());
    out.truncate(cut);
    while out.ends_with([',', ':', ' ', '\n', '\t']) {
        out.pop();
    }

    // Close whatever is still open, innermost first.
    if let ScanState::Clean { open_stack } = scan_state(&out) {
        for opener in open_stack.into_iter().rev() {
            out.push(match opener {
                '{' => '}',
                _ => ']',
            });
        }
    }
    out
}

/// Terminal state of a left-to-right scan.
enum ScanState {
    /// Scan ended outside any string; `open_stack` holds the unclosed
    /// `{` / `[` openers in order.
    Clean { open_stack: Vec<char> },
    /// Scan ended inside a string opened at byte offset `start`.
    InString { start: usize },
}

fn scan_state(text: &str) -> ScanState {
    let mut open_stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut string_start = 0usize;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                string_start = i;
            }
            '{' | '[' => open_stack.push(c),
            '}' | ']' => {
                open_stack.pop();
            }
            _ => {}
        }
    }

    if in_string {
        ScanState::InString {
            start: string_start,
        }
    } else {
        ScanState::Clean { open_stack }
    }
}

/// Decode a raw JSON string body (as captured between quotes).
fn unescape(body: &str) -> Option<String> {
    serde_json::from_str(&format!("\"{body}\"")).ok()
}
