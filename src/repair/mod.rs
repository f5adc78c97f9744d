//! Progressive repair of malformed model payloads.
//!
//! The cascade runs escalating passes, each only attempted when the
//! previous output still fails a strict parse. First success wins: later
//! passes are progressively more destructive and must never run when a
//! cheaper fix suffices. Every transition emits a tracing event so an
//! observability layer can see which pass recovered (or lost) a payload
//! without the outcome leaking into the return value.

pub mod scanner;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// The quoting pass is skipped once the payload nests deeper than this:
/// its regex heuristics cannot tell structure from string content in
/// deeply nested values.
const QUOTING_MAX_DEPTH: usize = 2;

/// Trailing commas before a closing brace or bracket.
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Bare (unquoted) object keys.
static BARE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());

/// Bare word values (not numbers, not already quoted).
static BARE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":\s*([A-Za-z_][^,\}\]"]*?)\s*([,\}\]])"#).unwrap());

/// Booleans and null that ended up quoted in value position.
static QUOTED_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":\s*"(true|false|null)""#).unwrap());

/// Numbers that ended up quoted in value position.
static QUOTED_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":\s*"(-?\d+(?:\.\d+)?)""#).unwrap());

/// The payload could not be recovered by any pass.
#[derive(Error, Debug)]
#[error("payload unrepairable: {reason}")]
pub struct UnrepairableError {
    pub reason: String,
}

/// Which pass produced the accepted payload. Reported for diagnostics
/// and asserted on in tests: a later pass running when an earlier one
/// would have parsed is a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairPass {
    Cosmetic,
    Quoting,
    Truncation,
    Balancing,
}

/// A successfully repaired payload.
#[derive(Debug)]
pub struct Repaired {
    pub value: Value,
    pub pass: RepairPass,
}

/// Run the repair cascade over a candidate that failed strict parsing.
pub fn repair(candidate: &str) -> Result<Repaired, UnrepairableError> {
    // Pass 1: cosmetic normalization. Raw newlines inside string values
    // are the most common real-world parse failure.
    let cosmetic = cosmetic_repair(candidate);
    match serde_json::from_str::<Value>(&cosmetic) {
        Ok(value) => {
            debug!(pass = "cosmetic", outcome = "parsed");
            return Ok(Repaired {
                value,
                pass: RepairPass::Cosmetic,
            });
        }
        Err(e) => debug!(pass = "cosmetic", outcome = "failed", reason = %e),
    }

    // Pass 2: quoting heuristics, bounded to shallow payloads.
    let depth = scanner::max_depth(&cosmetic);
    if depth > QUOTING_MAX_DEPTH {
        debug!(
            pass = "quoting",
            outcome = "skipped",
            reason = format!("nesting depth {depth} exceeds {QUOTING_MAX_DEPTH}")
        );
    } else {
        let quoted = quoting_repair(&cosmetic);
        match serde_json::from_str::<Value>(&quoted) {
            Ok(value) => {
                debug!(pass = "quoting", outcome = "parsed");
                return Ok(Repaired {
                    value,
                    pass: RepairPass::Quoting,
                });
            }
            Err(e) => debug!(pass = "quoting", outcome = "failed", reason = %e),
        }
    }

    // Pass 3: the payload was likely cut off mid-stream. Salvage the
    // complete issue objects and rebuild a minimal payload around them.
    match scanner::recover_truncated(&cosmetic) {
        Some(value) => {
            debug!(pass = "truncation", outcome = "recovered");
            return Ok(Repaired {
                value,
                pass: RepairPass::Truncation,
            });
        }
        None => debug!(
            pass = "truncation",
            outcome = "failed",
            reason = "no recognisable issues array"
        ),
    }

    // Pass 4: last resort, cut the dangling fragment and balance brackets.
    let balanced = scanner::balance(&cosmetic);
    match serde_json::from_str::<Value>(&balanced) {
        Ok(value) => {
            debug!(pass = "balancing", outcome = "parsed");
            Ok(Repaired {
                value,
                pass: RepairPass::Balancing,
            })
        }
        Err(e) => {
            debug!(pass = "balancing", outcome = "failed", reason = %e);
            Err(UnrepairableError {
                reason: format!("all repair passes exhausted, last error: {e}"),
            })
        }
    }
}

/// Pass 1: smart quotes to plain quotes, raw newlines and tabs to
/// spaces, trailing commas removed.
fn cosmetic_repair(text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect();
    TRAILING_COMMA_RE.replace_all(&text, "$1").into_owned()
}

/// Pass 2: quote bare keys and bare word values, then restore literals
/// the quoting (ours or the model's) wrongly stringified.
///
/// Best-effort by design: values containing commas, colons, or braces can
/// be mis-repaired, which is why the cascade bounds this pass to shallow
/// payloads.
fn quoting_repair(text: &str) -> String {
    let text = BARE_KEY_RE.replace_all(text, "$1\"$2\":");
    let text = BARE_VALUE_RE.replace_all(&text, ": \"$1\"$2");
    let text = QUOTED_LITERAL_RE.replace_all(&text, ": $1");
    QUOTED_NUMBER_RE.replace_all(&text, ": $1").into_owned()
}
