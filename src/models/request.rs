//! Review request type and prompt budgets.

use crate::constants::{MAX_CONTENT_CHARS, MAX_DIFF_CHARS, TRUNCATION_MARKER};
use crate::models::{Language, ReviewType};

/// One file's bundled input to the review pipeline.
///
/// Constructed per file, consumed once, discarded. Content and diff are
/// truncated to fixed budgets at construction; truncation is lossy and a
/// marker is appended so both the model and a human reader know data was
/// cut.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub filename: String,
    pub content: String,
    pub diff: String,
    pub review_type: ReviewType,
    pub language: Language,
    /// Hard cap stated in the prompt, clamped to `[1, 10]`.
    pub max_issues_per_file: u8,
}

impl ReviewRequest {
    pub fn new(
        filename: impl Into<String>,
        content: &str,
        diff: &str,
        review_type: ReviewType,
        language: Language,
        max_issues_per_file: u8,
    ) -> Self {
        ReviewRequest {
            filename: filename.into(),
            content: truncate_with_marker(content, MAX_CONTENT_CHARS),
            diff: truncate_with_marker(diff, MAX_DIFF_CHARS),
            review_type,
            language,
            max_issues_per_file: max_issues_per_file.clamp(1, 10),
        }
    }
}

/// Truncate `text` to at most `limit` characters, appending the
/// truncation marker when anything was cut.
///
/// Counts characters rather than bytes so a multi-byte boundary can
/// never split a code point.
fn truncate_with_marker(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_content(content: &str) -> ReviewRequest {
        ReviewRequest::new(
            "src/lib.rs",
            content,
            "+ let x = 1;",
            ReviewType::Full,
            Language::En,
            3,
        )
    }

    #[test]
    fn short_content_is_untouched() {
        let req = request_with_content("fn main() {}");
        assert_eq!(req.content, "fn main() {}");
        assert!(!req.content.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn oversized_content_is_cut_at_budget_with_marker() {
        let big = "x".repeat(6_000);
        let req = request_with_content(&big);
        assert!(req.content.starts_with(&"x".repeat(MAX_CONTENT_CHARS)));
        assert!(req.content.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            req.content.chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn oversized_diff_is_cut_at_budget() {
        let big_diff = "-".repeat(2_000);
        let req = ReviewRequest::new(
            "a.rs",
            "",
            &big_diff,
            ReviewType::Full,
            Language::En,
            3,
        );
        assert!(req.diff.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            req.diff.chars().count(),
            MAX_DIFF_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn content_exactly_at_budget_has_no_marker() {
        let exact = "y".repeat(MAX_CONTENT_CHARS);
        let req = request_with_content(&exact);
        assert_eq!(req.content, exact);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // Multi-byte characters must not be split mid-code-point.
        let text = "한".repeat(MAX_CONTENT_CHARS + 10);
        let req = request_with_content(&text);
        assert!(req.content.ends_with(TRUNCATION_MARKER));
        let kept: String = req
            .content
            .chars()
            .take(MAX_CONTENT_CHARS)
            .collect();
        assert_eq!(kept, "한".repeat(MAX_CONTENT_CHARS));
    }

    #[test]
    fn max_issues_is_clamped() {
        let req = ReviewRequest::new("a.rs", "", "", ReviewType::Full, Language::En, 0);
        assert_eq!(req.max_issues_per_file, 1);
        let req = ReviewRequest::new("a.rs", "", "", ReviewType::Full, Language::En, 50);
        assert_eq!(req.max_issues_per_file, 10);
    }
}
