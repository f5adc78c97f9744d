//! Markdown rendering of a run's reviews into one comment body.
//!
//! The severity filter is applied here, at the presentation edge. The
//! pipeline always returns the model's full judgment; what the reader
//! sees is a reporting decision.

use crate::models::{Review, RunSummary, Severity};

/// Drop issues below `min_severity` from each review.
///
/// Synthetic fallback issues are low severity, so a raised filter hides
/// them too; that is intentional, the reader asked for signal only.
pub fn filter_by_severity(reviews: &mut [Review], min_severity: Severity) {
    for review in reviews.iter_mut() {
        review.issues.retain(|issue| issue.severity >= min_severity);
    }
}

/// Render the full run as one markdown comment body.
///
/// `reviews` must be in the same order as `filenames`.
pub fn render(filenames: &[String], reviews: &[Review], summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("## 🤖 critiq code review\n\n");
    out.push_str(&format!(
        "**Type:** {} · **Files:** {} · **Issues:** {}\n",
        summary.review_type, summary.total_files, summary.total_issues
    ));

    for (filename, review) in filenames.iter().zip(reviews) {
        out.push_str(&format!(
            "\n### `{}` · {}/10\n\n{}\n",
            filename, review.overall_score, review.summary
        ));

        for issue in &review.issues {
            let location = match issue.line {
                Some(line) => format!(" (line {line})"),
                None => String::new(),
            };
            out.push_str(&format!(
                "\n- {} **{}**{} · `{}`\n  {}\n",
                severity_marker(issue.severity),
                issue.title,
                location,
                issue.issue_type,
                issue.description
            ));
            if !issue.suggestion.is_empty() {
                out.push_str(&format!("  💡 {}\n", issue.suggestion));
            }
            if let Some(ref example) = issue.code_example {
                out.push_str(&format!("\n  ```\n  {}\n  ```\n", example.replace('\n', "\n  ")));
            }
        }

        if !review.positive_feedback.is_empty() {
            out.push_str("\n**Done well:**\n");
            for item in &review.positive_feedback {
                out.push_str(&format!("- {item}\n"));
            }
        }
    }

    out.push_str(&format!(
        "\n---\n*Generated by [critiq](https://github.com/critiq-dev/critiq) v{}*\n",
        crate::constants::VERSION
    ));

    out
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "⚪",
        Severity::Medium => "🟡",
        Severity::High => "🟠",
        Severity::Critical => "🔴",
    }
}
