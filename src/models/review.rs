//! Review result types.
//!
//! A [`Review`] is the structured outcome of reviewing one file. The
//! pipeline guarantees a valid `Review` for every file it touches: when
//! extraction and repair both fail, a degraded review carrying a single
//! synthetic [`IssueType::System`] issue is produced instead of an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SCORE, DEFAULT_SUMMARY};
use crate::models::ReviewType;

/// Severity of a reported issue, lowest first.
///
/// The ordering backs the downstream severity filter: issues below the
/// configured threshold are dropped by the caller, never by the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Default substituted for unrecognised model output.
    pub const FALLBACK: Severity = Severity::Medium;
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "unknown severity: '{other}'. Supported: low, medium, high, critical"
            )),
        }
    }
}

/// Category of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Bug,
    Security,
    Performance,
    Style,
    Maintainability,
    /// Default for unrecognised model output.
    General,
    /// Synthetic issues raised by the pipeline itself (e.g. a review
    /// that could not be completed).
    System,
}

impl IssueType {
    /// Default substituted for unrecognised model output.
    pub const FALLBACK: IssueType = IssueType::General;
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Bug => write!(f, "bug"),
            IssueType::Security => write!(f, "security"),
            IssueType::Performance => write!(f, "performance"),
            IssueType::Style => write!(f, "style"),
            IssueType::Maintainability => write!(f, "maintainability"),
            IssueType::General => write!(f, "general"),
            IssueType::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bug" => Ok(IssueType::Bug),
            "security" => Ok(IssueType::Security),
            "performance" => Ok(IssueType::Performance),
            "style" => Ok(IssueType::Style),
            "maintainability" => Ok(IssueType::Maintainability),
            "general" => Ok(IssueType::General),
            "system" => Ok(IssueType::System),
            other => Err(format!("unknown issue type: '{other}'")),
        }
    }
}

/// One finding within a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Line number in the new file, when the model supplied one.
    pub line: Option<u32>,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Short summary of the issue.
    pub title: String,
    /// Detailed explanation.
    pub description: String,
    /// Suggested fix or improvement.
    pub suggestion: String,
    /// Optional corrected code snippet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

/// The structured result of reviewing one file.
///
/// Issue ordering follows the model's output order, which the prompt asks
/// to be ranked by importance. No reordering is applied downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub summary: String,
    pub issues: Vec<Issue>,
    pub positive_feedback: Vec<String>,
    /// Overall quality score in `[1, 10]`.
    pub overall_score: u8,
}

impl Review {
    /// The degraded review produced when no usable payload could be
    /// recovered from the model response. Carries a single synthetic
    /// low-severity issue describing the failure so the file shows up
    /// in the report instead of silently vanishing.
    pub fn fallback(reason: &str) -> Self {
        Review {
            summary: DEFAULT_SUMMARY.to_string(),
            issues: vec![Issue {
                line: None,
                severity: Severity::Low,
                issue_type: IssueType::System,
                title: "Review could not be completed".to_string(),
                description: reason.to_string(),
                suggestion: "Re-run the review or inspect the action logs.".to_string(),
                code_example: None,
            }],
            positive_feedback: Vec::new(),
            overall_score: DEFAULT_SCORE,
        }
    }
}

/// Aggregate statistics handed to the comment-rendering collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_files: usize,
    pub total_issues: usize,
    pub review_type: ReviewType,
}

impl RunSummary {
    /// Compute the aggregate over a run's per-file reviews.
    pub fn from_reviews(reviews: &[Review], review_type: ReviewType) -> Self {
        RunSummary {
            total_files: reviews.len(),
            total_issues: reviews.iter().map(|r| r.issues.len()).sum(),
            review_type,
        }
    }
}
