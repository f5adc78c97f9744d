//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and the prompt budgets so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "critiq";

/// Crate version, from Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.critiq.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".critiq.toml";

/// Maximum number of file content characters embedded in a prompt.
/// Anything beyond this is cut and replaced with [`TRUNCATION_MARKER`].
pub const MAX_CONTENT_CHARS: usize = 5_000;

/// Maximum number of diff characters embedded in a prompt.
pub const MAX_DIFF_CHARS: usize = 1_000;

/// Marker appended to content or diff that was cut at the budget.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Base token budget for a model completion.
pub const BASE_MAX_TOKENS: u64 = 3_000;

/// Additional completion tokens granted per requested issue.
pub const TOKENS_PER_ISSUE: u64 = 500;

/// Hard ceiling on the completion token budget.
pub const MAX_TOKENS_CEILING: u64 = 8_000;

/// Summary used when the model response carries no usable summary field.
pub const DEFAULT_SUMMARY: &str = "Code review completed";

/// Overall score used when the model response carries no usable score.
pub const DEFAULT_SCORE: u8 = 5;

// ── Environment variable names ──────────────────────────────────────
//
// The `INPUT_*` names follow the GitHub Actions convention: every
// `with:` input of the action surfaces as `INPUT_<UPPERCASED NAME>`.

pub const ENV_PROVIDER: &str = "INPUT_PROVIDER";
pub const ENV_MODEL: &str = "INPUT_MODEL";
pub const ENV_API_KEY: &str = "INPUT_API_KEY";
pub const ENV_BASE_URL: &str = "INPUT_BASE_URL";
pub const ENV_REVIEW_TYPE: &str = "INPUT_REVIEW_TYPE";
pub const ENV_LANGUAGE: &str = "INPUT_LANGUAGE";
pub const ENV_MAX_ISSUES: &str = "INPUT_MAX_ISSUES_PER_FILE";
pub const ENV_SEVERITY_FILTER: &str = "INPUT_SEVERITY_FILTER";
pub const ENV_MAX_FILES: &str = "INPUT_MAX_FILES";

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_SHA: &str = "GITHUB_SHA";
pub const ENV_PR_NUMBER: &str = "PR_NUMBER";
