//! Thin GitHub REST client for the action's needs.
//!
//! Three calls: list a pull request's changed files, fetch a file's
//! contents at a ref, and post the review comment. No pagination and no
//! retries; a run reviews at most a couple dozen files and a failed
//! post is a failed run.

use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::constants as c;
use crate::env::Env;

/// Errors from the GitHub API surface.
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("GitHub API returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode file content: {0}")]
    Decode(String),
}

/// Where this run is executing, resolved from the Actions environment.
#[derive(Debug, Clone)]
pub struct GithubContext {
    pub api_url: String,
    pub repository: String,
    pub token: String,
    /// Present on pull_request events.
    pub pr_number: Option<u64>,
    /// Head commit; the fallback comment target when there is no PR.
    pub sha: Option<String>,
}

impl GithubContext {
    /// Resolve the run context from environment variables.
    pub fn from_env(env: &Env) -> Result<Self, GithubError> {
        let token = env
            .var(c::ENV_GITHUB_TOKEN)
            .map_err(|_| GithubError::MissingEnv(c::ENV_GITHUB_TOKEN))?;
        let repository = env
            .var(c::ENV_GITHUB_REPOSITORY)
            .map_err(|_| GithubError::MissingEnv(c::ENV_GITHUB_REPOSITORY))?;
        let api_url = env
            .var(c::ENV_GITHUB_API_URL)
            .unwrap_or_else(|_| "https://api.github.com".to_string());
        let pr_number = env
            .var(c::ENV_PR_NUMBER)
            .ok()
            .and_then(|v| v.parse().ok());
        let sha = env.var(c::ENV_GITHUB_SHA).ok();

        Ok(Self {
            api_url,
            repository,
            token,
            pr_number,
            sha,
        })
    }
}

/// One changed file as reported by the pull request files endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    /// Unified diff hunk for this file. Absent for binary files and
    /// very large diffs.
    pub patch: Option<String>,
    pub status: String,
}

impl ChangedFile {
    /// Whether the file has reviewable content. Removed files have
    /// nothing left to review.
    pub fn is_reviewable(&self) -> bool {
        self.status != "removed"
    }
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    encoding: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    files: Option<Vec<ChangedFile>>,
}

/// GitHub REST API client.
pub struct GithubClient {
    http: reqwest::Client,
    context: GithubContext,
}

impl GithubClient {
    pub fn new(context: GithubContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            context,
        }
    }

    pub fn context(&self) -> &GithubContext {
        &self.context
    }

    /// List the files changed in a pull request.
    pub async fn list_changed_files(
        &self,
        pr_number: u64,
    ) -> Result<Vec<ChangedFile>, GithubError> {
        let url = format!(
            "{}/repos/{}/pulls/{}/files?per_page=100",
            self.context.api_url, self.context.repository, pr_number
        );
        let response = self.get(&url).await?;
        let files: Vec<ChangedFile> = response.json().await?;
        debug!(pr = pr_number, count = files.len(), "listed changed files");
        Ok(files)
    }

    /// List the files changed in a single commit. Used on push events,
    /// where there is no pull request to ask.
    pub async fn list_commit_files(&self, sha: &str) -> Result<Vec<ChangedFile>, GithubError> {
        let url = format!(
            "{}/repos/{}/commits/{}",
            self.context.api_url, self.context.repository, sha
        );
        let response = self.get(&url).await?;
        let commit: CommitResponse = response.json().await?;
        let files = commit.files.unwrap_or_default();
        debug!(sha, count = files.len(), "listed commit files");
        Ok(files)
    }

    /// Fetch a file's full content at the given ref.
    pub async fn fetch_file_content(
        &self,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GithubError> {
        let url = format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.context.api_url, self.context.repository, path, git_ref
        );
        let response = self.get(&url).await?;
        let contents: ContentsResponse = response.json().await?;
        decode_content(&contents.content, &contents.encoding)
    }

    /// Post the review as a pull request comment.
    pub async fn post_pr_comment(&self, pr_number: u64, body: &str) -> Result<(), GithubError> {
        // PR comments go through the issues endpoint.
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.context.api_url, self.context.repository, pr_number
        );
        self.post(&url, &json!({ "body": body })).await
    }

    /// Post the review as a commit comment. Used when the run has a SHA
    /// but no pull request number.
    pub async fn post_commit_comment(&self, sha: &str, body: &str) -> Result<(), GithubError> {
        let url = format!(
            "{}/repos/{}/commits/{}/comments",
            self.context.api_url, self.context.repository, sha
        );
        self.post(&url, &json!({ "body": body })).await
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, GithubError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.context.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", c::APP_NAME)
            .send()
            .await?;
        check_status(url, response).await
    }

    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), GithubError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.context.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", c::APP_NAME)
            .json(payload)
            .send()
            .await?;
        check_status(url, response).await?;
        Ok(())
    }
}

async fn check_status(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GithubError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

/// Decode a contents API payload. GitHub base64-encodes file bodies and
/// inserts newlines every 60 characters, which the strict decoder
/// rejects, so they are stripped first.
fn decode_content(content: &str, encoding: &str) -> Result<String, GithubError> {
    if encoding != "base64" {
        return Err(GithubError::Decode(format!(
            "unexpected content encoding: {encoding}"
        )));
    }
    let stripped: String = content.chars().filter(|ch| !ch.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(stripped)
        .map_err(|e| GithubError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GithubError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_requires_token() {
        let env = Env::mock([("GITHUB_REPOSITORY", "acme/widgets")]);
        let result = GithubContext::from_env(&env);
        assert!(matches!(result, Err(GithubError::MissingEnv("GITHUB_TOKEN"))));
    }

    #[test]
    fn context_requires_repository() {
        let env = Env::mock([("GITHUB_TOKEN", "ghs_test")]);
        let result = GithubContext::from_env(&env);
        assert!(matches!(
            result,
            Err(GithubError::MissingEnv("GITHUB_REPOSITORY"))
        ));
    }

    #[test]
    fn context_defaults_api_url() {
        let env = Env::mock([
            ("GITHUB_TOKEN", "ghs_test"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
        ]);
        let context = GithubContext::from_env(&env).unwrap();
        assert_eq!(context.api_url, "https://api.github.com");
        assert_eq!(context.pr_number, None);
    }

    #[test]
    fn context_reads_pr_number_and_sha() {
        let env = Env::mock([
            ("GITHUB_TOKEN", "ghs_test"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_API_URL", "https://github.example.com/api/v3"),
            ("PR_NUMBER", "42"),
            ("GITHUB_SHA", "abc123"),
        ]);
        let context = GithubContext::from_env(&env).unwrap();
        assert_eq!(context.api_url, "https://github.example.com/api/v3");
        assert_eq!(context.pr_number, Some(42));
        assert_eq!(context.sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn non_numeric_pr_number_is_ignored() {
        let env = Env::mock([
            ("GITHUB_TOKEN", "ghs_test"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", "not-a-number"),
        ]);
        let context = GithubContext::from_env(&env).unwrap();
        assert_eq!(context.pr_number, None);
    }

    #[test]
    fn decode_content_strips_newlines() {
        // "fn main() {}" encoded with a line break in the middle.
        let encoded = "Zm4gbWFp\nbigpIHt9";
        assert_eq!(decode_content(encoded, "base64").unwrap(), "fn main() {}");
    }

    #[test]
    fn decode_content_rejects_unknown_encoding() {
        let result = decode_content("whatever", "utf-16");
        assert!(matches!(result, Err(GithubError::Decode(_))));
    }

    #[test]
    fn removed_files_are_not_reviewable() {
        let file = ChangedFile {
            filename: "old.rs".to_string(),
            patch: None,
            status: "removed".to_string(),
        };
        assert!(!file.is_reviewable());

        let file = ChangedFile {
            filename: "new.rs".to_string(),
            patch: Some("+fn new() {}".to_string()),
            status: "added".to_string(),
        };
        assert!(file.is_reviewable());
    }
}
