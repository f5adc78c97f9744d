//! Integration test using a mock LLM provider.
//!
//! Drives the full per-file pipeline and the fan-out end-to-end without
//! real API calls, feeding it the kinds of responses models actually
//! produce: clean JSON, fenced JSON with prose around it, malformed
//! JSON, truncated JSON, and no JSON at all.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use critiq::models::{IssueType, Language, ReviewRequest, ReviewType, Severity};
use critiq::orchestrator;
use critiq::provider::{CompletionRequest, ModelProvider, ProviderError};

/// A mock provider that picks its response by the filename mentioned in
/// the prompt, so each file in a fan-out gets its own script.
struct ScriptedProvider {
    responses: HashMap<&'static str, &'static str>,
}

impl ScriptedProvider {
    fn new(scripts: &[(&'static str, &'static str)]) -> Self {
        Self {
            responses: scripts.iter().copied().collect(),
        }
    }

    /// A provider that returns the same response for every file.
    fn uniform(response: &'static str) -> Self {
        Self::new(&[("", response)])
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let response = self
            .responses
            .iter()
            .find(|(file, _)| !file.is_empty() && request.prompt.contains(*file))
            .or_else(|| self.responses.iter().find(|(file, _)| file.is_empty()))
            .map(|(_, response)| response)
            .expect("no scripted response matches the prompt");
        Ok(response.to_string())
    }
}

fn request(filename: &str) -> ReviewRequest {
    ReviewRequest::new(
        filename,
        "fn divide(a: i32, b: i32) -> i32 { a / b }",
        "+fn divide(a: i32, b: i32) -> i32 { a / b }",
        ReviewType::Full,
        Language::En,
        3,
    )
}

#[tokio::test]
async fn clean_fenced_response_round_trips() {
    let provider = ScriptedProvider::uniform(
        r#"Here is my review:

```json
{
  "summary": "Division without a zero check",
  "issues": [
    {
      "line": 1,
      "severity": "high",
      "type": "bug",
      "title": "Possible division by zero",
      "description": "b is not checked before dividing",
      "suggestion": "Return an error when b == 0",
      "code_example": "if b == 0 { return Err(...) }"
    }
  ],
  "positive_feedback": ["Small, focused function"],
  "overall_score": 6
}
```

Let me know if you need more detail."#,
    );

    let review = orchestrator::review_file(&provider, "test-model", &request("src/div.rs")).await;

    assert_eq!(review.summary, "Division without a zero check");
    assert_eq!(review.issues.len(), 1);
    assert_eq!(review.issues[0].severity, Severity::High);
    assert_eq!(review.issues[0].issue_type, IssueType::Bug);
    assert_eq!(review.issues[0].line, Some(1));
    assert_eq!(review.positive_feedback, vec!["Small, focused function"]);
    assert_eq!(review.overall_score, 6);
}

#[tokio::test]
async fn malformed_response_is_repaired() {
    // Bare keys, a bare string value, and a trailing comma.
    let provider = ScriptedProvider::uniform(
        r#"{summary: "needs quoting work", issues: [], overall_score: 7,}"#,
    );

    let review = orchestrator::review_file(&provider, "test-model", &request("src/div.rs")).await;

    assert_eq!(review.summary, "needs quoting work");
    assert!(review.issues.is_empty());
    assert_eq!(review.overall_score, 7);
}

#[tokio::test]
async fn truncated_response_recovers_complete_issues() {
    // Cut mid-way through the second issue, as happens when the model
    // hits its token limit.
    let provider = ScriptedProvider::uniform(
        r#"{
  "summary": "Two problems found",
  "issues": [
    {"line": 1, "severity": "high", "type": "bug", "title": "First",
     "description": "complete", "suggestion": "fix"},
    {"line": 2, "severity": "low", "type": "style", "title": "Second",
     "description": "this one got cut o"#,
    );

    let review = orchestrator::review_file(&provider, "test-model", &request("src/div.rs")).await;

    assert_eq!(review.summary, "Two problems found");
    assert_eq!(review.issues.len(), 1);
    assert_eq!(review.issues[0].title, "First");
    assert!(review.positive_feedback.is_empty());
}

#[tokio::test]
async fn prose_only_response_degrades_to_fallback() {
    let provider =
        ScriptedProvider::uniform("I cannot review this file, it appears to be generated.");

    let review = orchestrator::review_file(&provider, "test-model", &request("src/div.rs")).await;

    assert_eq!(review.issues.len(), 1);
    assert_eq!(review.issues[0].severity, Severity::Low);
    assert_eq!(review.issues[0].issue_type, IssueType::System);
    assert_eq!(review.overall_score, 5);
}

#[tokio::test]
async fn unknown_enum_values_normalize_to_defaults() {
    let provider = ScriptedProvider::uniform(
        r#"{"summary": "odd labels", "issues": [
            {"line": 3, "severity": "blocker", "type": "architecture",
             "title": "t", "description": "d", "suggestion": "s"}
        ], "overall_score": 4}"#,
    );

    let review = orchestrator::review_file(&provider, "test-model", &request("src/div.rs")).await;

    assert_eq!(review.issues[0].severity, Severity::Medium);
    assert_eq!(review.issues[0].issue_type, IssueType::General);
}

#[tokio::test]
async fn fan_out_keeps_per_file_results_in_input_order() {
    let provider: Arc<dyn ModelProvider> = Arc::new(ScriptedProvider::new(&[
        (
            "src/a.rs",
            r#"{"summary": "review of a", "issues": [], "overall_score": 9}"#,
        ),
        (
            "src/b.rs",
            r#"{"summary": "review of b", "issues": [], "overall_score": 3}"#,
        ),
        (
            "src/c.rs",
            "no json here at all",
        ),
    ]));

    let requests = vec![request("src/a.rs"), request("src/b.rs"), request("src/c.rs")];
    let reviews = orchestrator::review_files(provider, "test-model", requests).await;

    assert_eq!(reviews.len(), 3);
    assert_eq!(reviews[0].summary, "review of a");
    assert_eq!(reviews[0].overall_score, 9);
    assert_eq!(reviews[1].summary, "review of b");
    assert_eq!(reviews[1].overall_score, 3);
    // The third file degraded to a fallback without touching the others.
    assert_eq!(reviews[2].issues.len(), 1);
    assert_eq!(reviews[2].issues[0].issue_type, IssueType::System);
}

#[tokio::test]
async fn prompt_carries_the_issue_cap_and_filename() {
    struct CapturingProvider {
        captured: std::sync::Mutex<Option<CompletionRequest>>,
    }

    #[async_trait]
    impl ModelProvider for CapturingProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            *self.captured.lock().unwrap() = Some(request.clone());
            Ok(r#"{"summary": "ok", "issues": [], "overall_score": 8}"#.to_string())
        }
    }

    let provider = CapturingProvider {
        captured: std::sync::Mutex::new(None),
    };
    orchestrator::review_file(&provider, "test-model", &request("src/captured.rs")).await;

    let captured = provider.captured.lock().unwrap().take().unwrap();
    assert_eq!(captured.model, "test-model");
    assert_eq!(captured.max_tokens, 4_500);
    assert!(captured.prompt.contains("src/captured.rs"));
    assert!(captured.prompt.contains("AT MOST 3 issues"));
    assert!(captured.system.contains("JSON"));
}
