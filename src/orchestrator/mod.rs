//! Per-file review pipeline and the fan-out across files.
//!
//! The pipeline walks `prompt → model call → extract → parse/repair →
//! normalize` for one file and is total at its boundary: every failure
//! mode collapses into a fallback [`Review`] so callers always receive a
//! uniform value. The fan-out launches one task per file and reassembles
//! results in input order, so one file's failure (or slowness) never
//! affects its siblings.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::classify;
use crate::constants::{BASE_MAX_TOKENS, MAX_TOKENS_CEILING, TOKENS_PER_ISSUE};
use crate::extract;
use crate::models::{Review, ReviewRequest};
use crate::prompt;
use crate::provider::{classify_error, CompletionRequest, ModelProvider, ProviderError};
use crate::repair;

/// Sampling temperature for review completions. Kept low: we want the
/// most probable reading of the code, not a creative one.
const TEMPERATURE: f64 = 0.1;

/// Failure modes of the fallible inner pipeline.
///
/// None of these escape [`review_file`]; they exist so each stage can
/// bail with `?` and the boundary can phrase the fallback review.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Transport(#[from] ProviderError),

    #[error("model response contained no JSON payload")]
    NoJsonFound,

    #[error(transparent)]
    Unrepairable(#[from] repair::UnrepairableError),
}

/// Completion token budget for a request, sized by the issue cap.
fn max_tokens(max_issues_per_file: u8) -> u64 {
    (BASE_MAX_TOKENS + u64::from(max_issues_per_file) * TOKENS_PER_ISSUE).min(MAX_TOKENS_CEILING)
}

/// Review one file. Total: always returns a [`Review`], never an error.
///
/// Unrecoverable failures produce the fallback review with a single
/// synthetic issue naming the reason, so a broken file review surfaces
/// as one finding instead of aborting the run.
pub async fn review_file(
    provider: &dyn ModelProvider,
    model: &str,
    request: &ReviewRequest,
) -> Review {
    match run_pipeline(provider, model, request).await {
        Ok(review) => review,
        Err(err) => {
            let reason = match &err {
                ReviewError::Transport(e) => classify_error(e).to_string(),
                ReviewError::NoJsonFound => {
                    "the model response contained no JSON payload".to_string()
                }
                ReviewError::Unrepairable(_) => {
                    "the model response could not be parsed or repaired".to_string()
                }
            };
            warn!(file = %request.filename, error = %err, "review failed, emitting fallback");
            Review::fallback(&reason)
        }
    }
}

/// The fallible pipeline behind [`review_file`].
async fn run_pipeline(
    provider: &dyn ModelProvider,
    model: &str,
    request: &ReviewRequest,
) -> Result<Review, ReviewError> {
    let user_prompt = prompt::build(request);

    let completion = CompletionRequest {
        model: model.to_string(),
        max_tokens: max_tokens(request.max_issues_per_file),
        temperature: TEMPERATURE,
        system: prompt::SYSTEM_INSTRUCTION.to_string(),
        prompt: user_prompt,
    };

    // The only suspension point: everything after this is synchronous
    // in-memory string and parse work.
    let response = provider.complete(&completion).await?;

    let candidate = extract::extract(&response).ok_or(ReviewError::NoJsonFound)?;

    let payload = match serde_json::from_str::<serde_json::Value>(&candidate) {
        Ok(value) => value,
        Err(parse_err) => {
            debug!(file = %request.filename, error = %parse_err, "strict parse failed, repairing");
            let repaired = repair::repair(&candidate)?;
            debug!(file = %request.filename, pass = ?repaired.pass, "payload repaired");
            repaired.value
        }
    };

    Ok(classify::normalize_review(&payload))
}

/// Review many files concurrently and return results in input order.
///
/// Fan-out/fan-in: every file gets its own task, all are awaited
/// collectively, and results are reassembled by index — completion order
/// never leaks into the report. A panicked task degrades to that file's
/// fallback review.
pub async fn review_files(
    provider: Arc<dyn ModelProvider>,
    model: &str,
    requests: Vec<ReviewRequest>,
) -> Vec<Review> {
    let mut join_set = JoinSet::new();

    for (index, request) in requests.into_iter().enumerate() {
        let provider = Arc::clone(&provider);
        let model = model.to_string();
        join_set.spawn(async move {
            let review = review_file(provider.as_ref(), &model, &request).await;
            (index, review)
        });
    }

    let mut reviews: Vec<Option<Review>> = Vec::new();
    reviews.resize_with(join_set.len(), || None);

    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((index, review)) => reviews[index] = Some(review),
            Err(e) => warn!(error = %e, "review task panicked"),
        }
    }

    reviews
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Review::fallback("the review task panicked")))
        .collect()
}
